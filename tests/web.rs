#![cfg(target_arch = "wasm32")]

use life_architect_tree::LifeArchitect;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas(width: u32, height: u32) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(width);
    canvas.set_height(height);
    canvas
}

#[wasm_bindgen_test]
fn test_commands_round_trip_through_json() {
    let mut app = LifeArchitect::new(canvas(800, 600)).unwrap();
    let sid = app.add_structure("Health").unwrap();
    let gid = app.add_goal(&sid, "Sleep 8h").unwrap();
    assert!(app.toggle_goal(&sid, &gid).unwrap());

    let json = app.export_json();
    let mut other = LifeArchitect::new(canvas(800, 600)).unwrap();
    other.load(&json);
    assert_eq!(other.export_json(), json);
}

#[wasm_bindgen_test]
fn test_rejections_surface_as_errors() {
    let mut app = LifeArchitect::new(canvas(800, 600)).unwrap();
    assert!(app.add_structure("  ").is_err());
    assert!(app.add_goal("missing", "Goal").is_err());
    assert!(app.set_season("monsoon").is_err());
    assert!(app.configure("growth: { growth_rate: 5 }").is_err());
}

#[wasm_bindgen_test]
fn test_render_grows_canvas_to_content() {
    let element = canvas(400, 300);
    let mut app = LifeArchitect::new(element.clone()).unwrap();
    app.load(r#"{"structures":[{"id":"a","name":"A","goals":[{"id":"g","name":"G"}]}]}"#);
    app.render(1.0 / 60.0).unwrap();

    assert_eq!(element.width(), 400);
    assert_eq!(element.height(), app.snapshot_height());
    assert!(element.height() as f32 >= app.content_height());
}

#[wasm_bindgen_test]
fn test_snapshot_dimensions() {
    let mut app = LifeArchitect::new(canvas(640, 480)).unwrap();
    app.add_structure("Work").unwrap();
    let pixels = app.snapshot_pixels();
    assert_eq!(
        pixels.len(),
        (app.snapshot_width() * app.snapshot_height() * 4) as usize
    );
}

#[wasm_bindgen_test]
fn test_structures_json_lists_structures() {
    let mut app = LifeArchitect::new(canvas(800, 600)).unwrap();
    app.add_structure("Health").unwrap();
    app.set_season("winter").unwrap();
    let json = app.structures_json().unwrap();
    assert!(json.contains("\"name\":\"Health\""));
}

#[wasm_bindgen_test]
fn test_layout_json_names_nodes() {
    let mut app = LifeArchitect::new(canvas(800, 600)).unwrap();
    let sid = app.add_structure("Health").unwrap();
    app.add_goal(&sid, "Sleep 8h").unwrap();
    let json = app.layout_json().unwrap();
    assert!(json.contains("\"name\":\"Health\""));
    assert!(json.contains("\"name\":\"Sleep 8h\""));
}
