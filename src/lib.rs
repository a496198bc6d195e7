use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub mod data;
pub mod math;
pub mod layout;
pub mod animation;
pub mod particles;
pub mod render;
pub mod interaction;
pub mod visual;
pub mod config;
pub mod logging;
pub mod engine;

// Re-export visual analyzer for JavaScript
pub use visual::metrics::VisualAnalyzer;

use config::EngineConfig;
use data::{GoalId, StructureId};
use engine::Engine;
use interaction::Hit;
use math::Vec2;
use particles::Season;
use render::CanvasSurface;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if let Err(e) = logging::init_logging("info") {
        web_sys::console::warn_1(&JsValue::from_str(&e));
    }
}

/// Main engine state exposed to JavaScript
#[wasm_bindgen]
pub struct LifeArchitect {
    engine: Engine,
    surface: CanvasSurface,
}

#[wasm_bindgen]
impl LifeArchitect {
    /// Create an engine drawing into `canvas`
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<LifeArchitect, JsValue> {
        let surface = CanvasSurface::new(canvas).map_err(|e| JsValue::from_str(&e))?;

        let mut config = EngineConfig::default();
        config.particles.seed = Some(random_seed());
        let engine = Engine::new(surface.width() as f32, surface.height() as f32, config);

        Ok(Self { engine, surface })
    }

    /// Create an engine for the `<canvas>` with the given element id
    #[wasm_bindgen]
    pub fn from_canvas_id(id: &str) -> Result<LifeArchitect, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("No document available")?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("No element with id '{}'", id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("Element '{}' is not a canvas", id)))?;
        Self::new(canvas)
    }

    /// Load a persisted tree snapshot (JSON); unusable input yields an empty tree
    #[wasm_bindgen]
    pub fn load(&mut self, json: &str) {
        self.engine.load_snapshot(json);
    }

    /// Current tree as JSON, for the host to persist
    #[wasm_bindgen]
    pub fn export_json(&self) -> String {
        self.engine.tree().to_json()
    }

    /// Apply a YAML configuration document
    #[wasm_bindgen]
    pub fn configure(&mut self, yaml: &str) -> Result<(), JsValue> {
        let mut config = EngineConfig::from_yaml(yaml).map_err(|e| JsValue::from_str(&e))?;
        if config.particles.seed.is_none() {
            config.particles.seed = self.engine.config().particles.seed;
        }
        self.engine.configure(config).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen]
    pub fn set_season(&mut self, name: &str) -> Result<(), JsValue> {
        let season: Season = name.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.engine.set_season(season);
        Ok(())
    }

    /// Resize the viewport; the canvas element follows on the next render
    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) {
        self.engine.resize(width, height);
    }

    /// Update and render a frame `dt` seconds after the previous one
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) -> Result<(), JsValue> {
        let frame = self.engine.frame(dt);
        self.surface.present(frame).map_err(|e| JsValue::from_str(&e))
    }

    /// Update and render a frame timed by `performance.now()`
    #[wasm_bindgen]
    pub fn tick(&mut self) -> Result<(), JsValue> {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .ok_or("performance.now() is unavailable")?;
        let frame = self.engine.frame_at(now);
        self.surface.present(frame).map_err(|e| JsValue::from_str(&e))
    }

    // === Commands ===

    /// Returns the new structure's id
    #[wasm_bindgen]
    pub fn add_structure(&mut self, name: &str) -> Result<String, JsValue> {
        self.engine
            .add_structure(name)
            .map(|id| id.to_string())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Returns the new goal's id
    #[wasm_bindgen]
    pub fn add_goal(&mut self, structure_id: &str, name: &str) -> Result<String, JsValue> {
        self.engine
            .add_goal(&StructureId::new(structure_id), name)
            .map(|id| id.to_string())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn toggle_goal(&mut self, structure_id: &str, goal_id: &str) -> Result<bool, JsValue> {
        self.engine
            .toggle_goal(&StructureId::new(structure_id), &GoalId::new(goal_id))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn toggle_collapsed(&mut self, structure_id: &str) -> Result<bool, JsValue> {
        self.engine
            .toggle_collapsed(&StructureId::new(structure_id))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn clear_all(&mut self) {
        self.engine.clear_all();
    }

    /// Handle a click in canvas coordinates; returns the toggled node's id
    #[wasm_bindgen]
    pub fn click(&mut self, x: f32, y: f32) -> Result<Option<String>, JsValue> {
        let hit = self
            .engine
            .click(x, y)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(hit.map(|hit| match hit {
            Hit::Structure(sid) => sid.to_string(),
            Hit::Goal(_, gid) => gid.to_string(),
        }))
    }

    /// Complete the growth instantly
    #[wasm_bindgen]
    pub fn complete_growth(&mut self) {
        self.engine.complete_growth();
    }

    // === Export ===

    /// RGBA pixels of the still export (every edge grown, no particles)
    #[wasm_bindgen]
    pub fn snapshot_pixels(&self) -> Vec<u8> {
        self.engine.snapshot().pixels
    }

    #[wasm_bindgen]
    pub fn snapshot_width(&self) -> u32 {
        self.engine.surface_size().0
    }

    #[wasm_bindgen]
    pub fn snapshot_height(&self) -> u32 {
        self.engine.surface_size().1
    }

    #[wasm_bindgen]
    pub fn content_height(&self) -> f32 {
        self.engine.content_height()
    }

    /// Structures as `[{id, name, goals, completed, collapsed}]` JSON
    #[wasm_bindgen]
    pub fn structures_json(&self) -> Result<String, JsValue> {
        structures_json(&self.engine).map_err(|e| JsValue::from_str(&e))
    }

    /// Placed nodes as `{trunk, branches, leaves}` JSON, for drawing labels
    #[wasm_bindgen]
    pub fn layout_json(&self) -> Result<String, JsValue> {
        layout_json(&self.engine).map_err(|e| JsValue::from_str(&e))
    }
}

#[derive(Serialize)]
struct StructureOption<'a> {
    id: &'a str,
    name: &'a str,
    goals: usize,
    completed: usize,
    collapsed: bool,
}

fn structures_json(engine: &Engine) -> Result<String, String> {
    let options: Vec<StructureOption> = engine
        .tree()
        .structures
        .iter()
        .map(|s| StructureOption {
            id: s.id.as_str(),
            name: &s.name,
            goals: s.goals.len(),
            completed: s.completed_count(),
            collapsed: s.collapsed,
        })
        .collect();
    serde_json::to_string(&options).map_err(|e| e.to_string())
}

#[derive(Serialize)]
struct PlacedBranch<'a> {
    id: &'a str,
    name: &'a str,
    x: f32,
    y: f32,
    collapsed: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlacedLeaf<'a> {
    id: &'a str,
    structure_id: &'a str,
    name: &'a str,
    x: f32,
    y: f32,
    complete: bool,
}

#[derive(Serialize)]
struct PlacedTree<'a> {
    trunk: Vec2,
    branches: Vec<PlacedBranch<'a>>,
    leaves: Vec<PlacedLeaf<'a>>,
}

fn layout_json(engine: &Engine) -> Result<String, String> {
    let layout = engine.layout();
    let placed = PlacedTree {
        trunk: layout.trunk,
        branches: layout
            .branches
            .iter()
            .map(|b| PlacedBranch {
                id: b.structure_id.as_str(),
                name: &b.name,
                x: b.position.x,
                y: b.position.y,
                collapsed: b.collapsed,
            })
            .collect(),
        leaves: layout
            .leaves
            .iter()
            .map(|l| PlacedLeaf {
                id: l.goal_id.as_str(),
                structure_id: l.structure_id.as_str(),
                name: &l.name,
                x: l.position.x,
                y: l.position.y,
                complete: l.complete,
            })
            .collect(),
    };
    serde_json::to_string(&placed).map_err(|e| e.to_string())
}

/// Particle seed from the host's random source
fn random_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64
}
