use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};
use super::canvas::PixelCanvas;

/// The page's `<canvas>` plus its 2D context
pub struct CanvasSurface {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, String> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("Failed to get 2D context: {:?}", e))?
            .ok_or("Canvas has no 2D context")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Context is not a CanvasRenderingContext2d".to_string())?;

        Ok(Self { canvas, ctx })
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Copy a rendered frame onto the page, growing the element to fit it
    pub fn present(&self, frame: &PixelCanvas) -> Result<(), String> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(());
        }
        if self.canvas.width() != frame.width() {
            self.canvas.set_width(frame.width());
        }
        if self.canvas.height() != frame.height() {
            self.canvas.set_height(frame.height());
        }

        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(frame.pixels()),
            frame.width(),
            frame.height(),
        )
        .map_err(|e| format!("Failed to create ImageData: {:?}", e))?;

        self.ctx
            .put_image_data(&image, 0.0, 0.0)
            .map_err(|e| format!("Failed to blit frame: {:?}", e))
    }
}
