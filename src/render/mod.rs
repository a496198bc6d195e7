pub mod canvas;
pub mod theme;
pub mod pipeline;
pub mod web;

pub use canvas::{PixelCanvas, Rgba};
pub use theme::Palette;
pub use pipeline::RenderPipeline;
pub use web::CanvasSurface;
