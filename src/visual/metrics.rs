//! Frame metrics for automated visual checks
//!
//! Tests render a frame or snapshot and assert on these numbers instead of
//! comparing against golden images: how much of the surface carries ink,
//! where it sits, and what hue dominates.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use crate::render::Rgba;

/// A pixel counts as ink when its channels differ from the background by
/// more than this sum
const INK_THRESHOLD: u32 = 24;

/// Bounding box of ink pixels, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InkBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl InkBounds {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Metrics computed from one rendered frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMetrics {
    /// Fraction of pixels that are not background (0-1)
    pub ink_coverage: f32,
    /// Average luminance over all pixels (0-1)
    pub avg_brightness: f32,
    /// Centre of the most populated 30° hue bin among ink pixels
    pub dominant_hue: Option<f32>,
    pub ink_bounds: Option<InkBounds>,
    /// Normalized 12-bin hue histogram of ink pixels
    pub hue_histogram: [f32; 12],
}

/// Analyze RGBA pixel data drawn over `background`
pub fn analyze_frame(pixels: &[u8], width: u32, height: u32, background: Rgba) -> FrameMetrics {
    let pixel_count = (width as usize) * (height as usize);
    if pixel_count == 0 || pixels.len() < pixel_count * 4 {
        return FrameMetrics::default();
    }

    let mut total_brightness = 0.0f64;
    let mut ink = 0u32;
    let mut bounds: Option<InkBounds> = None;
    let mut hue_counts = [0u32; 12];

    for (i, px) in pixels.chunks_exact(4).take(pixel_count).enumerate() {
        let r = px[0] as f32 / 255.0;
        let g = px[1] as f32 / 255.0;
        let b = px[2] as f32 / 255.0;
        total_brightness += (0.299 * r + 0.587 * g + 0.114 * b) as f64;

        let diff = px[0].abs_diff(background.r) as u32
            + px[1].abs_diff(background.g) as u32
            + px[2].abs_diff(background.b) as u32;
        if diff <= INK_THRESHOLD {
            continue;
        }

        ink += 1;
        let x = (i % width as usize) as u32;
        let y = (i / width as usize) as u32;
        bounds = Some(match bounds {
            None => InkBounds { min_x: x, min_y: y, max_x: x, max_y: y },
            Some(b) => InkBounds {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });

        let (h, s, _v) = rgb_to_hsv(r, g, b);
        if s > 0.1 {
            hue_counts[((h / 30.0).floor() as usize) % 12] += 1;
        }
    }

    let colored: u32 = hue_counts.iter().sum();
    let mut hue_histogram = [0.0f32; 12];
    let mut peak: Option<(usize, u32)> = None;
    for (bin, &count) in hue_counts.iter().enumerate() {
        if colored > 0 {
            hue_histogram[bin] = count as f32 / colored as f32;
        }
        if count > 0 && peak.map_or(true, |(_, best)| count > best) {
            peak = Some((bin, count));
        }
    }

    FrameMetrics {
        ink_coverage: ink as f32 / pixel_count as f32,
        avg_brightness: (total_brightness / pixel_count as f64) as f32,
        dominant_hue: peak.map(|(bin, _)| bin as f32 * 30.0 + 15.0),
        ink_bounds: bounds,
        hue_histogram,
    }
}

/// Convert RGB (0-1) to HSV (hue: 0-360, saturation: 0-1, value: 0-1)
fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta / max } else { 0.0 };

    let h = if delta < 0.0001 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    let h = if h < 0.0 { h + 360.0 } else { h };

    (h, s, max)
}

/// Frame analysis callable from JavaScript
#[wasm_bindgen]
pub struct VisualAnalyzer;

#[wasm_bindgen]
impl VisualAnalyzer {
    /// Analyze pixel data drawn over a `#rrggbb` background; returns JSON
    #[wasm_bindgen]
    pub fn analyze(pixels: &[u8], width: u32, height: u32, background: &str) -> Result<String, JsValue> {
        let background = Rgba::from_hex(background).map_err(|e| JsValue::from_str(&e))?;
        let metrics = analyze_frame(pixels, width, height, background);
        serde_json::to_string(&metrics).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
