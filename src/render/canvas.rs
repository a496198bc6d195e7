//! CPU raster target for frames and snapshots
//!
//! Shapes are anti-aliased by analytic coverage. A stroked path builds one
//! coverage mask for the whole path and blends it once, so overlapping pieces
//! of the same path never darken their joints.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::math::Vec2;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let digits = hex.trim().trim_start_matches('#');
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| format!("invalid colour '{}'", hex))
        };
        match digits.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(format!("invalid colour '{}'", hex)),
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Same colour with its alpha scaled by `factor`
    pub fn with_alpha(&self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..*self }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Widest raster a canvas allocates; wider requests are cropped on the right
pub const MAX_SIDE: u32 = 8192;
/// Largest raster a canvas allocates; taller requests lose their bottom rows
pub const MAX_PIXELS: u64 = 4096 * 4096;

/// Size a canvas of the requested extent actually gets.
///
/// Both sides are at least 1; the buffer never exceeds `MAX_PIXELS`.
pub fn clamp_size(width: u32, height: u32) -> (u32, u32) {
    let width = width.clamp(1, MAX_SIDE);
    let max_rows = (MAX_PIXELS / width as u64).min(u32::MAX as u64) as u32;
    (width, height.clamp(1, max_rows))
}

fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Owned RGBA8 pixel buffer, row-major, top-left origin
#[derive(Debug, Clone, PartialEq)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = clamp_size(width, height);
        Self {
            width,
            height,
            pixels: vec![0; buffer_len(width, height)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Reallocate only when the clamped size actually changes
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = clamp_size(width, height);
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; buffer_len(width, height)];
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Rgba::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Source-over blend of `color` at `coverage` (0..1) into one pixel
    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let alpha = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let i = self.offset(x as u32, y as u32);
        let dst = &mut self.pixels[i..i + 4];
        let mix = |d: u8, s: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
        dst[0] = mix(dst[0], color.r);
        dst[1] = mix(dst[1], color.g);
        dst[2] = mix(dst[2], color.b);
        dst[3] = ((alpha + dst[3] as f32 / 255.0 * (1.0 - alpha)) * 255.0).round() as u8;
    }

    /// Anti-aliased filled disc
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.fill_ellipse(center, radius, radius, color);
    }

    /// Anti-aliased axis-aligned filled ellipse
    pub fn fill_ellipse(&mut self, center: Vec2, rx: f32, ry: f32, color: Rgba) {
        if !(center.is_finite() && rx > 0.0 && ry > 0.0) {
            return;
        }
        let (x0, y0, x1, y1) = self.clip_box(
            center.x - rx - 1.0,
            center.y - ry - 1.0,
            center.x + rx + 1.0,
            center.y + ry + 1.0,
        );
        let r_min = rx.min(ry);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = (x as f32 + 0.5 - center.x) / rx;
                let dy = (y as f32 + 0.5 - center.y) / ry;
                // Approximate signed distance in pixels from the outline
                let d = ((dx * dx + dy * dy).sqrt() - 1.0) * r_min;
                let coverage = (0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    /// Ring of the given stroke width
    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        if !(center.is_finite() && radius > 0.0 && width > 0.0) {
            return;
        }
        let half = width / 2.0;
        let reach = radius + half + 1.0;
        let (x0, y0, x1, y1) =
            self.clip_box(center.x - reach, center.y - reach, center.x + reach, center.y + reach);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = (p.distance(&center) - radius).abs();
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    /// Anti-aliased polyline with round joins and caps
    pub fn stroke_path(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        if points.is_empty() || width <= 0.0 || points.iter().any(|p| !p.is_finite()) {
            return;
        }
        let half = width / 2.0;
        let pad = half + 1.0;

        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let (x0, y0, x1, y1) = self.clip_box(min_x - pad, min_y - pad, max_x + pad, max_y + pad);
        if x1 < x0 || y1 < y0 {
            return;
        }

        // One mask per path: each pixel takes its best coverage over all pieces
        let mask_w = (x1 - x0 + 1) as usize;
        let mask_h = (y1 - y0 + 1) as usize;
        let mut mask = vec![0.0f32; mask_w * mask_h];

        let pieces: Vec<(Vec2, Vec2)> = if points.len() == 1 {
            vec![(points[0], points[0])]
        } else {
            points.windows(2).map(|w| (w[0], w[1])).collect()
        };

        for (a, b) in pieces {
            let (px0, py0, px1, py1) = self.clip_box(
                a.x.min(b.x) - pad,
                a.y.min(b.y) - pad,
                a.x.max(b.x) + pad,
                a.y.max(b.y) + pad,
            );
            for y in py0.max(y0)..=py1.min(y1) {
                for x in px0.max(x0)..=px1.min(x1) {
                    let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let d = distance_to_segment(p, a, b);
                    let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                    let slot = &mut mask[(y - y0) as usize * mask_w + (x - x0) as usize];
                    if coverage > *slot {
                        *slot = coverage;
                    }
                }
            }
        }

        for my in 0..mask_h {
            for mx in 0..mask_w {
                let coverage = mask[my * mask_w + mx];
                if coverage > 0.0 {
                    self.blend(x0 + mx as i64, y0 + my as i64, color, coverage);
                }
            }
        }
    }

    /// Pixel-index box covering the float rectangle, clipped to the canvas
    fn clip_box(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> (i64, i64, i64, i64) {
        let x0 = (min_x.floor() as i64).max(0);
        let y0 = (min_y.floor() as i64).max(0);
        let x1 = (max_x.ceil() as i64).min(self.width as i64 - 1);
        let y1 = (max_y.ceil() as i64).min(self.height as i64 - 1);
        (x0, y0, x1, y1)
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return p.distance(&a);
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    p.distance(&(a + ab.scale(t)))
}
