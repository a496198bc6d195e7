use super::Vec2;

/// Quadratic Bézier used for every drawn edge.
///
/// The control point sits on the perpendicular through the chord midpoint,
/// `bow * chord_length` away from it, so edges read as curved twigs rather
/// than straight rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCurve {
    pub from: Vec2,
    pub control: Vec2,
    pub to: Vec2,
}

impl EdgeCurve {
    pub fn new(from: Vec2, to: Vec2, bow: f32) -> Self {
        let chord = to - from;
        let mid = from.lerp(&to, 0.5);
        let control = mid + chord.perpendicular().scale(chord.length() * bow);
        Self { from, control, to }
    }

    /// Curve for an edge that has grown to `eased` of its length.
    ///
    /// The visible tip is `lerp(from, to, eased)`; at `eased == 1` this is
    /// exactly the static edge.
    pub fn growing(from: Vec2, to: Vec2, bow: f32, eased: f32) -> Self {
        let eased = eased.clamp(0.0, 1.0);
        if eased >= 1.0 {
            return Self::new(from, to, bow);
        }
        Self::new(from, from.lerp(&to, eased), bow)
    }

    /// Evaluate at parameter t (0.0 to 1.0)
    pub fn evaluate(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.from.scale(u * u) + self.control.scale(2.0 * u * t) + self.to.scale(t * t)
    }

    /// Sample N evenly spaced points (N >= 2 includes both endpoints)
    pub fn sample(&self, n: usize) -> Vec<Vec2> {
        (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1).max(1) as f32;
                self.evaluate(t)
            })
            .collect()
    }

    pub fn chord_length(&self) -> f32 {
        self.from.distance(&self.to)
    }

    /// Sample count that keeps pieces a few pixels long
    pub fn samples_for_length(&self) -> usize {
        ((self.chord_length() / 6.0).ceil() as usize).clamp(2, 64)
    }
}
