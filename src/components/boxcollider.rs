/// Axis-aligned box anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Overlap test in whole units: boxes collide only when they share at
    /// least one unit on both axes. Edge-adjacent boxes (`[0, 10)` and
    /// `[10, 20)`) do not collide. Grid-snapped movement depends on these
    /// exact thresholds.
    pub fn collides_with(&self, other: &Self) -> bool {
        !((self.x + self.width < other.x + 1.0)
            || (other.x + other.width - 1.0 < self.x)
            || (self.y + self.height < other.y + 1.0)
            || (other.y + other.height - 1.0 < self.y))
    }

    /// Strict interior point test. Boundary points are outside, so zero-area
    /// boxes never contain anything.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x > self.x && y > self.y && x < self.x + self.width && y < self.y + self.height
    }

    /// True when both sides are positive.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}
