//! Controller view (camera offset) and canvas scaling.
//!
//! The view is the world position of the screen's top-left corner. Entity
//! positions minus the view give screen-relative draw coordinates.
//!
//! [`CanvasTransform`] maps canvas pixels to the output surface: a uniform
//! scale, optionally about the canvas center.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct View {
    pub x: f32,
    pub y: f32,
}

impl View {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Screen position of a world point.
    pub fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.x, y - self.y)
    }

    /// World position of a screen point.
    pub fn to_world(&self, x: f32, y: f32) -> (f32, f32) {
        (x + self.x, y + self.y)
    }
}

/// Canvas-to-surface scaling.
///
/// Surface = (canvas - offset) * scale. With an offset of
/// `(w - w / scale) / 2` the canvas center stays at the surface center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::scaled(1.0)
    }
}

impl CanvasTransform {
    /// Scale from the top-left corner.
    pub fn scaled(scale: f32) -> Self {
        Self {
            scale,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Scale about the center of a `width` x `height` surface.
    pub fn centered(scale: f32, width: f32, height: f32) -> Self {
        Self {
            scale,
            offset_x: (width - width / scale) / 2.0,
            offset_y: (height - height / scale) / 2.0,
        }
    }

    /// Surface position of a canvas point.
    pub fn to_surface(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.offset_x) * self.scale, (y - self.offset_y) * self.scale)
    }

    /// Surface length of a canvas length.
    pub fn length(&self, len: f32) -> f32 {
        len * self.scale
    }

    /// Canvas position of a surface point, such as a mouse position.
    pub fn to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        (x / self.scale + self.offset_x, y / self.scale + self.offset_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_offsets_both_ways() {
        let view = View::new(30.0, 10.0);
        assert_eq!(view.to_screen(50.0, 40.0), (20.0, 30.0));
        assert_eq!(view.to_world(20.0, 30.0), (50.0, 40.0));
    }

    #[test]
    fn corner_scaling_keeps_the_origin() {
        let t = CanvasTransform::scaled(2.0);
        assert_eq!(t.to_surface(0.0, 0.0), (0.0, 0.0));
        assert_eq!(t.to_surface(100.0, 50.0), (200.0, 100.0));
        assert_eq!(t.to_canvas(200.0, 100.0), (100.0, 50.0));
    }

    #[test]
    fn centered_scaling_keeps_the_center() {
        let t = CanvasTransform::centered(2.0, 640.0, 480.0);
        assert_eq!((t.offset_x, t.offset_y), (160.0, 120.0));
        assert_eq!(t.to_surface(320.0, 240.0), (320.0, 240.0));
        assert_eq!(t.to_canvas(320.0, 240.0), (320.0, 240.0));
        // The top-left surface pixel shows the canvas point a quarter in.
        assert_eq!(t.to_canvas(0.0, 0.0), (160.0, 120.0));
        assert_eq!(t.length(16.0), 32.0);
    }
}
