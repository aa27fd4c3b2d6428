//! Rendering surface abstraction and frame composition.
//!
//! The engine never talks to a graphics API directly. Everything is drawn
//! through a [`Canvas`], which the windowed backend implements on top of
//! raylib and [`RecordingCanvas`] implements as a call log for headless runs
//! and tests.

use crate::controller::Controller;
use crate::resources::assetstore::ImageAsset;
use crate::resources::debugmode::DebugOverlay;

/// Rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// 2D drawing context.
pub trait Canvas {
    /// Blit the `src` region of `image` into `dest`.
    fn draw_image(&mut self, image: &ImageAsset, src: Rect, dest: Rect);

    fn save(&mut self) {}

    fn restore(&mut self) {}

    fn clear_rect(&mut self, _rect: Rect) {}

    fn fill_text(&mut self, _text: &str, _x: f32, _y: f32) {}
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Image { image: String, src: Rect, dest: Rect },
    Save,
    Restore,
    Clear(Rect),
    Text { text: String, x: f32, y: f32 },
}

/// Canvas that keeps every call in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Image ids in paint order.
    pub fn painted_images(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { image, .. } => Some(image.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn draw_image(&mut self, image: &ImageAsset, src: Rect, dest: Rect) {
        self.commands.push(DrawCommand::Image {
            image: image.id.clone(),
            src,
            dest,
        });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Clear(rect));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
        });
    }
}

/// Compose one frame: clear the canvas, paint the active controller's
/// entities and its overlay hook, then the debug overlay on top.
pub fn render_frame(
    canvas: &mut dyn Canvas,
    controller: Option<&mut Controller>,
    debug: &DebugOverlay,
    size: (u32, u32),
) {
    canvas.save();
    canvas.clear_rect(Rect::new(0.0, 0.0, size.0 as f32, size.1 as f32));
    let entity_count = match controller {
        Some(controller) => {
            controller.draw_entities(canvas);
            controller.draw_overlay(canvas);
            Some(controller.len())
        }
        None => None,
    };
    canvas.restore();

    debug.draw(canvas, entity_count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;

    #[test]
    fn frame_clears_then_draws_scene_then_overlay() {
        let mut ctrl = Controller::new();
        ctrl.add_entity(Entity::new("thing", 1));
        ctrl.set_draw(|c: &Controller, canvas: &mut dyn Canvas| {
            canvas.fill_text(&format!("view {}", c.view().x), 0.0, 0.0)
        });
        let debug = DebugOverlay::new(true);

        let mut canvas = RecordingCanvas::new();
        render_frame(&mut canvas, Some(&mut ctrl), &debug, (640, 480));

        assert_eq!(canvas.commands[0], DrawCommand::Save);
        assert_eq!(
            canvas.commands[1],
            DrawCommand::Clear(Rect::new(0.0, 0.0, 640.0, 480.0))
        );
        assert_eq!(canvas.texts(), vec!["view 0", "FPS: 0", "Entities: 1"]);
    }

    #[test]
    fn frame_without_controller_still_clears() {
        let mut canvas = RecordingCanvas::new();
        render_frame(&mut canvas, None, &DebugOverlay::new(false), (10, 10));
        assert_eq!(
            canvas.commands,
            vec![
                DrawCommand::Save,
                DrawCommand::Clear(Rect::new(0.0, 0.0, 10.0, 10.0)),
                DrawCommand::Restore
            ]
        );
    }
}
