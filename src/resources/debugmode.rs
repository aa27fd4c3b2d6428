//! Debug overlay.
//!
//! When shown, the overlay writes the measured frame rate and the active
//! controller's entity count in the top-left corner, after the scene.

use crate::systems::render::Canvas;

const LEFT: f32 = 16.0;
const TOP: f32 = 32.0;
const LINE_HEIGHT: f32 = 20.0;

#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    pub show: bool,
    fps: u32,
    frames_this_second: u32,
    second_started_ms: Option<f64>,
}

impl DebugOverlay {
    pub fn new(show: bool) -> Self {
        Self {
            show,
            ..Self::default()
        }
    }

    pub fn toggle(&mut self) {
        self.show = !self.show;
    }

    /// Frames counted during the last whole second.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Count one frame rendered at `now_ms`.
    pub fn record_frame(&mut self, now_ms: f64) {
        let started = *self.second_started_ms.get_or_insert(now_ms);
        if now_ms - started >= 1000.0 {
            self.fps = self.frames_this_second;
            self.frames_this_second = 0;
            self.second_started_ms = Some(now_ms);
        }
        self.frames_this_second += 1;
    }

    pub fn lines(&self, entity_count: Option<usize>) -> Vec<String> {
        let mut lines = vec![format!("FPS: {}", self.fps)];
        if let Some(count) = entity_count {
            lines.push(format!("Entities: {}", count));
        }
        lines
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, entity_count: Option<usize>) {
        if !self.show {
            return;
        }
        canvas.save();
        for (i, line) in self.lines(entity_count).iter().enumerate() {
            canvas.fill_text(line, LEFT, TOP + i as f32 * LINE_HEIGHT);
        }
        canvas.restore();
    }
}
