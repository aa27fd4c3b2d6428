//! Touch input events.
//!
//! Coordinates are screen coordinates that the platform layer has already
//! un-scaled to canvas pixels.

/// Start or end of a touch (mouse down / mouse up).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub x: f32,
    pub y: f32,
}

impl TouchEvent {
    pub fn start(x: f32, y: f32) -> Self {
        Self {
            phase: TouchPhase::Start,
            x,
            y,
        }
    }

    pub fn end(x: f32, y: f32) -> Self {
        Self {
            phase: TouchPhase::End,
            x,
            y,
        }
    }
}
