//! Frame-cycle state for sprite animations.
//!
//! An [`Animation`] is either single-frame (one entry in `frames`, never
//! advances) or animating: every `frame_speed` ticks it moves to the next
//! entry, wrapping around, and fires its end callback when the frame it just
//! reached is the last one.

use std::fmt;

use smallvec::SmallVec;

/// Default number of ticks a frame stays visible.
pub const DEFAULT_FRAME_SPEED: u32 = 10;

/// Frame sequence; most sheets animate fewer than eight frames.
pub type Frames = SmallVec<[u32; 8]>;

/// What drives animation ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationTiming {
    /// One tick per draw call, so playback follows the display rate.
    Draw,
    /// One tick per simulation step.
    #[default]
    Step,
}

impl AnimationTiming {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draw" => Some(Self::Draw),
            "step" => Some(Self::Step),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::Step => "step",
        }
    }
}

pub struct Animation {
    frames: Frames,
    frame_speed: u32,
    current_frame: usize,
    counter: u32,
    on_animation_end: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("frames", &self.frames)
            .field("frame_speed", &self.frame_speed)
            .field("current_frame", &self.current_frame)
            .field("counter", &self.counter)
            .field("on_animation_end", &self.on_animation_end.is_some())
            .finish()
    }
}

impl Animation {
    /// Build an animation over `frames`, starting at position `start` of the
    /// sequence. An empty sequence becomes the single frame 0 and an out of
    /// range start is wrapped into range.
    pub fn new(frames: impl IntoIterator<Item = u32>, start: usize) -> Self {
        let mut frames: Frames = frames.into_iter().collect();
        if frames.is_empty() {
            frames.push(0);
        }
        let current_frame = start % frames.len();
        Self {
            frames,
            frame_speed: DEFAULT_FRAME_SPEED,
            current_frame,
            counter: 0,
            on_animation_end: None,
        }
    }

    /// Single-frame animation showing sheet frame `frame`.
    pub fn still(frame: u32) -> Self {
        Self::new([frame], 0)
    }

    /// Closed range `[start_frame, end_frame]` of sheet frames.
    pub fn from_range(start_frame: u32, end_frame: u32, start: usize) -> Self {
        if end_frame < start_frame {
            return Self::new([start_frame], 0);
        }
        Self::new(start_frame..=end_frame, start)
    }

    pub fn with_frame_speed(mut self, frame_speed: u32) -> Self {
        self.set_frame_speed(frame_speed);
        self
    }

    /// Values below 1 are clamped to 1.
    pub fn set_frame_speed(&mut self, frame_speed: u32) {
        self.frame_speed = frame_speed.max(1);
        self.counter %= self.frame_speed;
    }

    pub fn frame_speed(&self) -> u32 {
        self.frame_speed
    }

    pub fn frames(&self) -> &[u32] {
        &self.frames
    }

    /// Position inside `frames`.
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Sheet frame currently shown.
    pub fn current_sheet_frame(&self) -> u32 {
        self.frames[self.current_frame]
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn is_animating(&self) -> bool {
        self.frames.len() > 1
    }

    /// Jump to position `index` of the sequence and restart the counter.
    pub fn set_current_frame(&mut self, index: usize) {
        self.current_frame = index % self.frames.len();
        self.counter = 0;
    }

    pub fn set_on_animation_end(&mut self, callback: impl FnMut() + 'static) {
        self.on_animation_end = Some(Box::new(callback));
    }

    pub fn clear_on_animation_end(&mut self) {
        self.on_animation_end = None;
    }

    /// Advance by one tick. Returns true when the last frame was reached on
    /// this tick (the end callback, if any, has then been invoked).
    pub fn tick(&mut self) -> bool {
        if !self.is_animating() {
            return false;
        }
        let mut ended = false;
        if self.counter == self.frame_speed - 1 {
            self.current_frame = (self.current_frame + 1) % self.frames.len();
            if self.current_frame == self.frames.len() - 1 {
                ended = true;
                if let Some(callback) = self.on_animation_end.as_mut() {
                    callback();
                }
            }
        }
        self.counter = (self.counter + 1) % self.frame_speed;
        ended
    }
}
