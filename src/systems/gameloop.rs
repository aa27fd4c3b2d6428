//! Fixed-timestep loop.
//!
//! Wall-clock frame time is accumulated into an offset and drained in fixed
//! steps, so the simulation rate is independent of the display rate. Each
//! frame's contribution is capped (1 second by default) so a long stall does
//! not trigger a burst of catch-up steps. Steps drained while the game is
//! not running are discarded, never replayed after resuming.
//!
//! [`GameLoop`] drives a [`Game`] until its [`CancellationToken`] is
//! cancelled or the frame callback asks to stop.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use log::{info, warn};

use crate::game::Game;

/// Frame contribution cap used when the configured one is unusable.
pub const DEFAULT_MAX_FRAME_DELTA: f64 = 1.0;

/// Step accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    step_size: f64,
    max_frame_delta: f64,
    offset: f64,
}

impl FixedTimestep {
    /// `rate` steps per second, each frame contributing at most
    /// `max_frame_delta` seconds. A cap that is not a positive finite number
    /// falls back to [`DEFAULT_MAX_FRAME_DELTA`].
    pub fn new(rate: u32, max_frame_delta: f64) -> Self {
        let max_frame_delta = if max_frame_delta.is_finite() && max_frame_delta > 0.0 {
            max_frame_delta
        } else {
            warn!(
                "Ignoring max_frame_delta {}, using {}",
                max_frame_delta, DEFAULT_MAX_FRAME_DELTA
            );
            DEFAULT_MAX_FRAME_DELTA
        };
        Self {
            step_size: 1.0 / f64::from(rate.max(1)),
            max_frame_delta,
            offset: 0.0,
        }
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }

    /// Add one frame's elapsed seconds. Returns the capped amount added.
    /// Negative or NaN elapsed time adds nothing.
    pub fn accumulate(&mut self, elapsed: f64) -> f64 {
        let capped = if elapsed > 0.0 {
            elapsed.min(self.max_frame_delta)
        } else {
            0.0
        };
        self.offset += capped;
        capped
    }

    /// Take one step out of the offset if more than a full step is pending.
    pub fn consume_step(&mut self) -> bool {
        if self.offset > self.step_size {
            self.offset -= self.step_size;
            true
        } else {
            false
        }
    }

    /// Accumulate `elapsed` and drain it, returning the number of steps.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        self.accumulate(elapsed);
        let mut steps = 0;
        while self.consume_step() {
            steps += 1;
        }
        steps
    }
}

/// Millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Monotonic clock measuring from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced by hand, for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set_ms(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Frame driver for a [`Game`].
pub struct GameLoop<C: Clock> {
    clock: C,
    token: CancellationToken,
}

impl<C: Clock> GameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            token: CancellationToken::new(),
        }
    }

    /// Token that stops this loop before its next frame.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Start `game` and call `frame` with the current time once per frame
    /// until the token is cancelled or `frame` returns false. `frame` is
    /// expected to call [`Game::frame`] with a canvas for that frame.
    pub fn run<F>(&mut self, game: &mut Game, mut frame: F) -> u64
    where
        F: FnMut(&mut Game, f64) -> bool,
    {
        game.run(self.clock.now_ms());
        let mut frames = 0;
        while !self.token.is_cancelled() {
            let now = self.clock.now_ms();
            if !frame(game, now) {
                break;
            }
            frames += 1;
        }
        info!("Game loop finished after {} frames", frames);
        frames
    }
}
