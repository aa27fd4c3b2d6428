/// Simulation and wall-clock bookkeeping for the game loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTime {
    /// Wall-clock seconds fed into the loop since `run`, after capping.
    pub elapsed: f64,
    /// Capped seconds of the latest frame.
    pub delta: f64,
    /// Frames rendered since `run`.
    pub frame_count: u64,
    /// Simulation steps executed since `run`.
    pub step_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            frame_count: 0,
            step_count: 0,
        }
    }
}

impl WorldTime {
    /// Seconds of simulated time, `step_count * step_size`.
    pub fn simulated_seconds(&self, step_size: f64) -> f64 {
        self.step_count as f64 * step_size
    }
}
