//! Game loop state.
//!
//! The loop keeps rendering in every state; only `Running` advances the
//! simulation.

/// Discrete states the game loop can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Stopped,
    Running,
}

impl GameState {
    pub fn is_running(&self) -> bool {
        matches!(self, GameState::Running)
    }
}
