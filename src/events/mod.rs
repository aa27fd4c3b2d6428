//! Event types fed into the engine from the platform layer.
//!
//! Submodules:
//! - [`input`] – touch start / end at a de-scaled screen point
pub mod input;
