//! Entity building blocks.
//!
//! Submodules overview:
//! - [`animation`] – frame cycle with per-frame tick count and end callback
//! - [`boxcollider`] – axis-aligned bounding box, overlap and point tests
//! - [`entity`] – positioned unit with motion, depth, sprite and hooks
//! - [`mapposition`] – distance, direction and length-direction helpers
//! - [`sprite`] – sprite sheet image plus animation

pub mod animation;
pub mod boxcollider;
pub mod entity;
pub mod mapposition;
pub mod sprite;
