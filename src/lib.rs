//! vastengine library.
//!
//! A fixed-timestep 2D engine: entities with motion, step hooks and animated
//! sprites, grouped into controllers that are stepped on a fixed timestep and
//! drawn back to front through a [`systems::render::Canvas`].
//!
//! Entities live in a plain `Vec` owned by their [`controller::Controller`];
//! `systems` holds the per-step passes the controller runs over them.

pub mod components;
pub mod controller;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
