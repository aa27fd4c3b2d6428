//! Long-lived data owned by the [`Game`](crate::game::Game).
//!
//! Overview
//! - `assetstore` – images and audio keyed by id, manifests and loaders
//! - `camera2d` – view offset used for world/screen transforms
//! - `debugmode` – FPS and entity count overlay
//! - `gameconfig` – INI-backed engine settings
//! - `gamestate` – stopped / running loop state
//! - `texturestore` – raylib textures and canvas (`raylib` feature)
//! - `worldtime` – frame and step counters
pub mod assetstore;
pub mod camera2d;
pub mod debugmode;
pub mod gameconfig;
pub mod gamestate;
#[cfg(feature = "raylib")]
pub mod texturestore;
pub mod worldtime;
