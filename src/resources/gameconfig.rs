//! Game configuration resource.
//!
//! Manages engine settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [game]
//! speed = 60
//! frame_speed = 10
//! max_frame_delta = 1.0
//! animation_timing = step
//!
//! [canvas]
//! width = 640
//! height = 480
//! scale = 1.0
//! fullscreen = false
//! scale_center = false
//!
//! [debug]
//! show = false
//! ```

use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::components::animation::{AnimationTiming, DEFAULT_FRAME_SPEED};
use crate::error::{EngineError, EngineResult};
use crate::resources::camera2d::CanvasTransform;

/// Default safe values for startup
const DEFAULT_GAME_SPEED: u32 = 60;
const DEFAULT_MAX_FRAME_DELTA: f64 = 1.0;
const DEFAULT_CANVAS_WIDTH: u32 = 640;
const DEFAULT_CANVAS_HEIGHT: u32 = 480;
const DEFAULT_SCALE: f32 = 1.0;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_SCALE_CENTER: bool = false;
const DEFAULT_SHOW_DEBUG: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Simulation steps per second.
    pub game_speed: u32,
    /// Animation ticks per sprite frame for new sprites.
    pub default_frame_speed: u32,
    /// Upper bound, in seconds, on the time one frame may feed the simulation.
    pub max_frame_delta: f64,
    /// What drives sprite animation ticks.
    pub animation_timing: AnimationTiming,
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Output scale factor.
    pub scale: f32,
    pub fullscreen: bool,
    /// Scale about the canvas center instead of its top-left corner.
    pub scale_center: bool,
    /// Start with the debug overlay visible.
    pub show_debug: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            game_speed: DEFAULT_GAME_SPEED,
            default_frame_speed: DEFAULT_FRAME_SPEED,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            animation_timing: AnimationTiming::default(),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            scale: DEFAULT_SCALE,
            fullscreen: DEFAULT_FULLSCREEN,
            scale_center: DEFAULT_SCALE_CENTER,
            show_debug: DEFAULT_SHOW_DEBUG,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Seconds per simulation step.
    pub fn step_size(&self) -> f64 {
        1.0 / f64::from(self.game_speed.max(1))
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. Out of range
    /// values are rejected.
    pub fn load_from_file(&mut self) -> EngineResult<()> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| EngineError::Config(format!("Failed to load config file: {}", e)))?;
        self.apply(&config)?;

        info!(
            "Loaded config: speed={}, frame_speed={}, timing={}, canvas={}x{} scale={}, fullscreen={}",
            self.game_speed,
            self.default_frame_speed,
            self.animation_timing.as_str(),
            self.canvas_width,
            self.canvas_height,
            self.scale,
            self.fullscreen
        );

        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> EngineResult<()> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> EngineResult<()> {
        // [game] section
        if let Some(speed) = config.getuint("game", "speed").ok().flatten() {
            if speed == 0 {
                return Err(EngineError::Config("game speed must be at least 1".to_string()));
            }
            self.game_speed = to_u32("game", "speed", speed)?;
        }
        if let Some(frame_speed) = config.getuint("game", "frame_speed").ok().flatten() {
            self.default_frame_speed = to_u32("game", "frame_speed", frame_speed)?.max(1);
        }
        if let Some(delta) = config.getfloat("game", "max_frame_delta").ok().flatten() {
            if !(delta.is_finite() && delta > 0.0) {
                return Err(EngineError::Config(
                    "max_frame_delta must be a positive number of seconds".to_string(),
                ));
            }
            self.max_frame_delta = delta;
        }
        if let Some(timing) = config.get("game", "animation_timing") {
            match AnimationTiming::parse(&timing) {
                Some(timing) => self.animation_timing = timing,
                None => warn!("Unknown animation_timing '{}', keeping {}", timing, self.animation_timing.as_str()),
            }
        }

        // [canvas] section
        if let Some(width) = config.getuint("canvas", "width").ok().flatten() {
            self.canvas_width = to_u32("canvas", "width", width)?;
        }
        if let Some(height) = config.getuint("canvas", "height").ok().flatten() {
            self.canvas_height = to_u32("canvas", "height", height)?;
        }
        if let Some(scale) = config.getfloat("canvas", "scale").ok().flatten() {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(EngineError::Config("canvas scale must be positive".to_string()));
            }
            self.scale = scale as f32;
        }
        if let Some(fullscreen) = config.getbool("canvas", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }
        if let Some(scale_center) = config.getbool("canvas", "scale_center").ok().flatten() {
            self.scale_center = scale_center;
        }

        // [debug] section
        if let Some(show) = config.getbool("debug", "show").ok().flatten() {
            self.show_debug = show;
        }

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> EngineResult<()> {
        let mut config = Ini::new();

        // [game] section
        config.set("game", "speed", Some(self.game_speed.to_string()));
        config.set("game", "frame_speed", Some(self.default_frame_speed.to_string()));
        config.set("game", "max_frame_delta", Some(self.max_frame_delta.to_string()));
        config.set(
            "game",
            "animation_timing",
            Some(self.animation_timing.as_str().to_string()),
        );

        // [canvas] section
        config.set("canvas", "width", Some(self.canvas_width.to_string()));
        config.set("canvas", "height", Some(self.canvas_height.to_string()));
        config.set("canvas", "scale", Some(self.scale.to_string()));
        config.set("canvas", "fullscreen", Some(self.fullscreen.to_string()));
        config.set("canvas", "scale_center", Some(self.scale_center.to_string()));

        // [debug] section
        config.set("debug", "show", Some(self.show_debug.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| EngineError::Config(format!("Failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Output surface size. Center scaling zooms within the canvas size;
    /// corner scaling grows the surface with the scale.
    pub fn scaled_canvas_size(&self) -> (u32, u32) {
        if self.scale_center {
            return (self.canvas_width, self.canvas_height);
        }
        (
            (self.canvas_width as f32 * self.scale).round() as u32,
            (self.canvas_height as f32 * self.scale).round() as u32,
        )
    }

    /// Canvas-to-surface transform for the configured scale mode.
    pub fn canvas_transform(&self) -> CanvasTransform {
        if self.scale_center {
            CanvasTransform::centered(
                self.scale,
                self.canvas_width as f32,
                self.canvas_height as f32,
            )
        } else {
            CanvasTransform::scaled(self.scale)
        }
    }
}

fn to_u32(section: &str, key: &str, value: u64) -> EngineResult<u32> {
    u32::try_from(value)
        .map_err(|_| EngineError::Config(format!("[{}] {} = {} is out of range", section, key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_constants() {
        let config = GameConfig::new();
        assert_eq!(config.game_speed, 60);
        assert_eq!(config.default_frame_speed, 10);
        assert_eq!(config.max_frame_delta, 1.0);
        assert_eq!(config.animation_timing, AnimationTiming::Step);
        assert_eq!((config.canvas_width, config.canvas_height), (640, 480));
        assert!((config.step_size() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[game]\nspeed = 30\nanimation_timing = draw\n[canvas]\nscale = 2\n")
            .unwrap();
        assert_eq!(config.game_speed, 30);
        assert_eq!(config.animation_timing, AnimationTiming::Draw);
        assert_eq!(config.scale, 2.0);
        assert_eq!(config.default_frame_speed, 10);
        assert_eq!(config.scaled_canvas_size(), (1280, 960));
    }

    #[test]
    fn zero_speed_is_rejected() {
        let mut config = GameConfig::new();
        let err = config.load_from_str("[game]\nspeed = 0\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn non_finite_or_negative_frame_delta_is_rejected() {
        for text in ["nan", "inf", "-1.0", "0"] {
            let mut config = GameConfig::new();
            let err = config
                .load_from_str(&format!("[game]\nmax_frame_delta = {}\n", text))
                .unwrap_err();
            assert!(matches!(err, EngineError::Config(_)), "{text}");
            assert_eq!(config.max_frame_delta, 1.0);
        }
    }

    #[test]
    fn values_past_u32_are_rejected() {
        let mut config = GameConfig::new();
        let err = config.load_from_str("[game]\nspeed = 4294967296\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(msg) if msg.contains("speed")));
        assert_eq!(config.game_speed, 60);

        let err = config.load_from_str("[canvas]\nwidth = 99999999999\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert_eq!(config.canvas_width, 640);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let mut config = GameConfig::new();
        assert!(config.load_from_str("[canvas]\nscale = 0\n").is_err());
        assert_eq!(config.scale, 1.0);
    }

    #[test]
    fn scale_center_zooms_about_the_middle() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[canvas]\nscale = 2\nscale_center = true\n")
            .unwrap();
        assert_eq!(config.scaled_canvas_size(), (640, 480));
        let transform = config.canvas_transform();
        assert_eq!(transform.to_canvas(320.0, 240.0), (320.0, 240.0));
        assert_eq!(transform.to_canvas(0.0, 0.0), (160.0, 120.0));

        config.scale_center = false;
        assert_eq!(config.scaled_canvas_size(), (1280, 960));
        assert_eq!(config.canvas_transform().to_canvas(320.0, 240.0), (160.0, 120.0));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let mut saved = GameConfig::with_path(&path);
        saved.game_speed = 120;
        saved.show_debug = true;
        saved.animation_timing = AnimationTiming::Draw;
        saved.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let mut config = GameConfig::with_path("/definitely/not/here/config.ini");
        assert!(matches!(config.load_from_file(), Err(EngineError::Config(_))));
    }
}
