//! Engine error types.
//!
//! Construction and lookup failures are distinct variants so callers can tell
//! "asset not loaded yet" apart from "no such asset". Missing optional hooks
//! and sprites are never errors.

/// Errors raised by the engine itself.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A sprite was requested from a missing image handle.
    #[error("Cannot build Sprite from undefined image.")]
    UndefinedImageForSprite,

    /// Sprite frame size resolved to a non-positive width or height.
    #[error("Sprite dimensions must be greater than zero (got {width}x{height}).")]
    InvalidSpriteDimensions { width: f32, height: f32 },

    /// Asset type string is neither `image` nor `audio`.
    #[error("Invalid asset type \"{0}\"")]
    InvalidAssetType(String),

    /// No asset was ever registered under this id.
    #[error("No asset exists with the given ID value: {0}")]
    AssetNotFound(String),

    /// The asset is registered but its loader has not run yet.
    #[error("Asset \"{0}\" is registered but has not been loaded")]
    AssetNotLoaded(String),

    /// The loader failed to instantiate an asset.
    #[error("Failed to load asset \"{id}\": {reason}")]
    AssetLoad { id: String, reason: String },

    /// No controller registered under this name.
    #[error("No controller registered as \"{0}\"")]
    UnknownController(String),

    /// Invalid configuration value or unreadable config file.
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Asset manifest is not valid JSON.
    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
