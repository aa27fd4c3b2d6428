//! Asset registry.
//!
//! Assets are registered by string id with a source path, then instantiated
//! in one pass through an [`AssetLoader`]. Lookups distinguish ids that were
//! never registered from ids whose loader has not run yet.
//!
//! # Manifest Format
//!
//! ```json
//! [
//!   { "id": "player", "type": "image", "source": "assets/player.png", "width": 64, "height": 32 },
//!   { "id": "jump", "type": "audio", "source": "assets/jump.ogg" }
//! ]
//! ```

use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// Kinds of asset the registry knows how to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Image,
    Audio,
}

impl AssetType {
    pub fn parse(value: &str) -> EngineResult<Self> {
        match value {
            "image" => Ok(Self::Image),
            "audio" => Ok(Self::Audio),
            other => Err(EngineError::InvalidAssetType(other.to_string())),
        }
    }
}

/// Loaded image metadata. Pixel data stays with the rendering backend, which
/// looks textures up by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub id: String,
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
}

pub type ImageHandle = Rc<ImageAsset>;

#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub id: String,
    pub source: PathBuf,
}

pub type AudioHandle = Rc<AudioClip>;

/// Registration data handed to loaders.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: PathBuf,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl AssetEntry {
    pub fn new(id: impl Into<String>, kind: AssetType, source: impl Into<PathBuf>) -> Self {
        let kind = match kind {
            AssetType::Image => "image",
            AssetType::Audio => "audio",
        };
        Self {
            id: id.into(),
            kind: kind.to_string(),
            source: source.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn asset_type(&self) -> EngineResult<AssetType> {
        AssetType::parse(&self.kind)
    }
}

/// Instantiates assets from their registration entries.
pub trait AssetLoader {
    fn load_image(&mut self, entry: &AssetEntry) -> EngineResult<ImageAsset>;
    fn load_audio(&mut self, entry: &AssetEntry) -> EngineResult<AudioClip>;
}

/// Asset payloads an [`AssetManager`] can hold.
pub trait Asset: Sized {
    const TYPE: AssetType;
    fn load(loader: &mut dyn AssetLoader, entry: &AssetEntry) -> EngineResult<Self>;
}

impl Asset for ImageAsset {
    const TYPE: AssetType = AssetType::Image;
    fn load(loader: &mut dyn AssetLoader, entry: &AssetEntry) -> EngineResult<Self> {
        loader.load_image(entry)
    }
}

impl Asset for AudioClip {
    const TYPE: AssetType = AssetType::Audio;
    fn load(loader: &mut dyn AssetLoader, entry: &AssetEntry) -> EngineResult<Self> {
        loader.load_audio(entry)
    }
}

struct Slot<T> {
    entry: AssetEntry,
    asset: Option<Rc<T>>,
}

/// Dictionary-style store of one asset type.
pub struct AssetManager<T: Asset> {
    slots: Vec<Slot<T>>,
    index: FxHashMap<String, usize>,
}

impl<T: Asset> Default for AssetManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Asset> AssetManager<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn asset_type(&self) -> AssetType {
        T::TYPE
    }

    /// Register `id` with its source. Re-registering an id replaces the
    /// previous entry and drops any loaded asset for it.
    pub fn add(&mut self, id: impl Into<String>, source: impl Into<PathBuf>) {
        self.add_entry(AssetEntry::new(id, T::TYPE, source));
    }

    /// Register a full entry, e.g. one read from a manifest.
    pub fn add_entry(&mut self, entry: AssetEntry) {
        let slot = Slot { entry, asset: None };
        match self.index.get(&slot.entry.id) {
            Some(&i) => self.slots[i] = slot,
            None => {
                self.index.insert(slot.entry.id.clone(), self.slots.len());
                self.slots.push(slot);
            }
        }
    }

    /// Instantiate every registered asset that is not loaded yet.
    pub fn load(&mut self, loader: &mut dyn AssetLoader) -> EngineResult<usize> {
        let mut loaded = 0;
        for slot in self.slots.iter_mut().filter(|s| s.asset.is_none()) {
            debug!("Loading {:?} asset '{}'", T::TYPE, slot.entry.id);
            slot.asset = Some(Rc::new(T::load(loader, &slot.entry)?));
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn get_by_id(&self, id: &str) -> EngineResult<Rc<T>> {
        let i = self
            .index
            .get(id)
            .ok_or_else(|| EngineError::AssetNotFound(id.to_string()))?;
        self.slots[*i]
            .asset
            .clone()
            .ok_or_else(|| EngineError::AssetNotLoaded(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &AssetEntry> {
        self.slots.iter().map(|s| &s.entry)
    }
}

/// Images and audio of a game.
#[derive(Default)]
pub struct Assets {
    pub images: AssetManager<ImageAsset>,
    pub audio: AssetManager<AudioClip>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every entry of a JSON manifest file.
    pub fn load_manifest(&mut self, path: impl AsRef<Path>) -> EngineResult<usize> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let count = self.register_manifest(&json)?;
        info!("Registered {} assets from {}", count, path.display());
        Ok(count)
    }

    /// Register every entry of a JSON manifest string.
    pub fn register_manifest(&mut self, json: &str) -> EngineResult<usize> {
        let entries: Vec<AssetEntry> = serde_json::from_str(json)?;
        let count = entries.len();
        for entry in entries {
            match entry.asset_type()? {
                AssetType::Image => self.images.add_entry(entry),
                AssetType::Audio => self.audio.add_entry(entry),
            }
        }
        Ok(count)
    }

    pub fn load_all(&mut self, loader: &mut dyn AssetLoader) -> EngineResult<usize> {
        Ok(self.images.load(loader)? + self.audio.load(loader)?)
    }

    pub fn image(&self, id: &str) -> EngineResult<ImageHandle> {
        self.images.get_by_id(id)
    }

    pub fn sound(&self, id: &str) -> EngineResult<AudioHandle> {
        self.audio.get_by_id(id)
    }
}

/// Loader that never touches the filesystem: image sizes come from the
/// registration entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessLoader;

impl AssetLoader for HeadlessLoader {
    fn load_image(&mut self, entry: &AssetEntry) -> EngineResult<ImageAsset> {
        match (entry.width, entry.height) {
            (Some(width), Some(height)) => Ok(ImageAsset {
                id: entry.id.clone(),
                source: entry.source.clone(),
                width,
                height,
            }),
            _ => Err(EngineError::AssetLoad {
                id: entry.id.clone(),
                reason: "headless images need a declared width and height".to_string(),
            }),
        }
    }

    fn load_audio(&mut self, entry: &AssetEntry) -> EngineResult<AudioClip> {
        Ok(AudioClip {
            id: entry.id.clone(),
            source: entry.source.clone(),
        })
    }
}
