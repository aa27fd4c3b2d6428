//! Raylib texture storage and canvas.
//!
//! Only built with the `raylib` feature. [`RaylibLoader`] turns image
//! entries into GPU textures kept in a [`TextureStore`], and
//! [`RaylibCanvas`] paints engine draw calls with those textures.

use log::info;
use raylib::prelude::*;
use rustc_hash::FxHashMap;

use crate::error::{EngineError, EngineResult};
use crate::resources::assetstore::{AssetEntry, AssetLoader, AudioClip, ImageAsset};
use crate::resources::camera2d::CanvasTransform;
use crate::systems::render::{Canvas, Rect};

const TEXT_SIZE: i32 = 20;

/// Loaded textures keyed by image id.
#[derive(Default)]
pub struct TextureStore {
    pub map: FxHashMap<String, Texture2D>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Texture2D> {
        self.map.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, texture: Texture2D) {
        self.map.insert(id.into(), texture);
    }
}

/// Asset loader uploading images to the GPU.
pub struct RaylibLoader<'a> {
    rl: &'a mut RaylibHandle,
    thread: &'a RaylibThread,
    textures: &'a mut TextureStore,
}

impl<'a> RaylibLoader<'a> {
    pub fn new(
        rl: &'a mut RaylibHandle,
        thread: &'a RaylibThread,
        textures: &'a mut TextureStore,
    ) -> Self {
        Self {
            rl,
            thread,
            textures,
        }
    }
}

impl AssetLoader for RaylibLoader<'_> {
    fn load_image(&mut self, entry: &AssetEntry) -> EngineResult<ImageAsset> {
        let path = entry.source.to_string_lossy();
        let texture = self
            .rl
            .load_texture(self.thread, &path)
            .map_err(|e| EngineError::AssetLoad {
                id: entry.id.clone(),
                reason: e.to_string(),
            })?;
        let image = ImageAsset {
            id: entry.id.clone(),
            source: entry.source.clone(),
            width: texture.width.max(0) as u32,
            height: texture.height.max(0) as u32,
        };
        info!(
            "Loaded texture '{}' ({}x{}) from {}",
            image.id, image.width, image.height, path
        );
        self.textures.insert(entry.id.clone(), texture);
        Ok(image)
    }

    fn load_audio(&mut self, entry: &AssetEntry) -> EngineResult<AudioClip> {
        // Playback is out of scope; the clip is only registered.
        Ok(AudioClip {
            id: entry.id.clone(),
            source: entry.source.clone(),
        })
    }
}

fn rectangle(rect: Rect) -> Rectangle {
    Rectangle {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
    }
}

/// Canvas over any raylib draw handle.
pub struct RaylibCanvas<'a, D: RaylibDraw> {
    draw: &'a mut D,
    textures: &'a TextureStore,
    transform: CanvasTransform,
}

impl<'a, D: RaylibDraw> RaylibCanvas<'a, D> {
    pub fn new(draw: &'a mut D, textures: &'a TextureStore, transform: CanvasTransform) -> Self {
        Self {
            draw,
            textures,
            transform,
        }
    }

    fn scaled(&self, rect: Rect) -> Rectangle {
        let (x, y) = self.transform.to_surface(rect.x, rect.y);
        rectangle(Rect::new(
            x,
            y,
            self.transform.length(rect.width),
            self.transform.length(rect.height),
        ))
    }
}

impl<D: RaylibDraw> Canvas for RaylibCanvas<'_, D> {
    fn draw_image(&mut self, image: &ImageAsset, src: Rect, dest: Rect) {
        if let Some(texture) = self.textures.get(&image.id) {
            let dest = self.scaled(dest);
            self.draw.draw_texture_pro(
                texture,
                rectangle(src),
                dest,
                Vector2::zero(),
                0.0,
                Color::WHITE,
            );
        }
    }

    fn clear_rect(&mut self, rect: Rect) {
        let rect = self.scaled(rect);
        self.draw.draw_rectangle_rec(rect, Color::BLACK);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let (x, y) = self.transform.to_surface(x, y);
        self.draw.draw_text(
            text,
            x as i32,
            y as i32,
            TEXT_SIZE,
            Color::WHITE,
        );
    }
}
