use crate::components::animation::{Animation, DEFAULT_FRAME_SPEED};
use crate::error::{EngineError, EngineResult};
use crate::resources::assetstore::ImageHandle;
use crate::systems::render::{Canvas, Rect};

/// Sprite is identified by an image, its frame size in world units and an
/// [`Animation`] selecting which sheet frame to show.
///
/// Sheet frames are numbered in row-major order, so frame `n` of a sheet
/// that is `cols` frames wide sits at row `n / cols`, column `n % cols`.
#[derive(Debug)]
pub struct Sprite {
    image: Option<ImageHandle>,
    pub width: f32,
    pub height: f32,
    pub animation: Animation,
}

/// Optional parameters for [`Sprite::from_image`]. `None` sizes default to
/// the full image; the default range is the single frame 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSheet {
    pub frame_width: Option<f32>,
    pub frame_height: Option<f32>,
    pub start_frame: u32,
    pub end_frame: u32,
    pub animation_start_frame: usize,
    /// `None` uses [`DEFAULT_FRAME_SPEED`].
    pub frame_speed: Option<u32>,
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self {
            frame_width: None,
            frame_height: None,
            start_frame: 0,
            end_frame: 0,
            animation_start_frame: 0,
            frame_speed: None,
        }
    }
}

impl SpriteSheet {
    pub fn frames(frame_width: f32, frame_height: f32, start_frame: u32, end_frame: u32) -> Self {
        Self {
            frame_width: Some(frame_width),
            frame_height: Some(frame_height),
            start_frame,
            end_frame,
            ..Self::default()
        }
    }

    pub fn with_frame_speed(mut self, frame_speed: u32) -> Self {
        self.frame_speed = Some(frame_speed);
        self
    }

    pub fn starting_at(mut self, animation_start_frame: usize) -> Self {
        self.animation_start_frame = animation_start_frame;
        self
    }
}

impl Sprite {
    pub fn new(image: ImageHandle, width: f32, height: f32, animation: Animation) -> Self {
        Self {
            image: Some(image),
            width,
            height,
            animation,
        }
    }

    /// Build a sprite from an image (single frame or sheet).
    pub fn from_image(image: Option<ImageHandle>, sheet: SpriteSheet) -> EngineResult<Self> {
        let image = image.ok_or(EngineError::UndefinedImageForSprite)?;
        let width = sheet.frame_width.unwrap_or(image.width as f32);
        let height = sheet.frame_height.unwrap_or(image.height as f32);
        if width <= 0.0 || height <= 0.0 {
            return Err(EngineError::InvalidSpriteDimensions { width, height });
        }
        let animation = Animation::from_range(
            sheet.start_frame,
            sheet.end_frame,
            sheet.animation_start_frame,
        )
        .with_frame_speed(sheet.frame_speed.unwrap_or(DEFAULT_FRAME_SPEED));
        Ok(Self::new(image, width, height, animation))
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    /// Detaching the image turns every draw into a no-op.
    pub fn set_image(&mut self, image: Option<ImageHandle>) {
        self.image = image;
    }

    pub fn set_on_animation_end(&mut self, callback: impl FnMut() + 'static) {
        self.animation.set_on_animation_end(callback);
    }

    /// Advance the animation by one tick without drawing.
    pub fn advance(&mut self) -> bool {
        self.animation.tick()
    }

    /// Advance the animation, then draw the current frame at `(x, y)`.
    /// Returns true when the animation reached its last frame.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, x: f32, y: f32) -> bool {
        if self.image.is_none() {
            return false;
        }
        let ended = self.advance();
        self.render(canvas, x, y);
        ended
    }

    /// Draw the current frame at `(x, y)` without touching the animation.
    pub fn render(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        let Some(image) = self.image.as_ref() else {
            return;
        };
        canvas.draw_image(
            image,
            self.source_rect(),
            Rect::new(x, y, self.width, self.height),
        );
    }

    /// Sheet region of the current frame. Sheets whose width is not a
    /// multiple of the frame width give floor-truncated coordinates.
    pub fn source_rect(&self) -> Rect {
        let frame = self.animation.current_sheet_frame() as f32;
        let image_width = self.image.as_ref().map_or(self.width, |i| i.width as f32);
        let cols = image_width / self.width;
        let row = (frame / cols).floor();
        let col = (frame % cols).floor();
        Rect::new(col * self.width, row * self.height, self.width, self.height)
    }
}
