//! Entities and their optional behaviors.
//!
//! An [`Entity`] is one (usually visible) thing in the game: a box with an
//! absolute position, a draw depth, motion and an optional [`Sprite`].
//! Behavior is attached through capability traits:
//!
//! - [`Steppable`] runs once per simulation step, after motion is applied,
//!   and again as the animation-end hook when the sprite reaches its last frame
//! - [`Drawable`] draws on top of the sprite, relative to the view
//! - [`Touchable`] reacts to touches that land inside the entity
//!
//! Each trait has a blanket impl for the matching closure signature, so most
//! callers just pass a closure. Step, touch and animation-end hooks also get
//! an [`EntityContext`]: read access to the other entities of the same
//! controller and a queue for spawning new ones.

use std::fmt;

use crate::components::boxcollider::BoundingBox;
use crate::components::sprite::Sprite;
use crate::systems::render::Canvas;

/// What an entity hook sees of the rest of its controller.
///
/// The running entity itself is not among [`others`](Self::others); it is
/// handed to the hook separately.
pub trait EntityContext {
    /// Every other entity, in collection order.
    fn others(&self) -> Box<dyn Iterator<Item = &Entity> + '_>;

    /// Queue `entity` for insertion. Spawned entities are appended after the
    /// current pass and first stepped on the next tick.
    fn spawn(&mut self, entity: Entity);

    fn entity_by_id(&self, id: u32) -> Option<&Entity> {
        self.others().find(|e| e.id == id)
    }

    fn entities_by_type(&self, kind: &str) -> Vec<&Entity> {
        self.others().filter(|e| e.kind == kind).collect()
    }

    /// Other entities strictly containing `(x, y)`, optionally only of `kind`.
    fn entities_at_position(&self, x: f32, y: f32, kind: Option<&str>) -> Vec<&Entity> {
        self.others()
            .filter(|e| e.on_position(x, y) && kind.is_none_or(|k| e.kind == k))
            .collect()
    }

    fn is_position_free(&self, x: f32, y: f32, kind: Option<&str>) -> bool {
        !self
            .others()
            .any(|e| e.on_position(x, y) && kind.is_none_or(|k| e.kind == k))
    }

    /// Other entities whose box collides with `entity`'s.
    fn colliding_with(&self, entity: &Entity, kind: Option<&str>) -> Vec<&Entity> {
        self.others()
            .filter(|e| entity.check_collision(e) && kind.is_none_or(|k| e.kind == k))
            .collect()
    }
}

/// [`EntityContext`] over the entities before and after the running one.
pub struct Siblings<'a> {
    before: &'a [Entity],
    after: &'a [Entity],
    spawned: &'a mut Vec<Entity>,
}

impl<'a> Siblings<'a> {
    pub fn new(before: &'a [Entity], after: &'a [Entity], spawned: &'a mut Vec<Entity>) -> Self {
        Self {
            before,
            after,
            spawned,
        }
    }
}

impl EntityContext for Siblings<'_> {
    fn others(&self) -> Box<dyn Iterator<Item = &Entity> + '_> {
        Box::new(self.before.iter().chain(self.after.iter()))
    }

    fn spawn(&mut self, entity: Entity) {
        self.spawned.push(entity);
    }
}

pub trait Steppable {
    fn step(&mut self, entity: &mut Entity, ctx: &mut dyn EntityContext);
}

impl<F: FnMut(&mut Entity, &mut dyn EntityContext)> Steppable for F {
    fn step(&mut self, entity: &mut Entity, ctx: &mut dyn EntityContext) {
        self(entity, ctx)
    }
}

pub trait Drawable {
    /// `x`, `y` are the entity position relative to the view.
    fn draw(&mut self, entity: &Entity, canvas: &mut dyn Canvas, x: f32, y: f32);
}

impl<F: FnMut(&Entity, &mut dyn Canvas, f32, f32)> Drawable for F {
    fn draw(&mut self, entity: &Entity, canvas: &mut dyn Canvas, x: f32, y: f32) {
        self(entity, canvas, x, y)
    }
}

pub trait Touchable {
    /// `x`, `y` are the touch position in world coordinates.
    fn touch(&mut self, entity: &mut Entity, ctx: &mut dyn EntityContext, x: f32, y: f32);
}

impl<F: FnMut(&mut Entity, &mut dyn EntityContext, f32, f32)> Touchable for F {
    fn touch(&mut self, entity: &mut Entity, ctx: &mut dyn EntityContext, x: f32, y: f32) {
        self(entity, ctx, x, y)
    }
}

/// Positioned, sized, depth-ordered simulation unit.
pub struct Entity {
    /// Group tag used to retrieve similar entities. Not unique.
    pub kind: String,
    /// Lookup key. Not enforced unique.
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Lower depth paints later, on top.
    pub depth: i32,
    pub speed: f32,
    /// Degrees, 0 along +x, clockwise on screen.
    pub direction: f32,
    pub sprite: Option<Sprite>,
    destroyed: bool,
    step: Option<Box<dyn Steppable>>,
    draw: Option<Box<dyn Drawable>>,
    on_animation_end: Option<Box<dyn Steppable>>,
    on_touch: Option<Box<dyn Touchable>>,
    on_touch_end: Option<Box<dyn Touchable>>,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth)
            .field("speed", &self.speed)
            .field("direction", &self.direction)
            .field("destroyed", &self.destroyed)
            .field("sprite", &self.sprite)
            .finish_non_exhaustive()
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new("", 0)
    }
}

impl Entity {
    pub fn new(kind: impl Into<String>, id: u32) -> Self {
        Self {
            kind: kind.into(),
            id,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            depth: 0,
            speed: 0.0,
            direction: 0.0,
            sprite: None,
            destroyed: false,
            step: None,
            draw: None,
            on_animation_end: None,
            on_touch: None,
            on_touch_end: None,
        }
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.set_position(x, y);
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.set_size(width, height);
        self
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_motion(mut self, speed: f32, direction: f32) -> Self {
        self.speed = speed;
        self.direction = direction;
        self
    }

    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_step(mut self, step: impl Steppable + 'static) -> Self {
        self.set_step(step);
        self
    }

    pub fn with_draw(mut self, draw: impl Drawable + 'static) -> Self {
        self.set_draw(draw);
        self
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Negative sizes are clamped to 0.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Match the bounding box to the sprite's frame size, if there is a sprite.
    pub fn set_size_from_sprite(&mut self) {
        if let Some(sprite) = &self.sprite {
            self.width = sprite.width;
            self.height = sprite.height;
        }
    }

    pub fn set_depth(&mut self, depth: i32) {
        self.depth = depth;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn set_direction(&mut self, direction: f32) {
        self.direction = direction;
    }

    pub fn set_sprite(&mut self, sprite: Sprite) {
        self.sprite = Some(sprite);
    }

    pub fn set_step(&mut self, step: impl Steppable + 'static) {
        self.step = Some(Box::new(step));
    }

    pub fn clear_step(&mut self) {
        self.step = None;
    }

    pub fn set_draw(&mut self, draw: impl Drawable + 'static) {
        self.draw = Some(Box::new(draw));
    }

    /// Run `hook` each time the sprite animation reaches its last frame. The
    /// hook may replace or remove the sprite.
    pub fn set_on_animation_end(&mut self, hook: impl Steppable + 'static) {
        self.on_animation_end = Some(Box::new(hook));
    }

    pub fn set_on_touch(&mut self, on_touch: impl Touchable + 'static) {
        self.on_touch = Some(Box::new(on_touch));
    }

    pub fn set_on_touch_end(&mut self, on_touch_end: impl Touchable + 'static) {
        self.on_touch_end = Some(Box::new(on_touch_end));
    }

    pub fn has_step(&self) -> bool {
        self.step.is_some()
    }

    pub fn has_draw(&self) -> bool {
        self.draw.is_some()
    }

    pub fn is_touchable(&self) -> bool {
        self.on_touch.is_some() || self.on_touch_end.is_some()
    }

    /// Mark for removal on the owning controller's next step. The entity
    /// stays visible to draws and queries until then.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    /// Box overlap with the one-unit inclusive convention of
    /// [`BoundingBox::collides_with`]; edge-adjacent boxes do not collide.
    pub fn check_collision(&self, other: &Entity) -> bool {
        self.bounding_box().collides_with(&other.bounding_box())
    }

    /// Strict interior point test.
    pub fn on_position(&self, x: f32, y: f32) -> bool {
        self.bounding_box().contains_point(x, y)
    }

    /// Run the step hook, if any. A hook that installs a replacement for
    /// itself keeps the replacement.
    pub fn run_step(&mut self, ctx: &mut dyn EntityContext) {
        if let Some(mut step) = self.step.take() {
            step.step(self, ctx);
            if self.step.is_none() {
                self.step = Some(step);
            }
        }
    }

    pub fn run_animation_end(&mut self, ctx: &mut dyn EntityContext) {
        if let Some(mut hook) = self.on_animation_end.take() {
            hook.step(self, ctx);
            if self.on_animation_end.is_none() {
                self.on_animation_end = Some(hook);
            }
        }
    }

    pub fn run_draw(&mut self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        if let Some(mut draw) = self.draw.take() {
            draw.draw(self, canvas, x, y);
            if self.draw.is_none() {
                self.draw = Some(draw);
            }
        }
    }

    pub fn run_touch(&mut self, ctx: &mut dyn EntityContext, x: f32, y: f32) {
        if let Some(mut hook) = self.on_touch.take() {
            hook.touch(self, ctx, x, y);
            if self.on_touch.is_none() {
                self.on_touch = Some(hook);
            }
        }
    }

    pub fn run_touch_end(&mut self, ctx: &mut dyn EntityContext, x: f32, y: f32) {
        if let Some(mut hook) = self.on_touch_end.take() {
            hook.touch(self, ctx, x, y);
            if self.on_touch_end.is_none() {
                self.on_touch_end = Some(hook);
            }
        }
    }

    /// Draw the sprite, if any, advancing its animation. Returns true when
    /// the animation reached its last frame on this draw.
    pub fn draw_sprite(&mut self, canvas: &mut dyn Canvas, x: f32, y: f32) -> bool {
        match self.sprite.as_mut() {
            Some(sprite) => sprite.draw(canvas, x, y),
            None => false,
        }
    }
}
