//! Sprite animation ticking.
//!
//! Depending on [`AnimationTiming`], sprites advance once per simulation
//! step (here) or once per draw call (inside [`Sprite::draw`]).
//!
//! [`Sprite::draw`]: crate::components::sprite::Sprite::draw

use crate::components::animation::AnimationTiming;
use crate::components::entity::{Entity, EntityContext};
use crate::systems::render::Canvas;

/// Advance the entity's sprite animation by one simulation tick, running the
/// entity's animation-end hook if the last frame was reached.
///
/// Sprites without an image do not animate, matching draw-driven timing
/// where a draw without an image is a no-op.
pub fn tick_sprite_animation(entity: &mut Entity, ctx: &mut dyn EntityContext) -> bool {
    let ended = match entity.sprite.as_mut() {
        Some(sprite) if sprite.image().is_some() => sprite.advance(),
        _ => false,
    };
    if ended {
        entity.run_animation_end(ctx);
    }
    ended
}

/// Draw the entity's sprite at a view-relative position, advancing the
/// animation only under draw-driven timing.
pub fn draw_sprite(
    entity: &mut Entity,
    ctx: &mut dyn EntityContext,
    timing: AnimationTiming,
    canvas: &mut dyn Canvas,
    x: f32,
    y: f32,
) {
    match timing {
        AnimationTiming::Draw => {
            if entity.draw_sprite(canvas, x, y) {
                entity.run_animation_end(ctx);
            }
        }
        AnimationTiming::Step => {
            if let Some(sprite) = entity.sprite.as_ref() {
                sprite.render(canvas, x, y);
            }
        }
    }
}
