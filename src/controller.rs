//! Entity controller.
//!
//! A [`Controller`] owns a collection of entities and the view they are drawn
//! relative to. Each simulation step runs, in order:
//!
//! 1. prune entities marked destroyed during the previous step
//! 2. the `pre_step` hook
//! 3. for every entity, in collection order: motion, its step hook, and (under
//!    step-driven animation timing) one sprite animation tick
//! 4. the `post_step` hook
//!
//! Drawing sorts the collection by depth (highest first, stable) and paints
//! every live entity's sprite and then its draw hook.
//!
//! Controller hooks receive the controller itself. Entity hooks receive their
//! entity plus an [`EntityContext`] over its siblings; entities they spawn are
//! appended once the pass over the collection is done. A hook that installs a
//! new hook of the same kind while running is replaced by it.

use std::fmt;

use log::debug;

use crate::components::animation::AnimationTiming;
use crate::components::entity::{Entity, EntityContext, Siblings};
use crate::resources::camera2d::View;
use crate::systems::animation::{draw_sprite, tick_sprite_animation};
use crate::systems::movement::integrate_motion;
use crate::systems::render::Canvas;

pub type StepHook = Box<dyn FnMut(&mut Controller)>;
pub type TouchHook = Box<dyn FnMut(&mut Controller, f32, f32)>;
pub type DrawHook = Box<dyn FnMut(&Controller, &mut dyn Canvas)>;

#[derive(Default)]
pub struct Controller {
    entities: Vec<Entity>,
    view: View,
    animation_timing: AnimationTiming,
    pending_switch: Option<String>,
    pre_step: Option<StepHook>,
    post_step: Option<StepHook>,
    on_touch: Option<TouchHook>,
    on_touch_end: Option<TouchHook>,
    draw: Option<DrawHook>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("entities", &self.entities.len())
            .field("view", &self.view)
            .field("animation_timing", &self.animation_timing)
            .field("pending_switch", &self.pending_switch)
            .finish_non_exhaustive()
    }
}

macro_rules! run_hook {
    ($self:ident, $slot:ident, $($arg:expr),*) => {
        if let Some(mut hook) = $self.$slot.take() {
            hook(&mut *$self, $($arg),*);
            if $self.$slot.is_none() {
                $self.$slot = Some(hook);
            }
        }
    };
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_animation_timing(mut self, timing: AnimationTiming) -> Self {
        self.animation_timing = timing;
        self
    }

    pub fn animation_timing(&self) -> AnimationTiming {
        self.animation_timing
    }

    pub fn set_animation_timing(&mut self, timing: AnimationTiming) {
        self.animation_timing = timing;
    }

    // ---- view ----

    /// Move the view. No clamping; callers keep it in bounds.
    pub fn set_view_position(&mut self, x: f32, y: f32) {
        self.view = View::new(x, y);
    }

    pub fn view(&self) -> View {
        self.view
    }

    // ---- hooks ----

    pub fn set_pre_step(&mut self, hook: impl FnMut(&mut Controller) + 'static) {
        self.pre_step = Some(Box::new(hook));
    }

    pub fn set_post_step(&mut self, hook: impl FnMut(&mut Controller) + 'static) {
        self.post_step = Some(Box::new(hook));
    }

    pub fn set_on_touch(&mut self, hook: impl FnMut(&mut Controller, f32, f32) + 'static) {
        self.on_touch = Some(Box::new(hook));
    }

    pub fn set_on_touch_end(&mut self, hook: impl FnMut(&mut Controller, f32, f32) + 'static) {
        self.on_touch_end = Some(Box::new(hook));
    }

    pub fn set_draw(&mut self, hook: impl FnMut(&Controller, &mut dyn Canvas) + 'static) {
        self.draw = Some(Box::new(hook));
    }

    pub fn clear_hooks(&mut self) {
        self.pre_step = None;
        self.post_step = None;
        self.on_touch = None;
        self.on_touch_end = None;
        self.draw = None;
    }

    // ---- simulation ----

    /// Advance the simulation by one fixed step.
    pub fn step(&mut self) {
        self.remove_destroyed_entities();

        run_hook!(self, pre_step,);

        let timing = self.animation_timing;
        self.for_each_entity(|entity, ctx| {
            integrate_motion(entity);
            entity.run_step(ctx);
            if timing == AnimationTiming::Step {
                tick_sprite_animation(entity, ctx);
            }
        });

        run_hook!(self, post_step,);
    }

    /// Visit the entities present at the start of the call, in order, each
    /// with a context over the others. Entities spawned through the context
    /// are appended afterwards.
    pub fn for_each_entity(&mut self, mut f: impl FnMut(&mut Entity, &mut dyn EntityContext)) {
        let mut spawned = Vec::new();
        for i in 0..self.entities.len() {
            let (before, rest) = self.entities.split_at_mut(i);
            let Some((entity, after)) = rest.split_first_mut() else {
                break;
            };
            let mut ctx = Siblings::new(before, after, &mut spawned);
            f(entity, &mut ctx);
        }
        if !spawned.is_empty() {
            debug!("Spawned {} entities", spawned.len());
            self.entities.append(&mut spawned);
        }
    }

    /// Drop every entity marked destroyed, keeping the order of the rest.
    pub fn remove_destroyed_entities(&mut self) {
        let before = self.entities.len();
        self.entities.retain(|e| !e.is_destroyed());
        let removed = before - self.entities.len();
        if removed > 0 {
            debug!("Pruned {} destroyed entities", removed);
        }
    }

    /// Ask the owning game to activate another controller once this step
    /// completes.
    pub fn request_switch(&mut self, name: impl Into<String>) {
        self.pending_switch = Some(name.into());
    }

    pub fn take_switch_request(&mut self) -> Option<String> {
        self.pending_switch.take()
    }

    // ---- collection ----

    /// Append an entity and return it for further setup.
    pub fn add_entity(&mut self, entity: Entity) -> &mut Entity {
        self.entities.push(entity);
        let last = self.entities.len() - 1;
        &mut self.entities[last]
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove every entity immediately.
    pub fn clear_entities(&mut self) {
        self.entities.clear();
    }

    /// First entity with `id`, in collection order.
    pub fn entity_by_id(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_by_id_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn entities_by_type(&self, kind: &str) -> Vec<&Entity> {
        self.entities.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn entities_by_type_mut(&mut self, kind: &str) -> Vec<&mut Entity> {
        self.entities.iter_mut().filter(|e| e.kind == kind).collect()
    }

    /// Entities whose box strictly contains `(x, y)`, optionally only of `kind`.
    pub fn entities_at_position(&self, x: f32, y: f32, kind: Option<&str>) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.on_position(x, y) && kind.is_none_or(|k| e.kind == k))
            .collect()
    }

    /// True when no entity (optionally only of `kind`) strictly contains `(x, y)`.
    pub fn is_position_free(&self, x: f32, y: f32, kind: Option<&str>) -> bool {
        !self
            .entities
            .iter()
            .any(|e| e.on_position(x, y) && kind.is_none_or(|k| e.kind == k))
    }

    // ---- touch ----

    /// Run the touch hook with a world-space point.
    pub fn touch(&mut self, x: f32, y: f32) {
        run_hook!(self, on_touch, x, y);
    }

    /// Run the touch-end hook with a world-space point.
    pub fn touch_end(&mut self, x: f32, y: f32) {
        run_hook!(self, on_touch_end, x, y);
    }

    // ---- rendering ----

    /// Stable sort with the highest depth first, so the lowest depth paints
    /// last and ends up on top.
    pub fn sort_entities_by_depth(&mut self) {
        self.entities.sort_by(|a, b| b.depth.cmp(&a.depth));
    }

    /// Paint every live entity relative to the view, back to front.
    pub fn draw_entities(&mut self, canvas: &mut dyn Canvas) {
        self.sort_entities_by_depth();

        let view = self.view;
        let timing = self.animation_timing;
        self.for_each_entity(|entity, ctx| {
            if entity.is_destroyed() {
                return;
            }
            let (x, y) = view.to_screen(entity.x, entity.y);
            draw_sprite(entity, ctx, timing, canvas, x, y);
            entity.run_draw(canvas, x, y);
        });
    }

    /// Run the controller's own draw hook, painted over the entities.
    pub fn draw_overlay(&mut self, canvas: &mut dyn Canvas) {
        if let Some(mut hook) = self.draw.take() {
            hook(self, canvas);
            if self.draw.is_none() {
                self.draw = Some(hook);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::sprite::{Sprite, SpriteSheet};
    use crate::resources::assetstore::ImageAsset;
    use crate::systems::render::RecordingCanvas;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    fn image(id: &str) -> Rc<ImageAsset> {
        Rc::new(ImageAsset {
            id: id.to_string(),
            source: PathBuf::from(format!("{id}.png")),
            width: 16,
            height: 16,
        })
    }

    fn sprite_entity(id: &str, depth: i32) -> Entity {
        let sprite = Sprite::from_image(Some(image(id)), SpriteSheet::default()).unwrap();
        Entity::new(id, 0).with_depth(depth).with_sprite(sprite)
    }

    #[test]
    fn destroyed_entity_is_pruned_on_next_step() {
        let mut ctrl = Controller::new();
        ctrl.add_entity(Entity::new("a", 1));
        ctrl.add_entity(Entity::new("b", 2));
        ctrl.add_entity(Entity::new("c", 3));

        ctrl.entity_by_id_mut(2).unwrap().destroy();
        assert_eq!(ctrl.len(), 3);
        assert!(ctrl.entity_by_id(2).is_some());

        ctrl.step();
        let ids: Vec<u32> = ctrl.entities().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn step_runs_hooks_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctrl = Controller::new();

        let l = log.clone();
        ctrl.set_pre_step(move |_| l.borrow_mut().push("pre".to_string()));
        let l = log.clone();
        ctrl.set_post_step(move |_| l.borrow_mut().push("post".to_string()));
        for id in 1..=2 {
            let l = log.clone();
            ctrl.add_entity(Entity::new("e", id).with_step(
                move |e: &mut Entity, _: &mut dyn EntityContext| l.borrow_mut().push(format!("step{}", e.id)),
            ));
        }

        ctrl.step();
        assert_eq!(*log.borrow(), vec!["pre", "step1", "step2", "post"]);
    }

    #[test]
    fn step_hook_sees_integrated_position() {
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        let mut ctrl = Controller::new();
        ctrl.add_entity(
            Entity::new("mover", 1)
                .with_position(100.0, 100.0)
                .with_size(50.0, 50.0)
                .with_motion(100.0, 0.0)
                .with_step(move |e: &mut Entity, _: &mut dyn EntityContext| {
                    *s.borrow_mut() = Some((e.x, e.y))
                }),
        );
        ctrl.step();
        assert_eq!(*seen.borrow(), Some((110.0, 100.0)));
    }

    #[test]
    fn entities_added_by_post_step_are_stepped_next_tick() {
        let mut ctrl = Controller::new();
        ctrl.set_post_step(|c: &mut Controller| {
            if c.entities_by_type("bullet").is_empty() {
                c.add_entity(Entity::new("bullet", 9).with_motion(100.0, 0.0));
            }
        });
        ctrl.step();
        assert_eq!(ctrl.entity_by_id(9).unwrap().x, 0.0);
        ctrl.step();
        assert_eq!(ctrl.entity_by_id(9).unwrap().x, 10.0);
    }

    #[test]
    fn step_hook_stops_at_a_wall() {
        let mut ctrl = Controller::new();
        ctrl.add_entity(
            Entity::new("walker", 1)
                .with_size(10.0, 10.0)
                .with_step(|e: &mut Entity, ctx: &mut dyn EntityContext| {
                    // One unit past the right edge, inside the row.
                    if ctx.is_position_free(e.x + e.width + 1.0, e.y + 1.0, Some("wall")) {
                        e.x += 5.0;
                    }
                }),
        );
        ctrl.add_entity(Entity::new("wall", 2).with_position(30.0, 0.0).with_size(10.0, 10.0));

        for _ in 0..10 {
            ctrl.step();
        }
        assert_eq!(ctrl.entity_by_id(1).unwrap().x, 20.0);
    }

    #[test]
    fn entities_spawned_by_step_hooks_join_after_the_pass() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut ctrl = Controller::new();
        let s = seen.clone();
        ctrl.add_entity(Entity::new("gun", 1).with_step(
            move |e: &mut Entity, ctx: &mut dyn EntityContext| {
                s.borrow_mut().push(ctx.others().count());
                if ctx.entities_by_type("bullet").is_empty() {
                    ctx.spawn(Entity::new("bullet", 9).with_position(e.x, e.y).with_motion(100.0, 0.0));
                }
            },
        ));

        ctrl.step();
        assert_eq!(ctrl.len(), 2);
        assert_eq!(ctrl.entity_by_id(9).unwrap().x, 0.0);
        ctrl.step();
        assert_eq!(ctrl.len(), 2);
        assert_eq!(ctrl.entity_by_id(9).unwrap().x, 10.0);
        assert_eq!(*seen.borrow(), vec![0, 1]);
    }

    #[test]
    fn animation_end_hook_runs_under_step_timing() {
        let sheet = Rc::new(ImageAsset {
            id: "burst".to_string(),
            source: PathBuf::from("burst.png"),
            width: 32,
            height: 16,
        });
        let sprite = Sprite::from_image(
            Some(sheet),
            SpriteSheet::frames(16.0, 16.0, 0, 1).with_frame_speed(1),
        )
        .unwrap();
        let mut burst = Entity::new("burst", 1).with_sprite(sprite);
        burst.set_on_animation_end(|e: &mut Entity, ctx: &mut dyn EntityContext| {
            ctx.spawn(Entity::new("smoke", 2));
            e.destroy();
        });

        let mut ctrl = Controller::new().with_animation_timing(AnimationTiming::Step);
        ctrl.add_entity(burst);
        let mut canvas = RecordingCanvas::new();
        ctrl.draw_entities(&mut canvas);
        assert!(!ctrl.entity_by_id(1).unwrap().is_destroyed());

        // Frame 1 is the last one, reached on the first step.
        ctrl.step();
        assert!(ctrl.entity_by_id(1).unwrap().is_destroyed());
        assert_eq!(ctrl.entities_by_type("smoke").len(), 1);
        ctrl.step();
        assert!(ctrl.entity_by_id(1).is_none());
        assert_eq!(ctrl.len(), 1);
    }

    #[test]
    fn clearing_drops_entities_and_hooks() {
        let mut ctrl = Controller::new();
        ctrl.set_pre_step(|c: &mut Controller| {
            c.add_entity(Entity::new("tick", 0));
        });
        ctrl.add_entity(Entity::new("a", 1));
        ctrl.step();
        assert_eq!(ctrl.len(), 2);

        ctrl.clear_entities();
        assert!(ctrl.is_empty());
        ctrl.clear_hooks();
        ctrl.step();
        assert!(ctrl.is_empty());
    }

    #[test]
    fn entities_by_type_mut_reaches_every_match() {
        let mut ctrl = Controller::new();
        ctrl.add_entity(Entity::new("coin", 1));
        ctrl.add_entity(Entity::new("wall", 2));
        ctrl.add_entity(Entity::new("coin", 3));
        for coin in ctrl.entities_by_type_mut("coin") {
            coin.destroy();
        }
        ctrl.step();
        let ids: Vec<u32> = ctrl.entities().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn lookups_respect_order_and_kind() {
        let mut ctrl = Controller::new();
        ctrl.add_entity(Entity::new("wall", 1).with_size(10.0, 10.0));
        ctrl.add_entity(Entity::new("coin", 1).with_size(10.0, 10.0));
        ctrl.add_entity(Entity::new("wall", 2).with_position(20.0, 0.0).with_size(10.0, 10.0));

        assert_eq!(ctrl.entity_by_id(1).unwrap().kind, "wall");
        assert!(ctrl.entity_by_id(7).is_none());
        let walls: Vec<u32> = ctrl.entities_by_type("wall").iter().map(|e| e.id).collect();
        assert_eq!(walls, vec![1, 2]);

        assert_eq!(ctrl.entities_at_position(5.0, 5.0, None).len(), 2);
        let coins = ctrl.entities_at_position(5.0, 5.0, Some("coin"));
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].kind, "coin");

        assert!(!ctrl.is_position_free(5.0, 5.0, None));
        assert!(!ctrl.is_position_free(25.0, 5.0, Some("wall")));
        assert!(ctrl.is_position_free(25.0, 5.0, Some("coin")));
        // Edges are not inside.
        assert!(ctrl.is_position_free(10.0, 5.0, None));
    }

    #[test]
    fn zero_sized_entities_are_never_hit() {
        let mut ctrl = Controller::new();
        ctrl.add_entity(Entity::new("marker", 1).with_position(5.0, 5.0));
        assert!(ctrl.entities_at_position(5.0, 5.0, None).is_empty());
        assert!(ctrl.is_position_free(5.0, 5.0, None));
    }

    #[test]
    fn draw_paints_lowest_depth_last_and_keeps_ties_stable() {
        let mut ctrl = Controller::new();
        ctrl.add_entity(sprite_entity("a", 5));
        ctrl.add_entity(sprite_entity("b", 5));
        ctrl.add_entity(sprite_entity("c", -1));

        let mut canvas = RecordingCanvas::new();
        ctrl.draw_entities(&mut canvas);
        assert_eq!(canvas.painted_images(), vec!["a", "b", "c"]);

        ctrl.add_entity(sprite_entity("d", 10));
        canvas.clear();
        ctrl.draw_entities(&mut canvas);
        assert_eq!(canvas.painted_images(), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn draw_offsets_by_view_and_skips_destroyed() {
        let mut ctrl = Controller::new();
        let hooked = Rc::new(RefCell::new(Vec::new()));
        let h = hooked.clone();
        ctrl.add_entity(
            sprite_entity("hero", 0)
                .with_position(50.0, 40.0)
                .with_draw(move |_: &Entity, _: &mut dyn Canvas, x: f32, y: f32| {
                    h.borrow_mut().push((x, y))
                }),
        );
        ctrl.add_entity(sprite_entity("ghost", 0)).destroy();
        ctrl.set_view_position(30.0, 10.0);

        let mut canvas = RecordingCanvas::new();
        ctrl.draw_entities(&mut canvas);
        assert_eq!(canvas.painted_images(), vec!["hero"]);
        assert_eq!(*hooked.borrow(), vec![(20.0, 30.0)]);
    }

    #[test]
    fn step_timing_advances_sprites_per_step_not_per_draw() {
        let sheet = Rc::new(ImageAsset {
            id: "walk".to_string(),
            source: PathBuf::from("walk.png"),
            width: 32,
            height: 16,
        });
        let sprite = Sprite::from_image(
            Some(sheet),
            SpriteSheet::frames(16.0, 16.0, 0, 1).with_frame_speed(1),
        )
        .unwrap();

        let mut ctrl = Controller::new().with_animation_timing(AnimationTiming::Step);
        ctrl.add_entity(Entity::new("walker", 1).with_sprite(sprite));

        let mut canvas = RecordingCanvas::new();
        ctrl.draw_entities(&mut canvas);
        ctrl.draw_entities(&mut canvas);
        let frame = |c: &Controller| c.entities()[0].sprite.as_ref().unwrap().animation.current_frame();
        assert_eq!(frame(&ctrl), 0);

        ctrl.step();
        assert_eq!(frame(&ctrl), 1);

        ctrl.set_animation_timing(AnimationTiming::Draw);
        ctrl.draw_entities(&mut canvas);
        assert_eq!(frame(&ctrl), 0);
    }

    #[test]
    fn hooks_can_replace_themselves() {
        let mut ctrl = Controller::new();
        ctrl.set_pre_step(|c: &mut Controller| {
            c.add_entity(Entity::new("first", 1));
            c.set_pre_step(|c: &mut Controller| {
                c.add_entity(Entity::new("second", 2));
            });
        });
        ctrl.step();
        ctrl.step();
        ctrl.step();
        assert_eq!(ctrl.entities_by_type("first").len(), 1);
        assert_eq!(ctrl.entities_by_type("second").len(), 2);
    }

    #[test]
    fn touch_hooks_receive_coordinates() {
        let mut ctrl = Controller::new();
        ctrl.set_on_touch(|c: &mut Controller, x, y| c.set_view_position(x, y));
        ctrl.touch(12.0, 34.0);
        ctrl.touch_end(1.0, 1.0);
        assert_eq!(ctrl.view(), View::new(12.0, 34.0));
    }
}
