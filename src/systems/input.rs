//! Touch routing.
//!
//! A touch first goes to the controller's own touch hook, then, while the
//! game is running, to every entity with a positive-area box that strictly
//! contains the touched point. Entities are hit-tested in world space.

use log::trace;

use crate::controller::Controller;
use crate::events::input::{TouchEvent, TouchPhase};

/// Route `event` (screen coordinates) to `controller` and its entities.
/// Returns the number of entities whose hooks were invoked.
pub fn dispatch_touch(controller: &mut Controller, event: TouchEvent, running: bool) -> usize {
    let (x, y) = controller.view().to_world(event.x, event.y);
    trace!("{:?} at screen ({}, {}) world ({}, {})", event.phase, event.x, event.y, x, y);

    match event.phase {
        TouchPhase::Start => controller.touch(x, y),
        TouchPhase::End => controller.touch_end(x, y),
    }

    if !running {
        return 0;
    }

    let mut hits = 0;
    controller.for_each_entity(|entity, ctx| {
        if !(entity.bounding_box().has_area() && entity.on_position(x, y)) {
            return;
        }
        match event.phase {
            TouchPhase::Start => entity.run_touch(ctx, x, y),
            TouchPhase::End => entity.run_touch_end(ctx, x, y),
        }
        hits += 1;
    });
    hits
}
