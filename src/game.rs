//! Engine context.
//!
//! [`Game`] owns the engine-wide state: configuration, asset tables, the
//! registered controllers and which one is active, the loop state and the
//! fixed-timestep accumulator.
//!
//! # Frame Flow
//!
//! 1. [`Game::run`] marks the game running and starts timing
//! 2. every display frame calls [`Game::frame`] with the current time:
//!    - the elapsed time (capped) feeds the accumulator
//!    - each drained step runs the active controller if the game is running
//!    - a switch requested by the controller during a step takes effect
//!      before the next step
//!    - the frame is rendered exactly once
//! 3. touch events arrive between frames through [`Game::dispatch_touch`]

use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::components::sprite::{Sprite, SpriteSheet};
use crate::controller::Controller;
use crate::error::{EngineError, EngineResult};
use crate::events::input::TouchEvent;
use crate::resources::assetstore::Assets;
use crate::resources::debugmode::DebugOverlay;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::GameState;
use crate::resources::worldtime::WorldTime;
use crate::systems::gameloop::FixedTimestep;
use crate::systems::input::dispatch_touch;
use crate::systems::render::{Canvas, render_frame};
use crate::systems::time::{record_step, update_world_time};

pub struct Game {
    pub config: GameConfig,
    pub assets: Assets,
    pub debug: DebugOverlay,
    controllers: FxHashMap<String, Controller>,
    active: Option<String>,
    state: GameState,
    timestep: FixedTimestep,
    time: WorldTime,
    previous_ms: Option<f64>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let timestep = FixedTimestep::new(config.game_speed, config.max_frame_delta);
        let debug = DebugOverlay::new(config.show_debug);
        Self {
            config,
            assets: Assets::new(),
            debug,
            controllers: FxHashMap::default(),
            active: None,
            state: GameState::Stopped,
            timestep,
            time: WorldTime::default(),
            previous_ms: None,
        }
    }

    // ---- state ----

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Pause or resume. The loop keeps rendering either way.
    pub fn set_state(&mut self, state: GameState) {
        if self.state != state {
            info!("Game state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    pub fn time(&self) -> &WorldTime {
        &self.time
    }

    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    /// Start the loop clock at `now_ms` and set the state to running.
    pub fn run(&mut self, now_ms: f64) {
        self.timestep = FixedTimestep::new(self.config.game_speed, self.config.max_frame_delta);
        self.time = WorldTime::default();
        self.previous_ms = Some(now_ms);
        self.set_state(GameState::Running);
    }

    // ---- controllers ----

    /// A controller set up with the configured animation timing.
    pub fn create_controller(&self) -> Controller {
        Controller::new().with_animation_timing(self.config.animation_timing)
    }

    /// Register `controller` under `name`, replacing (and returning) any
    /// controller already registered under it.
    pub fn add_controller(&mut self, name: impl Into<String>, controller: Controller) -> Option<Controller> {
        self.controllers.insert(name.into(), controller)
    }

    /// Unregister a controller. Removing the active one leaves no controller
    /// active.
    pub fn remove_controller(&mut self, name: &str) -> Option<Controller> {
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        self.controllers.remove(name)
    }

    pub fn set_active_controller(&mut self, name: &str) -> EngineResult<()> {
        if !self.controllers.contains_key(name) {
            return Err(EngineError::UnknownController(name.to_string()));
        }
        info!("Active controller: {}", name);
        self.active = Some(name.to_string());
        Ok(())
    }

    pub fn active_controller_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_controller(&self) -> Option<&Controller> {
        self.active.as_ref().and_then(|n| self.controllers.get(n))
    }

    pub fn active_controller_mut(&mut self) -> Option<&mut Controller> {
        self.active.as_ref().and_then(|n| self.controllers.get_mut(n))
    }

    pub fn controller(&self, name: &str) -> Option<&Controller> {
        self.controllers.get(name)
    }

    pub fn controller_mut(&mut self, name: &str) -> Option<&mut Controller> {
        self.controllers.get_mut(name)
    }

    // ---- assets ----

    /// Build a sprite from a loaded image. Sheets without an explicit frame
    /// speed use the configured default.
    pub fn sprite(&self, image_id: &str, mut sheet: SpriteSheet) -> EngineResult<Sprite> {
        let image = self.assets.image(image_id)?;
        sheet.frame_speed.get_or_insert(self.config.default_frame_speed);
        Sprite::from_image(Some(image), sheet)
    }

    // ---- frame ----

    /// Step the active controller once, then apply any switch it requested.
    pub fn step(&mut self) {
        let Some(controller) = self.active_controller_mut() else {
            return;
        };
        controller.step();
        let request = controller.take_switch_request();
        record_step(&mut self.time);

        if let Some(next) = request {
            if self.controllers.contains_key(&next) {
                info!("Switching controller to {}", next);
                self.active = Some(next);
            } else {
                warn!("Ignoring switch to unknown controller '{}'", next);
            }
        }
    }

    /// One display frame at `now_ms`: drain pending steps, then render once.
    pub fn frame(&mut self, now_ms: f64, canvas: &mut dyn Canvas) {
        let elapsed = match self.previous_ms {
            Some(previous) => (now_ms - previous) / 1000.0,
            None => 0.0,
        };
        self.previous_ms = Some(now_ms);

        let capped = self.timestep.accumulate(elapsed);
        update_world_time(&mut self.time, capped);

        while self.timestep.consume_step() {
            if self.state.is_running() {
                self.step();
            }
        }

        self.render(canvas);
        self.debug.record_frame(now_ms);
    }

    /// Render the active controller and overlays without stepping.
    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        let size = (self.config.canvas_width, self.config.canvas_height);
        let controller = self.active.as_ref().and_then(|n| self.controllers.get_mut(n));
        render_frame(canvas, controller, &self.debug, size);
    }

    // ---- input ----

    /// Route a touch to the active controller and, while running, to the
    /// entities under it. Returns how many entities were touched.
    pub fn dispatch_touch(&mut self, event: TouchEvent) -> usize {
        let running = self.state.is_running();
        match self.active_controller_mut() {
            Some(controller) => dispatch_touch(controller, event, running),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use crate::resources::assetstore::{AssetEntry, AssetType, HeadlessLoader};
    use crate::systems::render::RecordingCanvas;

    fn config(speed: u32) -> GameConfig {
        GameConfig {
            game_speed: speed,
            ..GameConfig::new()
        }
    }

    fn game_with_room(speed: u32) -> Game {
        let mut game = Game::new(config(speed));
        let mut room = game.create_controller();
        room.add_entity(Entity::new("ship", 1).with_position(100.0, 0.0).with_motion(100.0, 0.0));
        game.add_controller("room", room);
        game.set_active_controller("room").unwrap();
        game
    }

    fn ship_x(game: &Game) -> f32 {
        game.active_controller().unwrap().entity_by_id(1).unwrap().x
    }

    #[test]
    fn unknown_controller_is_an_error() {
        let mut game = Game::default();
        let err = game.set_active_controller("nowhere").unwrap_err();
        assert!(matches!(err, EngineError::UnknownController(name) if name == "nowhere"));
        assert!(game.active_controller().is_none());
    }

    #[test]
    fn frames_run_whole_steps_and_render_once() {
        let mut game = game_with_room(10);
        let mut canvas = RecordingCanvas::new();
        game.run(0.0);

        // 250 ms at 10 steps/s: two steps, 50 ms carried over.
        game.frame(250.0, &mut canvas);
        assert_eq!(game.time().step_count, 2);
        assert_eq!(game.time().frame_count, 1);
        assert_eq!(ship_x(&game), 120.0);
        assert_eq!(canvas.commands.first(), Some(&crate::systems::render::DrawCommand::Save));

        game.frame(320.0, &mut canvas);
        assert_eq!(game.time().step_count, 3);
    }

    #[test]
    fn paused_frames_discard_their_steps() {
        let mut game = game_with_room(10);
        let mut canvas = RecordingCanvas::new();
        game.run(0.0);
        game.frame(250.0, &mut canvas);

        game.set_state(GameState::Stopped);
        game.frame(520.0, &mut canvas);
        assert_eq!(game.time().step_count, 2);
        assert_eq!(ship_x(&game), 120.0);

        game.set_state(GameState::Running);
        game.frame(560.0, &mut canvas);
        assert_eq!(game.time().step_count, 2);
        game.frame(660.0, &mut canvas);
        assert_eq!(game.time().step_count, 3);
        assert_eq!(ship_x(&game), 130.0);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut game = game_with_room(10);
        let mut canvas = RecordingCanvas::new();
        game.run(0.0);
        game.frame(60_000.0, &mut canvas);
        assert!(game.time().step_count <= 10);
        assert_eq!(game.time().delta, 1.0);
    }

    #[test]
    fn bad_frame_delta_cap_does_not_stop_the_game() {
        for cap in [f64::NAN, -1.0] {
            let mut game = game_with_room(10);
            game.config.max_frame_delta = cap;
            let mut canvas = RecordingCanvas::new();
            game.run(0.0);
            game.frame(250.0, &mut canvas);
            assert_eq!(game.time().step_count, 2);
            assert_eq!(ship_x(&game), 120.0);
            // The one-second fallback cap still applies.
            game.frame(60_000.0, &mut canvas);
            assert_eq!(game.time().delta, 1.0);
        }
    }

    #[test]
    fn switch_requests_apply_after_the_step() {
        let mut game = game_with_room(10);
        let mut menu = game.create_controller();
        menu.add_entity(Entity::new("title", 7));
        game.add_controller("menu", menu);
        game.active_controller_mut()
            .unwrap()
            .set_post_step(|c: &mut Controller| c.request_switch("menu"));

        game.run(0.0);
        game.step();
        assert_eq!(game.active_controller_name(), Some("menu"));
        assert_eq!(game.controller("room").unwrap().entity_by_id(1).unwrap().x, 110.0);
    }

    #[test]
    fn switch_to_unknown_controller_is_ignored() {
        let mut game = game_with_room(10);
        game.active_controller_mut()
            .unwrap()
            .set_pre_step(|c: &mut Controller| c.request_switch("missing"));
        game.step();
        assert_eq!(game.active_controller_name(), Some("room"));
    }

    #[test]
    fn removing_the_active_controller_clears_it() {
        let mut game = game_with_room(10);
        assert!(game.remove_controller("room").is_some());
        assert!(game.active_controller_name().is_none());
        game.step();
        assert_eq!(game.time().step_count, 0);
    }

    #[test]
    fn sprites_use_configured_frame_speed() {
        let mut game = Game::new(GameConfig {
            default_frame_speed: 4,
            ..GameConfig::new()
        });
        game.assets
            .images
            .add_entry(AssetEntry::new("hero", AssetType::Image, "hero.png").with_size(64, 16));
        game.assets.load_all(&mut HeadlessLoader).unwrap();

        let sprite = game
            .sprite("hero", SpriteSheet::frames(16.0, 16.0, 0, 3))
            .unwrap();
        assert_eq!(sprite.animation.frame_speed(), 4);
        assert!(game.sprite("villain", SpriteSheet::default()).is_err());
    }

    #[test]
    fn touches_need_an_active_controller() {
        let mut game = Game::default();
        assert_eq!(game.dispatch_touch(TouchEvent::start(1.0, 1.0)), 0);
    }
}
