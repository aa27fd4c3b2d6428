//! vastengine demo entry point.
//!
//! Builds two controllers ("title" and "field"), fills the field with
//! bouncing balls and runs them through the fixed-timestep loop.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (missing file keeps defaults) and the asset manifest
//! 2. Register the demo controllers and activate "title"
//! 3. Run the loop:
//!    - headless (default): a manual clock advanced 1/60 s per frame, drawing
//!      into a recording canvas, for `--frames` frames
//!    - windowed (`raylib` feature): a system clock, raylib window and mouse
//!      touches, until the window closes
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --frames 600 --debug
//! cargo run --release --features raylib -- --manifest assets/manifest.json
//! ```

use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use vastengine::components::entity::{Entity, EntityContext};
use vastengine::components::sprite::SpriteSheet;
use vastengine::controller::Controller;
use vastengine::error::EngineResult;
use vastengine::events::input::TouchEvent;
use vastengine::game::Game;
use vastengine::resources::assetstore::{AssetEntry, AssetType, HeadlessLoader};
use vastengine::resources::gameconfig::GameConfig;
use vastengine::systems::gameloop::{GameLoop, ManualClock};
use vastengine::systems::render::{Canvas, RecordingCanvas};

const BALL_IMAGE: &str = "ball";
const BALL_COUNT: u32 = 12;
const TITLE_STEPS: u32 = 90;

/// vastengine 2D
#[derive(Parser)]
#[command(version, about = "Fixed-timestep 2D engine demo")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// JSON asset manifest.
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Frames to run headless before exiting.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Show the FPS / entity overlay.
    #[arg(long)]
    debug: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> EngineResult<()> {
    let mut config = GameConfig::with_path(&cli.config);
    if cli.config.exists() {
        config.load_from_file()?;
    } else {
        info!("No config at {}, using defaults", cli.config.display());
    }
    config.show_debug |= cli.debug;

    let mut game = Game::new(config);
    if let Some(manifest) = &cli.manifest {
        game.assets.load_manifest(manifest)?;
    }

    #[cfg(feature = "raylib")]
    {
        windowed::run(game)
    }
    #[cfg(not(feature = "raylib"))]
    {
        run_headless(game, cli.frames)
    }
}

#[cfg_attr(feature = "raylib", allow(dead_code))]
fn run_headless(mut game: Game, frames: u64) -> EngineResult<()> {
    if !game.assets.images.contains(BALL_IMAGE) {
        game.assets.images.add_entry(
            AssetEntry::new(BALL_IMAGE, AssetType::Image, "ball.png").with_size(16, 16),
        );
    }
    let loaded = game.assets.load_all(&mut HeadlessLoader)?;
    info!("Loaded {} assets headless", loaded);
    setup_demo(&mut game)?;

    let clock = ManualClock::new();
    let mut game_loop = GameLoop::new(clock.clone());
    let mut canvas = RecordingCanvas::new();
    let mut painted = 0;
    let mut remaining = frames;

    let ran = game_loop.run(&mut game, |game, now| {
        if remaining == 0 {
            return false;
        }
        remaining -= 1;

        if fastrand::u8(..) < 8 {
            let (x, y) = (
                fastrand::f32() * game.config.canvas_width as f32,
                fastrand::f32() * game.config.canvas_height as f32,
            );
            game.dispatch_touch(TouchEvent::start(x, y));
            game.dispatch_touch(TouchEvent::end(x, y));
        }

        game.frame(now, &mut canvas);
        painted += canvas.painted_images().len();
        canvas.clear();
        clock.advance_ms(1000.0 / 60.0);
        true
    });

    info!(
        "Headless run: {} frames, {} steps ({:.2} s simulated), {} sprite draws, active controller {:?}",
        ran,
        game.time().step_count,
        game.time().simulated_seconds(game.timestep().step_size()),
        painted,
        game.active_controller_name()
    );
    Ok(())
}

/// Register the "title" and "field" controllers and activate "title".
fn setup_demo(game: &mut Game) -> EngineResult<()> {
    let mut title = game.create_controller();
    let mut waited = 0;
    title.set_post_step(move |c: &mut Controller| {
        waited += 1;
        if waited >= TITLE_STEPS {
            c.request_switch("field");
        }
    });
    title.set_on_touch(|c: &mut Controller, _: f32, _: f32| c.request_switch("field"));
    title.set_draw(|_: &Controller, canvas: &mut dyn Canvas| {
        canvas.fill_text("vastengine", 280.0, 220.0)
    });

    let mut field = game.create_controller();
    let (width, height) = (
        game.config.canvas_width as f32,
        game.config.canvas_height as f32,
    );
    for id in 0..BALL_COUNT {
        let sprite = game.sprite(BALL_IMAGE, SpriteSheet::default())?;
        let mut ball = Entity::new("ball", id)
            .with_position(
                fastrand::f32() * (width - sprite.width),
                fastrand::f32() * (height - sprite.height),
            )
            .with_depth(fastrand::i32(-10..10))
            .with_motion(20.0 + fastrand::f32() * 40.0, fastrand::f32() * 360.0)
            .with_sprite(sprite);
        ball.set_size_from_sprite();
        ball.set_step(move |e: &mut Entity, ctx: &mut dyn EntityContext| bounce(e, ctx, width, height));
        ball.set_on_touch(|e: &mut Entity, _: &mut dyn EntityContext, _: f32, _: f32| e.destroy());
        field.add_entity(ball);
    }
    field.set_post_step(|c: &mut Controller| {
        if c.is_empty() {
            c.request_switch("title");
        }
    });
    field.set_draw(|c: &Controller, canvas: &mut dyn Canvas| {
        canvas.fill_text(&format!("Balls: {}", c.len()), 16.0, 16.0)
    });

    game.add_controller("title", title);
    game.add_controller("field", field);
    game.set_active_controller("title")
}

/// Reflect the direction off the canvas edges and off other balls.
fn bounce(e: &mut Entity, ctx: &mut dyn EntityContext, width: f32, height: f32) {
    if !ctx.colliding_with(e, Some("ball")).is_empty() {
        e.set_direction((e.direction + 180.0) % 360.0);
    }
    if e.x <= 0.0 || e.x + e.width >= width {
        e.set_direction((540.0 - e.direction) % 360.0);
        e.x = e.x.clamp(0.0, (width - e.width).max(0.0));
    }
    if e.y <= 0.0 || e.y + e.height >= height {
        e.set_direction((360.0 - e.direction) % 360.0);
        e.y = e.y.clamp(0.0, (height - e.height).max(0.0));
    }
}

#[cfg(feature = "raylib")]
mod windowed {
    use log::info;
    use raylib::prelude::*;

    use vastengine::error::EngineResult;
    use vastengine::events::input::TouchEvent;
    use vastengine::game::Game;
    use vastengine::resources::texturestore::{RaylibCanvas, RaylibLoader, TextureStore};
    use vastengine::systems::gameloop::{GameLoop, SystemClock};

    pub fn run(mut game: Game) -> EngineResult<()> {
        let (width, height) = game.config.scaled_canvas_size();
        let (mut rl, thread) = raylib::init()
            .size(width as i32, height as i32)
            .title("vastengine")
            .build();
        rl.set_target_fps(120);
        if game.config.fullscreen {
            rl.toggle_fullscreen();
        }

        let mut textures = TextureStore::new();
        let loaded = game
            .assets
            .load_all(&mut RaylibLoader::new(&mut rl, &thread, &mut textures))?;
        info!("Loaded {} assets", loaded);
        super::setup_demo(&mut game)?;

        let transform = game.config.canvas_transform();
        let mut game_loop = GameLoop::new(SystemClock::new());
        game_loop.run(&mut game, |game, now| {
            if rl.window_should_close() {
                return false;
            }
            if rl.is_key_pressed(KeyboardKey::KEY_F11) {
                game.debug.toggle();
            }

            let mouse = rl.get_mouse_position();
            let (x, y) = transform.to_canvas(mouse.x, mouse.y);
            if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
                game.dispatch_touch(TouchEvent::start(x, y));
            }
            if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
                game.dispatch_touch(TouchEvent::end(x, y));
            }

            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::BLACK);
            let mut canvas = RaylibCanvas::new(&mut d, &textures, transform);
            game.frame(now, &mut canvas);
            true
        });
        Ok(())
    }
}
