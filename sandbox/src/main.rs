//! Sandbox demo application
//!
//! Builds a small scene with a parented pair of entities and a stream of
//! short-lived sparks, then drives it headless for a bounded number of
//! frames. Pass a `.toml` or `.ron` runtime config path as the first
//! argument to override the defaults.

mod components;
mod console;

use spark_engine::foundation::logging;
use spark_engine::prelude::*;
use thiserror::Error;

use components::{DebugLabel, Greeter, Lifetime, Marker, Nudge, Spinner};
use console::{ConsoleCanvas, ConsoleUi};

/// Seconds between two sparks
const SPAWN_INTERVAL: f32 = 0.25;

/// Frames run when no config file is given
const DEFAULT_FRAMES: u64 = 120;

const NUDGE_STEP: f32 = 100.0;

#[derive(Error, Debug)]
enum SandboxError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

struct SandboxApp {
    panels: EditorPanels,
    since_spawn: f32,
    sparks: u32,
}

impl SandboxApp {
    fn new() -> Self {
        Self {
            panels: EditorPanels::new(),
            since_spawn: 0.0,
            sparks: 0,
        }
    }

    fn spawn_spark(&mut self, scene: &mut Scene) {
        self.sparks += 1;
        let column = u8::try_from(self.sparks % 8).unwrap_or(0);
        let offset = Vec3::new(f32::from(column), -1.0, 0.0);
        let spark = DetachedEntity::new(&format!("Spark {}", self.sparks))
            .with_local_position(offset)
            .with_component(Lifetime { remaining: 1.0 })
            .with_component(Marker {
                color: Color::RED,
                size: 0.25,
            });
        let id = scene.add_entity(spark);
        log::debug!("Spawned spark {id:?}");
    }
}

impl Application for SandboxApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let scene = engine.scenes_mut().current_scene_mut();

        let hello = scene.emplace_entity("Hello");
        scene.add_component(
            hello,
            Greeter {
                greeting: "Hello".to_string(),
            },
        );
        scene.add_component(hello, Spinner { degrees_per_second: 90.0 });
        scene.add_component(
            hello,
            Marker {
                color: Color::GREEN,
                size: 1.0,
            },
        );
        scene.add_component(hello, DebugLabel);
        scene.add_component(hello, Nudge { step: NUDGE_STEP });

        let world = scene.emplace_entity("World");
        scene.set_local_position(world, Vec3::new(2.0, 0.0, 0.0));
        scene.add_component(
            world,
            Greeter {
                greeting: "Hi".to_string(),
            },
        );
        scene.add_component(
            world,
            Marker {
                color: Color::BLUE,
                size: 0.5,
            },
        );
        scene.add_component(world, DebugLabel);
        scene.set_parent(world, Some(hello), true)?;

        log::info!(
            "Scene '{}' ready with {} entities",
            scene.name(),
            scene.entity_count()
        );

        self.panels.select(Some(hello));
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        self.since_spawn += delta_time;
        if self.since_spawn >= SPAWN_INTERVAL {
            self.since_spawn -= SPAWN_INTERVAL;
            self.spawn_spark(engine.scenes_mut().current_scene_mut());
        }
        Ok(())
    }

    fn render_ui(&mut self, engine: &mut Engine, ui: &mut dyn Ui) -> Result<(), AppError> {
        self.panels.render(engine.scenes_mut(), ui);
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let scene = engine.scenes().current_scene();
        if let Some(world) = scene.find_entity_by_name("World") {
            if let Some(position) = scene.world_position(world) {
                log::info!("World ends at {position:?}");
            }
        }
        log::info!(
            "Sandbox finished after {} frames: {} sparks spawned, {} entities left",
            engine.frame_count(),
            self.sparks,
            scene.entity_count()
        );
    }
}

fn load_config() -> Result<RuntimeConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => RuntimeConfig::load_from_file(path),
        None => Ok(RuntimeConfig {
            frame: FrameConfig {
                fixed_delta_time: Some(1.0 / 60.0),
                max_frames: Some(DEFAULT_FRAMES),
            },
            ..RuntimeConfig::default()
        }),
    }
}

fn main() -> Result<(), SandboxError> {
    // Set up panic hook for better error reporting
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {panic_info}");
    }));

    let config = load_config()?;
    logging::init_with_filter(&config.log_filter);

    log::info!("Starting sandbox");

    let mut app = SandboxApp::new();
    let mut canvas = ConsoleCanvas::new();
    let mut ui = ConsoleUi::new();
    ui.press_button(&format!("Add {NUDGE_STEP} to Position"));

    match Engine::run(config, &mut app, &mut canvas, &mut ui) {
        Ok(()) => {
            log::info!("Sandbox presented {} frames", canvas.frames());
            Ok(())
        }
        Err(e) => {
            log::error!("Application error: {e}");
            Err(e.into())
        }
    }
}
