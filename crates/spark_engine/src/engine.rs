//! Core engine implementation

use crate::{
    application::Application,
    config::{ConfigError, RuntimeConfig},
    foundation::time::FrameClock,
    render::{Canvas, Color},
    scene::SceneManager,
    ui::Ui,
};
use thiserror::Error;

/// Main engine struct
///
/// Owns the scene manager, the runtime configuration and the frame clock,
/// and drives the frame loop against the canvas and UI backends it is given.
#[derive(Debug)]
pub struct Engine {
    /// Scene manager; frame calls go to its current scene
    scenes: SceneManager,

    /// Frame timing
    clock: FrameClock,

    /// Engine configuration
    config: RuntimeConfig,

    /// Frames completed by [`Engine::frame`]
    frames: u64,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: RuntimeConfig) -> Self {
        log::info!("Initializing engine...");

        let clock = config
            .frame
            .fixed_delta_time
            .map_or_else(FrameClock::new, FrameClock::fixed);

        Self {
            scenes: SceneManager::with_config(&config),
            clock,
            config,
            frames: 0,
            running: true,
        }
    }

    /// Run the engine main loop with the given application
    ///
    /// Initializes the application and the current scene, then runs frames
    /// until [`Engine::quit`] is called or `frame.max_frames` is reached.
    /// Cleanup runs even when a frame fails.
    pub fn run<T: Application>(
        config: RuntimeConfig,
        app: &mut T,
        canvas: &mut dyn Canvas,
        ui: &mut dyn Ui,
    ) -> Result<(), EngineError> {
        let mut engine = Self::new(config);

        // Initialize application
        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;
        engine.scenes.init();

        log::info!("Starting main loop...");
        let result = engine.run_frames(app, canvas, ui);

        // Cleanup
        app.cleanup(&mut engine);

        log::info!("Engine shutdown complete after {} frames", engine.frames);
        result
    }

    fn run_frames<T: Application>(
        &mut self,
        app: &mut T,
        canvas: &mut dyn Canvas,
        ui: &mut dyn Ui,
    ) -> Result<(), EngineError> {
        while self.running {
            if self.config.frame.max_frames.is_some_and(|max| self.frames >= max) {
                log::info!("Reached frame limit of {}", self.frames);
                break;
            }
            let delta_time = self.clock.tick();
            self.frame(app, delta_time, canvas, ui)?;
        }
        Ok(())
    }

    /// Run a single frame: update, render, debug overlay, application UI
    pub fn frame<T: Application>(
        &mut self,
        app: &mut T,
        delta_time: f32,
        canvas: &mut dyn Canvas,
        ui: &mut dyn Ui,
    ) -> Result<(), EngineError> {
        // Update application, then the scene (including its deletion sweep)
        app.update(self, delta_time)
            .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;
        self.scenes.update(delta_time);

        // Render
        canvas.set_draw_color(Color::BLACK);
        canvas.clear();
        self.scenes.render(canvas);
        self.scenes.render_debug_overlay(ui);
        app.render_ui(self, ui)
            .map_err(|e| EngineError::ApplicationError(format!("App render: {e}")))?;
        canvas.present();

        self.frames += 1;
        Ok(())
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the frame loop keeps running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Engine configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Get the scene manager
    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Get mutable access to the scene manager
    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    /// Delta time of the last clock tick
    pub fn delta_time(&self) -> f32 {
        self.clock.delta_time()
    }

    /// Total time accumulated by the clock
    pub fn total_time(&self) -> f32 {
        self.clock.total_time()
    }

    /// Frames completed so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}
