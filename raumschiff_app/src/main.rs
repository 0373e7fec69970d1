//! Raumschiff demo application
//!
//! Opens the window, imports the spaceship and runs the screen loop until the
//! window is closed. Startup failures exit with status -1.

use raumschiff_engine::assets::{lore::load_lore_text, ImportError, ObjLoader};
use raumschiff_engine::config::{report_load, Config, DemoConfig};
use raumschiff_engine::foundation::{logging, time::FrameClock};
use raumschiff_engine::render::text::GlyphCache;
use raumschiff_engine::render::{
    check_errors, FrameRenderer, GlDevice, GraphicsDevice, UploadError, WindowError, WindowHandle,
};
use raumschiff_engine::screen::{AppState, Screen};
use thiserror::Error;

const CONFIG_PATH: &str = "config/raumschiff.toml";

/// Fatal errors before the first frame
#[derive(Error, Debug)]
enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Everything alive between startup and teardown
struct RaumschiffApp {
    config: DemoConfig,
    window: WindowHandle,
    device: GlDevice,
    renderer: FrameRenderer,
    state: AppState,
    clock: FrameClock,
}

impl RaumschiffApp {
    fn new(config: DemoConfig) -> Result<Self, StartupError> {
        config.validate().map_err(StartupError::Config)?;

        log::info!("Creating window...");
        let mut window = WindowHandle::new(&config.window)?;
        let mut device = window.create_device();
        let (width, height) = window.framebuffer_size();
        device.set_viewport(width, height);
        device.set_depth_test(true);

        let mesh = ObjLoader::load_obj(&config.assets.mesh_path)?;
        let glyphs = GlyphCache::load(&mut device, &config.assets.font_path, config.text.pixel_size);
        let mut renderer = FrameRenderer::new(&mut device, &mesh, &config, glyphs)?;
        renderer.resize(&mut device, width, height);
        check_errors(&mut device, "startup");

        let lore = load_lore_text(&config.assets.lore_path);
        let screen = Screen::initial(config.initial_screen, lore, config.text.reveal_interval);
        log::info!("Starting on {:?} screen", screen.kind());

        Ok(Self {
            state: AppState::new(screen, config.controls),
            config,
            window,
            device,
            renderer,
            clock: FrameClock::start(),
        })
    }

    fn run(mut self) {
        while !self.window.should_close() {
            if let Some((width, height)) = self.window.poll_events() {
                self.renderer.resize(&mut self.device, width, height);
            }

            let dt = self.clock.tick();
            let input = self.window.input_snapshot();
            self.state = self.state.update(&input, dt);
            if self.state.should_close {
                self.window.set_should_close(true);
            }

            self.renderer.render(&mut self.device, &self.state.screen);
            check_errors(&mut self.device, "frame");
            self.window.swap_buffers();
        }

        log::info!(
            "Closing after {} frames in {:.1} s ({:.1} fps average)",
            self.clock.frames(),
            self.clock.elapsed().as_secs_f32(),
            self.clock.average_fps()
        );
        self.renderer.teardown(&mut self.device);
        log::debug!("Window \"{}\" released", self.config.window.title);
    }
}

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {panic_info}");
        if let Some(location) = panic_info.location() {
            eprintln!("Panic location: {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    let (config, load_error) = DemoConfig::load_with_fallback(CONFIG_PATH);
    logging::init(&config.log_level);
    log::info!("Starting Raumschiff");
    report_load(CONFIG_PATH, load_error.as_ref());

    match RaumschiffApp::new(config) {
        Ok(app) => app.run(),
        Err(e) => {
            log::error!("Startup failed: {e}");
            std::process::exit(-1);
        }
    }
}
