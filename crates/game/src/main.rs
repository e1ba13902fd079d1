//! Astronomy - a procedurally generated solar system with a flyable camera

mod config;
mod events;
mod frame;
mod scene;
mod spaceship;

use anyhow::{Context, Result};
use config::AppConfig;
use frame::FrameContext;
use glam::Vec2;
use input::{InputState, KeyBindings};
use renderer::{Mesh, ModelData, Renderer};
use scene::SolarSystem;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

const WINDOW_TITLE: &str = "Astronomy";

/// Main application state.
pub struct GameState {
    renderer: Renderer,
    input: InputState,
    bindings: KeyBindings,
    frame: FrameContext,
    system: SolarSystem<Mesh>,
    running: bool,
}

impl GameState {
    async fn new(window: Arc<Window>, config: AppConfig) -> Result<Self> {
        let mut renderer = Renderer::new(window, config.vsync).await?;

        let ship_model = ModelData::load(&config.ship_model)
            .with_context(|| format!("Failed to load spaceship model {}", config.ship_model.display()))?;
        let system = SolarSystem::new(&mut renderer, &config.seeds, &ship_model)
            .context("Failed to build solar system geometry")?;

        let mut frame = FrameContext::new(&config).context("Invalid day/night settings")?;
        let (width, height) = renderer.dimensions();
        frame.camera.camera_mut().set_aspect(width, height);

        let mut state = Self {
            renderer,
            input: InputState::new(),
            bindings: KeyBindings::default(),
            frame,
            system,
            running: true,
        };
        state.set_cursor_captured(true);
        Ok(state)
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        let window = &self.renderer.window;
        if captured {
            let _ = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        } else {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
        }
        window.set_cursor_visible(!captured);
        self.input.set_cursor_locked(captured);
    }

    fn update(&mut self) {
        self.frame.clock.tick();

        let commands = self.bindings.active_commands(&self.input);
        // Raw motion is positive downwards; the camera wants positive up.
        let mouse = self.input.mouse_delta() * Vec2::new(1.0, -1.0);
        let scroll = self.input.scroll_delta();
        self.frame.step(&commands, mouse, scroll, &mut self.system);
        self.input.end_frame();

        if self.frame.quit_requested() {
            self.running = false;
        }

        if self.frame.fps.update(self.frame.clock.elapsed_seconds()) {
            self.renderer
                .window
                .set_title(&format!("{WINDOW_TITLE} FPS:{}", self.frame.fps.fps()));
        }
    }

    fn render(&mut self) {
        let frame = &self.frame;
        let system = &self.system;
        let result = self
            .renderer
            .render_scene(frame.sky.color(), frame.shading, |pass| frame.render(system, pass));

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.renderer.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                self.running = false;
            }
            Err(e) => log::warn!("Dropped frame: {e}"),
        }
    }
}

struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = AppConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title(WINDOW_TITLE)
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(GameState::new(window.clone(), config)) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.handle_device_event(event);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Astronomy controls:");
    println!("  WASD / mouse / wheel  - Fly and zoom (static camera)");
    println!("  K                     - Cycle camera: static, following, riding");
    println!("  Arrows, Numpad +/-    - Aim and size the ship's spotlight");
    println!("  F / G                 - Thicker / thinner fog");
    println!("  P / B                 - Gouraud shading / Blinn specular");
    println!("  Escape                - Quit");

    log::info!("Starting Astronomy");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
