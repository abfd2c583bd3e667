use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use log::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

use crate::error::HostError;
use crate::input::InputState;
use crate::renderer::present::FramePresenter;
use crate::renderer::utils::physical_to_logical;
use crate::window::{WindowConfig, window_attributes};

// ── Game trait ──────────────────────────────────────────────────────────────

/// What the host loop drives: `update` at a fixed rate, `render` once per
/// redraw. The frame returned by `render` is shown as-is, scaled into the
/// window.
pub trait Game {
    fn update(&mut self, input: &InputState);
    fn render(&mut self) -> &RgbaImage;
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    target_ups: u32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            title: "tilewalk".into(),
            width: 512,
            height: 512,
            target_ups: 60,
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self { Self::default() }
    pub fn with_title(mut self, title: &str) -> Self { self.title = title.into(); self }
    /// Logical window size; also the size of the frames the game renders.
    pub fn with_size(mut self, width: u32, height: u32) -> Self { self.width = width; self.height = height; self }
    pub fn with_ups(mut self, ups: u32) -> Self { self.target_ups = ups.max(1); self }

    /// Open the window and run `game` until the window is closed.
    pub fn run(self, game: impl Game + 'static) -> Result<(), HostError> {
        let event_loop = EventLoop::new()?;
        let fixed_dt = 1.0 / self.target_ups as f32;
        let mut app = App {
            config: self,
            game: Box::new(game),
            presenter: None,
            input: InputState::new(),
            last_instant: None,
            accumulator: 0.0,
            fixed_dt,
            failure: None,
        };
        event_loop.run_app(&mut app)?;
        match app.failure.take() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    config: EngineBuilder,
    game: Box<dyn Game>,
    presenter: Option<FramePresenter>,
    input: InputState,
    last_instant: Option<Instant>,
    accumulator: f32,
    fixed_dt: f32,
    /// First host failure; ends the loop and is returned from `run`.
    failure: Option<HostError>,
}

impl App {
    fn create_presenter(&self, event_loop: &ActiveEventLoop) -> Result<FramePresenter, HostError> {
        let window_config = WindowConfig::for_map(self.config.width, self.config.height);
        let window = Arc::new(event_loop.create_window(window_attributes(&window_config, &self.config.title))?);
        let size = window.inner_size();
        info!(
            "window '{}': {}x{} logical, {}x{} physical",
            self.config.title, self.config.width, self.config.height, size.width, size.height
        );
        pollster::block_on(FramePresenter::new(window, self.config.width, self.config.height))
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, failure: HostError) {
        error!("{failure}");
        self.failure.get_or_insert(failure);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.presenter.is_some() {
            return;
        }
        match self.create_presenter(event_loop) {
            Ok(presenter) => self.presenter = Some(presenter),
            Err(failure) => self.fail(event_loop, failure),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(presenter) = self.presenter.as_ref() {
            presenter.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(presenter) = self.presenter.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => presenter.resize(size),

            WindowEvent::CursorMoved { position, .. } => {
                self.input.mouse_pos = physical_to_logical(
                    presenter.window_config(),
                    [position.x as f32, position.y as f32],
                );
            }

            WindowEvent::MouseInput { button, state, .. } => match state {
                ElementState::Pressed => self.input.press_mouse(button),
                ElementState::Released => self.input.release_mouse(button),
            },

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32().min(0.25),
                    None => self.fixed_dt,
                };
                self.last_instant = Some(now);
                self.accumulator += elapsed;

                // A press stays pending until an update tick has seen it.
                while self.accumulator >= self.fixed_dt {
                    self.game.update(&self.input);
                    self.input.clear_frame_state();
                    self.accumulator -= self.fixed_dt;
                }

                presenter.upload(self.game.render());
                match presenter.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        warn!("surface lost, reconfiguring");
                        let size = presenter.window.inner_size();
                        presenter.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("GPU out of memory");
                        event_loop.exit();
                    }
                    Err(e) => warn!("skipped frame: {e}"),
                }
            }

            _ => {}
        }
    }
}
