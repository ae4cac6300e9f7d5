use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

use scene_loop::cli::Cli;
use scene_loop::core::{FpsCounter, RenderLoop, Stage, ViewportState, WinitController};
use scene_loop::logging::init_logging;
use scene_loop::renderer::SceneRenderer;
use scene_loop::scene::{BuiltScene, SceneBuilder};
use scene_loop::window::Window;

const INITIAL_WINDOW_WIDTH: u32 = 800;
const INITIAL_WINDOW_HEIGHT: u32 = 600;

type AppStage = Stage<SceneRenderer>;

struct App {
    /// Built before the event loop starts; moved into the stage on resume
    pending_scene: Option<BuiltScene>,
    window: Option<Window>,
    stage: Option<AppStage>,
    viewport: Option<ViewportState<AppStage>>,
    render_loop: RenderLoop,
    input: WinitController,
    fps: FpsCounter,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(scene: BuiltScene) -> Self {
        Self {
            pending_scene: Some(scene),
            window: None,
            stage: None,
            viewport: None,
            render_loop: RenderLoop::new(),
            input: WinitController::new(),
            fps: FpsCounter::new(),
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.render_loop.stop();
        self.failure.get_or_insert(err);
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let scene = self
            .pending_scene
            .take()
            .context("scene already handed to the renderer")?;

        let attributes = winit::window::Window::default_attributes()
            .with_title(format!("scene-loop: {}", scene.name()))
            .with_inner_size(winit::dpi::LogicalSize::new(
                INITIAL_WINDOW_WIDTH,
                INITIAL_WINDOW_HEIGHT,
            ));
        let window = Window::new(Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        ));

        let initial = window.viewport();
        let renderer = pollster::block_on(SceneRenderer::new(window.inner().clone(), &initial))
            .context("failed to initialise renderer")?;

        let mut stage = Stage::new(scene, renderer);
        let mut viewport: ViewportState<AppStage> =
            ViewportState::new(initial.width, initial.height, window.scale_factor());
        AppStage::register_resize_consumers(&mut viewport);
        viewport.sync(&mut stage);

        self.render_loop.start(&window);
        self.window = Some(window);
        self.stage = Some(stage);
        self.viewport = Some(viewport);
        Ok(())
    }

    fn resize(&mut self) {
        if let (Some(window), Some(viewport), Some(stage)) =
            (&self.window, &mut self.viewport, &mut self.stage)
        {
            let current = window.viewport();
            viewport.resize(current.width, current.height, window.scale_factor(), stage);
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let (Some(window), Some(viewport), Some(stage)) =
            (&self.window, &self.viewport, &mut self.stage)
        else {
            return Ok(());
        };
        let current = viewport.current();

        let delta = self.input.drain();
        if !delta.is_empty() {
            stage.scene.feed_input(delta, &current);
        }

        let frame = self
            .render_loop
            .tick(stage, &current, window)
            .context("render loop stopped")?;

        if let Some(frame) = frame {
            if let Some(fps) = self.fps.update(frame.delta) {
                log::debug!("frame {} at {:.2}s, {fps:.1} fps", frame.number, frame.time);
            }
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.start(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(window) = &self.window {
            self.input.process_event(&event, window.scale_factor());
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                log::info!("closing after {} frames", self.render_loop.frames_submitted());
                self.render_loop.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resize(),
            WindowEvent::Occluded(occluded) => log::debug!("window occluded: {occluded}"),
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_filter.as_deref());

    let config = cli.scene_config().context("failed to load scene description")?;
    let scene = SceneBuilder::build(&config)
        .with_context(|| format!("invalid scene `{}`", config.name))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(scene);
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
