use anyhow::{Context, Result};
use clap::Parser;
use glyphstage_assets::load_assets;
use glyphstage_common::Viewport;
use glyphstage_controls::OrbitControls;
use glyphstage_render::{FrameLoop, TickOutcome, ViewportHandler};
use glyphstage_render_wgpu::WgpuBackend;
use glyphstage_scene::{build_scene, PerspectiveCamera, Scene};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "glyphstage-desktop", about = "Glyphstage desktop viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Font file used for the extruded glyphs
    #[arg(long, default_value = "assets/helvetiker_regular.ttf")]
    font: String,
}

/// Everything the frame loop and resize handler operate on. One owner,
/// passed by reference; no ambient globals.
struct StageContext {
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    frame_loop: FrameLoop,
    viewport_handler: ViewportHandler,
}

impl StageContext {
    fn new(scene: Scene, viewport: Viewport) -> Self {
        let camera = PerspectiveCamera::new(viewport.aspect_ratio());
        let controls = OrbitControls::from_pose(camera.target, camera.eye);
        Self {
            scene,
            camera,
            controls,
            frame_loop: FrameLoop::new(),
            viewport_handler: ViewportHandler::new(viewport),
        }
    }
}

struct StageApp {
    scene: Option<Scene>,
    context: Option<StageContext>,
    window: Option<Arc<Window>>,
    backend: Option<WgpuBackend>,
    rotating: bool,
    panning: bool,
}

impl StageApp {
    fn new(scene: Scene) -> Self {
        Self {
            scene: Some(scene),
            context: None,
            window: None,
            backend: None,
            rotating: false,
            panning: false,
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(context) = &mut self.context {
            context.frame_loop.stop();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for StageApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Glyphstage")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height);
        let scene = self.scene.take().expect("scene consumed once");
        let context = StageContext::new(scene, viewport);

        match WgpuBackend::new(window.clone(), viewport, &context.scene) {
            Ok(backend) => {
                self.backend = Some(backend);
                self.context = Some(context);
                self.window = Some(window);
            }
            Err(e) => {
                tracing::error!("failed to initialize GPU backend: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Shutdown paths first; they need the whole app.
        match &event {
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
                return;
            }
            WindowEvent::KeyboardInput { event: key_event, .. }
                if key_event.state == ElementState::Pressed
                    && key_event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                self.shutdown(event_loop);
                return;
            }
            _ => {}
        }

        let (Some(context), Some(backend)) = (&mut self.context, &mut self.backend) else {
            return;
        };

        match event {
            WindowEvent::Resized(new_size) => {
                context.viewport_handler.apply(
                    &mut context.camera,
                    backend,
                    new_size.width,
                    new_size.height,
                );
            }
            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.rotating = pressed,
                    MouseButton::Right => self.panning = pressed,
                    _ => {}
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                context.controls.zoom(steps);
            }
            WindowEvent::RedrawRequested => {
                match context.frame_loop.tick(
                    &mut context.controls,
                    &mut context.camera,
                    &context.scene,
                    backend,
                ) {
                    TickOutcome::Rendered | TickOutcome::Faulted(_) => {
                        // Faults are logged by the driver; keep going.
                    }
                    TickOutcome::Stopped => return,
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        let Some(context) = &mut self.context else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.rotating {
                context.controls.rotate(delta.0 as f32, delta.1 as f32);
            } else if self.panning {
                context.controls.pan(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("glyphstage-desktop starting");

    // Phase one: assets. The scene is never built if this fails.
    let assets = load_assets(&cli.font)
        .with_context(|| format!("loading font from {}", cli.font))?;
    // Phase two: synchronous scene construction.
    let scene = build_scene(&assets).context("building scene")?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = StageApp::new(scene);
    event_loop.run_app(&mut app)?;

    Ok(())
}
