use std::sync::Arc;

use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::ViewerConfig;
use crate::controls::OrbitControls;
use crate::gpu::{GpuContext, RendererError};
use crate::input::PointerInput;
use crate::mesh::Mesh;
use crate::renderer::Renderer;
use crate::sphere::MeshError;
use crate::texture::Texture;

/// Edge length of the generated checkerboard texture.
const CHECKERBOARD_SIZE: u32 = 256;

/// Errors that stop the viewer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Renderer(#[from] RendererError),

    #[error("invalid sphere: {0}")]
    Mesh(#[from] MeshError),
}

/// Open a window and run the viewer until it is closed.
pub fn run(config: ViewerConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GlobeviewApp::Pending { config };
    event_loop.run_app(&mut app)?;

    match app {
        GlobeviewApp::Failed(e) => Err(e),
        _ => Ok(()),
    }
}

enum GlobeviewApp {
    Pending {
        config: ViewerConfig,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        renderer: Renderer,
        controls: OrbitControls,
        input: PointerInput,
    },
    Failed(AppError),
}

impl GlobeviewApp {
    fn start(config: &ViewerConfig, event_loop: &ActiveEventLoop) -> Result<Self, AppError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;

        let sphere = config.sphere.generate()?;
        info!(
            vertices = sphere.vertex_count(),
            triangles = sphere.triangle_count(),
            "generated sphere"
        );
        let mesh = Mesh::from_sphere(&gpu, &sphere);

        let texture = match &config.texture.path {
            Some(path) => {
                let texture = Texture::from_file(&gpu, path)?;
                info!(
                    "loaded texture {} ({}x{})",
                    path.display(),
                    texture.width,
                    texture.height
                );
                texture
            }
            None => Texture::checkerboard(&gpu, CHECKERBOARD_SIZE, config.texture.checker_squares),
        };

        let mut renderer = Renderer::new(&gpu, mesh, &texture, config.lighting.clone());
        let controls = OrbitControls::new(
            config.camera.orbit_camera(),
            config.camera.perspective(),
            gpu.width(),
            gpu.height(),
        );
        controls.init(&mut renderer);

        Ok(GlobeviewApp::Running {
            window,
            gpu,
            renderer,
            controls,
            input: PointerInput::new(),
        })
    }
}

impl ApplicationHandler for GlobeviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let GlobeviewApp::Pending { config } = self {
            match Self::start(config, event_loop) {
                Ok(running) => *self = running,
                Err(e) => {
                    error!("failed to start viewer: {e}");
                    *self = GlobeviewApp::Failed(e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let GlobeviewApp::Running {
            window,
            gpu,
            renderer,
            controls,
            input,
        } = self
        else {
            return;
        };

        if let Some(pointer) = input.handle_event(&event) {
            controls.handle(pointer, renderer);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
                controls.resize(size.width, size.height, renderer);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = renderer.render(gpu) {
                    error!("render failed: {e}");
                    *self = GlobeviewApp::Failed(e.into());
                    event_loop.exit();
                    return;
                }
                window.request_redraw();
            }
            _ => {}
        }
    }
}
