//! # Globeview
//!
//! **A lit, textured sphere you can spin with the mouse.**
//!
//! The interesting parts are plain math and work without a window:
//! [`SphereMesh::generate`] builds the UV-sphere geometry, [`OrbitCamera`]
//! turns pointer drags into an orbit around the origin, and
//! [`OrbitControls`] wires drags and resizes to any [`UniformSink`].
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> Result<(), globeview::AppError> {
//!     let config = globeview::config::load(None).unwrap_or_default();
//!     globeview::run(config)
//! }
//! ```
//!
//! ## Headless use
//!
//! ```
//! use globeview::{OrbitCamera, OrbitControls, Perspective, PointerEvent, UniformSink};
//! use globeview::{Mat4, Vec2, Vec3};
//!
//! #[derive(Default)]
//! struct Uniforms {
//!     view: Mat4,
//! }
//!
//! impl UniformSink for Uniforms {
//!     fn set_view_matrix(&mut self, view: Mat4) {
//!         self.view = view;
//!     }
//!     fn set_projection_matrix(&mut self, _: Mat4) {}
//!     fn set_view_position(&mut self, _: Vec3) {}
//! }
//!
//! let mut uniforms = Uniforms::default();
//! let mut controls = OrbitControls::new(OrbitCamera::new(), Perspective::default(), 800, 600);
//! controls.init(&mut uniforms);
//!
//! controls.handle(PointerEvent::Down(Vec2::new(100.0, 100.0)), &mut uniforms);
//! controls.handle(PointerEvent::Move(Vec2::new(140.0, 100.0)), &mut uniforms);
//! controls.handle(PointerEvent::Up, &mut uniforms);
//!
//! assert_eq!(uniforms.view, controls.camera.view_matrix());
//! ```

mod app;
mod camera;
pub mod config;
mod controls;
mod gpu;
mod input;
mod mesh;
mod orbit_camera;
mod renderer;
mod sky_pass;
mod sphere;
mod sphere_pass;
mod texture;

pub use app::{AppError, run};
pub use camera::{Camera, OPENGL_TO_WGPU, Perspective, look_at};
pub use config::{ConfigError, ViewerConfig};
pub use controls::{DragState, OrbitControls, UniformSink};
pub use gpu::{GpuContext, RendererError};
pub use input::{PointerEvent, PointerInput};
pub use mesh::{Mesh, Vertex3d};
pub use orbit_camera::{OrbitCamera, Orientation, POLE_EPSILON};
pub use renderer::{Renderer, SceneState, SceneUniforms};
pub use sphere::{MAX_VERTICES, MeshError, SphereMesh};
pub use texture::{Texture, checkerboard_image};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};
