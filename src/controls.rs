//! Pointer-drag orbit controls.
//!
//! [`OrbitControls`] owns the drag state machine and the orbit camera, and
//! pushes derived matrices to a [`UniformSink`] after every change:
//!
//! ```text
//!            on_drag_start(x, y)
//!   Idle ────────────────────────▶ Dragging { anchor }
//!    ▲                                 │  on_drag_move(x, y):
//!    │   on_drag_end() / Leave         │  rotate by (x, y) - anchor,
//!    └─────────────────────────────────┘  anchor = (x, y)
//! ```
//!
//! Moves while idle never touch the camera.

use glam::{Mat4, Vec2, Vec3};
use tracing::debug;

use crate::camera::Perspective;
use crate::input::PointerEvent;
use crate::orbit_camera::OrbitCamera;

/// Destination for the matrices and vectors the controls derive.
///
/// This is the only thing the controls know about the graphics backend.
pub trait UniformSink {
    fn set_view_matrix(&mut self, view: Mat4);
    fn set_projection_matrix(&mut self, projection: Mat4);
    /// Eye position in world space, for specular lighting.
    fn set_view_position(&mut self, position: Vec3);
}

/// Whether a drag is in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// `anchor` is the last observed pointer position.
    Dragging { anchor: Vec2 },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// Orbit camera, drag state and projection parameters for one viewport.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub camera: OrbitCamera,
    pub projection: Perspective,
    drag: DragState,
    viewport: (u32, u32),
}

impl OrbitControls {
    pub fn new(camera: OrbitCamera, projection: Perspective, width: u32, height: u32) -> Self {
        Self {
            camera,
            projection,
            drag: DragState::Idle,
            viewport: (width.max(1), height.max(1)),
        }
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.0 as f32 / self.viewport.1 as f32
    }

    /// Upload everything once so the first frame matches the initial state.
    pub fn init(&self, sink: &mut impl UniformSink) {
        self.upload_view(sink);
        self.upload_projection(sink);
    }

    pub fn on_drag_start(&mut self, x: f32, y: f32) {
        self.drag = DragState::Dragging {
            anchor: Vec2::new(x, y),
        };
    }

    /// Rotate by the delta since the previous move; no-op while idle.
    pub fn on_drag_move(&mut self, x: f32, y: f32, sink: &mut impl UniformSink) {
        let DragState::Dragging { anchor } = &mut self.drag else {
            return;
        };

        let position = Vec2::new(x, y);
        let delta = position - *anchor;
        *anchor = position;

        if delta == Vec2::ZERO {
            return;
        }

        self.camera.rotate(delta);
        self.upload_view(sink);
    }

    pub fn on_drag_end(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Track a new viewport size and upload the matching projection.
    ///
    /// Zero-sized viewports (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32, sink: &mut impl UniformSink) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        debug!(width, height, aspect = self.aspect(), "viewport resized");
        self.upload_projection(sink);
    }

    /// Dispatch a translated pointer event.
    pub fn handle(&mut self, event: PointerEvent, sink: &mut impl UniformSink) {
        match event {
            PointerEvent::Down(p) => self.on_drag_start(p.x, p.y),
            PointerEvent::Move(p) => self.on_drag_move(p.x, p.y, sink),
            PointerEvent::Up | PointerEvent::Leave => self.on_drag_end(),
        }
    }

    fn upload_view(&self, sink: &mut impl UniformSink) {
        sink.set_view_matrix(self.camera.view_matrix());
        sink.set_view_position(self.camera.eye());
    }

    fn upload_projection(&self, sink: &mut impl UniformSink) {
        sink.set_projection_matrix(self.projection.matrix(self.aspect()));
    }
}
