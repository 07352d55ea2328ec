use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::camera::Camera;

/// How far the polar angle stays from either pole when clamping is on.
pub const POLE_EPSILON: f32 = 0.01;

/// Orientation state of an orbit camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Orientation {
    /// Spherical coordinates around the target. `polar` is measured from +Y,
    /// `azimuth` around +Y starting at +Z.
    Spherical { polar: f32, azimuth: f32 },
    /// Unit quaternion rotating the rest offset `(0, 0, distance)`.
    Quaternion(Quat),
}

impl Default for Orientation {
    fn default() -> Self {
        Self::Quaternion(Quat::IDENTITY)
    }
}

impl Orientation {
    /// Spherical orientation with the eye on +Z.
    pub fn spherical() -> Self {
        Self::Spherical {
            polar: FRAC_PI_2,
            azimuth: 0.0,
        }
    }

    /// Quaternion orientation with the eye on +Z.
    pub fn quaternion() -> Self {
        Self::Quaternion(Quat::IDENTITY)
    }

    /// Applies a rotation of `delta` radians (x = horizontal, y = vertical).
    ///
    /// Spherical: `azimuth -= dx`, `polar -= dy`. Quaternion: yaw `dx` about
    /// +Y and pitch `dy` about +X, both composed on the right so they act in
    /// the camera's current local frame, then renormalised.
    pub fn rotate(&mut self, delta: Vec2, clamp_polar: bool) {
        match self {
            Self::Spherical { polar, azimuth } => {
                *azimuth -= delta.x;
                *polar -= delta.y;
                if clamp_polar {
                    *polar = polar.clamp(POLE_EPSILON, PI - POLE_EPSILON);
                }
            }
            Self::Quaternion(q) => {
                let yaw = Quat::from_axis_angle(Vec3::Y, delta.x);
                let pitch = Quat::from_axis_angle(Vec3::X, delta.y);
                *q = (*q * yaw * pitch).normalize();
            }
        }
    }

    /// Unit direction from the target to the eye.
    pub fn direction(&self) -> Vec3 {
        match *self {
            Self::Spherical { polar, azimuth } => {
                let (sin_p, cos_p) = polar.sin_cos();
                let (sin_a, cos_a) = azimuth.sin_cos();
                Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a)
            }
            Self::Quaternion(q) => q * Vec3::Z,
        }
    }

    /// The camera's own up axis, used when world up is degenerate.
    fn local_up(&self) -> Vec3 {
        match *self {
            // d(direction)/d(polar) points away from +Y; negate it.
            Self::Spherical { polar, azimuth } => {
                let (sin_p, cos_p) = polar.sin_cos();
                let (sin_a, cos_a) = azimuth.sin_cos();
                -Vec3::new(cos_p * sin_a, -sin_p, cos_p * cos_a)
            }
            Self::Quaternion(q) => q * Vec3::Y,
        }
    }
}

/// A camera orbiting the world origin at a fixed distance, driven by drag deltas.
///
/// # Example
/// ```
/// use globeview::{OrbitCamera, Orientation, Vec2};
///
/// let mut orbit = OrbitCamera::new()
///     .distance(2.0)
///     .orientation(Orientation::quaternion());
///
/// // 100 pixels to the right.
/// orbit.rotate(Vec2::new(100.0, 0.0));
/// let view = orbit.view_matrix();
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub orientation: Orientation,
    /// Distance from the origin.
    pub distance: f32,
    /// Radians of rotation per pixel of drag.
    pub sensitivity: f32,
    /// Keep the spherical polar angle inside `[POLE_EPSILON, π - POLE_EPSILON]`.
    pub clamp_polar: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            distance: 2.0,
            sensitivity: 0.005,
            clamp_polar: true,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial orientation.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the orbit radius.
    pub fn distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// Set radians per pixel of drag.
    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Enable or disable polar clamping for spherical orientation.
    pub fn clamp_polar(mut self, clamp: bool) -> Self {
        self.clamp_polar = clamp;
        self
    }

    /// Rotate by a pixel delta.
    pub fn rotate(&mut self, pixels: Vec2) {
        self.orientation
            .rotate(pixels * self.sensitivity, self.clamp_polar);
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        self.orientation.direction() * self.distance
    }

    /// Get the current camera state.
    ///
    /// The up hint is world +Y unless the view direction is (nearly) parallel
    /// to it, in which case the orientation's own up axis is used instead.
    pub fn camera(&self) -> Camera {
        let position = self.eye();
        let forward = -self.orientation.direction();
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-8 {
            self.orientation.local_up()
        } else {
            Vec3::Y
        };

        Camera {
            position,
            forward,
            up,
        }
    }

    /// View matrix looking from the eye at the origin.
    pub fn view_matrix(&self) -> Mat4 {
        self.camera().view_matrix()
    }
}
