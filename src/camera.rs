use glam::{Mat4, Vec3, Vec4};

/// Remaps OpenGL clip depth (`z ∈ [-1, 1]`) to the `[0, 1]` range wgpu expects.
///
/// Projections in this crate follow the OpenGL convention; the renderer
/// applies this on upload.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 1.0),
);

/// A snapshot of where the camera is and which way it faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    /// Up hint; need not be orthogonal to `forward`.
    pub up: Vec3,
}

impl Camera {
    /// World-to-camera transform.
    pub fn view_matrix(&self) -> Mat4 {
        look_at(self.position, self.position + self.forward, self.up)
    }
}

/// Right-handed view matrix looking from `eye` towards `target`.
///
/// Builds the basis `forward = normalize(target - eye)`,
/// `right = normalize(forward × up)`, `up' = right × forward` and returns the
/// inverse of the camera's world transform: the transposed rotation with
/// translation `-R · eye`. The caller must keep `up` off the `forward` axis.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let forward = (target - eye).normalize();
    let right = forward.cross(up).normalize();
    let true_up = right.cross(forward);

    Mat4::from_cols(
        Vec4::new(right.x, true_up.x, -forward.x, 0.0),
        Vec4::new(right.y, true_up.y, -forward.y, 0.0),
        Vec4::new(right.z, true_up.z, -forward.z, 0.0),
        Vec4::new(-right.dot(eye), -true_up.dot(eye), forward.dot(eye), 1.0),
    )
}

/// Symmetric perspective projection parameters.
///
/// The aspect ratio is supplied per call since it follows the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perspective {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_4,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Perspective {
    pub fn new(fov: f32, near: f32, far: f32) -> Self {
        Self { fov, near, far }
    }

    /// OpenGL-style projection: view-space `z ∈ [-near, -far]` maps to clip
    /// `z ∈ [-1, 1]` with `w = -z_view`.
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat_near(a: Mat4, b: Mat4) {
        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for i in 0..16 {
            assert!((a[i] - b[i]).abs() < 1e-5, "element {i}: {} vs {}", a[i], b[i]);
        }
    }

    #[test]
    fn look_at_matches_glam() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec3::new(-0.5, 0.0, 0.25);
        assert_mat_near(
            look_at(eye, target, Vec3::Y),
            Mat4::look_at_rh(eye, target, Vec3::Y),
        );
    }

    #[test]
    fn look_at_moves_eye_to_origin_and_target_down_negative_z() {
        let eye = Vec3::new(0.0, 0.0, 2.0);
        let view = look_at(eye, Vec3::ZERO, Vec3::Y);

        assert!(view.transform_point3(eye).length() < 1e-6);
        let target = view.transform_point3(Vec3::ZERO);
        assert!((target - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-6);
    }

    #[test]
    fn camera_view_looks_along_forward() {
        let camera = Camera {
            position: Vec3::new(3.0, 1.0, -2.0),
            forward: Vec3::new(-3.0, -1.0, 2.0).normalize(),
            up: Vec3::Y,
        };
        assert_mat_near(
            camera.view_matrix(),
            look_at(camera.position, Vec3::ZERO, Vec3::Y),
        );
    }

    #[test]
    fn perspective_has_gl_layout() {
        let p = Perspective::default();
        let m = p.matrix(2.0).to_cols_array();
        let f = 1.0 / (p.fov / 2.0).tan();

        assert!((m[0] - f / 2.0).abs() < 1e-5);
        assert!((m[5] - f).abs() < 1e-5);
        assert!((m[10] - (p.far + p.near) / (p.near - p.far)).abs() < 1e-5);
        assert_eq!(m[11], -1.0);
        assert!((m[14] - 2.0 * p.far * p.near / (p.near - p.far)).abs() < 1e-5);
        assert_eq!(m[15], 0.0);
    }

    #[test]
    fn depth_remap_sends_near_and_far_to_unit_range() {
        let p = Perspective::default();
        let proj = OPENGL_TO_WGPU * p.matrix(1.0);

        let near = proj.project_point3(Vec3::new(0.0, 0.0, -p.near));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -p.far));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-4);
    }
}
