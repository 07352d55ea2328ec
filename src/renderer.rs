//! Frame rendering: sky background, then the sphere.
//!
//! [`Renderer`] is the [`UniformSink`] the orbit controls write into. Updates
//! land in a CPU-side [`SceneState`] and are uploaded once, at the start of
//! the next frame.

use glam::{Mat3, Mat4, Vec3};
use tracing::warn;

use crate::camera::OPENGL_TO_WGPU;
use crate::config::LightingConfig;
use crate::controls::UniformSink;
use crate::gpu::{GpuContext, RendererError};
use crate::mesh::Mesh;
use crate::sky_pass::SkyPass;
use crate::sphere_pass::SpherePass;
use crate::texture::Texture;

/// Scene uniforms shared by the sky and sphere shaders (`@group(0)`).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    /// World to wgpu clip space.
    pub view_proj: [[f32; 4]; 4],
    /// Inverse of the rotation-only view-projection, for sky directions.
    pub sky_inv_view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 3],
    pub shininess: f32,
    /// Direction from the surface towards the light.
    pub light_direction: [f32; 3],
    pub _pad0: f32,
    pub light_color: [f32; 3],
    pub _pad1: f32,
    pub ambient_color: [f32; 3],
    pub _pad2: f32,
}

/// Latest camera and lighting values, as last written by the controls.
#[derive(Clone, Debug)]
pub struct SceneState {
    view: Mat4,
    projection: Mat4,
    view_position: Vec3,
    lighting: LightingConfig,
    dirty: bool,
}

impl SceneState {
    pub fn new(lighting: LightingConfig) -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            view_position: Vec3::ZERO,
            lighting,
            dirty: true,
        }
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Whether anything changed since the last [`take_uniforms`](Self::take_uniforms).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The uniforms to upload, clearing the dirty flag.
    pub fn take_uniforms(&mut self) -> Option<SceneUniforms> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.uniforms())
    }

    pub fn uniforms(&self) -> SceneUniforms {
        let projection = OPENGL_TO_WGPU * self.projection;
        let rotation_only = Mat4::from_mat3(Mat3::from_mat4(self.view));

        SceneUniforms {
            view_proj: (projection * self.view).to_cols_array_2d(),
            sky_inv_view_proj: (projection * rotation_only).inverse().to_cols_array_2d(),
            view_position: self.view_position.to_array(),
            shininess: self.lighting.shininess,
            light_direction: self.lighting.direction,
            _pad0: 0.0,
            light_color: self.lighting.color,
            _pad1: 0.0,
            ambient_color: self.lighting.ambient,
            _pad2: 0.0,
        }
    }
}

impl UniformSink for SceneState {
    fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
        self.dirty = true;
    }

    fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
        self.dirty = true;
    }

    fn set_view_position(&mut self, position: Vec3) {
        self.view_position = position;
        self.dirty = true;
    }
}

/// Owns the passes and the scene uniform buffer.
pub struct Renderer {
    scene: SceneState,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    sky_pass: SkyPass,
    sphere_pass: SpherePass,
}

impl Renderer {
    pub fn new(gpu: &GpuContext, mesh: Mesh, texture: &Texture, lighting: LightingConfig) -> Self {
        let device = &gpu.device;

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        Self {
            scene: SceneState::new(lighting),
            scene_buffer,
            scene_bind_group,
            sky_pass: SkyPass::new(gpu, &scene_layout),
            sphere_pass: SpherePass::new(gpu, &scene_layout, mesh, texture),
        }
    }

    /// Render one frame to the window surface.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render(&mut self, gpu: &GpuContext) -> Result<(), RendererError> {
        self.sphere_pass.ensure_depth_size(gpu);

        if let Some(uniforms) = self.scene.take_uniforms() {
            gpu.queue
                .write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.sphere_pass.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.sky_pass.render(&mut render_pass, &self.scene_bind_group);
            self.sphere_pass
                .render(&mut render_pass, &self.scene_bind_group);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl UniformSink for Renderer {
    fn set_view_matrix(&mut self, view: Mat4) {
        self.scene.set_view_matrix(view);
    }

    fn set_projection_matrix(&mut self, projection: Mat4) {
        self.scene.set_projection_matrix(projection);
    }

    fn set_view_position(&mut self, position: Vec3) {
        self.scene.set_view_position(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Perspective;
    use crate::controls::OrbitControls;
    use crate::orbit_camera::OrbitCamera;
    use glam::Vec4;

    fn scene_with_controls() -> (SceneState, OrbitControls) {
        let mut scene = SceneState::new(LightingConfig::default());
        let controls = OrbitControls::new(OrbitCamera::new(), Perspective::default(), 800, 600);
        controls.init(&mut scene);
        (scene, controls)
    }

    #[test]
    fn uniform_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 192);
        assert_eq!(std::mem::offset_of!(SceneUniforms, view_position), 128);
        assert_eq!(std::mem::offset_of!(SceneUniforms, light_direction), 144);
        assert_eq!(std::mem::offset_of!(SceneUniforms, light_color), 160);
        assert_eq!(std::mem::offset_of!(SceneUniforms, ambient_color), 176);
    }

    #[test]
    fn uploads_only_when_dirty() {
        let (mut scene, mut controls) = scene_with_controls();

        assert!(scene.take_uniforms().is_some());
        assert!(scene.take_uniforms().is_none());

        controls.on_drag_start(0.0, 0.0);
        controls.on_drag_move(25.0, 0.0, &mut scene);
        assert!(scene.is_dirty());
        assert!(scene.take_uniforms().is_some());
    }

    #[test]
    fn origin_lands_in_wgpu_depth_range() {
        let (scene, _) = scene_with_controls();
        let view_proj = Mat4::from_cols_array_2d(&scene.uniforms().view_proj);

        let clip = view_proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0, "depth {}", ndc.z);
    }

    #[test]
    fn sky_center_pixel_looks_at_target() {
        let (mut scene, mut controls) = scene_with_controls();
        controls.on_drag_start(0.0, 0.0);
        controls.on_drag_move(80.0, -30.0, &mut scene);

        let inv = Mat4::from_cols_array_2d(&scene.uniforms().sky_inv_view_proj);
        let far = inv * Vec4::new(0.0, 0.0, 1.0, 1.0);
        let dir = (far.truncate() / far.w).normalize();

        let forward = -controls.camera.eye().normalize();
        assert!((dir - forward).length() < 1e-3, "{dir} vs {forward}");

        // Translation never reaches the sky.
        let moved = controls.camera.clone().distance(50.0);
        let mut far_scene = SceneState::new(LightingConfig::default());
        far_scene.set_view_matrix(moved.view_matrix());
        far_scene.set_projection_matrix(scene.projection());
        let a = scene.uniforms().sky_inv_view_proj;
        let b = far_scene.uniforms().sky_inv_view_proj;
        for (ca, cb) in a.iter().zip(b.iter()) {
            for (x, y) in ca.iter().zip(cb.iter()) {
                assert!((x - y).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn light_direction_points_towards_the_light() {
        let uniforms = SceneState::new(LightingConfig::default()).uniforms();
        assert_eq!(uniforms.light_direction, [-0.5, -1.0, -0.5]);

        // The sphere shader dots normals with the uploaded vector as is.
        let shader = include_str!("shaders/sphere.wgsl");
        assert!(shader.contains("let light_dir = normalize(scene.light_direction);"));
        assert!(!shader.contains("-scene.light_direction"));
    }

    #[test]
    fn lighting_passes_through() {
        let lighting = LightingConfig {
            direction: [0.0, 1.0, 0.0],
            shininess: 8.0,
            ..Default::default()
        };
        let scene = SceneState::new(lighting);
        let uniforms = scene.uniforms();

        assert_eq!(uniforms.light_direction, [0.0, 1.0, 0.0]);
        assert_eq!(uniforms.shininess, 8.0);
        assert_eq!(uniforms.ambient_color, [0.2, 0.2, 0.2]);
    }
}
