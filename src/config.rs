//! Viewer configuration loaded from TOML.
//!
//! Every section and field has a default, so an empty file (or no file) is a
//! valid configuration:
//!
//! ```toml
//! [window]
//! title = "Globe"
//! width = 1280
//! height = 720
//!
//! [sphere]
//! radius = 0.5
//! latitude_bands = 30
//! longitude_bands = 30
//!
//! [camera]
//! orientation = "quaternion"   # or "spherical"
//! distance = 2.0
//! sensitivity = 0.005
//! fov_degrees = 45.0
//!
//! [texture]
//! path = "earth.png"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::camera::Perspective;
use crate::orbit_camera::{OrbitCamera, Orientation};
use crate::sphere::{MAX_VERTICES, SphereMesh};

/// Errors from loading or validating the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Globeview".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub radius: f32,
    pub latitude_bands: u32,
    pub longitude_bands: u32,
    pub center: [f32; 3],
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            latitude_bands: 30,
            longitude_bands: 30,
            center: [0.0, 0.0, 0.0],
        }
    }
}

impl SphereConfig {
    pub fn generate(&self) -> Result<SphereMesh, crate::sphere::MeshError> {
        SphereMesh::generate(
            self.radius,
            self.latitude_bands,
            self.longitude_bands,
            self.center.into(),
        )
    }
}

/// Which orientation representation the orbit camera uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationKind {
    Spherical,
    #[default]
    Quaternion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub orientation: OrientationKind,
    pub distance: f32,
    /// Radians per pixel of drag.
    pub sensitivity: f32,
    pub clamp_polar: bool,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orientation: OrientationKind::Quaternion,
            distance: 2.0,
            sensitivity: 0.005,
            clamp_polar: true,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn orbit_camera(&self) -> OrbitCamera {
        let orientation = match self.orientation {
            OrientationKind::Spherical => Orientation::spherical(),
            OrientationKind::Quaternion => Orientation::quaternion(),
        };
        OrbitCamera::new()
            .orientation(orientation)
            .distance(self.distance)
            .sensitivity(self.sensitivity)
            .clamp_polar(self.clamp_polar)
    }

    pub fn perspective(&self) -> Perspective {
        Perspective::new(self.fov_degrees.to_radians(), self.near, self.far)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Direction from the surface towards the light, world space.
    pub direction: [f32; 3],
    pub color: [f32; 3],
    pub ambient: [f32; 3],
    pub shininess: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            direction: [-0.5, -1.0, -0.5],
            color: [1.0, 1.0, 1.0],
            ambient: [0.2, 0.2, 0.2],
            shininess: 32.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Image wrapped around the sphere; a checkerboard is used when unset.
    pub path: Option<PathBuf>,
    /// Checkerboard squares along each texture axis.
    pub checker_squares: u32,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            path: None,
            checker_squares: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub sphere: SphereConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub texture: TextureConfig,
}

impl ViewerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sphere = &self.sphere;
        if sphere.latitude_bands == 0 || sphere.longitude_bands == 0 {
            return Err(invalid("sphere band counts must be at least 1"));
        }
        let vertices =
            SphereMesh::expected_vertex_count(sphere.latitude_bands, sphere.longitude_bands);
        if vertices > MAX_VERTICES {
            return Err(invalid(format!(
                "sphere tessellation needs {vertices} vertices, max is {MAX_VERTICES}"
            )));
        }
        if !sphere.radius.is_finite() || sphere.radius <= 0.0 {
            return Err(invalid(format!("sphere radius must be positive, got {}", sphere.radius)));
        }
        if !sphere.center.iter().all(|c| c.is_finite()) {
            return Err(invalid(format!("sphere center must be finite, got {:?}", sphere.center)));
        }

        let camera = &self.camera;
        if !camera.distance.is_finite() || camera.distance <= 0.0 {
            return Err(invalid(format!("camera distance must be positive, got {}", camera.distance)));
        }
        if !camera.sensitivity.is_finite() {
            return Err(invalid("camera sensitivity must be finite"));
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid(format!(
                "camera fov must be in (0, 180) degrees, got {}",
                camera.fov_degrees
            )));
        }
        if !(camera.near.is_finite() && camera.far.is_finite()) {
            return Err(invalid(format!(
                "clip planes must be finite, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window size must be non-zero"));
        }
        if self.texture.checker_squares == 0 {
            return Err(invalid("checker_squares must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

/// Load config from a specific TOML file path.
///
/// A file that parses but fails validation is reported with a warning and
/// replaced by the default config.
pub fn load_from_path(path: &Path) -> Result<ViewerConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: ViewerConfig = toml::from_str(&content)?;
    if let Err(e) = config.validate() {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(ViewerConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load `path` if given, otherwise `globeview.toml` in the working directory,
/// falling back to defaults when that file does not exist.
pub fn load(path: Option<&Path>) -> Result<ViewerConfig, ConfigError> {
    match path {
        Some(path) => load_from_path(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                load_from_path(default_path)
            } else {
                info!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                Ok(ViewerConfig::default())
            }
        }
    }
}

pub const DEFAULT_CONFIG_FILE: &str = "globeview.toml";
