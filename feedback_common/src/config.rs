use std::path::{Path, PathBuf};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use crate::camera::Camera;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "feedback_pt.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub shaders: ShaderConfig,
    pub noise_texture: NoiseConfig,
    pub camera: CameraConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "GPU feedback path tracer".to_string(),
            vsync: true,
        }
    }
}

/// Shader programs are found as `<directory>/<stem>.vs` and `<directory>/<stem>.fs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub directory: PathBuf,
    pub trace: String,
    pub denoise: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("gpu_feedback_pt/shaders"),
            trace: "trace".to_string(),
            denoise: "denoise".to_string(),
        }
    }
}

impl ShaderConfig {
    pub fn trace_stem(&self) -> PathBuf {
        self.directory.join(&self.trace)
    }

    pub fn denoise_stem(&self) -> PathBuf {
        self.directory.join(&self.denoise)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub path: PathBuf,
    /// side length of the generated texture when `path` can't be loaded
    pub placeholder_size: u32,
    pub placeholder_seed: u64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("gpu_feedback_pt/assets/noise.png"),
            placeholder_size: 64,
            placeholder_seed: 0x5eed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub forward: [f32; 3],
    pub up: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub speed: f32,
    /// world units per second, rescaled into `speed` every frame
    pub move_speed: f32,
    pub sensitivity: f32,
    /// degrees of fov per wheel notch
    pub zoom_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [1.0, 0.5, 2.0],
            forward: [0.0, 0.0, 1.0],
            up: [0.0, 1.0, 0.0],
            yaw: -90.0,
            pitch: 0.0,
            fov: 120.0,
            speed: 0.01,
            move_speed: 0.6,
            sensitivity: 0.1,
            zoom_factor: 5.0,
        }
    }
}

impl CameraConfig {
    /// Smallest `|forward x up|^2` accepted; below it strafing has no direction.
    pub const MIN_BASIS_AREA: f32 = 1.0e-6;

    /// Forward and up must both be non-zero and not parallel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let forward = Vec3::from(self.forward);
        let up = Vec3::from(self.up);
        let area = forward.normalize_or_zero().cross(up.normalize_or_zero()).length_squared();
        if area.is_nan() || area < Self::MIN_BASIS_AREA {
            return Err(ConfigError::DegenerateCameraBasis {
                forward: self.forward,
                up: self.up,
            });
        }
        Ok(())
    }

    pub fn camera(&self) -> Camera {
        Camera::new(Vec3::from(self.position),
                    Vec3::from(self.forward),
                    Vec3::from(self.up),
                    self.yaw,
                    self.pitch,
                    self.fov,
                    self.speed)
    }
}

impl AppConfig {
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.camera.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &text)
    }

    /// An explicit path must exist. Without one, `feedback_pt.toml` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                Self::load_from_file(path)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    log::info!("loading config from {}", path.display());
                    Self::load_from_file(path)
                } else {
                    log::info!("no {DEFAULT_CONFIG_FILE} found, using default config");
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_startup_scene() {
        let config = AppConfig::default();
        assert_eq!((config.window.width, config.window.height), (1280, 720));

        let camera = config.camera.camera();
        assert_eq!(camera.position(), Vec3::new(1.0, 0.5, 2.0));
        assert_eq!(camera.forward(), Vec3::Z);
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.fov(), 120.0);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let text = r#"
            [window]
            width = 640

            [camera]
            fov = 60.0
        "#;
        let config = AppConfig::from_toml(Path::new("inline.toml"), text).unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.sensitivity, 0.1);
        assert_eq!(config.shaders, ShaderConfig::default());
    }

    #[test]
    fn load_reads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[shaders]\ndirectory = \"custom\"\ntrace = \"pt\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.shaders.trace_stem(), PathBuf::from("custom/pt"));
        assert_eq!(config.shaders.denoise_stem(), PathBuf::from("custom/denoise"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn parallel_forward_and_up_are_rejected() {
        let text = "[camera]\nforward = [0.0, 1.0, 0.0]\n";
        let err = AppConfig::from_toml(Path::new("parallel.toml"), text).unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateCameraBasis { .. }));

        let text = "[camera]\nforward = [0.0, 0.0, 0.0]\n";
        let err = AppConfig::from_toml(Path::new("zero.toml"), text).unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateCameraBasis { .. }));

        let text = "[camera]\nup = [0.0, 0.0, -2.0]\n";
        assert!(AppConfig::from_toml(Path::new("antiparallel.toml"), text).is_err());
    }

    #[test]
    fn default_camera_basis_is_valid() {
        assert!(CameraConfig::default().validate().is_ok());
        let tilted = CameraConfig { up: [0.0, 1.0, 0.5], ..CameraConfig::default() };
        assert!(tilted.validate().is_ok());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = AppConfig::from_toml(Path::new("bad.toml"), "[window\nwidth = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
