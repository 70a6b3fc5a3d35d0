use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop the renderer.
///
/// Window, surface, adapter, device and shader failures are fatal at startup.
/// `TextureLoad` is reported but recovered by the caller with a placeholder.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no GPU adapter is compatible with the window surface")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface ran out of memory")]
    SurfaceOutOfMemory,

    #[error("failed to read shader source `{path}`: {source}")]
    ShaderIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("shader stage `{0}` is empty")]
    EmptyShaderSource(PathBuf),

    #[error("shader program `{name}` failed to compile: {message}")]
    ShaderCompile { name: String, message: String },

    #[error("failed to load texture `{path}`: {source}")]
    TextureLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("camera forward {forward:?} and up {up:?} do not span a plane")]
    DegenerateCameraBasis { forward: [f32; 3], up: [f32; 3] },
}
