use std::path::{Path, PathBuf};
use crate::error::RenderError;

/// WGSL source of a vertex/fragment program pair, read from `<stem>.vs` and `<stem>.fs`.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderSource {
    pub name: String,
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub const VERTEX_EXTENSION: &'static str = "vs";
    pub const FRAGMENT_EXTENSION: &'static str = "fs";

    pub fn load(stem: &Path) -> Result<Self, RenderError> {
        let name = stem
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| stem.display().to_string());
        let vertex = read_stage(&with_extension(stem, Self::VERTEX_EXTENSION))?;
        let fragment = read_stage(&with_extension(stem, Self::FRAGMENT_EXTENSION))?;
        log::info!("loaded shader program `{name}` from {}", stem.display());

        Ok(Self { name, vertex, fragment })
    }
}

// `Path::with_extension` would swallow a dotted stem such as `v1.2/trace`
fn with_extension(stem: &Path, extension: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

fn read_stage(path: &Path) -> Result<String, RenderError> {
    let text = std::fs::read_to_string(path).map_err(|source| RenderError::ShaderIo {
        path: path.to_path_buf(),
        source,
    })?;
    if text.trim().is_empty() {
        return Err(RenderError::EmptyShaderSource(path.to_path_buf()));
    }
    Ok(text)
}
