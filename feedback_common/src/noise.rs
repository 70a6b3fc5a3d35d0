use std::path::Path;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use crate::config::NoiseConfig;
use crate::error::RenderError;

/// RGBA8 pixels of the noise texture the trace pass seeds its random numbers from.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl NoiseImage {
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let image = image::open(path)
            .map_err(|source| RenderError::TextureLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();

        Ok(Self { width, height, rgba: image.into_raw() })
    }

    /// Seeded white noise, opaque. Stands in for a texture that failed to load.
    pub fn placeholder(size: u32, seed: u64) -> Self {
        let size = size.max(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut rgba = vec![0u8; (size * size * 4) as usize];
        rng.fill_bytes(&mut rgba);
        for pixel in rgba.chunks_exact_mut(4) {
            pixel[3] = u8::MAX;
        }

        Self { width: size, height: size, rgba }
    }

    /// A missing or broken noise file is not fatal; the trace pass gets the placeholder.
    pub fn load_or_placeholder(config: &NoiseConfig) -> Self {
        match Self::load(&config.path) {
            Ok(image) => {
                log::info!("loaded noise texture {} ({}x{})", config.path.display(), image.width, image.height);
                image
            }
            Err(err) => {
                log::warn!("{err}; using a {0}x{0} placeholder", config.placeholder_size);
                Self::placeholder(config.placeholder_size, config.placeholder_seed)
            }
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_deterministic_and_opaque() {
        let a = NoiseImage::placeholder(16, 7);
        let b = NoiseImage::placeholder(16, 7);
        assert_eq!(a, b);
        assert_eq!(a.rgba.len(), 16 * 16 * 4);
        assert!(a.rgba.chunks_exact(4).all(|p| p[3] == 255));
        assert_ne!(a, NoiseImage::placeholder(16, 8));
    }

    #[test]
    fn zero_size_placeholder_still_has_a_pixel() {
        let image = NoiseImage::placeholder(0, 1);
        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.bytes_per_row(), 4);
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = NoiseConfig {
            path: dir.path().join("missing.png"),
            placeholder_size: 8,
            placeholder_seed: 3,
        };
        assert!(matches!(NoiseImage::load(&config.path), Err(RenderError::TextureLoad { .. })));
        assert_eq!(NoiseImage::load_or_placeholder(&config), NoiseImage::placeholder(8, 3));
    }

    #[test]
    fn loads_png_as_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.png");
        let gray = image::GrayImage::from_fn(3, 2, |x, y| image::Luma([(x * 10 + y) as u8]));
        gray.save(&path).unwrap();

        let image = NoiseImage::load(&path).unwrap();
        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(&image.rgba[4..8], &[10, 10, 10, 255]);
    }
}
