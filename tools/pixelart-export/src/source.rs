//! Image decoding via the `image` crate

use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use image::{DynamicImage, GenericImageView};
use pixelart_common::{DecodedImage, ImageSource, ImportError};

/// File extensions accepted by [`ImageFileSource`]
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "gif", "bmp", "jpg", "jpeg"];

/// Whether `path` has an image extension the decoder supports
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.as_str()))
}

/// Decodes PNG, GIF, BMP and JPEG files
///
/// Opened images stay loaded until released. Rows are flipped so that row 0
/// is the bottom of the picture and +Y points up in the scene.
#[derive(Debug)]
pub struct ImageFileSource {
    flip_rows: bool,
    loaded: HashMap<PathBuf, DynamicImage>,
}

impl Default for ImageFileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFileSource {
    pub fn new() -> Self {
        Self {
            flip_rows: true,
            loaded: HashMap::new(),
        }
    }

    /// Keep image rows in file order (row 0 at the top)
    pub fn top_down(mut self) -> Self {
        self.flip_rows = false;
        self
    }

    /// Images decoded but not yet released
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

/// Samples in the channel layout the pixel buffer expects
fn normalized_samples(img: &DynamicImage) -> (u32, Vec<f32>) {
    match img.color().channel_count() {
        1 => (1, img.to_luma32f().into_raw()),
        // Grey + alpha is passed through and rejected downstream
        2 => (
            2,
            img.to_luma_alpha8()
                .into_raw()
                .into_iter()
                .map(|v| v as f32 / 255.0)
                .collect(),
        ),
        3 => (3, img.to_rgb32f().into_raw()),
        _ => (4, img.to_rgba32f().into_raw()),
    }
}

impl ImageSource for ImageFileSource {
    fn decode(&mut self, path: &Path) -> Result<DecodedImage, ImportError> {
        let img = image::open(path).map_err(|e| ImportError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let img = if self.flip_rows { img.flipv() } else { img };

        let (width, height) = img.dimensions();
        let (channels, samples) = normalized_samples(&img);
        tracing::debug!(
            "Decoded {:?}: {}x{}, {:?} -> {} channels",
            path,
            width,
            height,
            img.color(),
            channels
        );

        self.loaded.insert(path.to_path_buf(), img);

        Ok(DecodedImage {
            width,
            height,
            channels,
            samples,
        })
    }

    fn release(&mut self, path: &Path) {
        if self.loaded.remove(path).is_some() {
            tracing::debug!("Released {:?}", path);
        }
    }
}
