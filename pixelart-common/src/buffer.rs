//! Normalized in-memory pixel grid

use crate::color::Color;
use crate::error::ImportError;

/// Decoded image samples as handed over by an [`ImageSource`](crate::scene::ImageSource)
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    /// Row-major, channel-interleaved, normalized to [0, 1]
    pub samples: Vec<f32>,
}

/// Channel layouts the importer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Gray = 1,
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    pub fn from_count(channels: u32) -> Result<Self, ImportError> {
        match channels {
            1 => Ok(Channels::Gray),
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            _ => Err(ImportError::UnsupportedFormat { channels }),
        }
    }

    #[inline]
    pub const fn count(self) -> usize {
        self as usize
    }
}

/// Immutable RGBA view over decoded samples
///
/// Invariant: `samples.len() == width * height * channels`.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    samples: Vec<f32>,
}

impl PixelBuffer {
    pub fn new(
        width: u32,
        height: u32,
        channels: u32,
        samples: Vec<f32>,
    ) -> Result<Self, ImportError> {
        let layout = Channels::from_count(channels)?;
        let expected = width as usize * height as usize * layout.count();
        if samples.len() != expected {
            return Err(ImportError::SampleCount {
                width,
                height,
                channels,
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels: layout,
            samples,
        })
    }

    pub fn from_decoded(image: DecodedImage) -> Result<Self, ImportError> {
        Self::new(image.width, image.height, image.channels, image.samples)
    }

    /// Build an RGBA buffer from colours in row-major order (test and tooling helper)
    pub fn from_colors(width: u32, height: u32, colors: &[Color]) -> Result<Self, ImportError> {
        let samples = colors.iter().flat_map(|c| c.to_array()).collect();
        Self::new(width, height, 4, samples)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Colour at `(x, y)`
    ///
    /// Grey replicates into r, g and b. Grey and RGB report alpha 1.0.
    /// Coordinates must be in bounds.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> Color {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        let stride = self.channels.count();
        let index = (y as usize * self.width as usize + x as usize) * stride;
        let s = &self.samples[index..index + stride];
        match self.channels {
            Channels::Gray => Color::rgb(s[0], s[0], s[0]),
            Channels::Rgb => Color::rgb(s[0], s[1], s[2]),
            Channels::Rgba => Color::new(s[0], s[1], s[2], s[3]),
        }
    }

    /// Point-sample every `stride`-th pixel into a new buffer of the same layout
    ///
    /// Dimensions must be divisible by `stride`.
    pub(crate) fn downsample(&self, stride: u32) -> PixelBuffer {
        let width = self.width / stride;
        let height = self.height / stride;
        let channels = self.channels.count();
        let mut samples = Vec::with_capacity(width as usize * height as usize * channels);

        for y in 0..height {
            let row = (y * stride) as usize * self.width as usize;
            for x in 0..width {
                let index = (row + (x * stride) as usize) * channels;
                samples.extend_from_slice(&self.samples[index..index + channels]);
            }
        }

        PixelBuffer {
            width,
            height,
            channels: self.channels,
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_replicates_channel() {
        let buf = PixelBuffer::new(2, 1, 1, vec![0.25, 0.75]).unwrap();
        assert_eq!(buf.sample(0, 0), Color::new(0.25, 0.25, 0.25, 1.0));
        assert_eq!(buf.sample(1, 0), Color::new(0.75, 0.75, 0.75, 1.0));
    }

    #[test]
    fn test_rgb_alpha_is_opaque() {
        let buf = PixelBuffer::new(1, 2, 3, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();
        assert_eq!(buf.sample(0, 1), Color::new(0.4, 0.5, 0.6, 1.0));
    }

    #[test]
    fn test_rgba_reads_alpha() {
        let buf = PixelBuffer::new(1, 1, 4, vec![1.0, 0.0, 0.5, 0.0]).unwrap();
        assert_eq!(buf.sample(0, 0), Color::new(1.0, 0.0, 0.5, 0.0));
    }

    #[test]
    fn test_unsupported_channel_counts() {
        for channels in [0, 2, 5] {
            let err = PixelBuffer::new(1, 1, channels, vec![0.0; channels as usize]).unwrap_err();
            assert!(matches!(err, ImportError::UnsupportedFormat { channels: c } if c == channels));
        }
    }

    #[test]
    fn test_sample_count_mismatch() {
        let err = PixelBuffer::new(2, 2, 3, vec![0.0; 11]).unwrap_err();
        assert!(matches!(
            err,
            ImportError::SampleCount {
                expected: 12,
                actual: 11,
                ..
            }
        ));
    }

    #[test]
    fn test_downsample_point_samples_block_corner() {
        // 4x2 RGB, stride 2 -> 2x1 taking (0,0) and (2,0)
        let mut samples = Vec::new();
        for i in 0..8 {
            samples.extend_from_slice(&[i as f32 / 10.0, 0.0, 0.0]);
        }
        let buf = PixelBuffer::new(4, 2, 3, samples).unwrap();
        let small = buf.downsample(2);
        assert_eq!((small.width(), small.height()), (2, 1));
        assert_eq!(small.channels(), Channels::Rgb);
        assert_eq!(small.sample(0, 0).r, 0.0);
        assert_eq!(small.sample(1, 0).r, 0.2);
    }
}
