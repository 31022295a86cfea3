//! Integer upscale detection for pixel art
//!
//! Pixel art is often distributed blown up by an integer factor so that every
//! logical pixel is an `s`×`s` block of identical samples. Importing such an
//! image verbatim creates `s²` identical primitives per logical pixel.
//!
//! Detection is a single run-length pass: every horizontal run (per row) and
//! every vertical run (per column) of exactly equal colours is recorded into a
//! stride set. The smallest recorded run is the candidate block size `s`; the
//! image is accepted as upscaled when `s > 1`, both dimensions are divisible by
//! `s`, and every recorded run is a multiple of `s`.

use hashbrown::HashSet;

use crate::buffer::PixelBuffer;
use crate::color::Color;

/// Distinct run lengths observed while scanning rows and columns
pub type StrideSet = HashSet<u32>;

/// Vertical run tracked for one column while rows are scanned
///
/// Each column owns its own record.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnRun {
    color: Option<Color>,
    len: u32,
}

/// Why an upscale was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScaleRejection {
    /// No runs recorded (empty image)
    #[error("image has no pixels")]
    NoRuns,
    /// Some adjacent pixels differ, so the smallest run is 1
    #[error("adjacent pixels differ (stride 1)")]
    NoBlocks,
    /// Width or height is not a multiple of the candidate stride
    #[error("image size {width}x{height} is not divisible by stride {stride}")]
    Dimensions { width: u32, height: u32, stride: u32 },
    /// A recorded run is not a multiple of the candidate stride
    #[error("run of {run} pixels is not a multiple of stride {stride}")]
    RaggedRun { run: u32, stride: u32 },
}

/// Result of [`detect_stride`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDetection {
    Upscaled { stride: u32 },
    Rejected(ScaleRejection),
}

/// Record every run length of equal colours along rows and columns
///
/// Scanning stops as soon as a run of length 1 is seen: that alone fixes the
/// minimum at 1, so the remaining runs cannot change the outcome. Column
/// accumulators are flushed only after a complete scan.
pub fn collect_strides(buffer: &PixelBuffer) -> StrideSet {
    let width = buffer.width();
    let height = buffer.height();

    let mut strides = StrideSet::new();
    let mut columns: Vec<ColumnRun> = (0..width).map(|_| ColumnRun::default()).collect();

    for y in 0..height {
        let mut row_color: Option<Color> = None;
        let mut row_run = 0u32;

        for x in 0..width {
            let color = buffer.sample(x, y);

            let column = &mut columns[x as usize];
            if column.color == Some(color) {
                column.len += 1;
            } else {
                // Zero until the column has seen its first pixel
                strides.insert(column.len);
                column.color = Some(color);
                column.len = 1;
            }

            if row_color == Some(color) {
                row_run += 1;
            } else {
                if row_color.is_some() {
                    strides.insert(row_run);
                    if row_run == 1 {
                        strides.remove(&0);
                        return strides;
                    }
                }
                row_color = Some(color);
                row_run = 1;
            }
        }

        strides.insert(row_run);
        if row_run == 1 {
            strides.remove(&0);
            return strides;
        }
    }

    for column in &columns {
        strides.insert(column.len);
    }
    strides.remove(&0);

    strides
}

/// Validate a stride set and pick the block size
pub fn evaluate_strides(strides: &StrideSet, width: u32, height: u32) -> ScaleDetection {
    let Some(&stride) = strides.iter().filter(|&&s| s != 0).min() else {
        return ScaleDetection::Rejected(ScaleRejection::NoRuns);
    };

    if stride <= 1 {
        return ScaleDetection::Rejected(ScaleRejection::NoBlocks);
    }

    if width % stride != 0 || height % stride != 0 {
        return ScaleDetection::Rejected(ScaleRejection::Dimensions {
            width,
            height,
            stride,
        });
    }

    if let Some(&run) = strides.iter().find(|&&run| run % stride != 0) {
        return ScaleDetection::Rejected(ScaleRejection::RaggedRun { run, stride });
    }

    ScaleDetection::Upscaled { stride }
}

/// Detect the integer upscale factor of `buffer`
pub fn detect_stride(buffer: &PixelBuffer) -> ScaleDetection {
    if buffer.pixel_count() == 0 {
        return ScaleDetection::Rejected(ScaleRejection::NoRuns);
    }
    let strides = collect_strides(buffer);
    evaluate_strides(&strides, buffer.width(), buffer.height())
}

/// Outcome of [`auto_scale`]
#[derive(Debug)]
pub enum AutoScaled {
    Scaled { buffer: PixelBuffer, stride: u32 },
    Unscaled { buffer: PixelBuffer, reason: ScaleRejection },
}

impl AutoScaled {
    pub fn stride(&self) -> Option<u32> {
        match self {
            AutoScaled::Scaled { stride, .. } => Some(*stride),
            AutoScaled::Unscaled { .. } => None,
        }
    }

    pub fn into_buffer(self) -> PixelBuffer {
        match self {
            AutoScaled::Scaled { buffer, .. } | AutoScaled::Unscaled { buffer, .. } => buffer,
        }
    }
}

/// Replace `buffer` by its downscaled original when it is an integer upscale
///
/// Never fails: a rejected detection hands back the input buffer unchanged.
pub fn auto_scale(buffer: PixelBuffer) -> AutoScaled {
    match detect_stride(&buffer) {
        ScaleDetection::Upscaled { stride } => {
            let scaled = buffer.downsample(stride);
            tracing::info!(
                "Auto-scale: {}x{} -> {}x{} (stride {})",
                buffer.width(),
                buffer.height(),
                scaled.width(),
                scaled.height(),
                stride
            );
            AutoScaled::Scaled {
                buffer: scaled,
                stride,
            }
        }
        ScaleDetection::Rejected(reason) => {
            match reason {
                ScaleRejection::NoRuns => tracing::info!("Auto-scale: {}", reason),
                _ => tracing::warn!("Auto-scale skipped: {}", reason),
            }
            AutoScaled::Unscaled { buffer, reason }
        }
    }
}
