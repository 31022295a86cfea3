//! pixelart-export library
//!
//! Image decoding, scene export and manifest builds around `pixelart-common`,
//! for use by the `pixelart-export` binary and other tools.

pub mod convert;
pub mod export;
pub mod manifest;
pub mod source;

pub use convert::convert_image;
pub use export::{ExportFormat, write_scene};
pub use manifest::{Manifest, OptionOverrides, build_all, load_manifest, validate};
pub use source::ImageFileSource;

// Re-export the core types callers need alongside the tool
pub use pixelart_common::{ImportMode, ImportOptions, ImportReport};
