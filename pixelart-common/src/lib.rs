//! Pixel art to scene geometry
//!
//! Turns a decoded raster image into coloured scene geometry: one cube per
//! pixel, or one flat mesh with a quad per pixel. Shared by:
//! - `pixelart-export` (command line importer and OBJ/JSON exporter)
//! - anything else that implements the scene traits in [`scene`]
//!
//! # Modules
//!
//! - [`buffer`] - Normalized pixel grid over decoded samples
//! - [`autoscale`] - Detection and removal of integer upscaling
//! - [`material`] - Colour to material deduplication
//! - [`geometry`] - Cube and merged-mesh builders
//! - [`template`] - Naming templates for generated resources
//! - [`options`] - Import configuration
//! - [`pipeline`] - The import entry point
//! - [`scene`] - Host interfaces and the in-memory scene

pub mod autoscale;
pub mod buffer;
pub mod color;
pub mod error;
pub mod geometry;
pub mod material;
pub mod options;
pub mod pipeline;
pub mod scene;
pub mod template;

pub use autoscale::{AutoScaled, ScaleDetection, ScaleRejection, auto_scale, detect_stride};
pub use buffer::{Channels, DecodedImage, PixelBuffer};
pub use color::Color;
pub use error::{ImportError, TemplateError};
pub use material::{MaterialCache, MaterialPolicy};
pub use options::{ImportMode, ImportOptions, NameTemplates};
pub use pipeline::{ImportReport, import_pixel_art};
pub use scene::{
    ImageSource, MaterialDefinition, MaterialHandle, MaterialLibrary, MemoryScene, MeshHandle,
    ObjectHandle, SceneGraph, ShaderGraph, Shading,
};
