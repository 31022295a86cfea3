//! Import pipeline: decode, optionally auto-scale, build geometry, report

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::autoscale::{AutoScaled, auto_scale};
use crate::buffer::PixelBuffer;
use crate::error::ImportError;
use crate::geometry::{self, NameContext};
use crate::material::MaterialCache;
use crate::options::{ImportMode, ImportOptions};
use crate::scene::{ImageSource, MaterialLibrary, SceneGraph};

/// Pipeline states, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Loaded,
    AutoScaled,
    Unscaled,
    GeometryBuilt,
    Reported,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportStage::Loaded => "loaded",
            ImportStage::AutoScaled => "auto-scaled",
            ImportStage::Unscaled => "unscaled",
            ImportStage::GeometryBuilt => "geometry built",
            ImportStage::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Summary of a finished import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// Name the host gave the root object
    pub object_name: String,
    pub duration: Duration,
    pub mode: ImportMode,
    /// Decoded size
    pub source_size: (u32, u32),
    /// Size after auto-scale
    pub imported_size: (u32, u32),
    /// Detected upscale factor, when auto-scale succeeded
    pub stride: Option<u32>,
    pub objects_created: usize,
    pub faces_created: usize,
    pub materials_created: usize,
    pub materials_reused: usize,
}

/// Import the image at `path` into `scene`
///
/// Templates are compiled and the image decoded before the scene is touched,
/// so every error leaves the scene unchanged. The source is asked to release
/// `path` whether or not decoding succeeded.
pub fn import_pixel_art<I, S>(
    source: &mut I,
    path: &Path,
    scene: &mut S,
    options: &ImportOptions,
) -> Result<ImportReport, ImportError>
where
    I: ImageSource + ?Sized,
    S: SceneGraph + MaterialLibrary + ?Sized,
{
    let start = Instant::now();
    let templates = options.names.compile()?;

    let decoded = source.decode(path);
    source.release(path);
    let buffer = PixelBuffer::from_decoded(decoded?)?;
    let source_size = (buffer.width(), buffer.height());
    tracing::debug!(
        "Import stage {}: {}x{}, {:?}",
        ImportStage::Loaded,
        source_size.0,
        source_size.1,
        buffer.channels()
    );

    let (buffer, stride) = if options.auto_scale {
        let scaled = auto_scale(buffer);
        let stage = match scaled {
            AutoScaled::Scaled { .. } => ImportStage::AutoScaled,
            AutoScaled::Unscaled { .. } => ImportStage::Unscaled,
        };
        tracing::debug!("Import stage {}", stage);
        let stride = scaled.stride();
        (scaled.into_buffer(), stride)
    } else {
        tracing::debug!("Import stage {}", ImportStage::Unscaled);
        (buffer, None)
    };

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let names = NameContext {
        templates: &templates,
        filename: &filename,
        use_nodes: options.use_nodes_label(),
    };
    let mut materials = MaterialCache::new(options.material_policy());

    scene.deselect_all();
    let output = geometry::build(options.import_as, &buffer, &mut *scene, &mut materials, &names);
    tracing::debug!(
        "Import stage {}: {} materials created, {} reused",
        ImportStage::GeometryBuilt,
        materials.created(),
        materials.adopted()
    );

    let report = ImportReport {
        object_name: scene.object_name(output.root),
        duration: start.elapsed(),
        mode: options.import_as,
        source_size,
        imported_size: (buffer.width(), buffer.height()),
        stride,
        objects_created: output.objects_created,
        faces_created: output.faces_created,
        materials_created: materials.created(),
        materials_reused: materials.adopted(),
    };

    tracing::info!(
        "Imported pixel art {} in {:?}",
        report.object_name,
        report.duration
    );
    tracing::debug!("Import stage {}", ImportStage::Reported);

    Ok(report)
}
