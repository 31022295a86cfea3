//! Single image conversion (image -> OBJ/JSON)

use anyhow::{Context, Result};
use std::path::Path;

use pixelart_common::{ImportOptions, ImportReport, MemoryScene, import_pixel_art};

use crate::export::{ExportFormat, write_scene};
use crate::source::ImageFileSource;

/// Import `input` into a fresh scene and write it to `output`
pub fn convert_image(
    input: &Path,
    output: &Path,
    format: ExportFormat,
    options: &ImportOptions,
) -> Result<ImportReport> {
    let mut source = ImageFileSource::new();
    let mut scene = MemoryScene::new();

    let report = import_pixel_art(&mut source, input, &mut scene, options)
        .with_context(|| format!("Failed to import pixel art: {:?}", input))?;

    if let Some(stride) = report.stride {
        tracing::info!(
            "Detected {}x upscale: {}x{} -> {}x{}",
            stride,
            report.source_size.0,
            report.source_size.1,
            report.imported_size.0,
            report.imported_size.1
        );
    }
    tracing::info!(
        "{} mode: {} objects, {} faces, {} materials created, {} reused",
        report.mode,
        report.objects_created,
        report.faces_created,
        report.materials_created,
        report.materials_reused
    );

    write_scene(&scene, format, output)?;
    Ok(report)
}
