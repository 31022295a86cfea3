//! Scene writers

pub mod json;
pub mod obj;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use pixelart_common::MemoryScene;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Wavefront OBJ with an MTL material library next to it
    #[default]
    Obj,
    /// Pretty-printed JSON dump of the scene
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Obj => "obj",
            ExportFormat::Json => "json",
        }
    }

    /// Guess the format from an output path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "obj" => Some(ExportFormat::Obj),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?;
    Ok(BufWriter::new(file))
}

/// Write `scene` to `output`; returns every file written
pub fn write_scene(
    scene: &MemoryScene,
    format: ExportFormat,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    match format {
        ExportFormat::Obj => {
            let mtl_path = output.with_extension("mtl");
            let mtl_name = mtl_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "materials.mtl".to_string());

            let mut obj_writer = create(output)?;
            let mut mtl_writer = create(&mtl_path)?;
            let stats = obj::write_obj(scene, &mut obj_writer, &mut mtl_writer, &mtl_name)
                .with_context(|| format!("Failed to write OBJ: {:?}", output))?;
            obj_writer.flush()?;
            mtl_writer.flush()?;

            tracing::info!(
                "Wrote OBJ: {} objects, {} vertices, {} faces, {} materials",
                stats.objects,
                stats.vertices,
                stats.faces,
                stats.materials
            );
            Ok(vec![output.to_path_buf(), mtl_path])
        }
        ExportFormat::Json => {
            let mut writer = create(output)?;
            json::write_json(scene, &mut writer)
                .with_context(|| format!("Failed to write JSON: {:?}", output))?;
            writer.flush()?;
            tracing::info!("Wrote JSON scene: {:?}", output);
            Ok(vec![output.to_path_buf()])
        }
    }
}
