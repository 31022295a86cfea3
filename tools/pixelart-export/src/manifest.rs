//! Manifest parsing and batch builds
//!
//! Parses pixelart.toml:
//!
//! ```toml
//! [output]
//! dir = "out/"
//! format = "obj"
//!
//! [defaults]
//! import_as = "MERGED_MESH"
//! auto_scale = true
//!
//! [[images]]
//! path = "sprites/hero.png"
//!
//! [[images]]
//! path = "sprites/tiles.png"
//! output = "tiles.json"
//! import_as = "CUBES"
//! names = { material = "tiles_{color}" }
//! ```
//!
//! Relative paths are resolved against the manifest's directory.

use anyhow::{Context, Result};
use hashbrown::HashSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use pixelart_common::{ImportMode, ImportOptions, ImportReport};

use crate::convert::convert_image;
use crate::export::ExportFormat;
use crate::source::is_supported;

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub defaults: ImportOptions,
    #[serde(default)]
    pub images: Vec<ImageEntry>,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub format: ExportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: ExportFormat::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out/")
}

/// Name template overrides; unset fields keep the base value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NameOverrides {
    pub parent: Option<String>,
    pub pixel: Option<String>,
    pub mesh: Option<String>,
    pub material: Option<String>,
}

/// Import option overrides from a manifest entry or the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OptionOverrides {
    pub import_as: Option<ImportMode>,
    pub use_material_nodes: Option<bool>,
    pub reuse_existing_materials: Option<bool>,
    pub auto_scale: Option<bool>,
    #[serde(default)]
    pub names: NameOverrides,
}

impl OptionOverrides {
    /// `base` with every set field replaced
    pub fn apply(&self, base: &ImportOptions) -> ImportOptions {
        let mut options = base.clone();
        if let Some(mode) = self.import_as {
            options.import_as = mode;
        }
        if let Some(v) = self.use_material_nodes {
            options.use_material_nodes = v;
        }
        if let Some(v) = self.reuse_existing_materials {
            options.reuse_existing_materials = v;
        }
        if let Some(v) = self.auto_scale {
            options.auto_scale = v;
        }

        let names = &self.names;
        let targets = [
            (&names.parent, &mut options.names.parent),
            (&names.pixel, &mut options.names.pixel),
            (&names.mesh, &mut options.names.mesh),
            (&names.material, &mut options.names.material),
        ];
        for (value, target) in targets {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        options
    }
}

/// One image to convert
#[derive(Debug, Deserialize)]
pub struct ImageEntry {
    pub path: PathBuf,
    /// Output file, relative to the output directory
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub format: Option<ExportFormat>,
    #[serde(flatten)]
    pub overrides: OptionOverrides,
}

impl Manifest {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Source image path of `entry`
    pub fn source_path(&self, entry: &ImageEntry) -> PathBuf {
        self.resolve(&entry.path)
    }

    /// Output directory, or `output_override` when given
    pub fn output_dir(&self, output_override: Option<&Path>) -> PathBuf {
        match output_override {
            Some(dir) => dir.to_path_buf(),
            None => self.resolve(&self.output.dir),
        }
    }

    pub fn format_of(&self, entry: &ImageEntry) -> ExportFormat {
        entry.format.unwrap_or(self.output.format)
    }

    /// Output file name of `entry` within the output directory
    pub fn output_name(&self, entry: &ImageEntry) -> PathBuf {
        match &entry.output {
            Some(output) => output.clone(),
            None => {
                let stem = entry
                    .path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_string());
                PathBuf::from(format!("{}.{}", stem, self.format_of(entry).extension()))
            }
        }
    }

    /// Effective import options of `entry`
    pub fn options_for(&self, entry: &ImageEntry) -> ImportOptions {
        entry.overrides.apply(&self.defaults)
    }
}

/// Parse manifest text; relative paths resolve against `base_dir`
pub fn parse_manifest(content: &str, base_dir: &Path) -> Result<Manifest> {
    let mut manifest: Manifest = toml::from_str(content)?;
    manifest.base_dir = base_dir.to_path_buf();
    Ok(manifest)
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let base_dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
    parse_manifest(&content, &base_dir)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    if manifest.images.is_empty() {
        tracing::warn!("Manifest lists no images");
    }

    let mut outputs = HashSet::new();
    for entry in &manifest.images {
        let source = manifest.source_path(entry);
        if !source.exists() {
            anyhow::bail!("Image source not found: {:?}", source);
        }
        if !is_supported(&source) {
            anyhow::bail!(
                "Unsupported image format: {:?} (use .png, .gif, .bmp or .jpg)",
                source
            );
        }

        manifest
            .options_for(entry)
            .names
            .compile()
            .with_context(|| format!("Invalid name template for {:?}", entry.path))?;

        let output = manifest.output_name(entry);
        if !outputs.insert(output.clone()) {
            anyhow::bail!("Output {:?} is written by more than one image", output);
        }
    }
    Ok(())
}

/// Build every image in a manifest
pub fn build_all(
    manifest: &Manifest,
    output_override: Option<&Path>,
) -> Result<Vec<ImportReport>> {
    validate(manifest)?;

    let output_dir = manifest.output_dir(output_override);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut reports = Vec::with_capacity(manifest.images.len());
    for entry in &manifest.images {
        let input = manifest.source_path(entry);
        let output = output_dir.join(manifest.output_name(entry));
        tracing::info!("Converting image: {:?} -> {:?}", input, output);
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let report = convert_image(
            &input,
            &output,
            manifest.format_of(entry),
            &manifest.options_for(entry),
        )?;
        reports.push(report);
    }

    Ok(reports)
}
