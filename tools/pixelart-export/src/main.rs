//! pixelart-export - Pixel art import tool
//!
//! Converts pixel art images (PNG, GIF, BMP, JPEG) into coloured cube or flat
//! mesh geometry and writes it as Wavefront OBJ + MTL or as a JSON scene dump.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

// Use modules from library
use pixelart_export::manifest::{self, NameOverrides, OptionOverrides};
use pixelart_export::{ExportFormat, ImportMode, ImportOptions, convert_image};

#[derive(Parser)]
#[command(name = "pixelart-export")]
#[command(about = "Pixel art to 3D geometry import tool")]
#[command(version)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a single image
    Import {
        /// Input image (PNG/GIF/BMP/JPEG)
        input: PathBuf,

        /// Output file (default: input name with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (default: from the output extension, else obj)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Manifest whose [defaults] table provides base options
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        options: ImportArgs,
    },

    /// Build images from a manifest file
    Build {
        /// Path to pixelart.toml manifest
        #[arg(default_value = "pixelart.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to pixelart.toml manifest
        #[arg(default_value = "pixelart.toml")]
        manifest: PathBuf,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    /// One cube object per pixel (slow for large images)
    Cubes,
    /// One flat mesh with a square per pixel
    MergedMesh,
}

impl From<ModeArg> for ImportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Cubes => ImportMode::Cubes,
            ModeArg::MergedMesh => ImportMode::MergedMesh,
        }
    }
}

#[derive(Args)]
struct ImportArgs {
    /// Geometry to create
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Detect integer upscaling and import at the original resolution
    #[arg(long)]
    auto_scale: bool,

    /// Flat colour materials without shader nodes
    #[arg(long)]
    no_material_nodes: bool,

    /// Reuse existing materials with matching names
    #[arg(long)]
    reuse_materials: bool,

    /// Object name template (keys: filename, use_nodes)
    #[arg(long)]
    parent_name: Option<String>,

    /// Pixel object name template (keys: filename, color, x, y, use_nodes)
    #[arg(long)]
    pixel_name: Option<String>,

    /// Mesh name template
    #[arg(long)]
    mesh_name: Option<String>,

    /// Material name template
    #[arg(long)]
    material_name: Option<String>,
}

impl ImportArgs {
    /// Flags that were given; switches left off keep the base options
    fn overrides(self) -> OptionOverrides {
        OptionOverrides {
            import_as: self.mode.map(ImportMode::from),
            use_material_nodes: self.no_material_nodes.then_some(false),
            reuse_existing_materials: self.reuse_materials.then_some(true),
            auto_scale: self.auto_scale.then_some(true),
            names: NameOverrides {
                parent: self.parent_name,
                pixel: self.pixel_name,
                mesh: self.mesh_name,
                material: self.material_name,
            },
        }
    }
}

fn base_options(config: Option<&Path>) -> Result<ImportOptions> {
    match config {
        Some(path) => Ok(manifest::load_manifest(path)?.defaults),
        None => Ok(ImportOptions::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Import {
            input,
            output,
            format,
            config,
            options,
        } => {
            let options = options.overrides().apply(&base_options(config.as_deref())?);

            let format = format
                .or_else(|| output.as_deref().and_then(ExportFormat::from_path))
                .unwrap_or_default();
            let output = output.unwrap_or_else(|| input.with_extension(format.extension()));
            if output == input {
                anyhow::bail!("Output would overwrite the input image: {:?}", input);
            }

            tracing::info!("Converting {:?} -> {:?}", input, output);
            convert_image(&input, &output, format, &options)?;
            tracing::info!("Done!");
        }

        Commands::Build { manifest, output } => {
            tracing::debug!("Building images from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let reports = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! {} images converted", reports.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }
    }

    Ok(())
}
