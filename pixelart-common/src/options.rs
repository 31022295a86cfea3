//! Import configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ImportError;
use crate::material::MaterialPolicy;
use crate::template::{Template, TemplateKey};

pub const DEFAULT_PARENT_NAME: &str = "{filename}";
pub const DEFAULT_PIXEL_NAME: &str = "{filename}_{x}_{y}";
pub const DEFAULT_MESH_NAME: &str = "{filename}_{x}_{y}_mesh";
pub const DEFAULT_MATERIAL_NAME: &str = "pixel_art_{color}";

/// Geometry strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// One unit cube object per visible pixel, parented to an empty
    Cubes,
    /// One flat mesh holding a quad per visible pixel
    #[default]
    MergedMesh,
}

impl ImportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportMode::Cubes => "CUBES",
            ImportMode::MergedMesh => "MERGED_MESH",
        }
    }
}

impl FromStr for ImportMode {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUBES" | "cubes" => Ok(ImportMode::Cubes),
            "MERGED_MESH" | "merged-mesh" | "merged_mesh" | "2D_MESH" => Ok(ImportMode::MergedMesh),
            other => Err(ImportError::IllegalMode(other.to_string())),
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ImportMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ImportMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Naming templates for everything the importer creates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameTemplates {
    /// Parent empty (cubes) or the merged mesh and its object
    pub parent: String,
    /// Per-pixel cube objects
    pub pixel: String,
    /// Per-pixel cube meshes
    pub mesh: String,
    pub material: String,
}

impl Default for NameTemplates {
    fn default() -> Self {
        Self {
            parent: DEFAULT_PARENT_NAME.to_string(),
            pixel: DEFAULT_PIXEL_NAME.to_string(),
            mesh: DEFAULT_MESH_NAME.to_string(),
            material: DEFAULT_MATERIAL_NAME.to_string(),
        }
    }
}

impl NameTemplates {
    /// Compile all four templates
    ///
    /// The parent template only sees `filename` and `use_nodes`; it is
    /// rendered before any pixel is visited.
    pub fn compile(&self) -> Result<CompiledTemplates, ImportError> {
        let compile = |field: &'static str, source: &str, keys: &[TemplateKey]| {
            Template::compile(source, keys).map_err(|e| ImportError::template(field, e))
        };

        Ok(CompiledTemplates {
            parent: compile("object name", &self.parent, &TemplateKey::OBJECT)?,
            material: compile("material names", &self.material, &TemplateKey::ALL)?,
            mesh: compile("mesh names", &self.mesh, &TemplateKey::ALL)?,
            pixel: compile("pixel names", &self.pixel, &TemplateKey::ALL)?,
        })
    }
}

/// Templates validated up front, ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplates {
    pub parent: Template,
    pub pixel: Template,
    pub mesh: Template,
    pub material: Template,
}

/// Options for one import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub import_as: ImportMode,
    pub use_material_nodes: bool,
    pub reuse_existing_materials: bool,
    pub auto_scale: bool,
    pub names: NameTemplates,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            import_as: ImportMode::default(),
            use_material_nodes: true,
            reuse_existing_materials: false,
            auto_scale: false,
            names: NameTemplates::default(),
        }
    }
}

impl ImportOptions {
    pub fn material_policy(&self) -> MaterialPolicy {
        MaterialPolicy {
            use_nodes: self.use_material_nodes,
            reuse_existing: self.reuse_existing_materials,
        }
    }

    /// Value substituted for `{use_nodes}`
    pub fn use_nodes_label(&self) -> &'static str {
        if self.use_material_nodes { "nodes" } else { "" }
    }
}
