//! Interfaces to the host application
//!
//! The importer never owns scene objects. It talks to the host through three
//! narrow traits:
//!
//! - [`ImageSource`] decodes an image file into normalized samples
//! - [`SceneGraph`] creates objects and meshes and links them together
//! - [`MaterialLibrary`] looks up and creates named materials
//!
//! [`MemoryScene`] implements the scene traits in memory. The export tool
//! uses it as its host and tests use it to observe what the importer did.

mod memory;

use std::path::Path;

use serde::Serialize;

use crate::buffer::DecodedImage;
use crate::color::Color;
use crate::error::ImportError;

pub use memory::{MemoryScene, SceneMaterial, SceneMesh, SceneObject};

/// Opaque reference to a scene object (empty or mesh-bearing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectHandle(pub usize);

/// Opaque reference to a mesh resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MeshHandle(pub usize);

/// Opaque reference to a material resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MaterialHandle(pub usize);

/// Node graph variants built for materials when node shading is enabled
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShaderGraph {
    /// Diffuse BSDF straight into the material output
    Diffuse,
    /// Diffuse and transparent BSDFs mixed by `factor` (the colour's alpha)
    DiffuseTransparentMix { factor: f32 },
}

/// How a material is shaded
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Shading {
    /// Node-free: flat diffuse colour plus an opacity flag
    Flat { opaque: bool },
    /// Node graph
    Nodes { graph: ShaderGraph },
}

/// Everything the host needs to create one pixel material
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialDefinition {
    pub diffuse: Color,
    pub shading: Shading,
}

impl MaterialDefinition {
    pub fn for_color(color: Color, use_nodes: bool) -> Self {
        let shading = if !use_nodes {
            Shading::Flat {
                opaque: color.is_opaque(),
            }
        } else if color.is_opaque() {
            Shading::Nodes {
                graph: ShaderGraph::Diffuse,
            }
        } else {
            Shading::Nodes {
                graph: ShaderGraph::DiffuseTransparentMix { factor: color.a },
            }
        };

        Self {
            diffuse: color,
            shading,
        }
    }
}

/// Decodes image files into normalized samples
pub trait ImageSource {
    /// Decode `path`
    ///
    /// Channel counts other than 1, 3 and 4 are passed through; the pixel
    /// buffer rejects them.
    fn decode(&mut self, path: &Path) -> Result<DecodedImage, ImportError>;

    /// Drop any resources held for `path`
    fn release(&mut self, _path: &Path) {}
}

/// Object and mesh creation in the host scene
pub trait SceneGraph {
    /// Clear the host's selection before new objects are selected
    fn deselect_all(&mut self);

    /// Create a named object; `None` creates an empty used as a parent
    fn create_object(&mut self, name: &str, mesh: Option<MeshHandle>) -> ObjectHandle;

    /// Create a named mesh from vertices and polygon index lists
    fn create_mesh(&mut self, name: &str, vertices: Vec<[f32; 3]>, faces: Vec<Vec<u32>>)
    -> MeshHandle;

    /// Attach materials to a mesh; `face_slots[i]` indexes `materials` for face `i`
    fn set_mesh_materials(
        &mut self,
        mesh: MeshHandle,
        materials: Vec<MaterialHandle>,
        face_slots: Vec<u32>,
    );

    fn set_location(&mut self, object: ObjectHandle, location: [f32; 3]);

    fn set_parent(&mut self, object: ObjectHandle, parent: ObjectHandle);

    fn select(&mut self, object: ObjectHandle);

    fn set_active(&mut self, object: ObjectHandle);

    /// Name the host actually assigned (it may have been made unique)
    fn object_name(&self, object: ObjectHandle) -> String;
}

/// Named material resources in the host
pub trait MaterialLibrary {
    fn find_material(&self, name: &str) -> Option<MaterialHandle>;

    fn create_material(&mut self, name: &str, definition: MaterialDefinition) -> MaterialHandle;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_definition_topologies() {
        let opaque = Color::rgb(1.0, 0.0, 0.0);
        let glass = Color::new(0.0, 0.0, 1.0, 0.5);

        assert_eq!(
            MaterialDefinition::for_color(opaque, true).shading,
            Shading::Nodes {
                graph: ShaderGraph::Diffuse
            }
        );
        assert_eq!(
            MaterialDefinition::for_color(glass, true).shading,
            Shading::Nodes {
                graph: ShaderGraph::DiffuseTransparentMix { factor: 0.5 }
            }
        );
        assert_eq!(
            MaterialDefinition::for_color(glass, false).shading,
            Shading::Flat { opaque: false }
        );
        assert_eq!(
            MaterialDefinition::for_color(opaque, false).shading,
            Shading::Flat { opaque: true }
        );
    }
}
