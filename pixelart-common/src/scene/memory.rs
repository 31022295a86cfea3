//! In-memory host scene

use hashbrown::{HashMap, HashSet};
use serde::Serialize;

use super::{
    MaterialDefinition, MaterialHandle, MaterialLibrary, MeshHandle, ObjectHandle, SceneGraph,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneObject {
    pub name: String,
    pub mesh: Option<MeshHandle>,
    pub location: [f32; 3],
    pub parent: Option<ObjectHandle>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneMesh {
    pub name: String,
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<Vec<u32>>,
    pub materials: Vec<MaterialHandle>,
    /// Per-face index into `materials`
    pub face_slots: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneMaterial {
    pub name: String,
    #[serde(flatten)]
    pub definition: MaterialDefinition,
}

/// Scene graph and material library held in vectors
///
/// Names are unique per kind. A name that is already taken gets a numeric
/// suffix (`name.001`, `name.002`, ...), the way host applications resolve
/// collisions.
#[derive(Debug, Default, Serialize)]
pub struct MemoryScene {
    objects: Vec<SceneObject>,
    meshes: Vec<SceneMesh>,
    materials: Vec<SceneMaterial>,
    active: Option<ObjectHandle>,

    #[serde(skip)]
    object_names: HashSet<String>,
    #[serde(skip)]
    mesh_names: HashSet<String>,
    #[serde(skip)]
    material_names: HashMap<String, MaterialHandle>,
}

fn unique_name(taken: impl Fn(&str) -> bool, name: &str) -> String {
    if !taken(name) {
        return name.to_string();
    }
    (1u32..)
        .map(|n| format!("{name}.{n:03}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| name.to_string())
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn meshes(&self) -> &[SceneMesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &[SceneMaterial] {
        &self.materials
    }

    pub fn object(&self, handle: ObjectHandle) -> &SceneObject {
        &self.objects[handle.0]
    }

    pub fn mesh(&self, handle: MeshHandle) -> &SceneMesh {
        &self.meshes[handle.0]
    }

    pub fn material(&self, handle: MaterialHandle) -> &SceneMaterial {
        &self.materials[handle.0]
    }

    pub fn active(&self) -> Option<ObjectHandle> {
        self.active
    }

    pub fn find_object(&self, name: &str) -> Option<ObjectHandle> {
        self.objects
            .iter()
            .position(|o| o.name == name)
            .map(ObjectHandle)
    }

    /// Objects that carry a mesh, with their handles
    pub fn mesh_objects(&self) -> impl Iterator<Item = (ObjectHandle, &SceneObject)> {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.mesh.is_some())
            .map(|(i, o)| (ObjectHandle(i), o))
    }

    /// Location with every parent's location added
    pub fn world_location(&self, handle: ObjectHandle) -> [f32; 3] {
        let mut location = [0.0f32; 3];
        let mut current = Some(handle);
        // Parent chains are acyclic; the bound only guards malformed input
        let mut depth = 0;
        while let Some(h) = current {
            if depth > self.objects.len() {
                break;
            }
            let object = &self.objects[h.0];
            for (axis, value) in location.iter_mut().zip(object.location) {
                *axis += value;
            }
            current = object.parent;
            depth += 1;
        }
        location
    }
}

impl SceneGraph for MemoryScene {
    fn deselect_all(&mut self) {
        for object in &mut self.objects {
            object.selected = false;
        }
    }

    fn create_object(&mut self, name: &str, mesh: Option<MeshHandle>) -> ObjectHandle {
        let name = unique_name(|n| self.object_names.contains(n), name);
        self.object_names.insert(name.clone());
        self.objects.push(SceneObject {
            name,
            mesh,
            location: [0.0; 3],
            parent: None,
            selected: false,
        });
        ObjectHandle(self.objects.len() - 1)
    }

    fn create_mesh(
        &mut self,
        name: &str,
        vertices: Vec<[f32; 3]>,
        faces: Vec<Vec<u32>>,
    ) -> MeshHandle {
        let name = unique_name(|n| self.mesh_names.contains(n), name);
        self.mesh_names.insert(name.clone());
        self.meshes.push(SceneMesh {
            name,
            vertices,
            faces,
            materials: Vec::new(),
            face_slots: Vec::new(),
        });
        MeshHandle(self.meshes.len() - 1)
    }

    fn set_mesh_materials(
        &mut self,
        mesh: MeshHandle,
        materials: Vec<MaterialHandle>,
        face_slots: Vec<u32>,
    ) {
        let mesh = &mut self.meshes[mesh.0];
        mesh.materials = materials;
        mesh.face_slots = face_slots;
    }

    fn set_location(&mut self, object: ObjectHandle, location: [f32; 3]) {
        self.objects[object.0].location = location;
    }

    fn set_parent(&mut self, object: ObjectHandle, parent: ObjectHandle) {
        self.objects[object.0].parent = Some(parent);
    }

    fn select(&mut self, object: ObjectHandle) {
        self.objects[object.0].selected = true;
    }

    fn set_active(&mut self, object: ObjectHandle) {
        self.active = Some(object);
    }

    fn object_name(&self, object: ObjectHandle) -> String {
        self.objects[object.0].name.clone()
    }
}

impl MaterialLibrary for MemoryScene {
    fn find_material(&self, name: &str) -> Option<MaterialHandle> {
        self.material_names.get(name).copied()
    }

    fn create_material(&mut self, name: &str, definition: MaterialDefinition) -> MaterialHandle {
        let name = unique_name(|n| self.material_names.contains_key(n), name);
        let handle = MaterialHandle(self.materials.len());
        self.material_names.insert(name.clone(), handle);
        self.materials.push(SceneMaterial { name, definition });
        handle
    }
}
