//! Wavefront OBJ + MTL writer

use anyhow::Result;
use hashbrown::HashSet;
use std::io::Write;

use pixelart_common::{MemoryScene, Shading};

/// OBJ identifiers cannot contain whitespace
fn obj_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Sanitize `names` in order, suffixing `_1`, `_2`, ... onto any result already taken
fn unique_obj_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let base = obj_name(name);
            let mut candidate = base.clone();
            let mut suffix = 1;
            while taken.contains(&candidate) {
                candidate = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// Counts of what was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjStats {
    pub objects: usize,
    pub vertices: usize,
    pub faces: usize,
    pub materials: usize,
}

/// Write every mesh-bearing object of `scene` as one OBJ plus its MTL library
///
/// Vertices are baked into world space (parent locations included). Indices
/// are global and 1-based as OBJ requires.
pub fn write_obj<W: Write, M: Write>(
    scene: &MemoryScene,
    obj: &mut W,
    mtl: &mut M,
    mtl_file_name: &str,
) -> Result<ObjStats> {
    let mut stats = ObjStats::default();

    writeln!(obj, "# pixelart-export")?;
    writeln!(obj, "mtllib {}", mtl_file_name)?;

    let material_names =
        unique_obj_names(scene.materials().iter().map(|material| material.name.as_str()));
    let object_names =
        unique_obj_names(scene.mesh_objects().map(|(_, object)| object.name.as_str()));

    let mut base = 1usize;
    for ((handle, object), object_name) in scene.mesh_objects().zip(&object_names) {
        let Some(mesh_handle) = object.mesh else {
            continue;
        };
        let mesh = scene.mesh(mesh_handle);
        let [ox, oy, oz] = scene.world_location(handle);

        writeln!(obj, "o {}", object_name)?;
        for [x, y, z] in &mesh.vertices {
            writeln!(obj, "v {} {} {}", x + ox, y + oy, z + oz)?;
        }

        let mut current_slot = None;
        for (i, face) in mesh.faces.iter().enumerate() {
            let slot = mesh.face_slots.get(i).copied();
            if slot != current_slot {
                if let Some(material) = slot.and_then(|s| mesh.materials.get(s as usize)) {
                    writeln!(obj, "usemtl {}", material_names[material.0])?;
                }
                current_slot = slot;
            }

            write!(obj, "f")?;
            for index in face {
                write!(obj, " {}", base + *index as usize)?;
            }
            writeln!(obj)?;
        }

        base += mesh.vertices.len();
        stats.objects += 1;
        stats.vertices += mesh.vertices.len();
        stats.faces += mesh.faces.len();
    }

    writeln!(mtl, "# pixelart-export")?;
    for (material, name) in scene.materials().iter().zip(&material_names) {
        let c = material.definition.diffuse;
        writeln!(mtl)?;
        writeln!(mtl, "newmtl {}", name)?;
        writeln!(mtl, "Kd {} {} {}", c.r, c.g, c.b)?;
        writeln!(mtl, "d {}", c.a)?;
        // Transparent materials ask for the refraction-free glass model
        let illum = match material.definition.shading {
            Shading::Flat { opaque: true } => 1,
            Shading::Nodes { .. } if c.is_opaque() => 1,
            _ => 4,
        };
        writeln!(mtl, "illum {}", illum)?;
        stats.materials += 1;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelart_common::{Color, MaterialDefinition, MaterialLibrary, SceneGraph};

    fn write(scene: &MemoryScene) -> (String, String, ObjStats) {
        let mut obj = Vec::new();
        let mut mtl = Vec::new();
        let stats = write_obj(scene, &mut obj, &mut mtl, "out.mtl").unwrap();
        (
            String::from_utf8(obj).unwrap(),
            String::from_utf8(mtl).unwrap(),
            stats,
        )
    }

    #[test]
    fn test_world_space_and_global_indices() {
        let mut scene = MemoryScene::new();
        let red = scene.create_material(
            "red",
            MaterialDefinition::for_color(Color::rgb(1.0, 0.0, 0.0), true),
        );
        let parent = scene.create_object("parent", None);
        scene.set_location(parent, [0.0, 0.0, 5.0]);

        for x in 0..2 {
            let mesh = scene.create_mesh(
                "quad",
                vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
                vec![vec![0, 1, 2]],
            );
            scene.set_mesh_materials(mesh, vec![red], vec![0]);
            let object = scene.create_object("tri", Some(mesh));
            scene.set_location(object, [x as f32 * 10.0, 0.0, 0.0]);
            scene.set_parent(object, parent);
        }

        let (obj, mtl, stats) = write(&scene);
        assert_eq!(
            stats,
            ObjStats {
                objects: 2,
                vertices: 6,
                faces: 2,
                materials: 1
            }
        );
        assert!(obj.contains("mtllib out.mtl"));
        assert!(obj.contains("o tri\n"));
        assert!(obj.contains("o tri.001\n"));
        assert!(obj.contains("v 11 0 5\n"));
        assert!(obj.contains("f 1 2 3\n"));
        assert!(obj.contains("f 4 5 6\n"));
        assert!(!obj.contains("o parent"));
        assert!(mtl.contains("newmtl red\nKd 1 0 0\nd 1\nillum 1\n"));
    }

    #[test]
    fn test_usemtl_switches_with_slots() {
        let mut scene = MemoryScene::new();
        let a = scene.create_material(
            "a",
            MaterialDefinition::for_color(Color::rgb(1.0, 1.0, 1.0), false),
        );
        let b = scene.create_material(
            "b b",
            MaterialDefinition::for_color(Color::new(0.0, 0.0, 0.0, 0.5), false),
        );
        let mesh = scene.create_mesh(
            "m",
            vec![[0.0; 3]; 3],
            vec![vec![0, 1, 2], vec![0, 1, 2], vec![0, 1, 2]],
        );
        scene.set_mesh_materials(mesh, vec![a, b], vec![0, 0, 1]);
        scene.create_object("m", Some(mesh));

        let (obj, mtl, _) = write(&scene);
        assert_eq!(obj.matches("usemtl a\n").count(), 1);
        assert_eq!(obj.matches("usemtl b_b\n").count(), 1);
        assert!(mtl.contains("newmtl b_b\nKd 0 0 0\nd 0.5\nillum 4\n"));
    }

    #[test]
    fn test_sanitized_names_stay_distinct() {
        let mut scene = MemoryScene::new();
        let red = scene.create_material(
            "a b",
            MaterialDefinition::for_color(Color::rgb(1.0, 0.0, 0.0), true),
        );
        let blue = scene.create_material(
            "a_b",
            MaterialDefinition::for_color(Color::rgb(0.0, 0.0, 1.0), true),
        );
        for (name, material) in [("tile 1", red), ("tile_1", blue)] {
            let mesh = scene.create_mesh(name, vec![[0.0; 3]; 3], vec![vec![0, 1, 2]]);
            scene.set_mesh_materials(mesh, vec![material], vec![0]);
            scene.create_object(name, Some(mesh));
        }

        let (obj, mtl, _) = write(&scene);
        assert_eq!(mtl.matches("newmtl a_b\n").count(), 1);
        assert!(mtl.contains("newmtl a_b\nKd 1 0 0\n"));
        assert!(mtl.contains("newmtl a_b_1\nKd 0 0 1\n"));
        assert!(obj.contains("o tile_1\n"));
        assert!(obj.contains("o tile_1_1\n"));
        assert!(obj.contains("usemtl a_b\n"));
        assert!(obj.contains("usemtl a_b_1\n"));
    }
}
