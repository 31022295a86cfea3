//! One unit cube object per visible pixel

use super::{BuildOutput, NameContext, PixelNamer, visible_pixels};
use crate::buffer::PixelBuffer;
use crate::material::MaterialCache;
use crate::scene::{MaterialLibrary, SceneGraph};

/// Local cube corners, origin at the pixel's lower-left corner
pub const CUBE_VERTICES: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

pub const CUBE_FACES: [[u32; 4]; 6] = [
    [0, 1, 2, 3],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [4, 5, 6, 7],
    [2, 3, 7, 6],
    [0, 3, 7, 4],
];

/// Build a parent empty with one cube child per visible pixel
///
/// Each cube gets its own mesh with a single material slot and sits at
/// `(x, y, 0)` relative to the parent. The parent ends up selected and active.
/// Cost is one object and one mesh per pixel; slow for large images.
pub fn build<S>(
    buffer: &PixelBuffer,
    scene: &mut S,
    materials: &mut MaterialCache,
    names: &NameContext<'_>,
) -> BuildOutput
where
    S: SceneGraph + MaterialLibrary + ?Sized,
{
    let parent = scene.create_object(&names.object_name(), None);
    let templates = names.templates;
    let mut namer = PixelNamer::new(names);
    let mut cubes = 0;

    for pixel in visible_pixels(buffer) {
        let material_name = namer.render(&templates.material, &pixel);
        let material = materials.get_or_create(&mut *scene, pixel.color, &material_name);

        let mesh_name = namer.render(&templates.mesh, &pixel);
        let mesh = scene.create_mesh(
            &mesh_name,
            CUBE_VERTICES.to_vec(),
            CUBE_FACES.iter().map(|f| f.to_vec()).collect(),
        );
        scene.set_mesh_materials(mesh, vec![material], vec![0; CUBE_FACES.len()]);

        let object_name = namer.render(&templates.pixel, &pixel);
        let object = scene.create_object(&object_name, Some(mesh));
        scene.set_location(object, [pixel.x as f32, pixel.y as f32, 0.0]);
        scene.set_parent(object, parent);
        scene.select(object);
        cubes += 1;
    }

    scene.select(parent);
    scene.set_active(parent);

    tracing::debug!("Created {} cubes", cubes);

    BuildOutput {
        root: parent,
        objects_created: cubes + 1,
        meshes_created: cubes,
        faces_created: cubes * CUBE_FACES.len(),
        material_slots: 0,
    }
}
