//! One flat mesh with a quad per visible pixel

use hashbrown::HashMap;

use super::{BuildOutput, NameContext, PixelNamer, visible_pixels};
use crate::buffer::PixelBuffer;
use crate::color::ColorKey;
use crate::material::MaterialCache;
use crate::scene::{MaterialLibrary, SceneGraph};

/// Build a single mesh object covering every visible pixel
///
/// Pixel `(x, y)` becomes the quad `(x, y)..(x + 1, y + 1)` at z = 0.
/// Material slots are assigned in order of first appearance, one per
/// distinct colour. The new object ends up selected and active.
pub fn build<S>(
    buffer: &PixelBuffer,
    scene: &mut S,
    materials: &mut MaterialCache,
    names: &NameContext<'_>,
) -> BuildOutput
where
    S: SceneGraph + MaterialLibrary + ?Sized,
{
    let object_name = names.object_name();
    let templates = names.templates;
    let mut namer = PixelNamer::new(names);

    let mut vertices: Vec<[f32; 3]> = Vec::new();
    let mut faces: Vec<Vec<u32>> = Vec::new();
    let mut face_slots: Vec<u32> = Vec::new();
    let mut slots: HashMap<ColorKey, u32> = HashMap::new();
    let mut slot_materials = Vec::new();

    for pixel in visible_pixels(buffer) {
        let material_name = namer.render(&templates.material, &pixel);

        let (x, y) = (pixel.x as f32, pixel.y as f32);
        let base = vertices.len() as u32;
        vertices.extend([
            [x, y, 0.0],
            [x + 1.0, y, 0.0],
            [x + 1.0, y + 1.0, 0.0],
            [x, y + 1.0, 0.0],
        ]);
        faces.push(vec![base, base + 1, base + 2, base + 3]);

        let material = materials.get_or_create(&mut *scene, pixel.color, &material_name);
        let slot = *slots.entry(pixel.color.key()).or_insert_with(|| {
            slot_materials.push(material);
            (slot_materials.len() - 1) as u32
        });
        face_slots.push(slot);
    }

    let faces_created = faces.len();
    let material_slots = slot_materials.len();

    let mesh = scene.create_mesh(&object_name, vertices, faces);
    scene.set_mesh_materials(mesh, slot_materials, face_slots);

    let object = scene.create_object(&object_name, Some(mesh));
    scene.select(object);
    scene.set_active(object);

    tracing::debug!(
        "Created mesh with {} faces and {} material slots",
        faces_created,
        material_slots
    );

    BuildOutput {
        root: object,
        objects_created: 1,
        meshes_created: 1,
        faces_created,
        material_slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::material::MaterialPolicy;
    use crate::options::NameTemplates;
    use crate::scene::MemoryScene;

    const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    const CLEAR: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    fn run(buffer: &PixelBuffer, names: NameTemplates) -> (MemoryScene, BuildOutput) {
        let templates = names.compile().unwrap();
        let context = NameContext {
            templates: &templates,
            filename: "tiles.png",
            use_nodes: "",
        };
        let mut scene = MemoryScene::new();
        let mut cache = MaterialCache::new(MaterialPolicy {
            use_nodes: false,
            reuse_existing: true,
        });
        let output = build(buffer, &mut scene, &mut cache, &context);
        (scene, output)
    }

    #[test]
    fn test_faces_and_slots() {
        let buffer =
            PixelBuffer::from_colors(3, 2, &[RED, GREEN, CLEAR, BLUE, RED, GREEN]).unwrap();
        let (scene, output) = run(&buffer, NameTemplates::default());

        assert_eq!(output.faces_created, 5);
        assert_eq!(output.material_slots, 3);
        assert_eq!(scene.objects().len(), 1);

        let mesh = &scene.meshes()[0];
        assert_eq!(mesh.name, "tiles.png");
        assert_eq!(mesh.vertices.len(), 20);
        assert_eq!(mesh.face_slots, vec![0, 1, 2, 0, 1]);
        assert_eq!(mesh.materials.len(), 3);
        assert_eq!(scene.material(mesh.materials[2]).name, "pixel_art_0000FFFF");
    }

    #[test]
    fn test_quad_placement() {
        let buffer = PixelBuffer::from_colors(2, 2, &[CLEAR, CLEAR, CLEAR, RED]).unwrap();
        let (scene, _) = run(&buffer, NameTemplates::default());

        let mesh = &scene.meshes()[0];
        assert_eq!(
            mesh.vertices,
            vec![
                [1.0, 1.0, 0.0],
                [2.0, 1.0, 0.0],
                [2.0, 2.0, 0.0],
                [1.0, 2.0, 0.0]
            ]
        );
        assert_eq!(mesh.faces, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_object_selected_and_active() {
        let buffer = PixelBuffer::from_colors(1, 1, &[RED]).unwrap();
        let (scene, output) = run(&buffer, NameTemplates::default());

        assert!(scene.object(output.root).selected);
        assert_eq!(scene.active(), Some(output.root));
        assert_eq!(scene.object(output.root).name, "tiles.png");
    }

    #[test]
    fn test_slots_follow_colors_when_names_collide() {
        // Every colour proposes the same name; reuse adopts one material, but
        // each colour still gets its own slot
        let names = NameTemplates {
            material: "shared".to_string(),
            ..NameTemplates::default()
        };
        let buffer = PixelBuffer::from_colors(2, 1, &[RED, BLUE]).unwrap();
        let (scene, output) = run(&buffer, names);

        assert_eq!(scene.materials().len(), 1);
        assert_eq!(output.material_slots, 2);
        assert_eq!(scene.meshes()[0].face_slots, vec![0, 1]);
    }

    #[test]
    fn test_transparent_image_has_no_faces() {
        let buffer = PixelBuffer::from_colors(2, 1, &[CLEAR, CLEAR]).unwrap();
        let (scene, output) = run(&buffer, NameTemplates::default());

        assert_eq!(output.faces_created, 0);
        assert_eq!(output.material_slots, 0);
        assert!(scene.meshes()[0].faces.is_empty());
        assert!(scene.materials().is_empty());
    }
}
