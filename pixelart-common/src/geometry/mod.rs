//! Geometry synthesis from a pixel buffer
//!
//! Both strategies visit pixels row by row (y, then x) and skip pixels whose
//! alpha is exactly 0. Names are rendered from compiled templates; all scene
//! calls go through [`SceneGraph`](crate::scene::SceneGraph).

pub mod cubes;
pub mod merged;

use crate::buffer::PixelBuffer;
use crate::color::{Color, ColorKey};
use crate::material::MaterialCache;
use crate::options::{CompiledTemplates, ImportMode};
use crate::scene::{MaterialLibrary, ObjectHandle, SceneGraph};
use crate::template::{NameValues, Template};

/// A pixel that produces geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisiblePixel {
    pub x: u32,
    pub y: u32,
    pub color: Color,
}

/// Iterate non-transparent pixels in row-major order
pub fn visible_pixels(buffer: &PixelBuffer) -> impl Iterator<Item = VisiblePixel> + '_ {
    (0..buffer.height()).flat_map(move |y| {
        (0..buffer.width()).filter_map(move |x| {
            let color = buffer.sample(x, y);
            (!color.is_transparent()).then_some(VisiblePixel { x, y, color })
        })
    })
}

/// What a builder created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOutput {
    /// Parent empty (cubes) or the merged mesh object
    pub root: ObjectHandle,
    /// Objects created, root included
    pub objects_created: usize,
    pub meshes_created: usize,
    pub faces_created: usize,
    /// Material slots attached to the merged mesh; 0 for cubes
    pub material_slots: usize,
}

/// Shared naming state for one build
pub struct NameContext<'a> {
    pub templates: &'a CompiledTemplates,
    pub filename: &'a str,
    pub use_nodes: &'a str,
}

impl NameContext<'_> {
    /// Name of the root object; only `filename` and `use_nodes` apply
    pub fn object_name(&self) -> String {
        self.templates.parent.render(&NameValues {
            filename: self.filename,
            color: "",
            x: 0,
            y: 0,
            use_nodes: self.use_nodes,
        })
    }
}

/// Renders per-pixel names, re-encoding the colour hex only when it changes
pub(crate) struct PixelNamer<'a> {
    context: &'a NameContext<'a>,
    last: Option<ColorKey>,
    hex: String,
}

impl<'a> PixelNamer<'a> {
    pub(crate) fn new(context: &'a NameContext<'a>) -> Self {
        Self {
            context,
            last: None,
            hex: String::new(),
        }
    }

    pub(crate) fn render(&mut self, template: &Template, pixel: &VisiblePixel) -> String {
        let key = pixel.color.key();
        if self.last != Some(key) {
            self.hex = pixel.color.to_hex();
            self.last = Some(key);
        }
        template.render(&NameValues {
            filename: self.context.filename,
            color: &self.hex,
            x: pixel.x,
            y: pixel.y,
            use_nodes: self.context.use_nodes,
        })
    }
}

/// Run the strategy selected by `mode`
pub fn build<S>(
    mode: ImportMode,
    buffer: &PixelBuffer,
    scene: &mut S,
    materials: &mut MaterialCache,
    names: &NameContext<'_>,
) -> BuildOutput
where
    S: SceneGraph + MaterialLibrary + ?Sized,
{
    match mode {
        ImportMode::Cubes => cubes::build(buffer, scene, materials, names),
        ImportMode::MergedMesh => merged::build(buffer, scene, materials, names),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::NameTemplates;

    #[test]
    fn test_visible_pixels_skip_transparent() {
        let clear = Color::new(1.0, 1.0, 1.0, 0.0);
        let red = Color::rgb(1.0, 0.0, 0.0);
        let faint = Color::new(0.0, 1.0, 0.0, 0.01);
        let buffer = PixelBuffer::from_colors(2, 2, &[clear, red, faint, clear]).unwrap();

        let visible: Vec<_> = visible_pixels(&buffer).collect();
        assert_eq!(
            visible,
            vec![
                VisiblePixel { x: 1, y: 0, color: red },
                VisiblePixel { x: 0, y: 1, color: faint },
            ]
        );
    }

    #[test]
    fn test_visible_pixels_gray_is_opaque() {
        let buffer = PixelBuffer::new(3, 1, 1, vec![0.0, 0.5, 1.0]).unwrap();
        assert_eq!(visible_pixels(&buffer).count(), 3);
    }

    #[test]
    fn test_pixel_namer() {
        let templates = NameTemplates {
            pixel: "{filename}_{x:02}_{y}_{color}".to_string(),
            ..NameTemplates::default()
        }
        .compile()
        .unwrap();
        let context = NameContext {
            templates: &templates,
            filename: "a.png",
            use_nodes: "",
        };
        let mut namer = PixelNamer::new(&context);

        let red = VisiblePixel {
            x: 3,
            y: 1,
            color: Color::rgb(1.0, 0.0, 0.0),
        };
        let blue = VisiblePixel {
            x: 4,
            y: 1,
            color: Color::rgb(0.0, 0.0, 1.0),
        };
        assert_eq!(namer.render(&templates.pixel, &red), "a.png_03_1_FF0000FF");
        assert_eq!(namer.render(&templates.pixel, &blue), "a.png_04_1_0000FFFF");
        assert_eq!(context.object_name(), "a.png");
    }
}
