//! Naming templates for generated objects, meshes and materials
//!
//! Templates use `str.format`-style substitutions: literal text, `{key}`,
//! `{key:spec}` and the escapes `{{` / `}}`. A spec is
//! `[[fill]align][0][width][type]` with align one of `<`, `>`, `^` and type
//! `d` (numbers) or `s` (strings).
//!
//! Templates are compiled once, up front, against the set of keys they may
//! use. Rendering a compiled template cannot fail.

use std::fmt;

use crate::error::TemplateError;

/// Widest padding a format spec may request
pub const MAX_FIELD_WIDTH: usize = 256;

/// Substitution keys understood by the importer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKey {
    /// Source image file name (with extension)
    Filename,
    /// Pixel colour as `RRGGBBAA`
    Color,
    /// Pixel column
    X,
    /// Pixel row
    Y,
    /// `nodes` when material nodes are enabled, empty otherwise
    UseNodes,
}

impl TemplateKey {
    pub const ALL: [TemplateKey; 5] = [
        TemplateKey::Filename,
        TemplateKey::Color,
        TemplateKey::X,
        TemplateKey::Y,
        TemplateKey::UseNodes,
    ];

    /// Keys available before any pixel is visited
    pub const OBJECT: [TemplateKey; 2] = [TemplateKey::Filename, TemplateKey::UseNodes];

    pub fn name(self) -> &'static str {
        match self {
            TemplateKey::Filename => "filename",
            TemplateKey::Color => "color",
            TemplateKey::X => "x",
            TemplateKey::Y => "y",
            TemplateKey::UseNodes => "use_nodes",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    fn is_numeric(self) -> bool {
        matches!(self, TemplateKey::X | TemplateKey::Y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FormatSpec {
    fill: Option<char>,
    align: Option<Align>,
    zero: bool,
    width: usize,
}

impl FormatSpec {
    fn parse(key: TemplateKey, spec: &str) -> Result<Self, TemplateError> {
        let invalid = || TemplateError::InvalidFormatSpec {
            key: key.name().to_string(),
            spec: spec.to_string(),
        };
        let align_of = |c: char| match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            _ => None,
        };

        let chars: Vec<char> = spec.chars().collect();
        let mut out = FormatSpec::default();
        let mut i = 0;

        if let Some(align) = chars.get(1).copied().and_then(align_of) {
            out.fill = Some(chars[0]);
            out.align = Some(align);
            i = 2;
        } else if let Some(align) = chars.first().copied().and_then(align_of) {
            out.align = Some(align);
            i = 1;
        }

        if chars.get(i) == Some(&'0') {
            out.zero = true;
            i += 1;
        }

        let digits_start = i;
        while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        if i > digits_start {
            let digits: String = chars[digits_start..i].iter().collect();
            out.width = digits.parse().map_err(|_| invalid())?;
            if out.width > MAX_FIELD_WIDTH {
                return Err(invalid());
            }
        }

        match chars.get(i) {
            None => {}
            Some('d') if key.is_numeric() && i + 1 == chars.len() => {}
            Some('s') if !key.is_numeric() && i + 1 == chars.len() => {}
            Some(_) => return Err(invalid()),
        }

        Ok(out)
    }

    fn write(&self, out: &mut String, value: &str, numeric: bool) {
        let len = value.chars().count();
        if len >= self.width {
            out.push_str(value);
            return;
        }

        let fill = self.fill.unwrap_or(if self.zero { '0' } else { ' ' });
        let align = self
            .align
            .unwrap_or(if numeric { Align::Right } else { Align::Left });
        let pad = self.width - len;
        let (before, after) = match align {
            Align::Left => (0, pad),
            Align::Right => (pad, 0),
            Align::Center => (pad / 2, pad - pad / 2),
        };

        out.extend(std::iter::repeat_n(fill, before));
        out.push_str(value);
        out.extend(std::iter::repeat_n(fill, after));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { key: TemplateKey, spec: FormatSpec },
}

/// Values substituted into a [`Template`]
#[derive(Debug, Clone, Copy)]
pub struct NameValues<'a> {
    pub filename: &'a str,
    pub color: &'a str,
    pub x: u32,
    pub y: u32,
    pub use_nodes: &'a str,
}

/// A compiled naming template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`, rejecting keys outside `allowed`
    pub fn compile(source: &str, allowed: &[TemplateKey]) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    if chars.next_if(|&(_, c)| c == '{').is_some() {
                        literal.push('{');
                        continue;
                    }

                    let mut field = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        field.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedBrace { position: pos });
                    }

                    let (name, spec) = match field.split_once(':') {
                        Some((name, spec)) => (name, Some(spec)),
                        None => (field.as_str(), None),
                    };
                    if name.is_empty() {
                        return Err(TemplateError::EmptyKey { position: pos });
                    }
                    let key = TemplateKey::from_name(name)
                        .filter(|k| allowed.contains(k))
                        .ok_or_else(|| TemplateError::UnknownKey {
                            key: name.to_string(),
                            position: pos,
                        })?;
                    let spec = match spec {
                        Some(spec) => FormatSpec::parse(key, spec)?,
                        None => FormatSpec::default(),
                    };

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field { key, spec });
                }
                '}' => {
                    if chars.next_if(|&(_, c)| c == '}').is_some() {
                        literal.push('}');
                    } else {
                        return Err(TemplateError::UnmatchedCloseBrace { position: pos });
                    }
                }
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Whether the rendered name can change with `key`
    pub fn uses(&self, key: TemplateKey) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Field { key: k, .. } if *k == key))
    }

    pub fn render(&self, values: &NameValues<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { key, spec } => {
                    let digits;
                    let value = match key {
                        TemplateKey::Filename => values.filename,
                        TemplateKey::Color => values.color,
                        TemplateKey::UseNodes => values.use_nodes,
                        TemplateKey::X => {
                            digits = values.x.to_string();
                            digits.as_str()
                        }
                        TemplateKey::Y => {
                            digits = values.y.to_string();
                            digits.as_str()
                        }
                    };
                    spec.write(&mut out, value, key.is_numeric());
                }
            }
        }
        out
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> NameValues<'static> {
        NameValues {
            filename: "hero.png",
            color: "FF0000FF",
            x: 7,
            y: 12,
            use_nodes: "nodes",
        }
    }

    fn render(source: &str) -> String {
        Template::compile(source, &TemplateKey::ALL)
            .unwrap()
            .render(&values())
    }

    #[test]
    fn test_default_templates() {
        assert_eq!(render("{filename}"), "hero.png");
        assert_eq!(render("pixel_art_{color}"), "pixel_art_FF0000FF");
        assert_eq!(render("{filename}_{x}_{y}"), "hero.png_7_12");
        assert_eq!(render("{filename}_{x}_{y}_mesh"), "hero.png_7_12_mesh");
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(render("{{{x}}}"), "{7}");
        assert_eq!(render("a{{b}}c"), "a{b}c");
    }

    #[test]
    fn test_format_specs() {
        assert_eq!(render("{x:03}"), "007");
        assert_eq!(render("{y:>4}"), "  12");
        assert_eq!(render("{x:<3}|"), "7  |");
        assert_eq!(render("{x:*^5}"), "**7**");
        assert_eq!(render("{x:04d}"), "0007");
        assert_eq!(render("{use_nodes:>7s}"), "  nodes");
        assert_eq!(render("{filename:2}"), "hero.png");
    }

    #[test]
    fn test_unknown_key() {
        let err = Template::compile("pixel_{colour}", &TemplateKey::ALL).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownKey {
                key: "colour".to_string(),
                position: 6
            }
        );
    }

    #[test]
    fn test_key_not_allowed_in_object_template() {
        assert!(Template::compile("{filename}_{use_nodes}", &TemplateKey::OBJECT).is_ok());
        let err = Template::compile("{filename}_{x}", &TemplateKey::OBJECT).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownKey { ref key, .. } if key == "x"));
    }

    #[test]
    fn test_malformed_syntax() {
        assert_eq!(
            Template::compile("abc{x", &TemplateKey::ALL).unwrap_err(),
            TemplateError::UnclosedBrace { position: 3 }
        );
        assert_eq!(
            Template::compile("a}b", &TemplateKey::ALL).unwrap_err(),
            TemplateError::UnmatchedCloseBrace { position: 1 }
        );
        assert_eq!(
            Template::compile("{}", &TemplateKey::ALL).unwrap_err(),
            TemplateError::EmptyKey { position: 0 }
        );
        assert!(matches!(
            Template::compile("{x:q}", &TemplateKey::ALL).unwrap_err(),
            TemplateError::InvalidFormatSpec { .. }
        ));
        assert!(matches!(
            Template::compile("{color:d}", &TemplateKey::ALL).unwrap_err(),
            TemplateError::InvalidFormatSpec { .. }
        ));
    }

    #[test]
    fn test_field_width_capped() {
        assert_eq!(render("{x:256}").len(), 256);
        assert_eq!(
            Template::compile("{x:99999999999}", &TemplateKey::ALL).unwrap_err(),
            TemplateError::InvalidFormatSpec {
                key: "x".to_string(),
                spec: "99999999999".to_string()
            }
        );
        assert!(Template::compile("{filename:>257}", &TemplateKey::ALL).is_err());
    }

    #[test]
    fn test_uses() {
        let t = Template::compile("pixel_art_{color}", &TemplateKey::ALL).unwrap();
        assert!(t.uses(TemplateKey::Color));
        assert!(!t.uses(TemplateKey::X));
    }

    #[test]
    fn test_literal_only() {
        assert_eq!(render("plain"), "plain");
        assert_eq!(render(""), "");
    }
}
