//! Normalized RGBA colour and its hashable key

use serde::Serialize;

/// RGBA colour with channels normalized to [0, 1]
///
/// Equality is exact per-channel float equality. Two colours that differ in
/// the last bit are different materials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour (alpha = 1.0)
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build from 8-bit channels
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0] as f32 / 255.0,
            g: rgba[1] as f32 / 255.0,
            b: rgba[2] as f32 / 255.0,
            a: rgba[3] as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Fully transparent pixels produce no geometry
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a == 0.0
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    /// Channels as bytes: `round(clamp(v, 0, 1) * 255)`
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }

    /// `RRGGBBAA`, uppercase
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("{r:02X}{g:02X}{b:02X}{a:02X}")
    }

    /// Hashable key with the same equality as `PartialEq`
    #[inline]
    pub fn key(self) -> ColorKey {
        ColorKey([
            canonical_bits(self.r),
            canonical_bits(self.g),
            canonical_bits(self.b),
            canonical_bits(self.a),
        ])
    }
}

#[inline]
fn channel_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Folds -0.0 into 0.0 so bit equality matches float equality
#[inline]
fn canonical_bits(v: f32) -> u32 {
    (v + 0.0).to_bits()
}

/// Bit pattern of a [`Color`], usable as a map key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorKey([u32; 4]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Color::new(1.0, 0.0, 0.0, 1.0).to_hex(), "FF0000FF");
        assert_eq!(Color::from_rgba8([0x12, 0xAB, 0x00, 0x80]).to_hex(), "12AB0080");
    }

    #[test]
    fn test_hex_roundtrips_every_byte() {
        for v in 0..=255u8 {
            let c = Color::from_rgba8([v, v, v, v]);
            assert_eq!(c.to_rgba8(), [v, v, v, v]);
        }
    }

    #[test]
    fn test_key_matches_float_equality() {
        let a = Color::new(0.0, 0.5, 0.25, 1.0);
        let b = Color::new(-0.0, 0.5, 0.25, 1.0);
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());

        let c = Color::new(0.0, 0.5, 0.25 + f32::EPSILON, 1.0);
        assert_ne!(a, c);
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_transparency() {
        assert!(Color::new(1.0, 1.0, 1.0, 0.0).is_transparent());
        assert!(!Color::new(0.0, 0.0, 0.0, 0.01).is_transparent());
        assert!(Color::rgb(0.2, 0.2, 0.2).is_opaque());
    }
}
