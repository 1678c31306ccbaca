//! Materials and the highlight capability.
//!
//! The renderer distinguishes three material kinds: lit `Standard` surfaces,
//! unlit `Flat` surfaces (used for the ID-scene twins, where no lighting or
//! blending may perturb the encoded color), and `Textured` surfaces whose
//! albedo is bound to an offscreen composite target.
//!
//! Only `Standard` materials carry an emissive field and therefore implement
//! [`Highlightable`]. The allocator refuses to register pickable objects
//! backed by anything else, so the "can this material be highlighted?" check
//! happens at construction time rather than on every pick.

use serde::{Deserialize, Serialize};

use crate::pick::PickId;

/// An RGB color with exact component equality.
///
/// Stored as f32 per channel; conversions to and from 24-bit hex are exact
/// for 8-bit-representable values, which the highlight save/restore cycle
/// relies on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a 24-bit hex value such as `0x00FF00`.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    /// Returns the nearest 24-bit hex value.
    #[must_use]
    pub fn to_hex(self) -> u32 {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (quantize(self.r) << 16) | (quantize(self.g) << 8) | quantize(self.b)
    }

    /// Creates the exact color for an encoded pick ID.
    #[must_use]
    pub fn from_id_bytes(bytes: [u8; 3]) -> Self {
        Self {
            r: f32::from(bytes[0]) / 255.0,
            g: f32::from(bytes[1]) / 255.0,
            b: f32::from(bytes[2]) / 255.0,
        }
    }

    #[must_use]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Returns `[r, g, b, a]` with the given alpha.
    #[must_use]
    pub fn to_array4(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Capability interface for materials that can carry a transient highlight.
///
/// The picking engine saves the current highlight color, overrides it with
/// a time-varying color while the object is hovered, and restores the saved
/// value on deselect.
pub trait Highlightable {
    /// Returns the current emissive-equivalent color.
    fn highlight_color(&self) -> Color;

    /// Overrides the emissive-equivalent color.
    fn set_highlight_color(&mut self, color: Color);
}

/// A lit surface material with an emissive term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    /// Diffuse base color.
    pub base_color: Color,
    /// Emissive color, added after lighting. This is the highlight slot.
    pub emissive: Color,
    /// Alpha-test threshold; fragments below it are discarded. `None`
    /// disables the test.
    pub alpha_test: Option<f32>,
}

impl StandardMaterial {
    #[must_use]
    pub fn new(base_color: Color) -> Self {
        Self {
            base_color,
            emissive: Color::BLACK,
            alpha_test: None,
        }
    }
}

impl Highlightable for StandardMaterial {
    fn highlight_color(&self) -> Color {
        self.emissive
    }

    fn set_highlight_color(&mut self, color: Color) {
        self.emissive = color;
    }
}

/// An unlit flat-color material.
///
/// Used for ID-scene twins: the fragment output is exactly `color`, with
/// blending disabled in the pipeline, so the encoded ID survives
/// rasterization bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatMaterial {
    pub color: Color,
    /// Alpha-test threshold, kept so cut-out visible materials produce
    /// matching cut-out pick footprints.
    pub alpha_test: Option<f32>,
}

/// Where a textured material's color input comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureSource {
    /// The composite offscreen target's color buffer, sampled as a texture.
    Composite,
    /// A solid fallback color (no texture sampling).
    Solid(Color),
}

/// A surface whose albedo is bound to a texture input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedMaterial {
    pub source: TextureSource,
    /// Tint multiplied with the sampled color.
    pub tint: Color,
}

impl TexturedMaterial {
    /// A material sampling the composite target, untinted.
    #[must_use]
    pub fn composite() -> Self {
        Self {
            source: TextureSource::Composite,
            tint: Color::WHITE,
        }
    }
}

/// A mesh material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    Flat(FlatMaterial),
    Textured(TexturedMaterial),
}

/// Fixed alpha-test threshold for ID-scene twin materials.
pub const ID_ALPHA_TEST: f32 = 0.5;

impl Material {
    /// Shorthand for a lit material with the given base color.
    #[must_use]
    pub fn standard(base_color: Color) -> Self {
        Self::Standard(StandardMaterial::new(base_color))
    }

    /// Shorthand for an unlit flat material.
    #[must_use]
    pub fn flat(color: Color) -> Self {
        Self::Flat(FlatMaterial {
            color,
            alpha_test: None,
        })
    }

    /// The twin material rendering a pick ID as a flat color.
    #[must_use]
    pub fn id_material(id: PickId) -> Self {
        Self::Flat(FlatMaterial {
            color: Color::from_id_bytes(id.to_color()),
            alpha_test: Some(ID_ALPHA_TEST),
        })
    }

    /// Returns the highlight capability if this material supports it.
    #[must_use]
    pub fn as_highlightable(&self) -> Option<&dyn Highlightable> {
        match self {
            Material::Standard(m) => Some(m),
            Material::Flat(_) | Material::Textured(_) => None,
        }
    }

    /// Mutable variant of [`Material::as_highlightable`].
    pub fn as_highlightable_mut(&mut self) -> Option<&mut dyn Highlightable> {
        match self {
            Material::Standard(m) => Some(m),
            Material::Flat(_) | Material::Textured(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pick::{color_to_id, PickId};

    #[test]
    fn hex_roundtrip() {
        for hex in [0x000000, 0xFFFFFF, 0x00FF00, 0xFF00FF, 0x123456] {
            assert_eq!(Color::from_hex(hex).to_hex(), hex);
        }
    }

    #[test]
    fn id_material_color_is_exact() {
        let id = PickId::new(0xAB_CDEF).unwrap();
        let Material::Flat(flat) = Material::id_material(id) else {
            panic!("id material must be flat");
        };
        // Quantizing back to bytes must reproduce the encoded ID.
        let quantize = |c: f32| (c * 255.0).round() as u8;
        let decoded = color_to_id(
            quantize(flat.color.r),
            quantize(flat.color.g),
            quantize(flat.color.b),
        );
        assert_eq!(decoded, id.get());
        assert_eq!(flat.alpha_test, Some(ID_ALPHA_TEST));
    }

    #[test]
    fn highlight_capability_by_kind() {
        assert!(Material::standard(Color::WHITE).as_highlightable().is_some());
        assert!(Material::flat(Color::WHITE).as_highlightable().is_none());
        assert!(Material::Textured(TexturedMaterial::composite())
            .as_highlightable()
            .is_none());
    }

    #[test]
    fn highlight_set_and_get() {
        let mut mat = Material::standard(Color::from_hex(0x336699));
        let h = mat.as_highlightable_mut().unwrap();
        assert_eq!(h.highlight_color(), Color::BLACK);
        h.set_highlight_color(Color::from_hex(0x00FF00));
        assert_eq!(h.highlight_color(), Color::from_hex(0x00FF00));
    }
}
