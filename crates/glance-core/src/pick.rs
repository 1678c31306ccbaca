//! Pick ID encoding.
//!
//! Every pickable object is assigned a dense non-zero integer ID. In the
//! parallel ID-scene the object is rendered with a flat, unlit color equal
//! to its ID packed into the red/green/blue channels. Reading back a single
//! pixel and decoding it identifies the object under the cursor without any
//! CPU-side ray casting.

use std::num::NonZeroU32;

/// The largest representable pick ID: 24 bits across three 8-bit channels.
pub const MAX_PICK_ID: u32 = 0xFF_FFFF;

/// A non-zero object ID in the range `1..=MAX_PICK_ID`.
///
/// 0 is reserved for "no object": the ID-scene clears to black, so a pick
/// over empty background decodes to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickId(NonZeroU32);

impl PickId {
    /// Creates a pick ID from a raw decoded value.
    ///
    /// Returns `None` for 0 (background) and for values outside the
    /// encodable 24-bit range.
    #[must_use]
    pub fn new(raw: u32) -> Option<Self> {
        if raw > MAX_PICK_ID {
            return None;
        }
        NonZeroU32::new(raw).map(Self)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns this ID encoded as an RGB color.
    #[must_use]
    pub fn to_color(self) -> [u8; 3] {
        id_to_color(self.get())
    }
}

impl std::fmt::Display for PickId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.get())
    }
}

/// Encodes an ID as an RGB pick color.
///
/// Returns [R, G, B] where:
/// - R contains bits 16-23
/// - G contains bits 8-15
/// - B contains bits 0-7
#[must_use]
pub fn id_to_color(id: u32) -> [u8; 3] {
    [
        ((id >> 16) & 0xFF) as u8,
        ((id >> 8) & 0xFF) as u8,
        (id & 0xFF) as u8,
    ]
}

/// Decodes an RGB pick color back to an ID.
///
/// The alpha channel of the read-back pixel is ignored.
#[must_use]
pub fn color_to_id(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn roundtrip_boundaries() {
        for id in [0, 1, 255, 256, 65535, 65536, MAX_PICK_ID] {
            let [r, g, b] = id_to_color(id);
            assert_eq!(color_to_id(r, g, b), id, "roundtrip failed for {id}");
        }
    }

    #[test]
    fn specific_encodings() {
        assert_eq!(id_to_color(0), [0, 0, 0]);
        assert_eq!(id_to_color(1), [0, 0, 1]);
        assert_eq!(id_to_color(256), [0, 1, 0]);
        assert_eq!(id_to_color(0xFF0000), [255, 0, 0]);
        assert_eq!(id_to_color(MAX_PICK_ID), [255, 255, 255]);
    }

    #[test]
    fn pick_id_rejects_zero_and_out_of_range() {
        assert!(PickId::new(0).is_none());
        assert!(PickId::new(1).is_some());
        assert!(PickId::new(MAX_PICK_ID).is_some());
        assert!(PickId::new(MAX_PICK_ID + 1).is_none());
    }

    proptest! {
        #[test]
        fn roundtrip_full_range(id in 0u32..=MAX_PICK_ID) {
            let [r, g, b] = id_to_color(id);
            prop_assert_eq!(color_to_id(r, g, b), id);
        }
    }
}
