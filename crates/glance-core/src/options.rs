//! Configuration options for the viewer.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::material::Color;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Window title.
    pub window_title: String,

    /// Background color of the visible scene.
    pub background_color: Vec3,

    /// Side length in pixels of the square composite render target.
    ///
    /// Deliberately decoupled from the canvas resolution; the sub-scene is
    /// sampled as a texture, so its cost stays flat when the window grows.
    pub composite_resolution: u32,

    /// Highlight blink colors as 24-bit hex values.
    pub highlight_color_a: u32,
    pub highlight_color_b: u32,

    /// Highlight blink rate.
    pub highlight_frequency: f32,

    /// Vertical field of view in radians.
    pub camera_fov: f32,

    /// Near clipping plane.
    pub camera_near: f32,

    /// Far clipping plane.
    pub camera_far: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            window_title: "glance".to_string(),
            background_color: Vec3::new(1.0, 1.0, 1.0),
            composite_resolution: 512,
            highlight_color_a: 0x00FF00,
            highlight_color_b: 0xFF00FF,
            highlight_frequency: 8.0,
            camera_fov: 75.0_f32.to_radians(),
            camera_near: 0.1,
            camera_far: 100.0,
        }
    }
}

impl Options {
    /// Returns the visible-scene background as a [`Color`].
    #[must_use]
    pub fn background(&self) -> Color {
        Color::new(
            self.background_color.x,
            self.background_color.y,
            self.background_color.z,
        )
    }

    /// Returns the configured highlight policy.
    #[must_use]
    pub fn highlight_policy(&self) -> crate::highlight::HighlightPolicy {
        crate::highlight::HighlightPolicy {
            color_a: Color::from_hex(self.highlight_color_a),
            color_b: Color::from_hex(self.highlight_color_b),
            frequency: self.highlight_frequency,
        }
    }

    /// Saves options as JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads options from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let mut options = Options::default();
        options.composite_resolution = 256;
        options.highlight_frequency = 4.0;

        let json = serde_json::to_string(&options).unwrap();
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back.composite_resolution, 256);
        assert_eq!(back.highlight_frequency, 4.0);
        assert_eq!(back.background_color, options.background_color);
    }

    #[test]
    fn default_policy_matches_highlight_default() {
        let policy = Options::default().highlight_policy();
        assert_eq!(policy, crate::highlight::HighlightPolicy::default());
    }
}
