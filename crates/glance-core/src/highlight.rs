//! Highlight color animation.

use crate::material::Color;

/// Policy computing the transient highlight color as a function of time.
///
/// The default is a square wave alternating between green and magenta. The
/// exact waveform is not load-bearing; callers may substitute any
/// deterministic function of `time` by configuring the fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightPolicy {
    /// Color shown during the "high" half of the wave.
    pub color_a: Color,
    /// Color shown during the "low" half of the wave.
    pub color_b: Color,
    /// Oscillation rate; higher is faster blinking.
    pub frequency: f32,
}

impl Default for HighlightPolicy {
    fn default() -> Self {
        Self {
            color_a: Color::from_hex(0x00FF00),
            color_b: Color::from_hex(0xFF00FF),
            frequency: 8.0,
        }
    }
}

impl HighlightPolicy {
    /// Returns the highlight color at `time` (seconds).
    #[must_use]
    pub fn color_at(&self, time: f32) -> Color {
        if (time * self.frequency) % 2.0 > 1.0 {
            self.color_a
        } else {
            self.color_b
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waveform_alternates() {
        let policy = HighlightPolicy::default();
        // (0.0 * 8) % 2 = 0 -> low half
        assert_eq!(policy.color_at(0.0), policy.color_b);
        // (0.15 * 8) % 2 = 1.2 -> high half
        assert_eq!(policy.color_at(0.15), policy.color_a);
        // (0.25 * 8) % 2 = 0 -> low half again
        assert_eq!(policy.color_at(0.25), policy.color_b);
    }

    #[test]
    fn deterministic_in_time() {
        let policy = HighlightPolicy::default();
        for t in [0.0_f32, 0.1, 0.33, 7.5, 1000.25] {
            assert_eq!(policy.color_at(t), policy.color_at(t));
        }
    }
}
