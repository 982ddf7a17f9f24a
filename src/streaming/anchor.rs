//! Anchor tracking for streamed decoration
//!
//! The anchor is the world-space origin decoration instances are generated
//! around. Fractional camera motion must not cause constant regeneration,
//! so moves below a per-axis threshold are rejected, and the anchor is
//! quantized to the spacing grid when it feeds the GPU uniform.

use crate::core::types::Vec2;

/// Minimum per-axis movement in world units before a move qualifies
pub const MOVE_THRESHOLD: f32 = 16.0;

/// Spatial anchor with movement thresholding and grid quantization
#[derive(Debug, Clone, Copy)]
pub struct StreamAnchor {
    position: Vec2,
    threshold: f32,
}

impl StreamAnchor {
    /// Create an anchor at the given position with the default threshold
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            threshold: MOVE_THRESHOLD,
        }
    }

    /// Create an anchor with a custom movement threshold
    pub fn with_threshold(position: Vec2, threshold: f32) -> Self {
        Self {
            position,
            threshold,
        }
    }

    /// Current (unquantized) anchor position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Attempt to move the anchor to `(x, y)`.
    ///
    /// Returns `false` and leaves the anchor unchanged when both per-axis
    /// deltas are below the threshold. Orientation-only refresh is handled
    /// separately by the streamer, not inferred here.
    pub fn try_move(&mut self, x: f32, y: f32) -> bool {
        let dx = (self.position.x - x).abs();
        let dy = (self.position.y - y).abs();
        if dx < self.threshold && dy < self.threshold {
            // Haven't moved enough
            return false;
        }
        self.position = Vec2::new(x, y);
        true
    }

    /// Anchor snapped to the nearest lower multiple of `spacing` per axis
    pub fn quantized(&self, spacing: f32) -> Vec2 {
        if spacing <= 0.0 {
            return self.position;
        }
        Vec2::new(
            (self.position.x / spacing).floor() * spacing,
            (self.position.y / spacing).floor() * spacing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_move_rejected() {
        let mut anchor = StreamAnchor::new(Vec2::ZERO);
        assert!(!anchor.try_move(15.0, 0.0));
        assert_eq!(anchor.position(), Vec2::ZERO);
    }

    #[test]
    fn test_large_move_accepted() {
        let mut anchor = StreamAnchor::new(Vec2::ZERO);
        assert!(anchor.try_move(17.0, 0.0));
        assert_eq!(anchor.position(), Vec2::new(17.0, 0.0));
    }

    #[test]
    fn test_single_axis_qualifies() {
        let mut anchor = StreamAnchor::new(Vec2::ZERO);
        // Only the Y axis exceeds the threshold
        assert!(anchor.try_move(3.0, 20.0));
    }

    #[test]
    fn test_repeat_move_is_noop() {
        let mut anchor = StreamAnchor::new(Vec2::ZERO);
        assert!(anchor.try_move(40.0, 40.0));
        assert!(!anchor.try_move(40.0, 40.0));
    }

    #[test]
    fn test_quantize_floor() {
        let mut anchor = StreamAnchor::new(Vec2::ZERO);
        anchor.try_move(23.0, 4.0);
        // Quantizes to the lower multiple of spacing, unchanged Y cell
        assert_eq!(anchor.quantized(10.0), Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_quantize_negative_coordinates() {
        let anchor = StreamAnchor::new(Vec2::new(-3.0, -14.5));
        assert_eq!(anchor.quantized(10.0), Vec2::new(-10.0, -20.0));
    }

    #[test]
    fn test_quantize_exact_multiple() {
        let anchor = StreamAnchor::new(Vec2::new(30.0, -20.0));
        assert_eq!(anchor.quantized(10.0), Vec2::new(30.0, -20.0));
    }

    #[test]
    fn test_quantize_degenerate_spacing() {
        let anchor = StreamAnchor::new(Vec2::new(7.3, 2.1));
        assert_eq!(anchor.quantized(0.0), Vec2::new(7.3, 2.1));
    }

    #[test]
    fn test_custom_threshold() {
        let mut anchor = StreamAnchor::with_threshold(Vec2::ZERO, 2.0);
        assert!(!anchor.try_move(1.5, 1.5));
        assert!(anchor.try_move(2.5, 0.0));
    }
}
