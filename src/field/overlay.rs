//! Fixed constellation overlays
//!
//! Predetermined polylines in percent coordinates, scaled to the viewport and
//! drawn on top of the simulated particles. They never move with the physics.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Viewport;
use crate::ping_pong;

/// Overall overlay opacity
pub const OVERLAY_ALPHA: f32 = 0.2;
/// Line opacity pulses between these (times `OVERLAY_ALPHA`)
pub const OVERLAY_PULSE_MIN: f32 = 0.3;
pub const OVERLAY_PULSE_MAX: f32 = 0.5;
pub const OVERLAY_PULSE_SECS: f32 = 4.0;
pub const OVERLAY_POINT_RADIUS: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constellation {
    /// Vertices as `[x%, y%]` of the viewport, in drawing order
    pub points: Vec<[f32; 2]>,
}

impl Constellation {
    pub fn new(points: &[[f32; 2]]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }

    /// Triangle, square and two free-form shapes
    pub fn default_set() -> Vec<Self> {
        vec![
            Self::new(&[[15.0, 20.0], [25.0, 35.0], [5.0, 35.0], [15.0, 20.0]]),
            Self::new(&[[70.0, 15.0], [85.0, 15.0], [85.0, 30.0], [70.0, 30.0], [70.0, 15.0]]),
            Self::new(&[[40.0, 60.0], [50.0, 50.0], [60.0, 65.0], [45.0, 75.0], [40.0, 60.0]]),
            Self::new(&[[80.0, 70.0], [90.0, 75.0], [85.0, 85.0], [75.0, 80.0], [80.0, 70.0]]),
        ]
    }

    /// Vertices in CSS px
    pub fn points_px(&self, viewport: Viewport) -> impl Iterator<Item = Vec2> + '_ {
        let scale = viewport.size() / 100.0;
        self.points.iter().map(move |[x, y]| Vec2::new(*x, *y) * scale)
    }

    /// Consecutive vertex pairs in CSS px
    pub fn segments(&self, viewport: Viewport) -> Vec<(Vec2, Vec2)> {
        let points: Vec<Vec2> = self.points_px(viewport).collect();
        points.windows(2).map(|w| (w[0], w[1])).collect()
    }
}

/// Overlay line opacity at `time_secs`
pub fn overlay_alpha(time_secs: f32) -> f32 {
    let t = ping_pong(time_secs, OVERLAY_PULSE_SECS);
    OVERLAY_ALPHA * crate::lerp(OVERLAY_PULSE_MIN, OVERLAY_PULSE_MAX, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_scaled_to_viewport() {
        let triangle = &Constellation::default_set()[0];
        let segments = triangle.segments(Viewport::new(200.0, 100.0, 1.0));
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].0, Vec2::new(30.0, 20.0));
        assert_eq!(segments[0].1, Vec2::new(50.0, 35.0));
        // Closed shape ends where it started
        assert_eq!(segments[2].1, segments[0].0);
    }

    #[test]
    fn test_single_point_has_no_segments() {
        let dot = Constellation::new(&[[50.0, 50.0]]);
        assert!(dot.segments(Viewport::new(100.0, 100.0, 1.0)).is_empty());
        assert_eq!(dot.points_px(Viewport::new(100.0, 100.0, 1.0)).count(), 1);
    }

    #[test]
    fn test_alpha_pulses_within_range() {
        let lo = OVERLAY_ALPHA * OVERLAY_PULSE_MIN;
        let hi = OVERLAY_ALPHA * OVERLAY_PULSE_MAX;
        assert!((overlay_alpha(0.0) - lo).abs() < 1e-6);
        assert!((overlay_alpha(OVERLAY_PULSE_SECS) - hi).abs() < 1e-6);
        for i in 0..100 {
            let a = overlay_alpha(i as f32 * 0.13);
            assert!(a >= lo - 1e-6 && a <= hi + 1e-6);
        }
    }
}
