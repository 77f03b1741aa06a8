//! Pointer tracking and repulsion

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{INTERACTION_RADIUS, POINTER_THROTTLE_MS, REPULSION_STRENGTH};

/// Last known pointer position and whether a press/touch is held
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    pub pos: Vec2,
    pub radius: f32,
    pub active: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            radius: INTERACTION_RADIUS,
            active: false,
        }
    }
}

impl PointerState {
    pub fn with_radius(radius: f32) -> Self {
        Self {
            radius,
            ..Default::default()
        }
    }

    /// Repulsion factor in [0, 1]: 1 at the pointer, 0 at the radius edge
    pub fn falloff(&self, distance: f32) -> f32 {
        if self.radius <= 0.0 || distance >= self.radius {
            0.0
        } else {
            (self.radius - distance) / self.radius
        }
    }

    /// Unit direction away from the pointer for a particle at `pos`, if it is
    /// inside the radius and not on top of the pointer
    pub fn outward(&self, pos: Vec2) -> Option<Vec2> {
        let away = pos - self.pos;
        if away.length() >= self.radius {
            return None;
        }
        away.try_normalize()
    }

    /// One-step positional nudge away from the pointer for a particle at `pos`
    pub fn repulsion(&self, pos: Vec2) -> Vec2 {
        let away = pos - self.pos;
        let force = self.falloff(away.length());
        if force <= 0.0 {
            return Vec2::ZERO;
        }
        away.try_normalize().unwrap_or(Vec2::NEG_X) * force * REPULSION_STRENGTH
    }
}

/// Leading-edge throttle: accept an event, then ignore events for `interval_ms`
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last_accepted: Option<f64>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(POINTER_THROTTLE_MS)
    }
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_accepted: None,
        }
    }

    pub fn accept(&mut self, now_ms: f64) -> bool {
        match self.last_accepted {
            Some(last) if now_ms - last < self.interval_ms && now_ms >= last => false,
            _ => {
                self.last_accepted = Some(now_ms);
                true
            }
        }
    }
}

/// Ownership of the current touch gesture. A gesture that starts on the
/// backdrop belongs to the field: it holds the pointer down and suppresses
/// page scrolling until it ends. Any other gesture scrolls the page normally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchCapture {
    claimed: bool,
}

impl TouchCapture {
    /// Start a gesture; returns whether the field claimed it
    pub fn begin(&mut self, on_backdrop: bool) -> bool {
        self.claimed = on_backdrop;
        self.claimed
    }

    pub fn suppress_scroll(&self) -> bool {
        self.claimed
    }

    /// End the gesture; returns whether the field had claimed it
    pub fn end(&mut self) -> bool {
        std::mem::take(&mut self.claimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falloff_linear() {
        let pointer = PointerState::with_radius(100.0);
        assert_eq!(pointer.falloff(0.0), 1.0);
        assert!((pointer.falloff(25.0) - 0.75).abs() < 1e-6);
        assert_eq!(pointer.falloff(100.0), 0.0);
        assert_eq!(pointer.falloff(150.0), 0.0);
    }

    #[test]
    fn test_repulsion_points_away() {
        let pointer = PointerState {
            pos: Vec2::new(50.0, 50.0),
            radius: 100.0,
            active: true,
        };
        let nudge = pointer.repulsion(Vec2::new(60.0, 50.0));
        assert!(nudge.x > 0.0);
        assert!(nudge.y.abs() < 1e-6);
        assert!((nudge.length() - 0.9 * REPULSION_STRENGTH).abs() < 1e-5);

        // Coincident particle still gets pushed somewhere
        assert!(pointer.repulsion(pointer.pos).length() > 0.0);
        // Outside the radius: nothing
        assert_eq!(pointer.repulsion(Vec2::new(200.0, 50.0)), Vec2::ZERO);
    }

    #[test]
    fn test_outward_only_inside_radius() {
        let pointer = PointerState {
            pos: Vec2::new(50.0, 50.0),
            radius: 100.0,
            active: true,
        };
        assert_eq!(pointer.outward(Vec2::new(50.0, 80.0)), Some(Vec2::Y));
        assert_eq!(pointer.outward(Vec2::new(150.0, 50.0)), None);
        assert_eq!(pointer.outward(pointer.pos), None);
    }

    #[test]
    fn test_throttle_window() {
        let mut throttle = Throttle::new(16.0);
        assert!(throttle.accept(0.0));
        assert!(!throttle.accept(5.0));
        assert!(!throttle.accept(15.9));
        assert!(throttle.accept(16.0));
        assert!(!throttle.accept(20.0));
        // Clock reset (e.g. new timeline origin) never locks input out
        assert!(throttle.accept(1.0));
    }

    #[test]
    fn test_touch_capture_claims_backdrop_gestures() {
        let mut touch = TouchCapture::default();
        assert!(!touch.suppress_scroll());

        assert!(touch.begin(true));
        assert!(touch.suppress_scroll());
        assert!(touch.end());
        assert!(!touch.suppress_scroll());
        // Ending twice releases only once
        assert!(!touch.end());

        // Gestures on page content keep native scrolling
        assert!(!touch.begin(false));
        assert!(!touch.suppress_scroll());
        assert!(!touch.end());
    }
}
