//! Bounded counts and age/rank fading
//!
//! Shared by the particle field (count clamp on resize) and the cursor trail
//! (history cap plus fade-out), which are the same "bounded, decaying set of
//! points" idea at different time scales.

use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` bound on a collection size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub min: usize,
    pub max: usize,
}

impl Capacity {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Up to `max` entries, no floor
    pub const fn at_most(max: usize) -> Self {
        Self { min: 0, max }
    }

    pub fn clamp(&self, n: usize) -> usize {
        n.max(self.min).min(self.max.max(self.min))
    }

    /// Count for a surface of `area` at `area_per_item` each
    pub fn for_area(&self, area: f32, area_per_item: f32) -> usize {
        if area.is_nan() || area <= 0.0 || area_per_item.is_nan() || area_per_item <= 0.0 {
            return self.clamp(0);
        }
        self.clamp((area / area_per_item).floor() as usize)
    }
}

/// Fade by age (relative to `lifespan_ms`) and by rank (relative to capacity)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decay {
    pub lifespan_ms: f64,
    pub capacity: Capacity,
    /// Floor for `scale`
    pub min_scale: f32,
}

impl Decay {
    pub fn is_alive(&self, age_ms: f64) -> bool {
        age_ms < self.lifespan_ms
    }

    fn rank(&self, index: usize) -> f32 {
        if self.capacity.max == 0 {
            1.0
        } else {
            index as f32 / self.capacity.max as f32
        }
    }

    /// `max(0, 1 - age/lifespan - index/cap)`
    pub fn opacity(&self, age_ms: f64, index: usize) -> f32 {
        let age = if self.lifespan_ms > 0.0 {
            (age_ms.max(0.0) / self.lifespan_ms) as f32
        } else {
            1.0
        };
        (1.0 - age - self.rank(index)).max(0.0)
    }

    /// `max(min_scale, 1 - index/cap)`
    pub fn scale(&self, index: usize) -> f32 {
        (1.0 - self.rank(index)).max(self.min_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_for_area_is_monotonic() {
        let cap = Capacity::new(50, 150);
        assert_eq!(cap.for_area(0.0, 10_000.0), 50);
        assert_eq!(cap.for_area(-5.0, 10_000.0), 50);
        assert_eq!(cap.for_area(f32::NAN, 10_000.0), 50);
        assert_eq!(cap.for_area(800.0 * 600.0, 10_000.0), 50);
        assert_eq!(cap.for_area(1000.0 * 1000.0, 10_000.0), 100);
        assert_eq!(cap.for_area(1.0e9, 10_000.0), 150);

        let mut last = 0;
        for i in 0..400 {
            let n = cap.for_area(i as f32 * 5_000.0, 10_000.0);
            assert!(n >= last);
            last = n;
        }
    }

    #[test]
    fn test_inverted_capacity_uses_min() {
        let cap = Capacity::new(10, 5);
        assert_eq!(cap.clamp(0), 10);
        assert_eq!(cap.clamp(100), 10);
    }

    #[test]
    fn test_decay_fades_with_age_and_rank() {
        let decay = Decay {
            lifespan_ms: 100.0,
            capacity: Capacity::at_most(10),
            min_scale: 0.5,
        };
        assert_eq!(decay.opacity(0.0, 0), 1.0);
        assert!((decay.opacity(50.0, 0) - 0.5).abs() < 1e-6);
        assert!((decay.opacity(50.0, 2) - 0.3).abs() < 1e-6);
        assert_eq!(decay.opacity(100.0, 0), 0.0);
        assert!(decay.opacity(10.0, 9) < 1e-6);

        assert_eq!(decay.scale(0), 1.0);
        assert!((decay.scale(3) - 0.7).abs() < 1e-6);
        assert_eq!(decay.scale(9), 0.5);
        assert!(decay.is_alive(99.0));
        assert!(!decay.is_alive(100.0));
    }
}
