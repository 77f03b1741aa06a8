//! Cursor trail
//!
//! A short history of pointer positions, newest first. Each point fades by
//! age and by rank and shrinks towards the tail.

use std::collections::VecDeque;

use glam::Vec2;

use super::decay::{Capacity, Decay};
use crate::consts::{TRAIL_CAPACITY, TRAIL_LIFESPAN_MS, TRAIL_MIN_SCALE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub born_ms: f64,
}

/// One visible trail dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailDot {
    pub pos: Vec2,
    pub scale: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct CursorTrail {
    points: VecDeque<TrailPoint>,
    decay: Decay,
}

impl Default for CursorTrail {
    fn default() -> Self {
        Self::new(Decay {
            lifespan_ms: TRAIL_LIFESPAN_MS,
            capacity: Capacity::at_most(TRAIL_CAPACITY),
            min_scale: TRAIL_MIN_SCALE,
        })
    }
}

impl CursorTrail {
    pub fn new(decay: Decay) -> Self {
        Self {
            points: VecDeque::with_capacity(decay.capacity.max),
            decay,
        }
    }

    pub fn push(&mut self, pos: Vec2, now_ms: f64) {
        self.prune(now_ms);
        let cap = self.decay.capacity.max;
        if cap == 0 {
            return;
        }
        self.points.truncate(cap - 1);
        self.points.push_front(TrailPoint { pos, born_ms: now_ms });
    }

    /// Forget points older than the lifespan
    pub fn prune(&mut self, now_ms: f64) {
        let decay = self.decay;
        self.points.retain(|p| decay.is_alive(now_ms - p.born_ms));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    /// Visible dots at `now_ms`, newest first. Fully faded points are skipped.
    pub fn dots(&self, now_ms: f64) -> Vec<TrailDot> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| self.decay.is_alive(now_ms - p.born_ms))
            .map(|(i, p)| TrailDot {
                pos: p.pos,
                scale: self.decay.scale(i),
                opacity: self.decay.opacity(now_ms - p.born_ms, i),
            })
            .filter(|dot| dot.opacity > 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_capped_newest_first() {
        let mut trail = CursorTrail::default();
        for i in 0..40 {
            trail.push(Vec2::new(i as f32, 0.0), 1000.0 + i as f64);
        }
        assert_eq!(trail.len(), TRAIL_CAPACITY);
        assert_eq!(trail.points().next().unwrap().pos.x, 39.0);
    }

    #[test]
    fn test_old_points_expire() {
        let mut trail = CursorTrail::default();
        trail.push(Vec2::ZERO, 0.0);
        trail.push(Vec2::ONE, 60.0);
        assert_eq!(trail.dots(90.0).len(), 2);

        trail.prune(120.0);
        assert_eq!(trail.len(), 1);
        trail.prune(200.0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_dots_fade_and_shrink_towards_tail() {
        let mut trail = CursorTrail::default();
        for i in 0..5 {
            trail.push(Vec2::new(i as f32, 0.0), 10.0);
        }
        let dots = trail.dots(10.0);
        assert_eq!(dots.len(), 5);
        assert_eq!(dots[0].opacity, 1.0);
        assert_eq!(dots[0].scale, 1.0);
        for pair in dots.windows(2) {
            assert!(pair[1].opacity < pair[0].opacity);
            assert!(pair[1].scale <= pair[0].scale);
            assert!(pair[1].scale >= TRAIL_MIN_SCALE);
        }
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut trail = CursorTrail::new(Decay {
            lifespan_ms: 100.0,
            capacity: Capacity::at_most(0),
            min_scale: 0.5,
        });
        trail.push(Vec2::ONE, 0.0);
        assert!(trail.is_empty());
    }
}
