//! Proximity links between particles
//!
//! Every unordered pair closer than the connection threshold gets a line whose
//! opacity falls off linearly to zero at the threshold. Brute force is O(n²)
//! and fine for the capped counts the field uses; past `GRID_THRESHOLD`
//! particles the search goes through `SpatialGrid` instead.

use glam::Vec2;

use super::grid::SpatialGrid;
use super::particle::Particle;
use super::state::Viewport;
use crate::consts::{GRID_THRESHOLD, LINK_DISTANCE_CAP, LINK_DISTANCE_FACTOR};

/// A line between particles `a < b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub opacity: f32,
}

/// `min(min(width, height) * 0.15, 150)`
pub fn connection_threshold(viewport: Viewport) -> f32 {
    (viewport.width.min(viewport.height) * LINK_DISTANCE_FACTOR).min(LINK_DISTANCE_CAP)
}

/// `1 - distance/threshold` inside the threshold, else 0
pub fn link_opacity(distance: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 || distance >= threshold {
        0.0
    } else {
        1.0 - distance / threshold
    }
}

/// All links, picking the search strategy by particle count
pub fn find_links(particles: &[Particle], threshold: f32) -> Vec<Link> {
    if particles.len() > GRID_THRESHOLD {
        find_links_grid(particles, threshold)
    } else {
        find_links_brute(particles, threshold)
    }
}

fn link_between(particles: &[Particle], a: usize, b: usize, threshold: f32) -> Option<Link> {
    let distance = particles[a].pos.distance(particles[b].pos);
    let opacity = link_opacity(distance, threshold);
    (opacity > 0.0).then_some(Link { a, b, opacity })
}

pub fn find_links_brute(particles: &[Particle], threshold: f32) -> Vec<Link> {
    let mut links = Vec::new();
    if threshold <= 0.0 {
        return links;
    }
    for a in 0..particles.len() {
        for b in a + 1..particles.len() {
            if let Some(link) = link_between(particles, a, b, threshold) {
                links.push(link);
            }
        }
    }
    links
}

pub fn find_links_grid(particles: &[Particle], threshold: f32) -> Vec<Link> {
    let mut links = Vec::new();
    if threshold <= 0.0 {
        return links;
    }
    let grid = SpatialGrid::build(threshold, particles.iter().map(|p| p.pos));
    for a in 0..particles.len() {
        let pos: Vec2 = particles[a].pos;
        let mut neighbors: Vec<usize> = grid.nearby(pos).filter(|&b| b > a).collect();
        // Same order as the brute-force scan
        neighbors.sort_unstable();
        for b in neighbors {
            if let Some(link) = link_between(particles, a, b, threshold) {
                links.push(link);
            }
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn at(x: f32, y: f32) -> Particle {
        Particle {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            radius: 1.0,
        }
    }

    #[test]
    fn test_threshold_scales_and_caps() {
        assert!((connection_threshold(Viewport::new(800.0, 600.0, 1.0)) - 90.0).abs() < 1e-4);
        assert_eq!(connection_threshold(Viewport::new(4000.0, 3000.0, 1.0)), 150.0);
        assert_eq!(connection_threshold(Viewport::new(0.0, 600.0, 1.0)), 0.0);
    }

    #[test]
    fn test_opacity_linear_falloff() {
        let t = 90.0;
        assert_eq!(link_opacity(0.0, t), 1.0);
        assert_eq!(link_opacity(t, t), 0.0);
        assert_eq!(link_opacity(t + 1.0, t), 0.0);
        assert!((link_opacity(45.0, t) - 0.5).abs() < 1e-6);

        let mut last = link_opacity(0.0, t);
        for i in 1..90 {
            let o = link_opacity(i as f32, t);
            assert!(o < last);
            last = o;
        }
        assert_eq!(link_opacity(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_pair_at_threshold_not_linked() {
        let particles = [at(0.0, 0.0), at(90.0, 0.0), at(30.0, 0.0)];
        let links = find_links_brute(&particles, 90.0);
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| !(l.a == 0 && l.b == 1)));
        assert!(links.iter().all(|l| l.a < l.b));
    }

    #[test]
    fn test_grid_matches_brute_force() {
        let mut rng = Pcg32::seed_from_u64(11);
        let bounds = Vec2::new(1600.0, 1200.0);
        let particles: Vec<Particle> = (0..700)
            .map(|_| Particle::spawn(&mut rng, bounds, 1.0))
            .collect();

        let brute = find_links_brute(&particles, 80.0);
        let grid = find_links_grid(&particles, 80.0);
        assert!(!brute.is_empty());
        assert_eq!(brute, grid);
        assert_eq!(find_links(&particles, 80.0), grid);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(find_links(&[], 100.0).is_empty());
        assert!(find_links(&[at(1.0, 1.0), at(2.0, 2.0)], 0.0).is_empty());
    }
}
