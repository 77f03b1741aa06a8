//! Decorative star field behind the intro
//!
//! Generated once per mount from a seeded RNG. Purely visual: nothing in the
//! phase state machine depends on it.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    /// Position as percent of the container
    pub x: f32,
    pub y: f32,
    /// Diameter in CSS px
    pub size: f32,
    pub opacity: f32,
    /// Blink period (seconds)
    pub blink_secs: f32,
    /// Offset into the blink cycle so stars don't pulse in unison
    pub phase_secs: f32,
}

impl Star {
    /// Inline CSS for the star element
    pub fn style(&self) -> String {
        format!(
            "left:{:.2}%;top:{:.2}%;width:{:.2}px;height:{:.2}px;opacity:{:.2};\
             animation-duration:{:.2}s;animation-delay:-{:.2}s",
            self.x, self.y, self.size, self.size, self.opacity, self.blink_secs, self.phase_secs
        )
    }
}

pub fn generate_stars<R: Rng>(rng: &mut R, count: usize) -> Vec<Star> {
    (0..count)
        .map(|_| {
            let blink_secs = rng.random_range(3.0..7.0);
            Star {
                x: rng.random_range(0.0..100.0),
                y: rng.random_range(0.0..100.0),
                size: rng.random_range(0.5..2.5),
                opacity: rng.random_range(0.2..0.7),
                blink_secs,
                phase_secs: rng.random_range(0.0..blink_secs),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_stars_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let stars = generate_stars(&mut rng, 100);
        assert_eq!(stars.len(), 100);
        for star in &stars {
            assert!((0.0..100.0).contains(&star.x));
            assert!((0.0..100.0).contains(&star.y));
            assert!((0.5..2.5).contains(&star.size));
            assert!((0.2..0.7).contains(&star.opacity));
            assert!(star.phase_secs < star.blink_secs);
        }
    }

    #[test]
    fn test_same_seed_same_sky() {
        let a = generate_stars(&mut Pcg32::seed_from_u64(42), 10);
        let b = generate_stars(&mut Pcg32::seed_from_u64(42), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_style_string() {
        let star = Star {
            x: 12.5,
            y: 50.0,
            size: 1.0,
            opacity: 0.4,
            blink_secs: 4.0,
            phase_secs: 1.5,
        };
        let style = star.style();
        assert!(style.starts_with("left:12.50%;top:50.00%;"));
        assert!(style.contains("animation-delay:-1.50s"));
    }
}
