//! Portfolio FX - intro animation and interactive particle backdrop
//!
//! Core modules:
//! - `intro`: One-shot, time-driven intro sequence (words, box, name reveal)
//! - `field`: Particle field simulation, connection lines, cursor trail
//! - `platform`: Frame/timer scheduling seams with scoped cancellation
//! - `renderer`: WebGPU triangle pipeline for field frames
//! - `settings`: User preferences and field configuration
//! - `scroll`, `loader`: Page chrome models (scroll bar, loading overlay)

pub mod error;
pub mod field;
pub mod intro;
pub mod loader;
pub mod platform;
pub mod renderer;
pub mod scroll;
pub mod settings;

pub use error::{FxError, Result};
pub use settings::{QualityPreset, Settings};

/// Design constants
pub mod consts {
    /// Fixed simulation step (particles move in px per 60 Hz step)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame gap we try to catch up on (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Intro schedule, ms from mount. Strictly increasing.
    pub const INTRO_WORD1_MS: u32 = 300;
    pub const INTRO_WORD2_MS: u32 = 500;
    pub const INTRO_WORD3_MS: u32 = 1000;
    pub const INTRO_WORDS_EXIT_MS: u32 = 2000;
    pub const INTRO_BOX_GROW_MS: u32 = 2500;
    pub const INTRO_BOX_FULL_MS: u32 = 2900;
    pub const INTRO_NAME_MS: u32 = 3400;
    pub const INTRO_BOX_SHRINK_MS: u32 = 4800;
    pub const INTRO_COMPLETE_MS: u32 = 5600;
    /// Decorative stars behind the intro
    pub const INTRO_STAR_COUNT: usize = 100;

    /// One particle per this many square CSS pixels
    pub const AREA_PER_PARTICLE: f32 = 10_000.0;
    pub const MIN_PARTICLES: usize = 50;
    pub const MAX_PARTICLES: usize = 150;
    pub const PARTICLE_MIN_RADIUS: f32 = 0.5;
    pub const PARTICLE_MAX_RADIUS: f32 = 2.0;
    /// Max velocity component (px per step)
    pub const PARTICLE_MAX_SPEED: f32 = 0.5;
    pub const PARTICLE_ALPHA: f32 = 0.8;

    /// Connection threshold = min(min_dim * factor, cap)
    pub const LINK_DISTANCE_FACTOR: f32 = 0.15;
    pub const LINK_DISTANCE_CAP: f32 = 150.0;
    pub const LINK_WIDTH: f32 = 0.5;
    /// Above this count, pair search switches to the spatial grid
    pub const GRID_THRESHOLD: usize = 500;

    /// Pointer interaction
    pub const INTERACTION_RADIUS: f32 = 100.0;
    /// Max per-step displacement at distance zero (px)
    pub const REPULSION_STRENGTH: f32 = 2.0;
    /// Pointer-move throttle (~one update per frame)
    pub const POINTER_THROTTLE_MS: f64 = 16.0;

    /// Cursor trail
    pub const TRAIL_LIFESPAN_MS: f64 = 100.0;
    pub const TRAIL_CAPACITY: usize = 15;
    pub const TRAIL_MIN_SCALE: f32 = 0.5;
    pub const TRAIL_DOT_SIZE: f32 = 8.0;

    /// Velocity multiplier when reduced motion is requested
    pub const REDUCED_MOTION_SPEED: f32 = 0.25;

    /// Consecutive surface failures before the renderer is dropped
    pub const MAX_SURFACE_FAILURES: u32 = 3;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Triangle wave in [0, 1] with the given period (0 → 1 → 0)
#[inline]
pub fn ping_pong(time_secs: f32, period_secs: f32) -> f32 {
    if period_secs <= 0.0 {
        return 0.0;
    }
    let t = (time_secs / period_secs).rem_euclid(2.0);
    if t <= 1.0 { t } else { 2.0 - t }
}
