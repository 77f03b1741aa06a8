//! Field configuration and simulation state
//!
//! The particle set is a pure function of the viewport: every resize throws
//! the old set away and spawns a fresh one sized by area.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::decay::Capacity;
use super::overlay::Constellation;
use super::particle::Particle;
use super::pointer::{PointerState, Throttle};
use crate::consts::*;
use crate::error::Result;
use crate::settings::Settings;

/// Visible area in CSS px plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Backing-store size in device pixels (keeps strokes crisp on HiDPI)
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Canvas backdrop: `"transparent"` or any CSS color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Background {
    Transparent,
    Color(String),
}

impl Default for Background {
    fn default() -> Self {
        Background::Color("black".to_string())
    }
}

impl From<String> for Background {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("transparent") {
            Background::Transparent
        } else {
            Background::Color(trimmed.to_string())
        }
    }
}

impl From<Background> for String {
    fn from(value: Background) -> Self {
        value.css_value().to_string()
    }
}

impl Background {
    pub fn css_value(&self) -> &str {
        match self {
            Background::Transparent => "transparent",
            Background::Color(color) => color,
        }
    }
}

/// Host-facing field configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Paint order of the canvas
    pub z_index: i32,
    pub background: Background,
    /// Fixed polylines drawn over the simulated particles
    pub overlays: Vec<Constellation>,
    pub pointer_interaction: bool,
    pub interaction_radius: f32,
    pub area_per_particle: f32,
    pub capacity: Capacity,
    /// Velocity multiplier applied at spawn
    pub speed_scale: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            z_index: -10,
            background: Background::default(),
            overlays: Vec::new(),
            pointer_interaction: true,
            interaction_radius: INTERACTION_RADIUS,
            area_per_particle: AREA_PER_PARTICLE,
            capacity: Capacity::new(MIN_PARTICLES, MAX_PARTICLES),
            speed_scale: 1.0,
        }
    }
}

impl FieldConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Config reflecting the user's preferences
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            overlays: if settings.constellations {
                Constellation::default_set()
            } else {
                Vec::new()
            },
            pointer_interaction: settings.pointer_interaction,
            capacity: settings.quality.particle_capacity(),
            speed_scale: settings.motion_scale(),
            ..Default::default()
        }
    }
}

/// Complete simulation state for one mounted field
#[derive(Debug, Clone)]
pub struct FieldState {
    pub config: FieldConfig,
    pub viewport: Viewport,
    pub particles: Vec<Particle>,
    pub pointer: PointerState,
    pub throttle: Throttle,
    /// Seconds since mount, advanced per step (drives overlay pulse)
    pub time_secs: f32,
    rng: Pcg32,
}

impl FieldState {
    pub fn new(config: FieldConfig, viewport: Viewport, seed: u64) -> Self {
        let pointer = PointerState::with_radius(config.interaction_radius);
        let mut state = Self {
            config,
            viewport,
            particles: Vec::new(),
            pointer,
            throttle: Throttle::default(),
            time_secs: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.reinitialize();
        state
    }

    /// Particle count for the current viewport
    pub fn target_count(&self) -> usize {
        self.config
            .capacity
            .for_area(self.viewport.area(), self.config.area_per_particle)
    }

    /// Max distance at which two particles are linked
    pub fn connection_threshold(&self) -> f32 {
        super::links::connection_threshold(self.viewport)
    }

    /// New viewport: full reinitialization, no state carried over
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.reinitialize();
    }

    fn reinitialize(&mut self) {
        let count = self.target_count();
        let bounds = self.viewport.size();
        self.particles.clear();
        for _ in 0..count {
            let particle = Particle::spawn(&mut self.rng, bounds, self.config.speed_scale);
            self.particles.push(particle);
        }
        log::debug!(
            "Field reinitialized: {} particles for {}x{}",
            count,
            self.viewport.width,
            self.viewport.height
        );
    }

    /// Pointer moved (throttled to roughly one update per frame)
    pub fn pointer_move(&mut self, x: f32, y: f32, now_ms: f64) -> bool {
        if !self.throttle.accept(now_ms) {
            return false;
        }
        self.pointer.pos = Vec2::new(x, y);
        true
    }

    pub fn pointer_down(&mut self) {
        self.pointer.active = true;
    }

    pub fn pointer_up(&mut self) {
        self.pointer.active = false;
    }
}
