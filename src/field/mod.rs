//! Interactive particle field
//!
//! Drifting particles bounce inside the viewport, link up with nearby
//! neighbors and get pushed away from a pressed pointer. Everything here is
//! deterministic given a seed; the browser only supplies frames, pointer
//! events and a surface to draw on.

pub mod component;
pub mod decay;
pub mod draw;
pub mod grid;
pub mod links;
pub mod overlay;
pub mod particle;
pub mod pointer;
pub mod state;
pub mod tick;
pub mod trail;

pub use component::ParticleField;
pub use decay::{Capacity, Decay};
pub use draw::{DrawCmd, DrawList, Rgba, compose};
pub use links::{Link, connection_threshold, find_links, link_opacity};
pub use overlay::Constellation;
pub use particle::Particle;
pub use pointer::{PointerState, Throttle, TouchCapture};
pub use state::{Background, FieldConfig, FieldState, Viewport};
pub use tick::{advance, tick};
pub use trail::{CursorTrail, TrailDot, TrailPoint};
