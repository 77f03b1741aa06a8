//! Intro sequence
//!
//! A one-shot, non-interactive reveal: three words, a growing box, a name
//! label, then the box shrinks and the host is told exactly once that the
//! intro is finished. Time-driven only; no input is read.

pub mod sequencer;
pub mod stars;
pub mod state;
pub mod timeline;

pub use sequencer::IntroSequencer;
pub use stars::{Star, generate_stars};
pub use state::{BoxPhase, IntroPhase, IntroState, IntroStep, WORD_COUNT};
pub use timeline::Timeline;
