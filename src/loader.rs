//! Loading overlay model
//!
//! Progress ring shown while the page acquires its GPU surface. Progress is
//! clamped to [0, 1]; hiding the overlay resets it shortly afterwards so the
//! fade-out still shows the final value.

use crate::intro::Timeline;

/// Delay between hiding and resetting progress
pub const LOADER_RESET_MS: u32 = 300;

pub const LOADER_MESSAGES: [&str; 4] = [
    "Initializing development environment...",
    "Compiling components...",
    "Connecting API endpoints...",
    "Finalizing optimization...",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoaderStep {
    ResetProgress,
}

#[derive(Debug, Clone, Default)]
pub struct LoaderOverlay {
    visible: bool,
    progress: f32,
    /// Pending reset, measured from `hidden_at`
    reset: Option<Timeline<LoaderStep>>,
    hidden_at: f64,
}

impl LoaderOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the overlay. A reset still pending from an earlier hide is dropped.
    pub fn show(&mut self) {
        if let Some(reset) = self.reset.as_mut() {
            reset.cancel();
        }
        self.reset = None;
        self.visible = true;
    }

    pub fn hide(&mut self, now_ms: f64) {
        self.visible = false;
        self.hidden_at = now_ms;
        self.reset = Timeline::new(vec![(LOADER_RESET_MS, LoaderStep::ResetProgress)]).ok();
    }

    /// Run the pending reset once it is due
    pub fn tick(&mut self, now_ms: f64) {
        let Some(reset) = self.reset.as_mut() else {
            return;
        };
        let elapsed = (now_ms - self.hidden_at).max(0.0) as u32;
        for step in reset.advance(elapsed) {
            match step {
                LoaderStep::ResetProgress => self.progress = 0.0,
            }
        }
        if reset.is_exhausted() {
            self.reset = None;
        }
    }

    pub fn update_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whole percent, rounded down
    pub fn percent(&self) -> u32 {
        (self.progress * 100.0).floor() as u32
    }

    /// Quarter of the way through, 0..=3
    pub fn phase(&self) -> usize {
        match self.progress {
            p if p < 0.25 => 0,
            p if p < 0.5 => 1,
            p if p < 0.75 => 2,
            _ => 3,
        }
    }

    pub fn message(&self) -> &'static str {
        LOADER_MESSAGES[self.phase()]
    }
}
