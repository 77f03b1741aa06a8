//! Mounted particle field
//!
//! Owns the simulation state and its render loop. The loop holds at most one
//! pending frame request, which `unmount` (or drop) cancels, so a field that
//! is gone never gets another frame callback.

use super::draw::{DrawList, compose};
use super::state::{FieldConfig, FieldState, Viewport};
use super::tick::advance;
use crate::platform::{FrameClock, FrameLoop, FrameScheduler};

pub struct ParticleField<S: FrameScheduler> {
    state: FieldState,
    frames: FrameLoop<S>,
    clock: FrameClock,
    draw: DrawList,
}

impl<S: FrameScheduler> ParticleField<S> {
    /// Size the field to `viewport` and request the first frame
    pub fn mount(config: FieldConfig, viewport: Viewport, seed: u64, scheduler: S) -> Self {
        let state = FieldState::new(config, viewport, seed);
        log::info!(
            "Particle field mounted: {} particles, link threshold {:.1}px",
            state.particles.len(),
            state.connection_threshold()
        );
        let mut frames = FrameLoop::new(scheduler);
        frames.start();
        Self {
            state,
            frames,
            clock: FrameClock::new(),
            draw: DrawList::new(),
        }
    }

    /// Frame callback: simulate up to `time_ms`, compose, request the next
    /// frame. Returns the composed frame, or `None` once unmounted.
    pub fn on_frame(&mut self, time_ms: f64) -> Option<&DrawList> {
        let ran = self.on_frame_with(time_ms, |_, _| {});
        ran.then_some(&self.draw)
    }

    /// Like `on_frame`, but hands the composed frame to `present` before the
    /// next frame is requested. Returns `false` once unmounted.
    pub fn on_frame_with(&mut self, time_ms: f64, present: impl FnOnce(&FieldState, &DrawList)) -> bool {
        self.frames.run_frame(|| {
            let steps = self.clock.advance(time_ms);
            advance(&mut self.state, steps);
            compose(&self.state, &mut self.draw);
            present(&self.state, &self.draw);
        })
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.state.viewport {
            return;
        }
        self.state.resize(viewport);
    }

    /// Returns `false` when the move was throttled
    pub fn pointer_move(&mut self, x: f32, y: f32, now_ms: f64) -> bool {
        self.state.pointer_move(x, y, now_ms)
    }

    pub fn pointer_down(&mut self) {
        self.state.pointer_down();
    }

    pub fn pointer_up(&mut self) {
        self.state.pointer_up();
    }

    /// Cancel the pending frame and release everything
    pub fn unmount(mut self) {
        self.frames.stop();
        log::info!("Particle field unmounted after {} frames", self.frames.frames());
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    pub fn frames(&self) -> u64 {
        self.frames.frames()
    }
}
