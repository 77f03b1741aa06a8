//! Platform abstraction layer
//!
//! Components never call `requestAnimationFrame` or `setTimeout` directly.
//! They go through the schedulers below, wrapped in owners that cancel on
//! drop, so no frame or timer callback can outlive its component:
//! - `FrameLoop`: display-synced render loop (one outstanding frame at most)
//! - `TimerSlot`: a single armed one-shot timer
//! - `FrameClock`: fixed-step accumulator fed by frame timestamps

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Handle returned by a frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Handle returned by a timer request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(pub i32);

/// Display-synced callback registration (requestAnimationFrame on web)
pub trait FrameScheduler {
    /// Ask for the next frame. `None` means the platform refused.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// One-shot timers (setTimeout on web)
pub trait TimerScheduler {
    fn set_timeout(&mut self, delay_ms: u32) -> Option<TimerHandle>;
    fn clear_timeout(&mut self, handle: TimerHandle);
}

/// Render loop owner. Holds at most one outstanding frame request and
/// cancels it when stopped or dropped.
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
    stopped: bool,
    frames: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            stopped: false,
            frames: 0,
        }
    }

    /// Request the first frame (no-op if already running or stopped)
    pub fn start(&mut self) {
        if !self.stopped && self.pending.is_none() {
            self.pending = self.scheduler.request_frame();
        }
    }

    /// Run one frame body, then schedule the next one.
    ///
    /// Returns `false` without running `body` once the loop is stopped.
    pub fn run_frame(&mut self, body: impl FnOnce()) -> bool {
        if self.stopped {
            return false;
        }
        self.pending = None;
        body();
        self.frames += 1;
        self.pending = self.scheduler.request_frame();
        true
    }

    /// Cancel the outstanding frame. Permanent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.stopped = true;
    }

    pub fn is_running(&self) -> bool {
        !self.stopped && self.pending.is_some()
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A single re-armable one-shot timer. Arming replaces the previous timer.
pub struct TimerSlot<T: TimerScheduler> {
    scheduler: T,
    armed: Option<TimerHandle>,
}

impl<T: TimerScheduler> TimerSlot<T> {
    pub fn new(scheduler: T) -> Self {
        Self {
            scheduler,
            armed: None,
        }
    }

    /// Returns `false` if the platform refused the timer
    pub fn arm(&mut self, delay_ms: u32) -> bool {
        self.disarm();
        self.armed = self.scheduler.set_timeout(delay_ms);
        self.armed.is_some()
    }

    pub fn disarm(&mut self) {
        if let Some(handle) = self.armed.take() {
            self.scheduler.clear_timeout(handle);
        }
    }

    /// Mark the armed timer as fired (its handle is no longer valid)
    pub fn fired(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

impl<T: TimerScheduler> Drop for TimerSlot<T> {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Fixed-step accumulator driven by frame timestamps (ms)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame timestamp, get the number of fixed steps to run.
    /// The first frame always runs exactly one step.
    pub fn advance(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (((time_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => SIM_DT,
        };
        self.last_time = Some(time_ms);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT * 0.999 && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Drop backlog we refused to simulate
        if steps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        self.accumulator = self.accumulator.max(0.0);
        steps
    }

    pub fn reset(&mut self) {
        self.last_time = None;
        self.accumulator = 0.0;
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_frame_loop_requests_after_each_frame() {
        let spy = SpyFrames::default();
        let mut frames = FrameLoop::new(spy.clone());
        frames.start();
        frames.start();
        assert_eq!(spy.requests(), 1);

        let mut ran = 0;
        for _ in 0..3 {
            assert!(frames.run_frame(|| ran += 1));
        }
        assert_eq!(ran, 3);
        assert_eq!(spy.requests(), 4);
        assert_eq!(frames.frames(), 3);
        assert!(frames.is_running());
    }

    #[test]
    fn test_frame_loop_drop_cancels_pending() {
        let spy = SpyFrames::default();
        {
            let mut frames = FrameLoop::new(spy.clone());
            frames.start();
            frames.run_frame(|| {});
        }
        let log = spy.log.borrow();
        assert_eq!(log.cancelled.len(), 1);
        assert_eq!(log.cancelled[0], *log.requested.last().unwrap());
    }

    #[test]
    fn test_stopped_loop_never_runs_or_requests() {
        let spy = SpyFrames::default();
        let mut frames = FrameLoop::new(spy.clone());
        frames.start();
        frames.stop();
        let requests = spy.requests();

        let mut ran = false;
        assert!(!frames.run_frame(|| ran = true));
        frames.start();
        assert!(!ran);
        assert_eq!(spy.requests(), requests);
        assert!(!frames.is_running());
    }

    #[test]
    fn test_timer_slot_rearm_clears_previous() {
        let spy = SpyTimers::default();
        let mut slot = TimerSlot::new(spy.clone());
        slot.arm(100);
        slot.arm(200);
        assert_eq!(spy.log.borrow().live().len(), 1);
        assert_eq!(spy.log.borrow().live()[0].1, 200);

        drop(slot);
        assert!(spy.log.borrow().live().is_empty());
    }

    #[test]
    fn test_timer_slot_reports_refusal() {
        let mut slot = TimerSlot::new(SpyTimers::refusing());
        assert!(!slot.arm(100));
        assert!(!slot.is_armed());
    }

    #[test]
    fn test_timer_slot_fired_is_not_cleared() {
        let spy = SpyTimers::default();
        let mut slot = TimerSlot::new(spy.clone());
        assert!(slot.arm(50));
        slot.fired();
        assert!(!slot.is_armed());
        drop(slot);
        assert!(spy.log.borrow().cleared.is_empty());
    }

    #[test]
    fn test_frame_clock_steps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), 1);
        // One 60 Hz frame later
        assert_eq!(clock.advance(1000.0 + 1000.0 / 60.0), 1);
        // Long stall is capped
        assert_eq!(clock.advance(5000.0), MAX_SUBSTEPS);
        // Clock going backwards never produces steps from negative time
        assert_eq!(clock.advance(4000.0), 0);
    }
}
