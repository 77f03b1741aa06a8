//! Mounted intro sequence
//!
//! Owns the phase record, the schedule, the single armed timer and the
//! completion callback. Dropping it before completion cancels everything and
//! the callback is never invoked.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::stars::{Star, generate_stars};
use super::state::{IntroPhase, IntroState, IntroStep};
use super::timeline::Timeline;
use crate::consts::INTRO_STAR_COUNT;
use crate::error::Result;
use crate::platform::{TimerScheduler, TimerSlot};

pub struct IntroSequencer<T: TimerScheduler> {
    state: IntroState,
    timeline: Timeline<IntroStep>,
    timer: TimerSlot<T>,
    on_complete: Option<Box<dyn FnOnce()>>,
    stars: Vec<Star>,
    elapsed_ms: u32,
}

impl<T: TimerScheduler> IntroSequencer<T> {
    /// Create the sequence and arm the timer for its first step
    pub fn mount(timers: T, seed: u64, on_complete: impl FnOnce() + 'static) -> Result<Self> {
        let timeline = Timeline::new(IntroStep::schedule())?;
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut sequencer = Self {
            state: IntroState::new(),
            timeline,
            timer: TimerSlot::new(timers),
            on_complete: Some(Box::new(on_complete)),
            stars: generate_stars(&mut rng, INTRO_STAR_COUNT),
            elapsed_ms: 0,
        };
        sequencer.rearm();
        log::info!("Intro mounted ({}ms)", sequencer.timeline.total_ms());
        Ok(sequencer)
    }

    /// The armed timer went off; `elapsed_ms` is time since mount
    pub fn on_timer(&mut self, elapsed_ms: u32) -> Vec<IntroStep> {
        self.timer.fired();
        self.advance_to(elapsed_ms)
    }

    /// Apply every step due by `elapsed_ms` and re-arm for the next one
    pub fn advance_to(&mut self, elapsed_ms: u32) -> Vec<IntroStep> {
        self.elapsed_ms = self.elapsed_ms.max(elapsed_ms);
        let steps = self.timeline.advance(self.elapsed_ms);

        let mut completed = false;
        for step in &steps {
            self.state.apply(*step);
            log::debug!("Intro step {:?} -> {:?}", step, self.state.phase());
            if *step == IntroStep::Complete {
                completed = true;
            }
        }
        self.rearm();

        if completed {
            if let Some(on_complete) = self.on_complete.take() {
                log::info!("Intro complete at {}ms", self.elapsed_ms);
                on_complete();
            }
        }
        steps
    }

    /// Tear down early. Pending steps and the armed timer are cancelled.
    pub fn unmount(self) {}

    pub fn state(&self) -> &IntroState {
        &self.state
    }

    pub fn phase(&self) -> IntroPhase {
        self.state.phase()
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn is_done(&self) -> bool {
        self.state.done
    }

    /// Steps remain but no timer is armed to reach them
    pub fn is_stalled(&self) -> bool {
        !self.timeline.is_exhausted() && !self.timer.is_armed()
    }

    fn rearm(&mut self) {
        match self.timeline.next_deadline() {
            Some(deadline) => {
                if !self.timer.arm(deadline.saturating_sub(self.elapsed_ms)) {
                    log::warn!("Intro timer refused at {}ms", self.elapsed_ms);
                }
            }
            None => self.timer.disarm(),
        }
    }
}

impl<T: TimerScheduler> Drop for IntroSequencer<T> {
    fn drop(&mut self) {
        if !self.state.done {
            log::info!("Intro unmounted at {}ms before completion", self.elapsed_ms);
        }
        self.timeline.cancel();
        self.on_complete = None;
        self.timer.disarm();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::consts::*;
    use crate::intro::BoxPhase;
    use crate::platform::testing::SpyTimers;

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let calls = Rc::new(Cell::new(0));
        let calls_cb = calls.clone();
        (calls, move || calls_cb.set(calls_cb.get() + 1))
    }

    /// Drive the sequencer with fake time in 16 ms steps
    fn run_until(seq: &mut IntroSequencer<SpyTimers>, end_ms: u32) {
        let mut t = 0;
        while t <= end_ms {
            seq.advance_to(t);
            t += 16;
        }
        seq.advance_to(end_ms);
    }

    #[test]
    fn test_completes_once_after_full_run() {
        let (calls, cb) = counter();
        let timers = SpyTimers::default();
        let mut seq = IntroSequencer::mount(timers.clone(), 1, cb).unwrap();

        run_until(&mut seq, 6500);
        assert_eq!(calls.get(), 1);
        assert_eq!(seq.phase(), IntroPhase::Done);
        let state = seq.state();
        assert!(state.words.iter().all(|w| *w));
        assert!(state.words_exit);
        assert_eq!(state.box_phase, BoxPhase::Shrinking);
        assert!(state.name_revealed);

        // More time never re-fires
        seq.advance_to(20_000);
        assert_eq!(calls.get(), 1);
        // Nothing left armed
        assert!(timers.log.borrow().live().is_empty());
    }

    #[test]
    fn test_callback_not_before_total_duration() {
        let fired_at = Rc::new(RefCell::new(None));
        let now = Rc::new(Cell::new(0u32));
        let (fired_cb, now_cb) = (fired_at.clone(), now.clone());
        let mut seq = IntroSequencer::mount(SpyTimers::default(), 1, move || {
            *fired_cb.borrow_mut() = Some(now_cb.get());
        })
        .unwrap();

        for t in (0..=7000).step_by(10) {
            now.set(t);
            seq.advance_to(t);
        }
        let fired_at = *fired_at.borrow();
        let fired_at = fired_at.expect("callback fired");
        assert!(fired_at >= INTRO_COMPLETE_MS);
        assert!(fired_at > INTRO_BOX_SHRINK_MS);
    }

    #[test]
    fn test_unmount_early_never_calls_back() {
        let (calls, cb) = counter();
        let timers = SpyTimers::default();
        let mut seq = IntroSequencer::mount(timers.clone(), 1, cb).unwrap();
        run_until(&mut seq, 3000);
        assert_eq!(seq.phase(), IntroPhase::BoxFull);
        assert!(!timers.log.borrow().live().is_empty());

        seq.unmount();
        assert_eq!(calls.get(), 0);
        assert!(timers.log.borrow().live().is_empty());
    }

    #[test]
    fn test_flags_are_monotonic() {
        let (_calls, cb) = counter();
        let mut seq = IntroSequencer::mount(SpyTimers::default(), 3, cb).unwrap();
        let mut previous = seq.state().clone();
        for t in (0..=6500).step_by(7) {
            seq.advance_to(t);
            assert!(seq.state().dominates(&previous), "flag regressed at {t}ms");
            previous = seq.state().clone();
        }
    }

    #[test]
    fn test_single_timer_tracks_next_step() {
        let (_calls, cb) = counter();
        let timers = SpyTimers::default();
        let mut seq = IntroSequencer::mount(timers.clone(), 1, cb).unwrap();
        assert_eq!(timers.log.borrow().live(), vec![(crate::platform::TimerHandle(1), INTRO_WORD1_MS)]);

        seq.on_timer(INTRO_WORD1_MS);
        let log = timers.log.borrow();
        // The fired timer is not cleared again; the next one is relative to now
        assert!(log.cleared.is_empty());
        assert_eq!(log.armed.len(), 2);
        assert_eq!(log.armed[1].1, INTRO_WORD2_MS - INTRO_WORD1_MS);
    }

    #[test]
    fn test_late_timer_catches_up() {
        let (calls, cb) = counter();
        let mut seq = IntroSequencer::mount(SpyTimers::default(), 1, cb).unwrap();
        // Tab was throttled: a single very late wakeup
        let steps = seq.on_timer(9000);
        assert_eq!(steps.len(), IntroStep::schedule().len());
        assert_eq!(steps.last(), Some(&IntroStep::Complete));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_elapsed_never_goes_backwards() {
        let (_calls, cb) = counter();
        let mut seq = IntroSequencer::mount(SpyTimers::default(), 1, cb).unwrap();
        seq.advance_to(2100);
        assert_eq!(seq.phase(), IntroPhase::WordsExiting);
        assert!(seq.advance_to(100).is_empty());
        assert_eq!(seq.phase(), IntroPhase::WordsExiting);
    }

    #[test]
    fn test_refused_timer_is_reported_as_stalled() {
        let (calls, cb) = counter();
        let seq = IntroSequencer::mount(SpyTimers::refusing(), 1, cb).unwrap();
        assert!(seq.is_stalled());
        assert!(!seq.is_done());
        assert_eq!(calls.get(), 0);

        let (_, cb) = counter();
        let live = IntroSequencer::mount(SpyTimers::default(), 1, cb).unwrap();
        assert!(!live.is_stalled());
    }

    #[test]
    fn test_finished_sequence_is_not_stalled() {
        let (calls, cb) = counter();
        let mut seq = IntroSequencer::mount(SpyTimers::default(), 1, cb).unwrap();
        seq.advance_to(INTRO_COMPLETE_MS);
        assert!(seq.is_done());
        assert!(!seq.is_stalled());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_stars_generated_at_mount() {
        let (_calls, cb) = counter();
        let seq = IntroSequencer::mount(SpyTimers::default(), 9, cb).unwrap();
        assert_eq!(seq.stars().len(), INTRO_STAR_COUNT);
    }
}
