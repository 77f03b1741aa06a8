//! Intro phase flags and derived phase
//!
//! The record starts all-false at mount and only ever moves forward.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Number of headline words revealed before the box
pub const WORD_COUNT: usize = 3;

/// Container box animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BoxPhase {
    #[default]
    Hidden = 0,
    Growing = 1,
    Full = 2,
    Shrinking = 3,
}

impl BoxPhase {
    /// CSS class applied to the box element
    pub fn css_class(&self) -> &'static str {
        match self {
            BoxPhase::Hidden => "box-hidden",
            BoxPhase::Growing => "box-growing",
            BoxPhase::Full => "box-full",
            BoxPhase::Shrinking => "box-shrinking",
        }
    }
}

/// One scheduled transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroStep {
    RevealWord(usize),
    ExitWords,
    GrowBox,
    FillBox,
    RevealName,
    ShrinkBox,
    Complete,
}

impl IntroStep {
    /// The fixed intro schedule, ms from mount
    pub fn schedule() -> Vec<(u32, IntroStep)> {
        vec![
            (INTRO_WORD1_MS, IntroStep::RevealWord(0)),
            (INTRO_WORD2_MS, IntroStep::RevealWord(1)),
            (INTRO_WORD3_MS, IntroStep::RevealWord(2)),
            (INTRO_WORDS_EXIT_MS, IntroStep::ExitWords),
            (INTRO_BOX_GROW_MS, IntroStep::GrowBox),
            (INTRO_BOX_FULL_MS, IntroStep::FillBox),
            (INTRO_NAME_MS, IntroStep::RevealName),
            (INTRO_BOX_SHRINK_MS, IntroStep::ShrinkBox),
            (INTRO_COMPLETE_MS, IntroStep::Complete),
        ]
    }
}

/// Named state-machine phase, derived from the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntroPhase {
    Idle,
    WordsAppearing,
    WordsExiting,
    BoxGrowing,
    BoxFull,
    NameShown,
    BoxShrinking,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroState {
    pub words: [bool; WORD_COUNT],
    pub words_exit: bool,
    pub box_phase: BoxPhase,
    pub name_revealed: bool,
    pub done: bool,
}

impl IntroState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a transition. Flags only move forward; a stale step is ignored.
    pub fn apply(&mut self, step: IntroStep) {
        match step {
            IntroStep::RevealWord(i) => {
                if let Some(word) = self.words.get_mut(i) {
                    *word = true;
                }
            }
            IntroStep::ExitWords => self.words_exit = true,
            IntroStep::GrowBox => self.box_phase = self.box_phase.max(BoxPhase::Growing),
            IntroStep::FillBox => self.box_phase = self.box_phase.max(BoxPhase::Full),
            IntroStep::RevealName => self.name_revealed = true,
            IntroStep::ShrinkBox => self.box_phase = self.box_phase.max(BoxPhase::Shrinking),
            IntroStep::Complete => self.done = true,
        }
    }

    pub fn phase(&self) -> IntroPhase {
        if self.done {
            IntroPhase::Done
        } else if self.box_phase == BoxPhase::Shrinking {
            IntroPhase::BoxShrinking
        } else if self.name_revealed {
            IntroPhase::NameShown
        } else if self.box_phase == BoxPhase::Full {
            IntroPhase::BoxFull
        } else if self.box_phase == BoxPhase::Growing {
            IntroPhase::BoxGrowing
        } else if self.words_exit {
            IntroPhase::WordsExiting
        } else if self.words.iter().any(|w| *w) {
            IntroPhase::WordsAppearing
        } else {
            IntroPhase::Idle
        }
    }

    /// True when every flag of `earlier` is still set here
    pub fn dominates(&self, earlier: &IntroState) -> bool {
        self.words.iter().zip(earlier.words.iter()).all(|(now, then)| *now || !*then)
            && (self.words_exit || !earlier.words_exit)
            && self.box_phase >= earlier.box_phase
            && (self.name_revealed || !earlier.name_revealed)
            && (self.done || !earlier.done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_walks_every_phase() {
        let mut state = IntroState::new();
        assert_eq!(state.phase(), IntroPhase::Idle);

        let mut phases = vec![state.phase()];
        for (_, step) in IntroStep::schedule() {
            state.apply(step);
            if phases.last() != Some(&state.phase()) {
                phases.push(state.phase());
            }
        }
        assert_eq!(
            phases,
            vec![
                IntroPhase::Idle,
                IntroPhase::WordsAppearing,
                IntroPhase::WordsExiting,
                IntroPhase::BoxGrowing,
                IntroPhase::BoxFull,
                IntroPhase::NameShown,
                IntroPhase::BoxShrinking,
                IntroPhase::Done,
            ]
        );
    }

    #[test]
    fn test_box_phase_never_regresses() {
        let mut state = IntroState::new();
        state.apply(IntroStep::ShrinkBox);
        state.apply(IntroStep::GrowBox);
        state.apply(IntroStep::FillBox);
        assert_eq!(state.box_phase, BoxPhase::Shrinking);
    }

    #[test]
    fn test_out_of_range_word_ignored() {
        let mut state = IntroState::new();
        state.apply(IntroStep::RevealWord(WORD_COUNT));
        assert_eq!(state, IntroState::new());
    }

    #[test]
    fn test_dominates() {
        let mut early = IntroState::new();
        early.apply(IntroStep::RevealWord(0));
        let mut late = early.clone();
        late.apply(IntroStep::GrowBox);
        assert!(late.dominates(&early));
        assert!(!early.dominates(&late));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_step_order_only_moves_forward(order in prop::collection::vec(0usize..9, 0..40)) {
                let schedule = IntroStep::schedule();
                let mut state = IntroState::new();
                for i in order {
                    let before = state.clone();
                    state.apply(schedule[i].1);
                    prop_assert!(state.dominates(&before));
                    prop_assert!(state.phase() >= before.phase());
                }
            }
        }
    }
}
