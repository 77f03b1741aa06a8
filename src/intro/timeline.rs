//! Ordered one-shot schedule
//!
//! A fixed list of `(delay_ms, action)` pairs consumed by a single cursor.
//! Replaces a pile of independent timers: cancelling is one call, and an
//! entry can never fire twice or out of order.

use crate::error::{FxError, Result};

#[derive(Debug, Clone)]
pub struct Timeline<A> {
    entries: Vec<(u32, A)>,
    /// Index of the next entry to fire
    cursor: usize,
    cancelled: bool,
}

impl<A: Copy> Timeline<A> {
    /// Build a timeline. Delays must be strictly increasing.
    pub fn new(entries: Vec<(u32, A)>) -> Result<Self> {
        for (index, pair) in entries.windows(2).enumerate() {
            if pair[1].0 <= pair[0].0 {
                return Err(FxError::Timeline {
                    index: index + 1,
                    delay_ms: pair[1].0,
                    previous_ms: pair[0].0,
                });
            }
        }
        Ok(Self {
            entries,
            cursor: 0,
            cancelled: false,
        })
    }

    /// Fire every entry due at `elapsed_ms`, in order, each exactly once
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<A> {
        if self.cancelled {
            return Vec::new();
        }
        let due = self.entries[self.cursor..]
            .iter()
            .take_while(|(delay, _)| *delay <= elapsed_ms)
            .count();
        let fired = self.entries[self.cursor..self.cursor + due]
            .iter()
            .map(|(_, action)| *action)
            .collect();
        self.cursor += due;
        fired
    }

    /// Delay of the next pending entry
    pub fn next_deadline(&self) -> Option<u32> {
        if self.cancelled {
            return None;
        }
        self.entries.get(self.cursor).map(|(delay, _)| *delay)
    }

    /// Drop every pending entry
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// All entries fired or cancelled
    pub fn is_exhausted(&self) -> bool {
        self.cancelled || self.cursor >= self.entries.len()
    }

    /// Delay of the last entry (total run length)
    pub fn total_ms(&self) -> u32 {
        self.entries.last().map(|(delay, _)| *delay).unwrap_or(0)
    }
}
