//! Positive edge-triggered D flip-flop.

use serde::{Serialize, Deserialize};
use crate::seq::Sequential;

/// Single-bit storage cell.
///
/// `set_input` only records the candidate value; it becomes visible on the
/// next rising clock edge. The clock is not a logical input: it arrives
/// through [`Sequential::on_clock`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dff {
    /// Value latched on the next rising edge
    pending: bool,
    /// Q
    stored: bool,
    /// Clock level seen by the last `on_clock` call
    prev_clock: bool,
}

impl Dff {
    /// Create a cell with everything clear.
    pub const fn new() -> Self {
        Self {
            pending: false,
            stored: false,
            prev_clock: false,
        }
    }

    /// Record the value to latch on the next rising edge.
    #[inline]
    pub fn set_input(&mut self, d: bool) {
        self.pending = d;
    }

    /// Current outputs `(Q, !Q)`.
    #[inline]
    pub const fn output(&self) -> (bool, bool) {
        (self.stored, !self.stored)
    }

    /// Current Q output.
    #[inline]
    pub const fn q(&self) -> bool {
        self.stored
    }
}

impl Sequential for Dff {
    /// The cell has no combinational front end.
    fn recompute(&mut self) {}

    fn on_clock(&mut self, level: bool) {
        if !self.prev_clock && level {
            self.stored = self.pending;
        }
        self.prev_clock = level;
    }
}
