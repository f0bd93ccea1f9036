//! Program counter.
//!
//! A 16-bit register whose next value is chosen by fixed priority:
//! 1. `reset` - next = 0
//! 2. `load` - next = the supplied value
//! 3. `increment` - next = current + 1 (mod 2^16)
//! 4. otherwise - hold
//!
//! The priority is wired as a chain of 16-bit selectors, lowest priority
//! innermost, so the outermost selector (reset) wins.

use serde::{Serialize, Deserialize};
use crate::logic::gates::mux16;
use crate::logic::{inc16, Word16, WORD_WIDTH};
use crate::seq::{check_shape, ChipError, Register16, Sequential};

/// Control lines of the program counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcSignals {
    pub load: bool,
    pub increment: bool,
    pub reset: bool,
}

impl PcSignals {
    /// No control line asserted.
    pub const HOLD: PcSignals = PcSignals { load: false, increment: false, reset: false };
    pub const INCREMENT: PcSignals = PcSignals { load: false, increment: true, reset: false };
    pub const LOAD: PcSignals = PcSignals { load: true, increment: false, reset: false };
    pub const RESET: PcSignals = PcSignals { load: false, increment: false, reset: true };
}

/// The program counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramCounter {
    register: Register16,
    /// Value taken when `load` wins
    input: Word16,
    signals: PcSignals,
}

impl ProgramCounter {
    /// Create a counter at zero with every control line clear.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a 16-bit value and the control lines.
    ///
    /// Fails without recording anything if `value` is not 16 bits long.
    pub fn set_input(&mut self, value: &[bool], signals: PcSignals) -> Result<(), ChipError> {
        check_shape("ProgramCounter", WORD_WIDTH, value)?;
        let value = Word16::from_bits(std::array::from_fn(|i| value[i]));
        self.set_word(value, signals);
        Ok(())
    }

    /// Record a word and the control lines.
    pub fn set_word(&mut self, value: Word16, signals: PcSignals) {
        self.input = value;
        self.signals = signals;
        self.recompute();
    }

    /// Current count.
    #[inline]
    pub fn output(&self) -> Word16 {
        self.register.word()
    }

    /// Currently recorded control lines.
    #[inline]
    pub fn signals(&self) -> PcSignals {
        self.signals
    }

    /// The value the next rising edge will commit.
    fn next_value(&self) -> Word16 {
        let current = self.register.word();
        let counted = mux16(current, inc16(current), self.signals.increment);
        let loaded = mux16(counted, self.input, self.signals.load);
        mux16(loaded, Word16::ZERO, self.signals.reset)
    }
}

impl Sequential for ProgramCounter {
    fn recompute(&mut self) {
        // The register always loads; the selector chain decides what
        let next = self.next_value();
        self.register.set_word(next, true);
    }

    fn on_clock(&mut self, level: bool) {
        self.recompute();
        self.register.on_clock(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(pc: &mut ProgramCounter) {
        pc.on_clock(true);
        pc.on_clock(false);
    }

    fn loaded(value: u16) -> ProgramCounter {
        let mut pc = ProgramCounter::new();
        pc.set_word(Word16::from_u16(value), PcSignals::LOAD);
        tick(&mut pc);
        pc
    }

    #[test]
    fn test_starts_at_zero() {
        assert!(ProgramCounter::new().output().is_zero());
    }

    #[test]
    fn test_reset_beats_everything() {
        let mut pc = loaded(500);
        let all = PcSignals { load: true, increment: true, reset: true };
        pc.set_word(Word16::from_u16(77), all);
        assert_eq!(pc.output().to_u16(), 500);

        tick(&mut pc);
        assert!(pc.output().is_zero());
    }

    #[test]
    fn test_load_beats_increment() {
        let mut pc = loaded(500);
        pc.set_word(Word16::from_u16(77), PcSignals { load: true, increment: true, reset: false });
        tick(&mut pc);
        assert_eq!(pc.output().to_u16(), 77);
    }

    #[test]
    fn test_increment_counts_each_tick() {
        let mut pc = loaded(10);
        pc.set_word(Word16::zero(), PcSignals::INCREMENT);
        for expected in 11..=15 {
            tick(&mut pc);
            assert_eq!(pc.output().to_u16(), expected);
        }
    }

    #[test]
    fn test_increment_wraps() {
        let mut pc = loaded(u16::MAX - 1);
        pc.set_word(Word16::zero(), PcSignals::INCREMENT);
        tick(&mut pc);
        assert_eq!(pc.output().to_u16(), u16::MAX);
        tick(&mut pc);
        assert_eq!(pc.output().to_u16(), 0);
    }

    #[test]
    fn test_hold() {
        let mut pc = loaded(321);
        pc.set_word(Word16::from_u16(5), PcSignals::HOLD);
        tick(&mut pc);
        tick(&mut pc);
        assert_eq!(pc.output().to_u16(), 321);
    }

    #[test]
    fn test_repeated_rising_level_counts_once() {
        let mut pc = ProgramCounter::new();
        pc.set_word(Word16::zero(), PcSignals::INCREMENT);
        pc.on_clock(true);
        pc.on_clock(true);
        assert_eq!(pc.output().to_u16(), 1);
    }

    #[test]
    fn test_wrong_width_rejected() {
        let mut pc = loaded(3);
        let err = pc.set_input(&[true; 4], PcSignals::LOAD).unwrap_err();
        assert_eq!(err, ChipError::InvalidInputShape { chip: "ProgramCounter", expected: 16, actual: 4 });
        assert_eq!(pc.signals(), PcSignals::LOAD);
        tick(&mut pc);
        assert_eq!(pc.output().to_u16(), 3);
    }
}
