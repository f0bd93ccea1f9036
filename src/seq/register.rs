//! N-bit register.

use serde::{Deserialize, Deserializer, Serialize};
use crate::logic::{Word16, WORD_WIDTH};
use crate::seq::{check_shape, ChipError, LoadableBit, Sequential};

/// N loadable bits sharing one load line.
///
/// All bits see the same load signal and the same clock call, so a write
/// commits atomically on a single rising edge.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Register<const N: usize> {
    /// Bit `i` pairs with input bit `i` (LSB first)
    bits: Vec<LoadableBit>,
}

/// The machine-word register.
pub type Register16 = Register<WORD_WIDTH>;

impl<const N: usize> Register<N> {
    /// Number of bits.
    pub const WIDTH: usize = N;

    /// Create a register holding zero.
    pub fn new() -> Self {
        Self {
            bits: vec![LoadableBit::new(); N],
        }
    }

    /// Record `N` input bits and one load signal.
    ///
    /// Fails without touching any bit if `input` is not `N` bits long.
    pub fn set_input(&mut self, input: &[bool], load: bool) -> Result<(), ChipError> {
        check_shape("Register", N, input)?;
        for (bit, &value) in self.bits.iter_mut().zip(input) {
            bit.set_input(value, load);
        }
        Ok(())
    }

    /// Current contents, LSB first.
    pub fn output(&self) -> Vec<bool> {
        self.bits.iter().map(LoadableBit::output).collect()
    }
}

impl Register<WORD_WIDTH> {
    /// Record a whole word. Infallible: the width is fixed by the type.
    pub fn set_word(&mut self, word: Word16, load: bool) {
        for (i, bit) in self.bits.iter_mut().enumerate() {
            bit.set_input(word.get(i), load);
        }
    }

    /// Current contents as a word.
    pub fn word(&self) -> Word16 {
        Word16::from_bits(std::array::from_fn(|i| {
            self.bits.get(i).map_or(false, LoadableBit::output)
        }))
    }
}

impl<const N: usize> Default for Register<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire form of a register, checked against `N` before use.
#[derive(Deserialize)]
struct RegisterState {
    bits: Vec<LoadableBit>,
}

impl<const N: usize> TryFrom<RegisterState> for Register<N> {
    type Error = ChipError;

    fn try_from(state: RegisterState) -> Result<Self, Self::Error> {
        if state.bits.len() != N {
            return Err(ChipError::InvalidInputShape {
                chip: "Register",
                expected: N,
                actual: state.bits.len(),
            });
        }
        Ok(Self { bits: state.bits })
    }
}

impl<'de, const N: usize> Deserialize<'de> for Register<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let state = RegisterState::deserialize(deserializer)?;
        Self::try_from(state).map_err(serde::de::Error::custom)
    }
}

impl<const N: usize> Sequential for Register<N> {
    fn recompute(&mut self) {
        for bit in &mut self.bits {
            bit.recompute();
        }
    }

    fn on_clock(&mut self, level: bool) {
        for bit in &mut self.bits {
            bit.on_clock(level);
        }
    }
}

impl<const N: usize> std::fmt::Debug for Register<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Register<{}>(", N)?;
        for bit in self.bits.iter().rev() {
            write!(f, "{}", bit.output() as u8)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick<const N: usize>(reg: &mut Register<N>) {
        reg.on_clock(true);
        reg.on_clock(false);
    }

    #[test]
    fn test_load_word() {
        let mut reg = Register16::new();
        reg.set_word(Word16::from_u16(0xBEEF), true);
        assert!(reg.word().is_zero());

        tick(&mut reg);
        assert_eq!(reg.word().to_u16(), 0xBEEF);
    }

    #[test]
    fn test_hold_without_load() {
        let mut reg = Register16::new();
        reg.set_word(Word16::from_u16(7), true);
        tick(&mut reg);

        reg.set_word(Word16::from_u16(9), false);
        tick(&mut reg);
        assert_eq!(reg.word().to_u16(), 7);
    }

    #[test]
    fn test_odd_width() {
        let mut reg = Register::<3>::new();
        reg.set_input(&[true, false, true], true).unwrap();
        tick(&mut reg);
        assert_eq!(reg.output(), vec![true, false, true]);
    }

    #[test]
    fn test_wrong_width_rejected_without_mutation() {
        let mut reg = Register16::new();
        reg.set_word(Word16::from_u16(5), true);

        let err = reg.set_input(&[true; 8], true).unwrap_err();
        assert_eq!(err, ChipError::InvalidInputShape { chip: "Register", expected: 16, actual: 8 });

        // The earlier staged word is still the one that commits
        tick(&mut reg);
        assert_eq!(reg.word().to_u16(), 5);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut reg = Register16::new();
        reg.set_word(Word16::from_i16(-2), true);
        tick(&mut reg);

        let json = serde_json::to_string(&reg).unwrap();
        let restored: Register16 = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, reg);
        assert_eq!(restored.word().to_i16(), -2);
    }

    #[test]
    fn test_snapshot_with_wrong_width_rejected() {
        let err = serde_json::from_str::<Register16>(r#"{"bits":[]}"#).unwrap_err();
        assert!(err.to_string().contains("expected 16 input bits, got 0"), "{}", err);

        let narrow = serde_json::to_string(&Register::<3>::new()).unwrap();
        assert!(serde_json::from_str::<Register16>(&narrow).is_err());
        assert!(serde_json::from_str::<Register<3>>(&narrow).is_ok());
    }
}
