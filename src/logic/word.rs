//! Fixed-width binary words.
//!
//! The machine stores and moves 16-bit words. Bits are kept in an array
//! ordered from least significant (index 0) to most significant (index 15),
//! which is also the order every gate and register in the crate uses.

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Number of bits in a machine word.
pub const WORD_WIDTH: usize = 16;

/// A 16-bit word.
///
/// Used for:
/// - Register contents
/// - Every RAM cell
/// - The program counter value
///
/// Unsigned range: 0 to 65,535. Two's complement range: -32,768 to +32,767.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Word16 {
    /// Bits stored from least significant (index 0) to most significant (index 15)
    bits: [bool; WORD_WIDTH],
}

impl Word16 {
    /// Number of bits in a Word16.
    pub const WIDTH: usize = WORD_WIDTH;

    /// All bits clear.
    pub const ZERO: Word16 = Word16 { bits: [false; WORD_WIDTH] };

    /// Create a new Word16 with all zeros.
    #[inline]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Create a Word16 from an array of bits (LSB first).
    #[inline]
    pub const fn from_bits(bits: [bool; WORD_WIDTH]) -> Self {
        Self { bits }
    }

    /// Create a Word16 from a bit slice (LSB first).
    ///
    /// Fails if the slice is not exactly 16 bits long.
    pub fn from_slice(bits: &[bool]) -> Result<Self, WordParseError> {
        let bits: [bool; WORD_WIDTH] = bits.try_into().map_err(|_| WordParseError::WrongLength {
            expected: WORD_WIDTH,
            got: bits.len(),
        })?;
        Ok(Self { bits })
    }

    /// Get the underlying bit array.
    #[inline]
    pub const fn bits(&self) -> &[bool; WORD_WIDTH] {
        &self.bits
    }

    /// Get a single bit by index (0 = LSB).
    #[inline]
    pub const fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    /// Set a single bit by index (0 = LSB).
    #[inline]
    pub fn set(&mut self, index: usize, bit: bool) {
        self.bits[index] = bit;
    }

    /// Create from an unsigned integer.
    pub fn from_u16(value: u16) -> Self {
        let mut bits = [false; WORD_WIDTH];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = (value >> i) & 1 == 1;
        }
        Self { bits }
    }

    /// Convert to an unsigned integer.
    pub fn to_u16(&self) -> u16 {
        self.bits
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, &bit)| acc | ((bit as u16) << i))
    }

    /// Create from a two's complement integer.
    #[inline]
    pub fn from_i16(value: i16) -> Self {
        Self::from_u16(value as u16)
    }

    /// Convert to a two's complement integer.
    #[inline]
    pub fn to_i16(&self) -> i16 {
        self.to_u16() as i16
    }

    /// Check if every bit is clear.
    pub fn is_zero(&self) -> bool {
        self.bits.iter().all(|&b| !b)
    }

    /// Check the sign bit (bit 15).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.bits[WORD_WIDTH - 1]
    }

    /// Parse from a string like "0b0000000000101010" (MSB first).
    ///
    /// `_` separators are ignored.
    pub fn parse(s: &str) -> Result<Self, WordParseError> {
        let s = s.trim();
        let s = s.strip_prefix("0b").unwrap_or(s);
        let digits: Vec<char> = s.chars().filter(|&c| c != '_').collect();

        if digits.len() != WORD_WIDTH {
            return Err(WordParseError::WrongLength { expected: WORD_WIDTH, got: digits.len() });
        }

        let mut bits = [false; WORD_WIDTH];
        for (i, c) in digits.into_iter().rev().enumerate() {
            bits[i] = match c {
                '0' => false,
                '1' => true,
                _ => return Err(WordParseError::InvalidChar(c)),
            };
        }

        Ok(Self { bits })
    }
}

impl fmt::Debug for Word16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word16({} = {})", self, self.to_u16())
    }
}

impl fmt::Display for Word16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0b")?;
        for i in (0..WORD_WIDTH).rev() {
            write!(f, "{}", self.bits[i] as u8)?;
        }
        Ok(())
    }
}

impl From<u16> for Word16 {
    fn from(value: u16) -> Self {
        Word16::from_u16(value)
    }
}

impl From<i16> for Word16 {
    fn from(value: i16) -> Self {
        Word16::from_i16(value)
    }
}

impl From<Word16> for u16 {
    fn from(word: Word16) -> Self {
        word.to_u16()
    }
}

impl From<Word16> for i16 {
    fn from(word: Word16) -> Self {
        word.to_i16()
    }
}

/// Errors that can occur when building a word from text or raw bits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordParseError {
    /// The input had the wrong number of bits.
    #[error("expected {expected} bits, got {got}")]
    WrongLength { expected: usize, got: usize },
    /// An invalid character was encountered.
    #[error("invalid bit character: '{0}' (expected 0 or 1)")]
    InvalidChar(char),
}
