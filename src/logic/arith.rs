//! Binary arithmetic built from gates.
//!
//! Provides the half adder, full adder, and the 16-bit ripple-carry adder
//! and incrementer used by the program counter.

use crate::logic::gates::{and, or, xor};
use crate::logic::{Word16, WORD_WIDTH};

/// Half adder: returns (sum, carry).
#[inline]
pub fn half_adder(a: bool, b: bool) -> (bool, bool) {
    (xor(a, b), and(a, b))
}

/// Full adder: adds three bits, returns (sum, carry_out).
#[inline]
pub fn full_adder(a: bool, b: bool, carry_in: bool) -> (bool, bool) {
    let (partial, c1) = half_adder(a, b);
    let (sum, c2) = half_adder(partial, carry_in);
    (sum, or(c1, c2))
}

/// Add two 16-bit words. The final carry is discarded, so the result
/// wraps modulo 2^16.
pub fn add16(a: Word16, b: Word16) -> Word16 {
    let mut result = Word16::zero();
    let mut carry = false;

    for i in 0..WORD_WIDTH {
        let (sum, new_carry) = full_adder(a.get(i), b.get(i), carry);
        result.set(i, sum);
        carry = new_carry;
    }

    result
}

/// Increment a word by one (65535 wraps to 0).
#[inline]
pub fn inc16(a: Word16) -> Word16 {
    add16(a, Word16::from_u16(1))
}
