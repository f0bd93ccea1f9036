//! NAND-derived combinational gates.
//!
//! Every gate here is a pure function of its inputs. Only [`nand`] touches
//! Rust's boolean operators; the rest are wired from it. Multi-way selectors
//! take their select lines least significant first, so `sel = [s0, s1, s2]`
//! picks input `s0 + 2*s1 + 4*s2`.

use crate::logic::{BitOps, Word16, WORD_WIDTH};

/// The primitive gate.
#[inline]
pub fn nand(a: bool, b: bool) -> bool {
    !(a && b)
}

#[inline]
pub fn not(a: bool) -> bool {
    nand(a, a)
}

#[inline]
pub fn and(a: bool, b: bool) -> bool {
    not(nand(a, b))
}

#[inline]
pub fn or(a: bool, b: bool) -> bool {
    nand(not(a), not(b))
}

/// Exclusive or: `(a OR b) AND NOT (a AND b)`.
#[inline]
pub fn xor(a: bool, b: bool) -> bool {
    and(or(a, b), nand(a, b))
}

/// Two-way selector: `a` when `sel` is clear, `b` when it is set.
#[inline]
pub fn mux(a: bool, b: bool, sel: bool) -> bool {
    or(and(not(sel), a), and(sel, b))
}

/// Routes `input` to the first output when `sel` is clear, the second when set.
/// The unselected output is always clear.
#[inline]
pub fn dmux(input: bool, sel: bool) -> (bool, bool) {
    (and(not(sel), input), and(sel, input))
}

pub fn not16(a: Word16) -> Word16 {
    a.bit_not()
}

pub fn and16(a: Word16, b: Word16) -> Word16 {
    a.bit_and(&b)
}

pub fn or16(a: Word16, b: Word16) -> Word16 {
    a.bit_or(&b)
}

/// 16-bit two-way selector, one [`mux`] per bit.
pub fn mux16(a: Word16, b: Word16, sel: bool) -> Word16 {
    let mut out = Word16::zero();
    for i in 0..WORD_WIDTH {
        out.set(i, mux(a.get(i), b.get(i), sel));
    }
    out
}

/// OR of eight bits, as a balanced tree.
pub fn or8way(bits: [bool; 8]) -> bool {
    let pairs = [
        or(bits[0], bits[1]),
        or(bits[2], bits[3]),
        or(bits[4], bits[5]),
        or(bits[6], bits[7]),
    ];
    or(or(pairs[0], pairs[1]), or(pairs[2], pairs[3]))
}

/// Selects one of four words.
pub fn mux4way16(inputs: &[Word16; 4], sel: [bool; 2]) -> Word16 {
    let low = mux16(inputs[0], inputs[1], sel[0]);
    let high = mux16(inputs[2], inputs[3], sel[0]);
    mux16(low, high, sel[1])
}

/// Selects one of eight words.
pub fn mux8way16(inputs: &[Word16; 8], sel: [bool; 3]) -> Word16 {
    let low = mux4way16(&[inputs[0], inputs[1], inputs[2], inputs[3]], [sel[0], sel[1]]);
    let high = mux4way16(&[inputs[4], inputs[5], inputs[6], inputs[7]], [sel[0], sel[1]]);
    mux16(low, high, sel[2])
}

/// Routes `input` to one of four outputs. The result is one-hot when
/// `input` is set and all clear otherwise.
pub fn dmux4way(input: bool, sel: [bool; 2]) -> [bool; 4] {
    let (low, high) = dmux(input, sel[1]);
    let (out0, out1) = dmux(low, sel[0]);
    let (out2, out3) = dmux(high, sel[0]);
    [out0, out1, out2, out3]
}

/// Routes `input` to one of eight outputs.
pub fn dmux8way(input: bool, sel: [bool; 3]) -> [bool; 8] {
    let (low, high) = dmux(input, sel[2]);
    let [o0, o1, o2, o3] = dmux4way(low, [sel[0], sel[1]]);
    let [o4, o5, o6, o7] = dmux4way(high, [sel[0], sel[1]]);
    [o0, o1, o2, o3, o4, o5, o6, o7]
}
