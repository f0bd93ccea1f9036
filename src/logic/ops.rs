//! Bitwise operations trait.
//!
//! Defines the gate operations shared by single bits and whole words. The
//! word implementations apply the single-bit gate to every bit position,
//! which is exactly how the N-bit gate variants are wired.

use crate::logic::gates;

/// Trait for types that support bitwise gate operations.
pub trait BitOps {
    /// The output type for operations that return a value of the same width.
    type Output;

    /// Invert every bit.
    fn bit_not(&self) -> Self::Output;

    /// Bitwise AND.
    fn bit_and(&self, other: &Self) -> Self::Output;

    /// Bitwise OR.
    fn bit_or(&self, other: &Self) -> Self::Output;

    /// Bitwise XOR.
    fn bit_xor(&self, other: &Self) -> Self::Output;
}

impl BitOps for bool {
    type Output = bool;

    #[inline]
    fn bit_not(&self) -> bool {
        gates::not(*self)
    }

    #[inline]
    fn bit_and(&self, other: &Self) -> bool {
        gates::and(*self, *other)
    }

    #[inline]
    fn bit_or(&self, other: &Self) -> bool {
        gates::or(*self, *other)
    }

    #[inline]
    fn bit_xor(&self, other: &Self) -> bool {
        gates::xor(*self, *other)
    }
}

// N-bit variants: one single-bit gate per position
macro_rules! impl_bit_ops {
    ($type:ty, $width:expr) => {
        impl BitOps for $type {
            type Output = Self;

            fn bit_not(&self) -> Self {
                let mut result = *self;
                for i in 0..$width {
                    result.set(i, self.get(i).bit_not());
                }
                result
            }

            fn bit_and(&self, other: &Self) -> Self {
                let mut result = *self;
                for i in 0..$width {
                    result.set(i, self.get(i).bit_and(&other.get(i)));
                }
                result
            }

            fn bit_or(&self, other: &Self) -> Self {
                let mut result = *self;
                for i in 0..$width {
                    result.set(i, self.get(i).bit_or(&other.get(i)));
                }
                result
            }

            fn bit_xor(&self, other: &Self) -> Self {
                let mut result = *self;
                for i in 0..$width {
                    result.set(i, self.get(i).bit_xor(&other.get(i)));
                }
                result
            }
        }
    };
}

use crate::logic::{Word16, WORD_WIDTH};
impl_bit_ops!(Word16, WORD_WIDTH);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_ops_truth_table() {
        for a in [false, true] {
            assert_eq!(a.bit_not(), !a);
            for b in [false, true] {
                assert_eq!(a.bit_and(&b), a & b);
                assert_eq!(a.bit_or(&b), a | b);
                assert_eq!(a.bit_xor(&b), a ^ b);
            }
        }
    }

    #[test]
    fn test_word_ops_match_integer_ops() {
        let a = Word16::from_u16(0b1100_1010_0101_0011);
        let b = Word16::from_u16(0b0101_0110_1111_0000);

        assert_eq!(a.bit_not().to_u16(), !a.to_u16());
        assert_eq!(a.bit_and(&b).to_u16(), a.to_u16() & b.to_u16());
        assert_eq!(a.bit_or(&b).to_u16(), a.to_u16() | b.to_u16());
        assert_eq!(a.bit_xor(&b).to_u16(), a.to_u16() ^ b.to_u16());
    }
}
