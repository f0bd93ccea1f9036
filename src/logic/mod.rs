//! Combinational logic primitives.
//!
//! Everything in this module is stateless and settles instantly:
//! - [`Word16`] - A 16-bit word (index 0 = least significant bit)
//! - [`BitOps`] - Bitwise NOT/AND/OR/XOR over bits and words
//! - [`gates`] - NAND-derived gates and their multi-way variants
//! - [`arith`] - Ripple-carry adder and incrementer

mod word;
mod ops;
pub mod gates;
pub mod arith;

pub use word::{Word16, WordParseError, WORD_WIDTH};
pub use ops::BitOps;
pub use arith::{add16, inc16};
