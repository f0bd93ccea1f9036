//! # Hack Simulator
//!
//! A clocked model of a 16-bit computer, built bottom-up from NAND.
//!
//! The combinational layer ([`logic`]) is a set of pure gate functions.
//! The sequential layer ([`seq`]) stacks flip-flops into bits, bits into
//! registers, registers into RAM-8 through RAM-16K, and wraps a register
//! with increment/load/reset logic to form the program counter. A
//! [`Clock`] drives all of it with a strict two-phase discipline: inputs
//! are staged at any time, state changes only on a rising edge.

pub mod logic;
pub mod seq;

// Re-export commonly used types
pub use logic::{Word16, WordParseError, BitOps};
pub use seq::{
    ChipError, Clock, Component, Dff, Handle, LoadableBit, MemoryBlock, PcSignals,
    ProgramCounter, Ram, Ram16K, Ram4K, Ram512, Ram64, Ram8, Register, Register16, Sequential,
};
