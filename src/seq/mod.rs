//! Clocked sequential components.
//!
//! Every component follows the same two-phase discipline:
//! - `set_input` (phase 1) validates and records inputs, then recomputes the
//!   candidate next state combinationally. Observable outputs do not change.
//! - `on_clock` (phase 2) re-derives the candidate from the recorded inputs
//!   and commits it, but only on a rising edge.
//!
//! Components, leaf first:
//! - [`Dff`] - edge-triggered cell
//! - [`LoadableBit`] - cell with a hold/load selector in front
//! - [`Register`] - N loadable bits sharing one load line
//! - [`Ram`] - RAM-8 through RAM-16K, recursively composed
//! - [`ProgramCounter`] - 16-bit register with reset/load/increment logic
//! - [`Clock`] - drives all of the above

pub mod dff;
pub mod bit;
pub mod register;
pub mod ram;
pub mod counter;
pub mod clock;

pub use dff::Dff;
pub use bit::LoadableBit;
pub use register::{Register, Register16};
pub use ram::{MemoryBlock, Ram, Ram8, Ram64, Ram512, Ram4K, Ram16K, Way, Way4, Way8, load_image};
pub use counter::{PcSignals, ProgramCounter};
pub use clock::{Clock, Component, Handle};

use thiserror::Error;

/// Behaviour shared by everything the [`Clock`] drives.
pub trait Sequential {
    /// Re-derive the candidate next state from the most recently recorded
    /// inputs. Never changes observable output.
    fn recompute(&mut self);

    /// Observe a clock level. Stored state changes only on a 0 -> 1
    /// transition; repeated identical levels are no-ops.
    fn on_clock(&mut self, level: bool);
}

/// Errors raised by component inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChipError {
    #[error("{chip}: expected {expected} input bits, got {actual}")]
    InvalidInputShape {
        chip: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("address {address} out of range for a {size}-word memory")]
    AddressOutOfRange { address: usize, size: usize },

    #[error("image of {len} words at {start} does not fit a {size}-word memory")]
    ImageTooLarge { start: usize, len: usize, size: usize },

    #[error("handle does not refer to a component on this clock")]
    UnknownComponent,
}

/// Reject a bit sequence whose length differs from the declared arity.
pub(crate) fn check_shape(chip: &'static str, expected: usize, bits: &[bool]) -> Result<(), ChipError> {
    if bits.len() != expected {
        log::debug!("{}: rejected {}-bit input, expected {}", chip, bits.len(), expected);
        return Err(ChipError::InvalidInputShape {
            chip,
            expected,
            actual: bits.len(),
        });
    }
    Ok(())
}
