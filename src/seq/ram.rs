//! Hierarchical random-access memory.
//!
//! Each level owns `FAN_OUT` blocks of the level below:
//!
//! | Level  | Children        | Address bits |
//! |--------|-----------------|--------------|
//! | RAM8   | 8 x Register16  | 3            |
//! | RAM64  | 8 x RAM8        | 6            |
//! | RAM512 | 8 x RAM64       | 9            |
//! | RAM4K  | 8 x RAM512      | 12           |
//! | RAM16K | 4 x RAM4K       | 14           |
//!
//! Addresses are LSB first. The low bits are passed down unchanged as the
//! child's address; the top `log2(FAN_OUT)` bits pick the child. A write
//! demultiplexes the load line so exactly one child can see `load = 1`,
//! and a read multiplexes the children's outputs.

use std::marker::PhantomData;
use serde::{Deserialize, Deserializer, Serialize};
use crate::logic::gates::{dmux4way, dmux8way, mux4way16, mux8way16};
use crate::logic::{Word16, WORD_WIDTH};
use crate::seq::clock::{Clock, Handle};
use crate::seq::{check_shape, ChipError, Register16, Sequential};

/// A block of 16-bit words addressed by a fixed number of bits.
pub trait MemoryBlock: Sequential + Sized {
    /// Address width in bits.
    const ADDRESS_WIDTH: usize;

    /// Number of words.
    const SIZE: usize = 1 << Self::ADDRESS_WIDTH;

    /// A block with every word zero.
    fn blank() -> Self;

    /// Combinational read. `address` is `ADDRESS_WIDTH` bits, already validated.
    fn read(&self, address: &[bool]) -> Word16;

    /// Record a write request and route it to the children.
    /// `address` is `ADDRESS_WIDTH` bits, already validated.
    fn stage(&mut self, word: Word16, address: &[bool], load: bool);
}

/// A register is the one-word, zero-address-bit block.
impl MemoryBlock for Register16 {
    const ADDRESS_WIDTH: usize = 0;

    fn blank() -> Self {
        Register16::new()
    }

    fn read(&self, _address: &[bool]) -> Word16 {
        self.word()
    }

    fn stage(&mut self, word: Word16, _address: &[bool], load: bool) {
        self.set_word(word, load);
    }
}

/// Fan-out of one memory level: its decoder and output selector.
///
/// Both operate on eight lines; a narrower way leaves the extra lines
/// clear and ignores the extra inputs.
pub trait Way {
    const FAN_OUT: usize;
    const SELECT_BITS: usize;

    /// One-hot load lines for `load`, picked by `selector`.
    fn decode(load: bool, selector: &[bool]) -> [bool; 8];

    /// The child output picked by `selector`.
    fn select(outputs: &[Word16; 8], selector: &[bool]) -> Word16;
}

/// Eight children, three selector bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Way8;

/// Four children, two selector bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Way4;

impl Way for Way8 {
    const FAN_OUT: usize = 8;
    const SELECT_BITS: usize = 3;

    fn decode(load: bool, selector: &[bool]) -> [bool; 8] {
        dmux8way(load, [selector[0], selector[1], selector[2]])
    }

    fn select(outputs: &[Word16; 8], selector: &[bool]) -> Word16 {
        mux8way16(outputs, [selector[0], selector[1], selector[2]])
    }
}

impl Way for Way4 {
    const FAN_OUT: usize = 4;
    const SELECT_BITS: usize = 2;

    fn decode(load: bool, selector: &[bool]) -> [bool; 8] {
        let [a, b, c, d] = dmux4way(load, [selector[0], selector[1]]);
        [a, b, c, d, false, false, false, false]
    }

    fn select(outputs: &[Word16; 8], selector: &[bool]) -> Word16 {
        mux4way16(&[outputs[0], outputs[1], outputs[2], outputs[3]], [selector[0], selector[1]])
    }
}

/// One memory level built from `W::FAN_OUT` children of type `C`.
#[derive(Clone, Serialize)]
pub struct Ram<C, W> {
    children: Vec<C>,
    /// Last recorded write request
    word: Word16,
    address: Vec<bool>,
    load: bool,
    #[serde(skip)]
    way: PhantomData<W>,
}

pub type Ram8 = Ram<Register16, Way8>;
pub type Ram64 = Ram<Ram8, Way8>;
pub type Ram512 = Ram<Ram64, Way8>;
pub type Ram4K = Ram<Ram512, Way8>;
pub type Ram16K = Ram<Ram4K, Way4>;

impl<C: MemoryBlock, W: Way> Ram<C, W> {
    /// Create a block with every word zero.
    pub fn new() -> Self {
        Self {
            children: (0..W::FAN_OUT).map(|_| C::blank()).collect(),
            word: Word16::zero(),
            address: vec![false; <Self as MemoryBlock>::ADDRESS_WIDTH],
            load: false,
            way: PhantomData,
        }
    }

    /// Address width in bits.
    pub fn address_width(&self) -> usize {
        <Self as MemoryBlock>::ADDRESS_WIDTH
    }

    /// Number of words.
    pub fn size(&self) -> usize {
        <Self as MemoryBlock>::SIZE
    }

    /// Record a write request: a 16-bit word, an address, and a load signal.
    ///
    /// Nothing is stored until the next rising edge, and only if `load` is
    /// set. Fails without recording anything if either sequence has the
    /// wrong length.
    pub fn set_input(&mut self, word: &[bool], address: &[bool], load: bool) -> Result<(), ChipError> {
        check_shape("Ram word", WORD_WIDTH, word)?;
        check_shape("Ram address", <Self as MemoryBlock>::ADDRESS_WIDTH, address)?;
        let word = Word16::from_bits(std::array::from_fn(|i| word[i]));
        self.stage(word, address, load);
        Ok(())
    }

    /// Read the word at `address`. Purely combinational.
    pub fn output(&self, address: &[bool]) -> Result<Word16, ChipError> {
        check_shape("Ram address", <Self as MemoryBlock>::ADDRESS_WIDTH, address)?;
        Ok(self.read(address))
    }

    /// Read by integer address.
    pub fn read_word(&self, index: usize) -> Result<Word16, ChipError> {
        let address = self.address_bits(index)?;
        Ok(self.read(&address))
    }

    /// Stage a write by integer address with `load = 1`. The word is stored
    /// by the next rising edge, not by this call.
    pub fn write_word(&mut self, index: usize, word: Word16) -> Result<(), ChipError> {
        self.stage_word(index, word, true)
    }

    /// Stage a request by integer address with an explicit load signal.
    pub fn stage_word(&mut self, index: usize, word: Word16, load: bool) -> Result<(), ChipError> {
        let address = self.address_bits(index)?;
        self.stage(word, &address, load);
        Ok(())
    }

    /// Read a range of words, clipped to the block size.
    pub fn dump(&self, start: usize, count: usize) -> Vec<(usize, Word16)> {
        let end = start.saturating_add(count).min(self.size());
        (start..end)
            .filter_map(|i| self.read_word(i).ok().map(|word| (i, word)))
            .collect()
    }

    /// LSB-first address bits for an integer address.
    fn address_bits(&self, index: usize) -> Result<Vec<bool>, ChipError> {
        if index >= self.size() {
            return Err(ChipError::AddressOutOfRange {
                address: index,
                size: self.size(),
            });
        }
        Ok((0..self.address_width()).map(|i| (index >> i) & 1 == 1).collect())
    }
}

impl<C: MemoryBlock, W: Way> Default for Ram<C, W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire form of a memory level, checked against the level's shape before use.
#[derive(Deserialize)]
struct RamState<C> {
    children: Vec<C>,
    word: Word16,
    address: Vec<bool>,
    load: bool,
}

impl<C: MemoryBlock, W: Way> TryFrom<RamState<C>> for Ram<C, W> {
    type Error = ChipError;

    fn try_from(state: RamState<C>) -> Result<Self, Self::Error> {
        if state.children.len() != W::FAN_OUT {
            return Err(ChipError::InvalidInputShape {
                chip: "Ram children",
                expected: W::FAN_OUT,
                actual: state.children.len(),
            });
        }
        check_shape("Ram address", <Self as MemoryBlock>::ADDRESS_WIDTH, &state.address)?;
        Ok(Self {
            children: state.children,
            word: state.word,
            address: state.address,
            load: state.load,
            way: PhantomData,
        })
    }
}

impl<'de, C, W> Deserialize<'de> for Ram<C, W>
where
    C: MemoryBlock + Deserialize<'de>,
    W: Way,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let state = RamState::<C>::deserialize(deserializer)?;
        Self::try_from(state).map_err(serde::de::Error::custom)
    }
}

impl<C: MemoryBlock, W: Way> MemoryBlock for Ram<C, W> {
    const ADDRESS_WIDTH: usize = C::ADDRESS_WIDTH + W::SELECT_BITS;

    fn blank() -> Self {
        Self::new()
    }

    fn read(&self, address: &[bool]) -> Word16 {
        let (low, selector) = address.split_at(C::ADDRESS_WIDTH);
        let outputs: [Word16; 8] = std::array::from_fn(|i| {
            self.children.get(i).map_or(Word16::ZERO, |child| child.read(low))
        });
        W::select(&outputs, selector)
    }

    fn stage(&mut self, word: Word16, address: &[bool], load: bool) {
        self.word = word;
        self.address.clear();
        self.address.extend_from_slice(address);
        self.load = load;
        self.recompute();
    }
}

impl<C: MemoryBlock, W: Way> Sequential for Ram<C, W> {
    /// Decode the recorded address and hand every child the word, its low
    /// address bits, and its own load line.
    fn recompute(&mut self) {
        let Self { children, word, address, load, .. } = self;
        let (low, selector) = address.split_at(C::ADDRESS_WIDTH);
        let lines = W::decode(*load, selector);
        for (child, &line) in children.iter_mut().zip(lines.iter()) {
            child.stage(*word, low, line);
        }
    }

    fn on_clock(&mut self, level: bool) {
        self.recompute();
        for child in &mut self.children {
            child.on_clock(level);
        }
    }
}

impl<C: MemoryBlock, W: Way> std::fmt::Debug for Ram<C, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ram")
            .field("size", &self.size())
            .field("address_width", &self.address_width())
            .field("word", &self.word)
            .field("load", &self.load)
            .finish()
    }
}

/// Program a memory owned by `clock`, one word per tick, starting at `start`.
///
/// Every word goes through the usual write path and is committed by a
/// rising edge. The load line is released afterwards.
pub fn load_image<C, W>(
    clock: &mut Clock,
    handle: Handle<Ram<C, W>>,
    start: usize,
    words: &[Word16],
) -> Result<(), ChipError>
where
    C: MemoryBlock + 'static,
    W: Way + 'static,
{
    let size = <Ram<C, W> as MemoryBlock>::SIZE;
    if start.saturating_add(words.len()) > size {
        return Err(ChipError::ImageTooLarge { start, len: words.len(), size });
    }
    log::debug!("programming {} words at {} into a {}-word memory", words.len(), start, size);

    for (offset, &word) in words.iter().enumerate() {
        clock
            .get_mut(handle)
            .ok_or(ChipError::UnknownComponent)?
            .write_word(start + offset, word)?;
        clock.tick();
    }

    let end = (start + words.len()).min(size - 1);
    clock
        .get_mut(handle)
        .ok_or(ChipError::UnknownComponent)?
        .stage_word(end, Word16::ZERO, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick<M: Sequential>(mem: &mut M) {
        mem.on_clock(true);
        mem.on_clock(false);
    }

    fn bits(index: usize, width: usize) -> Vec<bool> {
        (0..width).map(|i| (index >> i) & 1 == 1).collect()
    }

    #[test]
    fn test_address_widths() {
        assert_eq!(<Register16 as MemoryBlock>::ADDRESS_WIDTH, 0);
        assert_eq!(<Ram8 as MemoryBlock>::ADDRESS_WIDTH, 3);
        assert_eq!(<Ram64 as MemoryBlock>::ADDRESS_WIDTH, 6);
        assert_eq!(<Ram512 as MemoryBlock>::ADDRESS_WIDTH, 9);
        assert_eq!(<Ram4K as MemoryBlock>::ADDRESS_WIDTH, 12);
        assert_eq!(<Ram16K as MemoryBlock>::ADDRESS_WIDTH, 14);
        assert_eq!(<Ram16K as MemoryBlock>::SIZE, 16384);
    }

    #[test]
    fn test_ram8_write_needs_tick() {
        let mut ram = Ram8::new();
        ram.write_word(5, Word16::from_u16(1234)).unwrap();
        assert!(ram.read_word(5).unwrap().is_zero());

        tick(&mut ram);
        assert_eq!(ram.read_word(5).unwrap().to_u16(), 1234);
    }

    #[test]
    fn test_ram8_only_target_changes() {
        let mut ram = Ram8::new();
        for i in 0..8 {
            ram.write_word(i, Word16::from_u16(i as u16 + 10)).unwrap();
            tick(&mut ram);
        }

        ram.write_word(3, Word16::from_u16(999)).unwrap();
        tick(&mut ram);

        for i in 0..8 {
            let expected = if i == 3 { 999 } else { i as u16 + 10 };
            assert_eq!(ram.read_word(i).unwrap().to_u16(), expected, "address {}", i);
        }
    }

    #[test]
    fn test_no_load_leaves_memory_unchanged() {
        let mut ram = Ram64::new();
        ram.write_word(17, Word16::from_u16(77)).unwrap();
        tick(&mut ram);

        ram.stage_word(17, Word16::from_u16(1), false).unwrap();
        tick(&mut ram);
        assert_eq!(ram.read_word(17).unwrap().to_u16(), 77);
        assert!(ram.dump(0, 64).iter().all(|&(i, w)| i == 17 || w.is_zero()));
    }

    #[test]
    fn test_bit_level_interface() {
        let mut ram = Ram64::new();
        let word = Word16::from_i16(-5);
        ram.set_input(word.bits(), &bits(42, 6), true).unwrap();
        tick(&mut ram);
        assert_eq!(ram.output(&bits(42, 6)).unwrap(), word);
    }

    #[test]
    fn test_shape_errors() {
        let mut ram = Ram512::new();
        assert_eq!(
            ram.set_input(&[false; 16], &[false; 6], true),
            Err(ChipError::InvalidInputShape { chip: "Ram address", expected: 9, actual: 6 })
        );
        assert_eq!(
            ram.set_input(&[false; 12], &[false; 9], true),
            Err(ChipError::InvalidInputShape { chip: "Ram word", expected: 16, actual: 12 })
        );
        assert!(ram.output(&[false; 10]).is_err());
        assert_eq!(
            ram.read_word(512),
            Err(ChipError::AddressOutOfRange { address: 512, size: 512 })
        );
    }

    #[test]
    fn test_rejected_write_keeps_previous_request() {
        let mut ram = Ram8::new();
        ram.write_word(2, Word16::from_u16(8)).unwrap();
        assert!(ram.set_input(&[true; 16], &[true; 2], true).is_err());
        tick(&mut ram);

        assert_eq!(ram.read_word(2).unwrap().to_u16(), 8);
        assert!(ram.read_word(3).unwrap().is_zero());
    }

    #[test]
    fn test_ram4k_boundaries() {
        let mut ram = Ram4K::new();
        for (addr, value) in [(0usize, 11u16), (2049, 22), (4095, 33)] {
            ram.write_word(addr, Word16::from_u16(value)).unwrap();
            tick(&mut ram);
        }
        assert_eq!(ram.read_word(0).unwrap().to_u16(), 11);
        assert_eq!(ram.read_word(2049).unwrap().to_u16(), 22);
        assert_eq!(ram.read_word(4095).unwrap().to_u16(), 33);
        assert!(ram.read_word(2048).unwrap().is_zero());
        assert!(ram.read_word(4094).unwrap().is_zero());
    }

    #[test]
    fn test_dump_is_clipped() {
        let ram = Ram8::new();
        assert_eq!(ram.dump(6, 10).len(), 2);
        assert!(ram.dump(8, 1).is_empty());
    }

    #[test]
    fn test_load_image() {
        let mut clock = Clock::new();
        let ram = clock.subscribe(Ram64::new());
        let image: Vec<Word16> = (1..=5).map(Word16::from_u16).collect();

        load_image(&mut clock, ram, 60, &[Word16::ZERO; 5]).unwrap_err();
        load_image(&mut clock, ram, 10, &image).unwrap();
        assert_eq!(clock.elapsed_ticks(), 5);

        let mem = clock.get(ram).unwrap();
        for (i, word) in image.iter().enumerate() {
            assert_eq!(mem.read_word(10 + i).unwrap(), *word);
        }

        // The load line is released: further ticks change nothing
        clock.run(3);
        let mem = clock.get(ram).unwrap();
        assert!(mem.read_word(15).unwrap().is_zero());
        assert_eq!(mem.read_word(14).unwrap().to_u16(), 5);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut ram = Ram64::new();
        ram.write_word(37, Word16::from_i16(-12)).unwrap();
        tick(&mut ram);
        ram.write_word(3, Word16::from_u16(99)).unwrap();

        let json = serde_json::to_string(&ram).unwrap();
        let mut restored: Ram64 = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.dump(0, 64), ram.dump(0, 64));
        assert!(restored.read_word(3).unwrap().is_zero());

        // The pending request is restored and commits on the next edge
        tick(&mut restored);
        assert_eq!(restored.read_word(3).unwrap().to_u16(), 99);
        assert_eq!(restored.read_word(37).unwrap().to_i16(), -12);
    }

    #[test]
    fn test_snapshot_with_wrong_shape_rejected() {
        let mut value: serde_json::Value = serde_json::to_value(Ram8::new()).unwrap();
        value["address"] = serde_json::json!([false]);
        let err = serde_json::from_value::<Ram8>(value).unwrap_err();
        assert!(err.to_string().contains("Ram address: expected 3 input bits, got 1"), "{}", err);

        let mut value: serde_json::Value = serde_json::to_value(Ram8::new()).unwrap();
        value["children"].as_array_mut().unwrap().truncate(5);
        let err = serde_json::from_value::<Ram8>(value).unwrap_err();
        assert!(err.to_string().contains("Ram children: expected 8 input bits, got 5"), "{}", err);

        // Nested levels are checked as well
        let mut value: serde_json::Value = serde_json::to_value(Ram64::new()).unwrap();
        value["children"][2]["children"][7]["bits"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Ram64>(value).is_err());
    }
}
