/*!
Mapper subsystem: trait definition and the ROM-only implementation.

Purpose:
- Decouple CPU address mapping in cartridge space from the `Cartridge` so bank
  switching controllers can be added without touching the Bus.
- The Bus forwards $0000..=$7FFF (ROM and controller registers) and
  $A000..=$BFFF (external RAM) through the cartridge to its mapper.

Concrete controllers with banking live in `crate::mappers`.
*/

use std::fmt;

/// Bank controller family declared by the cartridge type byte ($0147).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MapperKind {
    RomOnly,
    Mbc1,
    Mbc5,
}

impl fmt::Display for MapperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MapperKind::RomOnly => "ROM ONLY",
            MapperKind::Mbc1 => "MBC1",
            MapperKind::Mbc5 => "MBC5",
        };
        f.write_str(name)
    }
}

/// Common interface all cartridge mappers must implement.
///
/// Semantics:
/// - All methods take full CPU addresses (unmasked).
/// - `write_rom` returns whether the write hit a controller register. A mapper
///   without registers returns `false` and the Bus decides how to report it.
/// - `read_ram` returns `None` when no RAM is present or RAM is disabled;
///   `write_ram` returns `false` in the same situation.
pub trait Mapper: Send {
    fn kind(&self) -> MapperKind;

    /// CPU-visible read at $0000..=$7FFF.
    fn read_rom(&self, addr: u16) -> u8;

    /// CPU-visible write at $0000..=$7FFF.
    fn write_rom(&mut self, addr: u16, value: u8) -> bool;

    /// CPU-visible read at $A000..=$BFFF.
    fn read_ram(&self, addr: u16) -> Option<u8>;

    /// CPU-visible write at $A000..=$BFFF.
    fn write_ram(&mut self, addr: u16, value: u8) -> bool;

    /// Power-on register state. RAM contents survive.
    fn reset(&mut self) {}
}

/// Plain 32 KiB cartridge, optionally with up to 8 KiB of RAM (types $00, $08, $09).
#[derive(Clone, Debug)]
pub struct RomOnly {
    rom: Vec<u8>,
    ram: Vec<u8>,
}

impl RomOnly {
    pub fn new(rom: Vec<u8>, ram_size: usize) -> Self {
        Self {
            rom,
            ram: vec![0; ram_size],
        }
    }

    /// Returns true if external RAM is present.
    pub fn has_ram(&self) -> bool {
        !self.ram.is_empty()
    }
}

impl Mapper for RomOnly {
    #[inline]
    fn kind(&self) -> MapperKind {
        MapperKind::RomOnly
    }

    fn read_rom(&self, addr: u16) -> u8 {
        self.rom.get(addr as usize).copied().unwrap_or(0xFF)
    }

    fn write_rom(&mut self, _addr: u16, _value: u8) -> bool {
        false
    }

    fn read_ram(&self, addr: u16) -> Option<u8> {
        if self.ram.is_empty() {
            return None;
        }
        let rel = (addr as usize).wrapping_sub(0xA000);
        Some(self.ram[rel % self.ram.len()])
    }

    fn write_ram(&mut self, addr: u16, value: u8) -> bool {
        if self.ram.is_empty() {
            return false;
        }
        let rel = (addr as usize).wrapping_sub(0xA000);
        let len = self.ram.len();
        self.ram[rel % len] = value;
        true
    }
}

/// Offset of `addr` inside a `bank_size` window, selecting `bank` from `data`.
/// Out-of-range banks wrap on the number of banks actually present.
#[inline]
pub(crate) fn banked_index(data_len: usize, bank_size: usize, bank: usize, offset: usize) -> usize {
    let banks = (data_len / bank_size).max(1);
    ((bank % banks) * bank_size + offset) % data_len.max(1)
}
