//! MBC1 implementation.
//!
//! Implements:
//! - RAM enable ($0000-$1FFF, low nibble $A)
//! - 5-bit ROM bank register ($2000-$3FFF); bank 0 selects 1
//! - 2-bit secondary register ($4000-$5FFF): upper ROM bank bits or RAM bank
//! - Banking mode select ($6000-$7FFF): mode 1 applies the secondary register
//!   to $0000-$3FFF and to the RAM window
//!
//! Deferred / Simplified:
//! - Multicart (MBC1M) wiring
//! - Battery-backed persistence
use crate::mapper::{Mapper, MapperKind, banked_index};

const ROM_BANK_SIZE: usize = 0x4000;
const RAM_BANK_SIZE: usize = 0x2000;

/// MBC1 mapper core state.
#[derive(Debug, Clone)]
pub struct Mbc1 {
    rom: Vec<u8>,
    ram: Vec<u8>,

    ram_enabled: bool,
    rom_bank: u8,  // 5 bits
    secondary: u8, // 2 bits
    advanced_mode: bool,
}

impl Mbc1 {
    pub fn new(rom: Vec<u8>, ram_size: usize) -> Self {
        Self {
            rom,
            ram: vec![0; ram_size],
            ram_enabled: false,
            rom_bank: 1,
            secondary: 0,
            advanced_mode: false,
        }
    }

    /// Bank mapped at $0000-$3FFF.
    #[inline]
    fn low_bank(&self) -> usize {
        if self.advanced_mode {
            (self.secondary as usize) << 5
        } else {
            0
        }
    }

    /// Bank mapped at $4000-$7FFF.
    #[inline]
    pub fn high_bank(&self) -> usize {
        ((self.secondary as usize) << 5) | self.rom_bank as usize
    }

    #[inline]
    fn ram_bank(&self) -> usize {
        if self.advanced_mode {
            self.secondary as usize
        } else {
            0
        }
    }

    fn ram_index(&self, addr: u16) -> Option<usize> {
        if !self.ram_enabled || self.ram.is_empty() {
            return None;
        }
        let offset = (addr as usize).wrapping_sub(0xA000) & (RAM_BANK_SIZE - 1);
        Some(banked_index(
            self.ram.len(),
            RAM_BANK_SIZE.min(self.ram.len()),
            self.ram_bank(),
            offset,
        ))
    }
}

impl Mapper for Mbc1 {
    #[inline]
    fn kind(&self) -> MapperKind {
        MapperKind::Mbc1
    }

    fn read_rom(&self, addr: u16) -> u8 {
        if self.rom.is_empty() {
            return 0xFF;
        }
        let (bank, offset) = match addr {
            0x0000..=0x3FFF => (self.low_bank(), addr as usize),
            _ => (self.high_bank(), (addr as usize) & (ROM_BANK_SIZE - 1)),
        };
        self.rom[banked_index(self.rom.len(), ROM_BANK_SIZE, bank, offset)]
    }

    fn write_rom(&mut self, addr: u16, value: u8) -> bool {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                let bank = value & 0x1F;
                self.rom_bank = if bank == 0 { 1 } else { bank };
                log::debug!("MBC1 ROM bank -> {}", self.high_bank());
            }
            0x4000..=0x5FFF => {
                self.secondary = value & 0x03;
                log::debug!("MBC1 secondary bank -> {}", self.secondary);
            }
            0x6000..=0x7FFF => self.advanced_mode = value & 0x01 != 0,
            _ => return false,
        }
        true
    }

    fn read_ram(&self, addr: u16) -> Option<u8> {
        self.ram_index(addr).map(|i| self.ram[i])
    }

    fn write_ram(&mut self, addr: u16, value: u8) -> bool {
        match self.ram_index(addr) {
            Some(i) => {
                self.ram[i] = value;
                true
            }
            None => false,
        }
    }

    fn reset(&mut self) {
        self.ram_enabled = false;
        self.rom_bank = 1;
        self.secondary = 0;
        self.advanced_mode = false;
    }
}
