//! MBC5 implementation.
//!
//! Implements:
//! - RAM enable ($0000-$1FFF, low nibble $A)
//! - 9-bit ROM bank: low 8 bits at $2000-$2FFF, bit 8 at $3000-$3FFF.
//!   Unlike MBC1, bank 0 may be mapped at $4000-$7FFF.
//! - 4-bit RAM bank ($4000-$5FFF)
//!
//! Deferred / Simplified:
//! - Rumble motor bit (bit 3 of the RAM bank register on rumble carts) is masked off
use crate::mapper::{Mapper, MapperKind, banked_index};

const ROM_BANK_SIZE: usize = 0x4000;
const RAM_BANK_SIZE: usize = 0x2000;

#[derive(Debug, Clone)]
pub struct Mbc5 {
    rom: Vec<u8>,
    ram: Vec<u8>,
    rumble: bool,

    ram_enabled: bool,
    rom_bank: u16, // 9 bits
    ram_bank: u8,  // 4 bits
}

impl Mbc5 {
    pub fn new(rom: Vec<u8>, ram_size: usize, rumble: bool) -> Self {
        Self {
            rom,
            ram: vec![0; ram_size],
            rumble,
            ram_enabled: false,
            rom_bank: 1,
            ram_bank: 0,
        }
    }

    #[inline]
    pub fn rom_bank(&self) -> u16 {
        self.rom_bank
    }

    fn ram_index(&self, addr: u16) -> Option<usize> {
        if !self.ram_enabled || self.ram.is_empty() {
            return None;
        }
        let offset = (addr as usize).wrapping_sub(0xA000) & (RAM_BANK_SIZE - 1);
        Some(banked_index(
            self.ram.len(),
            RAM_BANK_SIZE.min(self.ram.len()),
            self.ram_bank as usize,
            offset,
        ))
    }
}

impl Mapper for Mbc5 {
    #[inline]
    fn kind(&self) -> MapperKind {
        MapperKind::Mbc5
    }

    fn read_rom(&self, addr: u16) -> u8 {
        if self.rom.is_empty() {
            return 0xFF;
        }
        let (bank, offset) = match addr {
            0x0000..=0x3FFF => (0, addr as usize),
            _ => (
                self.rom_bank as usize,
                (addr as usize) & (ROM_BANK_SIZE - 1),
            ),
        };
        self.rom[banked_index(self.rom.len(), ROM_BANK_SIZE, bank, offset)]
    }

    fn write_rom(&mut self, addr: u16, value: u8) -> bool {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x2FFF => {
                self.rom_bank = (self.rom_bank & 0x100) | value as u16;
                log::debug!("MBC5 ROM bank -> {}", self.rom_bank);
            }
            0x3000..=0x3FFF => {
                self.rom_bank = (self.rom_bank & 0x0FF) | (((value & 0x01) as u16) << 8);
                log::debug!("MBC5 ROM bank -> {}", self.rom_bank);
            }
            0x4000..=0x5FFF => {
                let mask = if self.rumble { 0x07 } else { 0x0F };
                self.ram_bank = value & mask;
                log::debug!("MBC5 RAM bank -> {}", self.ram_bank);
            }
            0x6000..=0x7FFF => {}
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
        self.ram_bank = 0;
    }
}
