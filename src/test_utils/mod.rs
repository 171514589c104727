//! Shared test utilities for building minimal DMG ROM images and buses.
//!
//! These helpers de-duplicate cartridge construction across tests in the
//! CPU, Bus, Cartridge and session modules. They support just what the test
//! suite needs.
//!
//! Notes on the header fields written here:
//! - 0x0100..0x0104 = `NOP; JP $0150` (entry point skipping the header)
//! - 0x0134..       = title "TESTROM" (NUL padded)
//! - 0x0147         = cartridge type
//! - 0x0148         = ROM size code (32 KiB << n)
//! - 0x0149         = RAM size code
//! - 0x014D         = header checksum (fixed up)
//! - 0x014E..0x0150 = global checksum, big-endian (fixed up)
//!
//! Test programs are placed at `PROGRAM_START`.

#![allow(dead_code)]

use crate::bus::{Bus, BusConfig, BusError, CpuBus, Interrupt, InterruptLines};
use crate::cartridge::{Cartridge, global_checksum, header_checksum};
use crate::cpu::{Cpu, CpuConfig};

/// Address test programs are loaded at (first byte after the header).
pub const PROGRAM_START: u16 = 0x0150;

const TITLE: &[u8] = b"TESTROM";

/// Build a 32 KiB ROM-only image with `program` at `PROGRAM_START`.
pub fn build_rom(program: &[u8]) -> Vec<u8> {
    build_rom_with(0x00, 0x00, 0x00, program)
}

/// Build an image with explicit cartridge type and size codes. The image is
/// sized to match the ROM size code; both checksums are valid.
pub fn build_rom_with(cart_type: u8, rom_code: u8, ram_code: u8, program: &[u8]) -> Vec<u8> {
    let len = (32 * 1024usize) << rom_code.min(8);
    let mut rom = vec![0u8; len];

    rom[0x0100..0x0104].copy_from_slice(&[0x00, 0xC3, 0x50, 0x01]);
    rom[0x0134..0x0134 + TITLE.len()].copy_from_slice(TITLE);
    rom[0x0147] = cart_type;
    rom[0x0148] = rom_code;
    rom[0x0149] = ram_code;

    let start = PROGRAM_START as usize;
    rom[start..start + program.len()].copy_from_slice(program);

    fix_header_checksum(&mut rom);
    fix_global_checksum(&mut rom);
    rom
}

/// Recompute 0x014D after header bytes were edited.
pub fn fix_header_checksum(rom: &mut [u8]) {
    rom[0x014D] = header_checksum(rom);
    fix_global_checksum(rom);
}

/// Recompute 0x014E..0x0150 after any byte was edited.
pub fn fix_global_checksum(rom: &mut [u8]) {
    let [hi, lo] = global_checksum(rom).to_be_bytes();
    rom[0x014E] = hi;
    rom[0x014F] = lo;
}

/// CPU + DMG bus with `program` loaded and PC at `PROGRAM_START`.
pub fn setup(program: &[u8]) -> (Cpu, Bus) {
    setup_with(program, CpuConfig::default(), BusConfig::default())
}

pub fn setup_with(program: &[u8], cpu_config: CpuConfig, bus_config: BusConfig) -> (Cpu, Bus) {
    let cart = Cartridge::from_bytes(build_rom(program)).expect("test ROM is valid");
    let bus = Bus::with_config(cart, bus_config);
    let mut cpu = Cpu::with_config(cpu_config);
    cpu.state_mut().pc = PROGRAM_START;
    (cpu, bus)
}

/// 64 KiB of plain RAM with the interrupt registers wired up.
///
/// Every address is readable and writable except 0xFF0F (IF) and 0xFFFF (IE),
/// which go to `lines`. `tick` only counts.
pub struct FlatBus {
    mem: Vec<u8>,
    pub lines: InterruptLines,
    pub ticks: u64,
    pub tick_calls: u32,
}

impl FlatBus {
    pub fn new() -> Self {
        Self {
            mem: vec![0; 0x10000],
            lines: InterruptLines::new(),
            ticks: 0,
            tick_calls: 0,
        }
    }

    pub fn with_program(addr: u16, bytes: &[u8]) -> Self {
        let mut bus = Self::new();
        let start = addr as usize;
        bus.mem[start..start + bytes.len()].copy_from_slice(bytes);
        bus
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    pub fn poke(&mut self, addr: u16, value: u8) {
        self.mem[addr as usize] = value;
    }
}

impl Default for FlatBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBus for FlatBus {
    fn read(&mut self, addr: u16) -> Result<u8, BusError> {
        Ok(match addr {
            0xFF0F => self.lines.read_flag(),
            0xFFFF => self.lines.read_enable(),
            _ => self.mem[addr as usize],
        })
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        match addr {
            0xFF0F => self.lines.write_flag(value),
            0xFFFF => self.lines.write_enable(value),
            _ => self.mem[addr as usize] = value,
        }
        Ok(())
    }

    fn pending_interrupts(&self) -> u8 {
        self.lines.pending()
    }

    fn requested_interrupts(&self) -> u8 {
        self.lines.requested()
    }

    fn acknowledge_interrupt(&mut self, irq: Interrupt) {
        self.lines.acknowledge(irq);
    }

    fn request_interrupt(&mut self, irq: Interrupt) {
        self.lines.request(irq);
    }

    fn tick(&mut self, cycles: u32) {
        self.ticks += cycles as u64;
        self.tick_calls += 1;
    }
}
