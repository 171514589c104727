#![doc = r#"
Bus module: the CPU-facing facade and the concrete DMG memory bus.

Overview
- `CpuBus` is the narrow contract the CPU core depends on: fallible byte reads and
  writes, the pending-interrupt checkpoint, and a single `tick` per step so
  peripherals can consume the elapsed cycles.
- `Bus` is the DMG implementation: cartridge (through its mapper), video RAM,
  work RAM with echo, OAM, I/O registers, high RAM and the interrupt registers.

Modules and responsibilities
- cpu_interface: CPU-visible address decoder (read/write); delegates to devices.
- ram: fixed-size RAM blocks (VRAM, WRAM, OAM, HRAM).
- interrupts: IF/IE registers and the `Interrupt` source enum.
- timer: DIV/TIMA/TMA/TAC and the timer interrupt.
- clock: tick orchestration (cycle counter, timer).

Address map (CPU)
- $0000-$7FFF: Cartridge ROM (mapper-controlled banks; writes reach mapper registers)
- $8000-$9FFF: Video RAM
- $A000-$BFFF: Cartridge RAM (if present and enabled)
- $C000-$DFFF: Work RAM
- $E000-$FDFF: Echo of $C000-$DDFF
- $FE00-$FE9F: OAM
- $FEA0-$FEFF: Prohibited (faults in strict mode)
- $FF00-$FF7F: I/O registers
- $FF80-$FFFE: High RAM
- $FFFF:       Interrupt enable
"#]

use thiserror::Error;

use crate::cartridge::Cartridge;

pub mod clock;
/// CPU-visible memory map (dispatcher for address ranges).
pub mod cpu_interface;
pub mod interrupts;
pub mod ram;
pub mod timer;

#[cfg(test)]
mod tests;

pub use interrupts::{Interrupt, InterruptLines};
pub use ram::{HRAM_SIZE, OAM_SIZE, Ram, VRAM_SIZE, WRAM_SIZE};
pub use timer::Timer;

/// Address resolution failures reported to the CPU core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("unmapped address {addr:#06x}")]
    Unmapped { addr: u16 },

    #[error("write to read-only address {addr:#06x}")]
    ReadOnly { addr: u16 },
}

/// The byte-addressable surface the CPU core executes against.
///
/// Interrupt state is read only at instruction boundaries through
/// `pending_interrupts` and cleared one source at a time through
/// `acknowledge_interrupt`.
pub trait CpuBus {
    fn read(&mut self, addr: u16) -> Result<u8, BusError>;

    fn write(&mut self, addr: u16, value: u8) -> Result<(), BusError>;

    /// Requested AND enabled interrupt sources (low five bits).
    fn pending_interrupts(&self) -> u8;

    /// Requested sources regardless of IE (low five bits of IF).
    fn requested_interrupts(&self) -> u8;

    /// Clear a serviced source.
    fn acknowledge_interrupt(&mut self, irq: Interrupt);

    /// Raise a source; the entry point peripherals use.
    fn request_interrupt(&mut self, irq: Interrupt);

    /// Advance peripherals by `cycles` T-cycles. Called once per CPU step.
    fn tick(&mut self, _cycles: u32) {}

    /// Read a little-endian 16-bit word.
    fn read_word(&mut self, addr: u16) -> Result<u16, BusError> {
        let lo = self.read(addr)?;
        let hi = self.read(addr.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Write a little-endian 16-bit word.
    fn write_word(&mut self, addr: u16, value: u16) -> Result<(), BusError> {
        let [lo, hi] = value.to_le_bytes();
        self.write(addr, lo)?;
        self.write(addr.wrapping_add(1), hi)
    }
}

/// Runtime bus options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusConfig {
    /// Fault on the prohibited region, absent cartridge RAM and ROM-only writes
    /// instead of returning open-bus values / ignoring the write.
    pub strict: bool,
}

pub struct Bus {
    // Cartridge (ROM/RAM and mapper)
    pub(crate) cartridge: Cartridge,

    // On-board memories
    pub(crate) vram: Ram<VRAM_SIZE>,
    pub(crate) wram: Ram<WRAM_SIZE>,
    pub(crate) oam: Ram<OAM_SIZE>,
    pub(crate) hram: Ram<HRAM_SIZE>,

    // I/O register backing store for devices that are not emulated
    pub(crate) io: [u8; 0x80],

    // Devices
    pub(crate) timer: Timer,
    pub(crate) interrupts: InterruptLines,

    pub(crate) config: BusConfig,

    // Timing/cycle tracking
    pub(crate) cpu_cycle: u64,
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("cartridge", &self.cartridge)
            .field("interrupts", &self.interrupts)
            .field("config", &self.config)
            .field("cpu_cycle", &self.cpu_cycle)
            .finish()
    }
}

impl Bus {
    /// Build a bus around a validated cartridge.
    pub fn new(cartridge: Cartridge) -> Self {
        Self::with_config(cartridge, BusConfig::default())
    }

    pub fn with_config(cartridge: Cartridge, config: BusConfig) -> Self {
        Self {
            cartridge,
            vram: Ram::new(),
            wram: Ram::new(),
            oam: Ram::new(),
            hram: Ram::new(),
            io: [0; 0x80],
            timer: Timer::new(),
            interrupts: InterruptLines::new(),
            config,
            cpu_cycle: 0,
        }
    }

    /// Clear RAM, I/O and device state. Cartridge ROM/RAM contents are kept.
    pub fn reset(&mut self) {
        self.vram.reset();
        self.wram.reset();
        self.oam.reset();
        self.hram.reset();
        self.io = [0; 0x80];
        self.timer = Timer::new();
        self.interrupts = InterruptLines::new();
        self.cartridge.reset();
        self.cpu_cycle = 0;
    }

    // -----------------------------
    // Accessors
    // -----------------------------

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    pub fn interrupts(&self) -> &InterruptLines {
        &self.interrupts
    }

    pub fn interrupts_mut(&mut self) -> &mut InterruptLines {
        &mut self.interrupts
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn config(&self) -> BusConfig {
        self.config
    }

    /// Total T-cycles the bus has been ticked.
    pub fn total_ticks(&self) -> u64 {
        self.cpu_cycle
    }

    /// Raise an interrupt source in IF (peripheral side).
    pub fn request_interrupt(&mut self, irq: Interrupt) {
        log::debug!("{irq:?} requested");
        self.interrupts.request(irq);
    }
}

impl CpuBus for Bus {
    #[inline]
    fn read(&mut self, addr: u16) -> Result<u8, BusError> {
        cpu_interface::cpu_read(self, addr)
    }

    #[inline]
    fn write(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        cpu_interface::cpu_write(self, addr, value)
    }

    #[inline]
    fn pending_interrupts(&self) -> u8 {
        self.interrupts.pending()
    }

    #[inline]
    fn requested_interrupts(&self) -> u8 {
        self.interrupts.requested()
    }

    #[inline]
    fn acknowledge_interrupt(&mut self, irq: Interrupt) {
        self.interrupts.acknowledge(irq);
    }

    #[inline]
    fn request_interrupt(&mut self, irq: Interrupt) {
        Bus::request_interrupt(self, irq);
    }

    #[inline]
    fn tick(&mut self, cycles: u32) {
        clock::tick(self, cycles);
    }
}
