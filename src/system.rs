/*!
system.rs - `GameBoy` session: one CPU and the DMG bus it executes against.

The session is the only owner of emulator state. There are no globals, so
several sessions can coexist (e.g. one per test) and a session can move
between threads.

Driving
=======
- `step`        one CPU step (interrupt service, idle slice or instruction).
- `run`         a bounded number of steps.
- `run_cycles`  steps until at least a T-cycle budget has elapsed.

Any `CpuError` is terminal for the session; the caller decides whether to
`reset` or drop it.
*/

use std::path::Path;

use crate::bus::{Bus, BusConfig, Interrupt};
use crate::cartridge::{Cartridge, CartridgeError};
use crate::cpu::{Cpu, CpuConfig, CpuError};

#[derive(Debug)]
pub struct GameBoy {
    cpu: Cpu,
    bus: Bus,
}

impl GameBoy {
    /// Power on with default CPU and bus configuration.
    pub fn new(cartridge: Cartridge) -> Self {
        Self::with_config(cartridge, CpuConfig::default(), BusConfig::default())
    }

    pub fn with_config(cartridge: Cartridge, cpu_config: CpuConfig, bus_config: BusConfig) -> Self {
        log::info!(
            "powering on \"{}\" ({}), strict bus: {}, halt bug: {}",
            cartridge.title(),
            cartridge.mapper_kind(),
            bus_config.strict,
            cpu_config.halt_bug
        );
        Self {
            cpu: Cpu::with_config(cpu_config),
            bus: Bus::with_config(cartridge, bus_config),
        }
    }

    /// Validate a ROM image and power on.
    pub fn from_rom_bytes(data: Vec<u8>) -> Result<Self, CartridgeError> {
        Ok(Self::new(Cartridge::from_bytes(data)?))
    }

    /// Load a ROM image from disk and power on.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        Ok(Self::new(Cartridge::from_file(path)?))
    }

    // -----------------------------
    // Accessors
    // -----------------------------

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    // -----------------------------
    // Execution
    // -----------------------------

    pub fn step(&mut self) -> Result<u32, CpuError> {
        self.cpu.step(&mut self.bus)
    }

    /// Run up to `max_steps` steps; returns the T-cycles elapsed.
    pub fn run(&mut self, max_steps: usize) -> Result<u64, CpuError> {
        self.cpu.run(&mut self.bus, max_steps)
    }

    /// Step until at least `budget` T-cycles have elapsed. The last step may
    /// overshoot the budget; the actual count is returned.
    pub fn run_cycles(&mut self, budget: u64) -> Result<u64, CpuError> {
        let mut elapsed = 0u64;
        while elapsed < budget {
            elapsed += self.step()? as u64;
        }
        Ok(elapsed)
    }

    /// Raise an interrupt request as a peripheral would.
    pub fn request_interrupt(&mut self, irq: Interrupt) {
        self.bus.request_interrupt(irq);
    }

    /// Return CPU and bus to their power-on state; the cartridge stays inserted.
    pub fn reset(&mut self) {
        log::info!("reset");
        self.cpu.reset();
        self.bus.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::build_rom;

    fn session(program: &[u8]) -> GameBoy {
        GameBoy::from_rom_bytes(build_rom(program)).expect("valid ROM")
    }

    #[test]
    fn boots_through_the_entry_point() {
        // Entry point: NOP; JP $0150. Program: LD A,$42.
        let mut gb = session(&[0x3E, 0x42]);
        assert_eq!(gb.cpu().pc(), 0x0100);
        assert_eq!(gb.step().unwrap(), 4);
        assert_eq!(gb.step().unwrap(), 16);
        assert_eq!(gb.cpu().pc(), 0x0150);
        gb.step().unwrap();
        assert_eq!(gb.cpu().state().a, 0x42);
    }

    #[test]
    fn invalid_rom_never_powers_on() {
        let mut rom = build_rom(&[]);
        rom[0x0134] ^= 0x01;
        assert!(matches!(
            GameBoy::from_rom_bytes(rom),
            Err(CartridgeError::Checksum { .. })
        ));
    }

    #[test]
    fn run_cycles_meets_budget() {
        // JR -2 forever.
        let mut gb = session(&[0x18, 0xFE]);
        let elapsed = gb.run_cycles(100).unwrap();
        assert!(elapsed >= 100);
        assert_eq!(gb.cpu().cycles(), elapsed);
        assert_eq!(gb.bus().total_ticks(), elapsed);
    }

    #[test]
    fn requested_interrupt_is_serviced() {
        // EI; NOP; NOP ...
        let mut gb = session(&[0xFB, 0x00, 0x00, 0x00]);
        gb.bus_mut().interrupts_mut().write_enable(Interrupt::Serial.mask());
        gb.run(3).unwrap(); // NOP, JP, EI
        gb.request_interrupt(Interrupt::Serial);
        gb.step().unwrap(); // NOP completes, IME now set
        assert_eq!(gb.step().unwrap(), 20);
        assert_eq!(gb.cpu().pc(), Interrupt::Serial.vector());
    }

    #[test]
    fn reset_returns_to_entry() {
        let mut gb = session(&[0x3E, 0x42]);
        gb.run(3).unwrap();
        gb.reset();
        assert_eq!(gb.cpu().pc(), 0x0100);
        assert_eq!(gb.bus().total_ticks(), 0);
    }

    #[test]
    fn session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<GameBoy>();
    }
}
