#![doc = r#"
dmgcore library crate.

This crate exposes a Game Boy (DMG) CPU core and the pieces needed to drive it.

Modules:
- bus: `CpuBus` facade plus the DMG memory bus (RAM blocks, I/O, timer, interrupts)
- cartridge: ROM header parsing and validation; constructs a Mapper
- cpu: SM83 CPU core (facade + state + descriptor tables + dispatch + execute modules)
- mapper: Mapper trait and the ROM-only implementation
- mappers: MBC1 and MBC5 bank controllers
- system: `GameBoy` session owning one CPU and its bus

In tests, shared ROM builders and a flat 64 KiB bus are available under `crate::test_utils`.
"#]

// Core emulator modules
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod mapper;
pub mod mappers;
pub mod system;

// Re-export commonly used types at the crate root for convenience.
pub use bus::{Bus, BusConfig, BusError, CpuBus, Interrupt};
pub use cartridge::{Cartridge, CartridgeError};
pub use cpu::{Cpu, CpuConfig, CpuError};
pub use system::GameBoy;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
