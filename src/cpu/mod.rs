/*!
cpu::mod - Public façade for the SM83 CPU core.

Module layout:

```text
    state.rs        - Architectural state (registers, flags, control latches).
    regs.rs         - `CpuRegs` trait + `Reg8` / `Reg16` register names.
    table.rs        - Static 256-entry descriptor tables (base + $CB).
    decode.rs       - Opcode fetch (prefix handling, halt bug, illegal opcodes).
    addressing.rs   - Operand resolution into registers / memory / immediates.
    execute.rs      - Pure ALU helpers, flag application, stack helpers.
    dispatch/       - Step orchestrator + per-family instruction handlers.
    interrupts.rs   - Interrupt checkpoint: halt/stop wake, priority service.
    core/           - `Cpu` facade owning `CpuState` and `CpuConfig`.
```

The public surface is the `Cpu` facade. Execution is driven against any
`CpuBus` implementation; `crate::bus::Bus` is the DMG memory map.

Feature flags:
    trace           - Per-instruction `log::trace!` from the step driver.

Usage:
```rust,ignore
use dmgcore::{Bus, Cartridge, Cpu};

let cart = Cartridge::from_file("game.gb")?;
let mut bus = Bus::new(cart);
let mut cpu = Cpu::new();
let cycles = cpu.step(&mut bus)?;
```
*/

use thiserror::Error;

use crate::bus::BusError;

pub mod addressing;
pub mod core;
pub mod decode;
pub mod dispatch;
pub mod execute;
pub mod interrupts;
pub mod regs;
pub mod state;
pub mod table;

// Re-exports:
// - Cpu (facade over CpuState)
// - CpuState (raw state; exposed for tests, snapshots, trait impls)
// - Flag constants (canonical bit masks)
pub use crate::cpu::core::Cpu;
pub use crate::cpu::regs::{CpuRegs, Reg8, Reg16};
pub use crate::cpu::state::{CARRY, CpuState, HALF_CARRY, SUBTRACT, ZERO};
pub use crate::cpu::table::{Cond, FlagEffect, FlagRule, Instruction, Op, Operand};

/// T-cycles consumed by servicing an interrupt.
pub const INTERRUPT_CYCLES: u32 = 20;

/// T-cycles consumed by one idle step while halted or stopped.
pub const IDLE_CYCLES: u32 = 4;

/// Runtime CPU options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuConfig {
    /// Reproduce the HALT bug: HALT with IME clear and an interrupt already
    /// pending does not halt, and the next opcode byte is read twice.
    pub halt_bug: bool,
    /// Start from the register values the boot ROM leaves behind (PC = $0100)
    /// instead of an all-zero state.
    pub post_boot: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            halt_bug: true,
            post_boot: true,
        }
    }
}

/// Terminal execution faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("illegal opcode {opcode:#04x} at {pc:#06x} after {cycles} cycles")]
    IllegalOpcode { opcode: u8, pc: u16, cycles: u64 },

    #[error(transparent)]
    Bus(#[from] BusError),
}
