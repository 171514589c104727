/*!
core::Cpu - Canonical SM83 CPU façade wrapping `CpuState`.

Design
======
- `Cpu` owns the architectural state (`CpuState`) and the runtime options
  (`CpuConfig`). It holds no bus reference: every step borrows a `CpuBus`,
  so the same CPU can be driven against the DMG `Bus` or the flat test bus.
- `step` delegates to the generic dispatcher; `run` repeats it.
- Register access goes through `state()` / `state_mut()` and the `CpuRegs`
  trait rather than a duplicated accessor layer.

Errors
======
`CpuError` is terminal. After an error the state is left exactly as the
faulting step found it (plus any operand bytes already consumed); callers are
expected to stop driving the CPU.
*/

use crate::bus::CpuBus;
use crate::cpu::state::CpuState;
use crate::cpu::{CpuConfig, CpuError, dispatch};

#[derive(Debug, Clone)]
pub struct Cpu {
    state: CpuState,
    config: CpuConfig,
}

impl Cpu {
    /// Construct a CPU with the default configuration (post-boot registers,
    /// halt bug reproduced).
    pub fn new() -> Self {
        Self::with_config(CpuConfig::default())
    }

    pub fn with_config(config: CpuConfig) -> Self {
        Self {
            state: CpuState::with_config(&config),
            config,
        }
    }

    /// Return immutable reference to internal state (for inspection / testing).
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Return mutable reference to internal state.
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    /// Return to the power-on state selected by the configuration.
    pub fn reset(&mut self) {
        self.state = CpuState::with_config(&self.config);
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn cycles(&self) -> u64 {
        self.state.cycles
    }

    pub fn is_halted(&self) -> bool {
        self.state.halted
    }

    pub fn is_stopped(&self) -> bool {
        self.state.stopped
    }

    /// Execute one step (interrupt service, idle slice or one instruction)
    /// and return the T-cycles it took.
    pub fn step<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        dispatch::step(&mut self.state, bus, &self.config)
    }

    /// Run up to `max_steps` steps, stopping at the first error.
    /// Returns the T-cycles elapsed.
    pub fn run<B: CpuBus + ?Sized>(&mut self, bus: &mut B, max_steps: usize) -> Result<u64, CpuError> {
        let mut total = 0u64;
        for _ in 0..max_steps {
            total += self.step(bus)? as u64;
        }
        Ok(total)
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
