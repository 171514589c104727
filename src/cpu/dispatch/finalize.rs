/*!
finalize.rs - Centralized step finalization.

Overview
========
Every successful step, whatever path produced it (interrupt service, idle
slice while halted/stopped, or an executed instruction), ends here:

  1. The CPU's cumulative cycle counter advances by the step's cycles.
  2. The bus is ticked exactly once with the same count, so peripherals
     (timer) observe elapsed time and may latch interrupt requests that the
     next step's checkpoint will see.

Faulting steps never reach this module: no cycles are accounted and the bus
is not ticked.
*/

use crate::bus::CpuBus;
use crate::cpu::state::CpuState;

/// Account `cycles` on the CPU and tick the bus once.
pub(crate) fn finish_step<B: CpuBus + ?Sized>(cpu: &mut CpuState, bus: &mut B, cycles: u32) {
    cpu.cycles = cpu.cycles.wrapping_add(cycles as u64);
    bus.tick(cycles);
}
