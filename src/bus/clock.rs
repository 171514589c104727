/*!
Clock/timing orchestrator for the Bus.

Purpose
- Centralize the order-of-operations for a batch of elapsed CPU T-cycles:
  * Increment the bus cycle counter
  * Step the timer, which may latch the timer interrupt into IF

Integration
- `Bus` implements `CpuBus::tick` by delegating here. The CPU step driver calls
  `tick` exactly once per step with the cycles that step consumed, so interrupt
  lines raised here become visible at the next instruction boundary.
*/

use crate::bus::Bus;

/// Advance all bus-owned devices by `cycles` T-cycles.
pub fn tick(bus: &mut Bus, cycles: u32) {
    bus.cpu_cycle = bus.cpu_cycle.wrapping_add(cycles as u64);
    bus.timer.tick(cycles, &mut bus.interrupts);
}
