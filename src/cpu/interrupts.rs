/*!
interrupts.rs - Interrupt checkpoint run at every step boundary.

Order of checks (before any opcode fetch):
1. STOP is left only when a joypad interrupt has been requested (IF bit 4),
   whether or not it is enabled.
2. HALT is left as soon as any requested-and-enabled source exists, even
   with IME clear (execution then simply resumes after the HALT).
3. With IME set, the lowest pending bit is serviced: PC is pushed, then IME
   is cleared, the IF bit is acknowledged and PC jumps to the vector. This takes
   the whole step (20 T-cycles) and no instruction is fetched.
*/

use crate::bus::{BusError, CpuBus, Interrupt};
use crate::cpu::INTERRUPT_CYCLES;
use crate::cpu::execute::push_word;
use crate::cpu::state::CpuState;

/// Run the checkpoint. Returns `Some(cycles)` if an interrupt was serviced.
pub fn check<B: CpuBus + ?Sized>(cpu: &mut CpuState, bus: &mut B) -> Result<Option<u32>, BusError> {
    if cpu.stopped {
        if bus.requested_interrupts() & Interrupt::Joypad.mask() == 0 {
            return Ok(None);
        }
        log::debug!("joypad request leaves STOP");
        cpu.stopped = false;
    }

    let pending = bus.pending_interrupts();
    let Some(irq) = Interrupt::highest_priority(pending) else {
        return Ok(None);
    };

    if cpu.halted {
        cpu.halted = false;
    }
    if !cpu.ime {
        return Ok(None);
    }

    service(cpu, bus, irq)?;
    Ok(Some(INTERRUPT_CYCLES))
}

/// Enter the service routine for `irq`.
pub fn service<B: CpuBus + ?Sized>(
    cpu: &mut CpuState,
    bus: &mut B,
    irq: Interrupt,
) -> Result<(), BusError> {
    // A latched halt bug (EI; HALT with a request already pending) makes the
    // handler return onto the HALT instead of repeating the next byte.
    let return_pc = if cpu.halt_bug {
        cpu.pc.wrapping_sub(1)
    } else {
        cpu.pc
    };
    push_word(cpu, bus, return_pc)?;
    cpu.ime = false;
    cpu.halt_bug = false;
    bus.acknowledge_interrupt(irq);
    cpu.pc = irq.vector();
    log::debug!(
        "servicing {irq:?} from {return_pc:#06x} -> {:#06x}",
        irq.vector()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FlatBus;

    fn cpu() -> CpuState {
        let mut cpu = CpuState::new();
        cpu.pc = 0xC123;
        cpu.sp = 0xDFFE;
        cpu
    }

    #[test]
    fn nothing_pending_is_a_no_op() {
        let mut cpu = cpu();
        cpu.ime = true;
        let mut bus = FlatBus::new();
        assert_eq!(check(&mut cpu, &mut bus).unwrap(), None);
        assert_eq!(cpu.pc, 0xC123);
    }

    #[test]
    fn services_highest_priority() {
        let mut cpu = cpu();
        cpu.ime = true;
        let mut bus = FlatBus::new();
        bus.lines.write_enable(0x1F);
        bus.request_interrupt(Interrupt::Serial);
        bus.request_interrupt(Interrupt::LcdStat);

        assert_eq!(check(&mut cpu, &mut bus).unwrap(), Some(20));
        assert_eq!(cpu.pc, 0x0048);
        assert!(!cpu.ime);
        assert_eq!(cpu.sp, 0xDFFC);
        assert_eq!(bus.peek(0xDFFD), 0xC1);
        assert_eq!(bus.peek(0xDFFC), 0x23);
        // Only the serviced bit is cleared.
        assert_eq!(bus.lines.requested(), Interrupt::Serial.mask());
    }

    #[test]
    fn halt_wakes_without_ime() {
        let mut cpu = cpu();
        cpu.halted = true;
        let mut bus = FlatBus::new();
        bus.lines.write_enable(Interrupt::Timer.mask());
        bus.request_interrupt(Interrupt::Timer);
        assert_eq!(check(&mut cpu, &mut bus).unwrap(), None);
        assert!(!cpu.halted);
        assert_eq!(cpu.pc, 0xC123);
        assert_eq!(bus.lines.requested(), Interrupt::Timer.mask());
    }

    #[test]
    fn disabled_sources_do_not_wake_halt() {
        let mut cpu = cpu();
        cpu.halted = true;
        let mut bus = FlatBus::new();
        bus.request_interrupt(Interrupt::Timer);
        assert_eq!(check(&mut cpu, &mut bus).unwrap(), None);
        assert!(cpu.halted);
    }

    #[test]
    fn stop_needs_joypad_request() {
        let mut cpu = cpu();
        cpu.stopped = true;
        let mut bus = FlatBus::new();
        bus.lines.write_enable(0x1F);
        bus.request_interrupt(Interrupt::VBlank);
        assert_eq!(check(&mut cpu, &mut bus).unwrap(), None);
        assert!(cpu.stopped);

        bus.request_interrupt(Interrupt::Joypad);
        check(&mut cpu, &mut bus).unwrap();
        assert!(!cpu.stopped);
    }

    #[test]
    fn service_with_latched_halt_bug_returns_onto_halt() {
        let mut cpu = cpu();
        cpu.ime = true;
        cpu.halt_bug = true;
        let mut bus = FlatBus::new();
        bus.lines.write_enable(Interrupt::VBlank.mask());
        bus.request_interrupt(Interrupt::VBlank);
        assert_eq!(check(&mut cpu, &mut bus).unwrap(), Some(20));
        assert!(!cpu.halt_bug);
        assert_eq!(bus.peek(0xDFFC), 0x22);
        assert_eq!(cpu.pc, 0x0040);
    }
}
