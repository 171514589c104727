/*!
decode.rs - Opcode fetch and descriptor lookup.

Reads the opcode at PC and advances PC past it. Two special cases:

- Halt bug armed: PC is *not* advanced for this one fetch, so the byte is
  executed again on the next step. The latch clears here.
- $CB: the following byte is fetched (always advancing PC) and looked up in
  the prefixed table.

Illegal base opcodes surface as `CpuError::IllegalOpcode` carrying the
address of the opcode byte.
*/

use crate::bus::CpuBus;
use crate::cpu::CpuError;
use crate::cpu::state::CpuState;
use crate::cpu::table::{self, Instruction, Op};

/// Fetch and decode the instruction at PC.
pub fn fetch<B: CpuBus + ?Sized>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<&'static Instruction, CpuError> {
    let pc = cpu.pc;
    let opcode = bus.read(pc)?;
    if cpu.halt_bug {
        cpu.halt_bug = false;
    } else {
        cpu.advance_pc(1);
    }

    let instr = table::lookup(opcode);
    match instr.op {
        Op::Prefix => {
            let cb = bus.read(cpu.pc)?;
            cpu.advance_pc(1);
            Ok(table::lookup_cb(cb))
        }
        Op::Illegal => Err(CpuError::IllegalOpcode {
            opcode,
            pc,
            cycles: cpu.cycles,
        }),
        _ => Ok(instr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::regs::Reg8;
    use crate::cpu::table::Operand;
    use crate::test_utils::FlatBus;

    fn cpu_at(pc: u16) -> CpuState {
        let mut cpu = CpuState::new();
        cpu.pc = pc;
        cpu
    }

    #[test]
    fn base_fetch_advances_one() {
        let mut bus = FlatBus::with_program(0xC000, &[0x7C]);
        let mut cpu = cpu_at(0xC000);
        let i = fetch(&mut cpu, &mut bus).unwrap();
        assert_eq!(i.op, Op::Ld8);
        assert_eq!(cpu.pc, 0xC001);
    }

    #[test]
    fn prefixed_fetch_consumes_two() {
        let mut bus = FlatBus::with_program(0xC000, &[0xCB, 0x7C]);
        let mut cpu = cpu_at(0xC000);
        let i = fetch(&mut cpu, &mut bus).unwrap();
        assert!(i.prefixed);
        assert_eq!(i.op, Op::Bit);
        assert_eq!(i.dst, Operand::R8(Reg8::H));
        assert_eq!(cpu.pc, 0xC002);
    }

    #[test]
    fn illegal_reports_opcode_address() {
        let mut bus = FlatBus::with_program(0xC010, &[0xDD]);
        let mut cpu = cpu_at(0xC010);
        cpu.cycles = 100;
        let err = fetch(&mut cpu, &mut bus).unwrap_err();
        assert_eq!(
            err,
            CpuError::IllegalOpcode {
                opcode: 0xDD,
                pc: 0xC010,
                cycles: 100
            }
        );
    }

    #[test]
    fn halt_bug_skips_one_pc_advance() {
        let mut bus = FlatBus::with_program(0xC000, &[0x3C]);
        let mut cpu = cpu_at(0xC000);
        cpu.halt_bug = true;
        fetch(&mut cpu, &mut bus).unwrap();
        assert_eq!(cpu.pc, 0xC000);
        assert!(!cpu.halt_bug);
        fetch(&mut cpu, &mut bus).unwrap();
        assert_eq!(cpu.pc, 0xC001);
    }
}
