/*!
arithmetic.rs - ADD / ADC / SUB / SBC / INC / DEC opcode family handler

Overview
========
8-bit:   ADD A,x  ADC A,x  SUB x  SBC A,x   (x = r, (HL), d8)
         INC r / DEC r / INC (HL) / DEC (HL)
16-bit:  INC rr / DEC rr (no flags), ADD HL,rr, ADD SP,e8

Responsibilities
================
- Fetch the operand through `cpu::addressing`.
- Compute with the pure helpers in `cpu::execute` and apply the result flags
  through the descriptor's `FlagEffect` (INC/DEC leave C alone, ADD HL leaves Z).
- Return the descriptor's cycle count.
*/

use crate::bus::{BusError, CpuBus};
use crate::cpu::addressing::{fetch_byte, load8, read8, resolve8, write8};
use crate::cpu::dispatch::load_store::pair_of;
use crate::cpu::execute::{add8, add16, add_sp_e8, apply_flags, dec8, inc8, sub8};
use crate::cpu::regs::{CpuRegs, Reg16};
use crate::cpu::table::{Instruction, Op};

/// ADD / ADC / SUB / SBC into A.
pub(crate) fn alu<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let v = load8(cpu, bus, instr.src)?;
    let a = cpu.a();
    let carry = cpu.carry();
    let (result, flags) = match instr.op {
        Op::Add => add8(a, v, false),
        Op::Adc => add8(a, v, carry),
        Op::Sub => sub8(a, v, false),
        Op::Sbc => sub8(a, v, carry),
        other => unreachable!("{other:?} routed to arithmetic::alu"),
    };
    cpu.set_a(result);
    apply_flags(cpu, instr.flags, flags);
    Ok(instr.cycles as u32)
}

/// INC / DEC on a register or (HL).
pub(crate) fn inc_dec8<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let place = resolve8(cpu, bus, instr.dst)?;
    let v = read8(cpu, bus, place)?;
    let (result, flags) = if instr.op == Op::Inc8 {
        inc8(v)
    } else {
        dec8(v)
    };
    write8(cpu, bus, place, result)?;
    apply_flags(cpu, instr.flags, flags);
    Ok(instr.cycles as u32)
}

/// INC rr / DEC rr.
pub(crate) fn inc_dec16<C: CpuRegs + ?Sized>(instr: &Instruction, cpu: &mut C) -> u32 {
    let rr = pair_of(instr.dst);
    let v = cpu.pair(rr);
    let result = if instr.op == Op::Inc16 {
        v.wrapping_add(1)
    } else {
        v.wrapping_sub(1)
    };
    cpu.set_pair(rr, result);
    instr.cycles as u32
}

/// ADD HL,rr.
pub(crate) fn add_hl<C: CpuRegs + ?Sized>(instr: &Instruction, cpu: &mut C) -> u32 {
    let rhs = cpu.pair(pair_of(instr.src));
    let (result, flags) = add16(cpu.pair(Reg16::HL), rhs);
    cpu.set_pair(Reg16::HL, result);
    apply_flags(cpu, instr.flags, flags);
    instr.cycles as u32
}

/// ADD SP,e8.
pub(crate) fn add_sp<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let e8 = fetch_byte(cpu, bus)?;
    let (result, flags) = add_sp_e8(cpu.sp(), e8);
    cpu.set_sp(result);
    apply_flags(cpu, instr.flags, flags);
    Ok(instr.cycles as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CpuConfig;
    use crate::cpu::dispatch::step;
    use crate::cpu::state::{CARRY, CpuState, HALF_CARRY, SUBTRACT, ZERO};
    use crate::test_utils::FlatBus;

    fn run(program: &[u8], prepare: impl FnOnce(&mut CpuState, &mut FlatBus)) -> (CpuState, FlatBus) {
        let mut bus = FlatBus::with_program(0xC000, program);
        let mut cpu = CpuState::new();
        cpu.pc = 0xC000;
        prepare(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus, &CpuConfig::default()).unwrap();
        (cpu, bus)
    }

    #[test]
    fn adc_uses_incoming_carry() {
        let (cpu, _) = run(&[0x88], |cpu, _| {
            cpu.a = 0x0E;
            cpu.b = 0x01;
            cpu.set_f(CARRY);
        });
        assert_eq!(cpu.a, 0x10);
        assert_eq!(cpu.f(), HALF_CARRY);
    }

    #[test]
    fn sbc_immediate() {
        let (cpu, _) = run(&[0xDE, 0x01], |cpu, _| {
            cpu.a = 0x02;
            cpu.set_f(CARRY);
        });
        assert_eq!(cpu.a, 0x00);
        assert_eq!(cpu.f(), ZERO | SUBTRACT);
    }

    #[test]
    fn dec_hl_memory() {
        let (cpu, bus) = run(&[0x35], |cpu, bus| {
            cpu.set_pair(Reg16::HL, 0xD000);
            bus.poke(0xD000, 0x01);
            cpu.set_f(CARRY);
        });
        assert_eq!(bus.peek(0xD000), 0x00);
        assert_eq!(cpu.f(), ZERO | SUBTRACT | CARRY);
    }

    #[test]
    fn sixteen_bit_inc_dec_leave_flags() {
        let (cpu, _) = run(&[0x03], |cpu, _| {
            cpu.set_pair(Reg16::BC, 0xFFFF);
            cpu.set_f(0xA0);
        });
        assert_eq!(cpu.pair(Reg16::BC), 0x0000);
        assert_eq!(cpu.f(), 0xA0);

        let (cpu, _) = run(&[0x3B], |cpu, _| cpu.sp = 0x0000);
        assert_eq!(cpu.sp, 0xFFFF);
    }

    #[test]
    fn add_hl_keeps_zero() {
        let (cpu, _) = run(&[0x29], |cpu, _| {
            cpu.set_pair(Reg16::HL, 0x8800);
            cpu.set_f(ZERO);
        });
        assert_eq!(cpu.pair(Reg16::HL), 0x1000);
        assert_eq!(cpu.f(), ZERO | HALF_CARRY | CARRY);
    }

    #[test]
    fn add_sp_negative() {
        let (cpu, _) = run(&[0xE8, 0xFE], |cpu, _| {
            cpu.sp = 0xD000;
            cpu.set_f(ZERO | SUBTRACT);
        });
        assert_eq!(cpu.sp, 0xCFFE);
        assert_eq!(cpu.f(), 0);
    }
}
