/*!
rmw.rs - Rotate / shift / bit opcode family handler

Overview
========
Accumulator rotates:  RLCA RRCA RLA RRA (Z always cleared)
$CB space:            RLC RRC RL RR SLA SRA SWAP SRL r|(HL)
                      BIT n,r|(HL)   RES n,r|(HL)   SET n,r|(HL)

Responsibilities
================
- Resolve the target once (register or (HL)), read it, compute, write back.
- BIT only reads; RES/SET touch no flags.
- Return the descriptor's cycle count ((HL) forms already carry the memory cost).
*/

use crate::bus::{BusError, CpuBus};
use crate::cpu::addressing::{read8, resolve8, write8};
use crate::cpu::execute::{self, FlagValues, apply_flags};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Instruction, Op, Operand};

#[inline]
fn bit_index(operand: Operand) -> u8 {
    match operand {
        Operand::Bit(n) => n,
        other => unreachable!("operand {other:?} is not a bit index"),
    }
}

fn rotate_or_shift(op: Op, v: u8, carry: bool) -> (u8, FlagValues) {
    match op {
        Op::Rlc | Op::Rlca => execute::rlc(v),
        Op::Rrc | Op::Rrca => execute::rrc(v),
        Op::Rl | Op::Rla => execute::rl(v, carry),
        Op::Rr | Op::Rra => execute::rr(v, carry),
        Op::Sla => execute::sla(v),
        Op::Sra => execute::sra(v),
        Op::Swap => execute::swap(v),
        Op::Srl => execute::srl(v),
        other => unreachable!("{other:?} is not a rotate or shift"),
    }
}

/// RLCA / RRCA / RLA / RRA.
pub(crate) fn rotate_a<C: CpuRegs + ?Sized>(instr: &Instruction, cpu: &mut C) -> u32 {
    let carry = cpu.carry();
    let (result, flags) = rotate_or_shift(instr.op, cpu.a(), carry);
    cpu.set_a(result);
    apply_flags(cpu, instr.flags, flags);
    instr.cycles as u32
}

/// $CB rotates, shifts and SWAP.
pub(crate) fn shift<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let place = resolve8(cpu, bus, instr.dst)?;
    let v = read8(cpu, bus, place)?;
    let carry = cpu.carry();
    let (result, flags) = rotate_or_shift(instr.op, v, carry);
    write8(cpu, bus, place, result)?;
    apply_flags(cpu, instr.flags, flags);
    Ok(instr.cycles as u32)
}

/// BIT n,x.
pub(crate) fn bit<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let place = resolve8(cpu, bus, instr.dst)?;
    let v = read8(cpu, bus, place)?;
    let flags = execute::bit(bit_index(instr.src), v);
    apply_flags(cpu, instr.flags, flags);
    Ok(instr.cycles as u32)
}

/// RES n,x / SET n,x.
pub(crate) fn res_set<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let mask = 1u8 << bit_index(instr.src);
    let place = resolve8(cpu, bus, instr.dst)?;
    let v = read8(cpu, bus, place)?;
    let result = if instr.op == Op::Set { v | mask } else { v & !mask };
    write8(cpu, bus, place, result)?;
    Ok(instr.cycles as u32)
}
