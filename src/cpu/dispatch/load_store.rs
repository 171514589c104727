/*!
load_store.rs - Load / store / stack opcode family handler

Overview
========
Implements the SM83 data movement instructions:

8-bit:   LD r,r' / LD r,d8 / LD r,(HL) / LD (HL),r / LD (HL),d8
         LD A,(BC|DE) / LD (BC|DE),A / LD A,(HL±) / LD (HL±),A
         LD A,(a16) / LD (a16),A / LDH A,(a8) / LDH (a8),A / LD A,(C) / LD (C),A
16-bit:  LD rr,d16 / LD (a16),SP / LD SP,HL / LD HL,SP+e8
Stack:   PUSH rr / POP rr (AF included; POP AF discards F's low nibble)

Responsibilities
================
- Resolve operands through `cpu::addressing` in source-then-destination
  order (at most one of them consumes immediate bytes).
- Return the descriptor's cycle count; none of these branch.
*/

use crate::bus::{BusError, CpuBus};
use crate::cpu::addressing::{fetch_byte, fetch_word, load8, load16, store8};
use crate::cpu::execute::{add_sp_e8, apply_flags, pop_word, push_word};
use crate::cpu::regs::{CpuRegs, Reg16};
use crate::cpu::table::{Instruction, Operand};

/// 16-bit register named by an operand.
#[inline]
pub(crate) fn pair_of(operand: Operand) -> Reg16 {
    match operand {
        Operand::R16(rr) => rr,
        other => unreachable!("operand {other:?} is not a register pair"),
    }
}

pub(crate) fn ld8<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let value = load8(cpu, bus, instr.src)?;
    store8(cpu, bus, instr.dst, value)?;
    Ok(instr.cycles as u32)
}

pub(crate) fn ld16<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let value = load16(cpu, bus, instr.src)?;
    match instr.dst {
        // LD (a16),SP
        Operand::A16 => {
            let addr = fetch_word(cpu, bus)?;
            bus.write_word(addr, value)?;
        }
        other => cpu.set_pair(pair_of(other), value),
    }
    Ok(instr.cycles as u32)
}

/// LD HL,SP+e8.
pub(crate) fn ld_hl_sp<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let e8 = fetch_byte(cpu, bus)?;
    let (value, flags) = add_sp_e8(cpu.sp(), e8);
    cpu.set_pair(Reg16::HL, value);
    apply_flags(cpu, instr.flags, flags);
    Ok(instr.cycles as u32)
}

pub(crate) fn push<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let value = cpu.pair(pair_of(instr.src));
    push_word(cpu, bus, value)?;
    Ok(instr.cycles as u32)
}

pub(crate) fn pop<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let value = pop_word(cpu, bus)?;
    cpu.set_pair(pair_of(instr.dst), value);
    Ok(instr.cycles as u32)
}
