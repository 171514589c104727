/*!
control_flow.rs - Jump / call / return opcode family handler

Overview
========
JP a16 / JP cc,a16 / JP HL
JR e8  / JR cc,e8
CALL a16 / CALL cc,a16
RET / RET cc / RETI
RST n

Timing
======
Operands are always fetched, taken or not, so PC ends past the whole
instruction. Conditional forms return `cycles_taken` when the condition
holds and `cycles` otherwise (see `dispatch::cost`).

RETI re-enables IME immediately, unlike EI.
*/

use crate::bus::{BusError, CpuBus};
use crate::cpu::addressing::jump_target;
use crate::cpu::dispatch::cost;
use crate::cpu::execute::{pop_word, push_word};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::CpuState;
use crate::cpu::table::{Cond, Instruction};

/// Evaluate an optional branch condition against the current flags.
#[inline]
pub(crate) fn condition_met<C: CpuRegs + ?Sized>(cpu: &C, cond: Option<Cond>) -> bool {
    match cond {
        None => true,
        Some(Cond::Nz) => !cpu.zero(),
        Some(Cond::Z) => cpu.zero(),
        Some(Cond::Nc) => !cpu.carry(),
        Some(Cond::C) => cpu.carry(),
    }
}

/// JP / JR.
pub(crate) fn jump<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let target = jump_target(cpu, bus, instr.src)?;
    let taken = condition_met(cpu, instr.cond);
    if taken {
        cpu.set_pc(target);
    }
    Ok(cost(instr, taken))
}

pub(crate) fn call<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let target = jump_target(cpu, bus, instr.src)?;
    let taken = condition_met(cpu, instr.cond);
    if taken {
        let return_pc = cpu.pc();
        push_word(cpu, bus, return_pc)?;
        cpu.set_pc(target);
    }
    Ok(cost(instr, taken))
}

pub(crate) fn ret<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let taken = condition_met(cpu, instr.cond);
    if taken {
        let pc = pop_word(cpu, bus)?;
        cpu.set_pc(pc);
    }
    Ok(cost(instr, taken))
}

pub(crate) fn reti<B: CpuBus + ?Sized>(
    instr: &Instruction,
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<u32, BusError> {
    let pc = pop_word(cpu, bus)?;
    cpu.pc = pc;
    cpu.ime = true;
    cpu.ime_scheduled = false;
    Ok(instr.cycles as u32)
}

pub(crate) fn rst<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let target = jump_target(cpu, bus, instr.src)?;
    let return_pc = cpu.pc();
    push_word(cpu, bus, return_pc)?;
    cpu.set_pc(target);
    Ok(instr.cycles as u32)
}
