/*!
misc.rs - Control / flag opcode family handler

Overview
========
Low-power:   HALT (0x76), STOP (0x10 0x00)
Interrupts:  DI (0xF3), EI (0xFB)
Flags / A:   DAA (0x27), CPL (0x2F), SCF (0x37), CCF (0x3F)

HALT
====
- IME set, or nothing pending: the CPU halts until an enabled source is
  requested (see `cpu::interrupts::check`).
- IME clear with an interrupt already pending: the CPU does not halt. With
  `CpuConfig::halt_bug` the next opcode fetch repeats the byte after HALT;
  without it execution simply continues.

STOP
====
Skips its padding byte and suspends until a joypad request.

EI / DI
=======
EI only schedules IME; `dispatch` promotes it after the following
instruction. DI clears IME and drops any pending schedule.
*/

use crate::bus::CpuBus;
use crate::cpu::CpuConfig;
use crate::cpu::execute::{FlagValues, apply_flags, daa as daa_adjust};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::CpuState;
use crate::cpu::table::{Instruction, Op};

pub(crate) fn stop(instr: &Instruction, cpu: &mut CpuState) -> u32 {
    cpu.advance_pc(1);
    cpu.stopped = true;
    log::debug!("STOP at {:#06x}", cpu.pc.wrapping_sub(2));
    instr.cycles as u32
}

pub(crate) fn halt<B: CpuBus + ?Sized>(
    instr: &Instruction,
    cpu: &mut CpuState,
    bus: &mut B,
    config: &CpuConfig,
) -> u32 {
    if !cpu.ime && bus.pending_interrupts() != 0 {
        if config.halt_bug {
            log::warn!("HALT bug triggered at {:#06x}", cpu.pc.wrapping_sub(1));
            cpu.halt_bug = true;
        }
    } else {
        cpu.halted = true;
    }
    instr.cycles as u32
}

pub(crate) fn di(instr: &Instruction, cpu: &mut CpuState) -> u32 {
    cpu.ime = false;
    cpu.ime_scheduled = false;
    instr.cycles as u32
}

pub(crate) fn ei(instr: &Instruction, cpu: &mut CpuState) -> u32 {
    if !cpu.ime {
        cpu.ime_scheduled = true;
    }
    instr.cycles as u32
}

pub(crate) fn daa<C: CpuRegs + ?Sized>(instr: &Instruction, cpu: &mut C) -> u32 {
    let (result, flags) = daa_adjust(cpu.a(), cpu.subtract(), cpu.half_carry(), cpu.carry());
    cpu.set_a(result);
    apply_flags(cpu, instr.flags, flags);
    instr.cycles as u32
}

pub(crate) fn cpl<C: CpuRegs + ?Sized>(instr: &Instruction, cpu: &mut C) -> u32 {
    let a = cpu.a();
    cpu.set_a(!a);
    apply_flags(cpu, instr.flags, FlagValues::default());
    instr.cycles as u32
}

/// SCF / CCF.
pub(crate) fn carry_flag<C: CpuRegs + ?Sized>(instr: &Instruction, cpu: &mut C) -> u32 {
    let c = instr.op == Op::Scf || !cpu.carry();
    apply_flags(cpu, instr.flags, FlagValues::new(false, false, false, c));
    instr.cycles as u32
}
