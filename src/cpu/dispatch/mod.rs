/*!
dispatch - Orchestrator for a single SM83 CPU step (interrupts / idle / execute)

Overview
========
Coordinates a single CPU step:
1. Runs the interrupt checkpoint (`cpu::interrupts::check`): may leave STOP or
   HALT, and may service an interrupt, which consumes the whole step.
2. While halted or stopped, burns one idle slice (4 T-cycles) without fetching.
3. Otherwise fetches and decodes one instruction (`cpu::decode::fetch`) and
   hands the descriptor to `execute`, an exhaustive `match` over `Op` that
   routes to the family handlers below.
4. Promotes a pending EI to IME once the instruction *after* EI completes.

Family handlers
===============
- load_store   LD (8/16-bit, all addressing modes), LD HL,SP+e8, PUSH, POP
- arithmetic   ADD ADC SUB SBC, INC/DEC (8 & 16), ADD HL,rr, ADD SP,e8
- logical      AND XOR OR CP
- rmw          RLCA RRCA RLA RRA and the $CB space (rotates, shifts, SWAP, BIT, RES, SET)
- control_flow JP JR CALL RET RETI RST (conditional forms report taken/not-taken cost)
- misc         NOP STOP HALT DI EI DAA CPL SCF CCF

Every handler returns the T-cycles the instruction actually took.

Cycle Ticking
=============
`finalize::finish_step` adds the step's cycles to the CPU's running counter
and ticks the bus exactly once. Faulting steps tick nothing.
*/

use crate::bus::CpuBus;
use crate::cpu::state::CpuState;
use crate::cpu::table::{Instruction, Op};
use crate::cpu::{CpuConfig, CpuError, IDLE_CYCLES, decode, interrupts};

pub(crate) mod arithmetic;
pub(crate) mod control_flow;
pub(crate) mod finalize;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;
pub(crate) mod rmw;

/// Execute one CPU step and return the T-cycles consumed.
pub fn step<B: CpuBus + ?Sized>(
    cpu: &mut CpuState,
    bus: &mut B,
    config: &CpuConfig,
) -> Result<u32, CpuError> {
    match run_step(cpu, bus, config) {
        Ok(cycles) => {
            finalize::finish_step(cpu, bus, cycles);
            Ok(cycles)
        }
        Err(err) => {
            log::error!("CPU fault (PC={:#06x}, cycles={}): {err}", cpu.pc, cpu.cycles);
            Err(err)
        }
    }
}

fn run_step<B: CpuBus + ?Sized>(
    cpu: &mut CpuState,
    bus: &mut B,
    config: &CpuConfig,
) -> Result<u32, CpuError> {
    // 1. Interrupt checkpoint
    if let Some(cycles) = interrupts::check(cpu, bus)? {
        return Ok(cycles);
    }

    // 2. Low-power states: no fetch
    if !cpu.is_running() {
        return Ok(IDLE_CYCLES);
    }

    // 3. Fetch / decode / execute
    let enable_after = cpu.ime_scheduled;
    #[cfg(feature = "trace")]
    let pc = cpu.pc;
    let instr = decode::fetch(cpu, bus)?;
    #[cfg(feature = "trace")]
    log::trace!(
        "{pc:04X}  {instr}  A={:02X} F={:02X} BC={:02X}{:02X} DE={:02X}{:02X} HL={:02X}{:02X} SP={:04X}",
        cpu.a,
        cpu.f(),
        cpu.b,
        cpu.c,
        cpu.d,
        cpu.e,
        cpu.h,
        cpu.l,
        cpu.sp
    );
    let cycles = execute(instr, cpu, bus, config)?;

    // 4. Delayed EI: only if nothing (DI) cancelled it meanwhile.
    if enable_after && cpu.ime_scheduled {
        cpu.ime = true;
        cpu.ime_scheduled = false;
    }

    Ok(cycles)
}

/// Apply one decoded instruction. PC already points past the opcode byte(s).
pub fn execute<B: CpuBus + ?Sized>(
    instr: &Instruction,
    cpu: &mut CpuState,
    bus: &mut B,
    config: &CpuConfig,
) -> Result<u32, CpuError> {
    let cycles = match instr.op {
        Op::Ld8 => load_store::ld8(instr, cpu, bus)?,
        Op::Ld16 => load_store::ld16(instr, cpu, bus)?,
        Op::LdHlSp => load_store::ld_hl_sp(instr, cpu, bus)?,
        Op::Push => load_store::push(instr, cpu, bus)?,
        Op::Pop => load_store::pop(instr, cpu, bus)?,

        Op::Add | Op::Adc | Op::Sub | Op::Sbc => arithmetic::alu(instr, cpu, bus)?,
        Op::Inc8 | Op::Dec8 => arithmetic::inc_dec8(instr, cpu, bus)?,
        Op::Inc16 | Op::Dec16 => arithmetic::inc_dec16(instr, cpu),
        Op::AddHl => arithmetic::add_hl(instr, cpu),
        Op::AddSp => arithmetic::add_sp(instr, cpu, bus)?,

        Op::And | Op::Xor | Op::Or | Op::Cp => logical::alu(instr, cpu, bus)?,

        Op::Rlca | Op::Rrca | Op::Rla | Op::Rra => rmw::rotate_a(instr, cpu),
        Op::Rlc | Op::Rrc | Op::Rl | Op::Rr | Op::Sla | Op::Sra | Op::Swap | Op::Srl => {
            rmw::shift(instr, cpu, bus)?
        }
        Op::Bit => rmw::bit(instr, cpu, bus)?,
        Op::Res | Op::Set => rmw::res_set(instr, cpu, bus)?,

        Op::Jp | Op::Jr => control_flow::jump(instr, cpu, bus)?,
        Op::Call => control_flow::call(instr, cpu, bus)?,
        Op::Ret => control_flow::ret(instr, cpu, bus)?,
        Op::Reti => control_flow::reti(instr, cpu, bus)?,
        Op::Rst => control_flow::rst(instr, cpu, bus)?,

        Op::Nop => instr.cycles as u32,
        Op::Stop => misc::stop(instr, cpu),
        Op::Halt => misc::halt(instr, cpu, bus, config),
        Op::Di => misc::di(instr, cpu),
        Op::Ei => misc::ei(instr, cpu),
        Op::Daa => misc::daa(instr, cpu),
        Op::Cpl => misc::cpl(instr, cpu),
        Op::Scf | Op::Ccf => misc::carry_flag(instr, cpu),

        // The decoder never hands these out; reaching here means the
        // descriptor came from somewhere else.
        Op::Prefix | Op::Illegal => {
            return Err(CpuError::IllegalOpcode {
                opcode: instr.opcode,
                pc: cpu.pc.wrapping_sub(instr.len as u16),
                cycles: cpu.cycles,
            });
        }
    };
    Ok(cycles)
}

/// Cycle cost for an instruction whose condition (if any) evaluated to `taken`.
#[inline]
pub(crate) fn cost(instr: &Instruction, taken: bool) -> u32 {
    if taken {
        instr.cycles_taken as u32
    } else {
        instr.cycles as u32
    }
}
