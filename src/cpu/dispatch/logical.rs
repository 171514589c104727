/*!
logical.rs - AND / XOR / OR / CP opcode family handler

AND sets H; XOR and OR clear N/H/C; CP is SUB without storing the result.
All forms take r, (HL) or d8 as source.
*/

use crate::bus::{BusError, CpuBus};
use crate::cpu::addressing::load8;
use crate::cpu::execute::{and8, apply_flags, or8, sub8, xor8};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Instruction, Op};

pub(crate) fn alu<C, B>(instr: &Instruction, cpu: &mut C, bus: &mut B) -> Result<u32, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let v = load8(cpu, bus, instr.src)?;
    let a = cpu.a();
    let (result, flags) = match instr.op {
        Op::And => and8(a, v),
        Op::Xor => xor8(a, v),
        Op::Or => or8(a, v),
        Op::Cp => sub8(a, v, false),
        other => unreachable!("{other:?} routed to logical::alu"),
    };
    if instr.op != Op::Cp {
        cpu.set_a(result);
    }
    apply_flags(cpu, instr.flags, flags);
    Ok(instr.cycles as u32)
}
