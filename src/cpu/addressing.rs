/*!
addressing.rs - Operand resolution for SM83 descriptors.

Overview
========
Turns an `Operand` from an instruction descriptor into a concrete place:

```text
    Place8::Reg(r)    8-bit register
    Place8::Mem(addr) memory byte at a resolved address
    Place8::Imm(v)    immediate byte already fetched from the stream
```

Resolution fetches any immediate bytes at PC (advancing PC). HL+ and HL-
resolve to the current HL; `load8` / `store8` apply the post-adjust only once
the access has succeeded, so a faulting access leaves HL untouched. Nothing
else in the register file is touched here.

Reading and writing a `Place8` goes through `read8` / `write8`, which makes
read-modify-write handlers (INC (HL), RLC (HL), SET n,(HL)) resolve once and
access twice.
*/

use crate::bus::{BusError, CpuBus};
use crate::cpu::regs::{CpuRegs, Reg8, Reg16};
use crate::cpu::table::Operand;

/// A resolved 8-bit location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place8 {
    Reg(Reg8),
    Mem(u16),
    Imm(u8),
}

/// Read the byte at PC and advance PC.
#[inline]
pub fn fetch_byte<C, B>(cpu: &mut C, bus: &mut B) -> Result<u8, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let v = bus.read(cpu.pc())?;
    cpu.advance_pc(1);
    Ok(v)
}

/// Read a little-endian word at PC and advance PC by 2.
#[inline]
pub fn fetch_word<C, B>(cpu: &mut C, bus: &mut B) -> Result<u16, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let lo = fetch_byte(cpu, bus)?;
    let hi = fetch_byte(cpu, bus)?;
    Ok(u16::from_le_bytes([lo, hi]))
}

/// Resolve an 8-bit operand. HL+/HL- are not adjusted here; see `post_adjust`.
pub fn resolve8<C, B>(cpu: &mut C, bus: &mut B, operand: Operand) -> Result<Place8, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let place = match operand {
        Operand::R8(r) => Place8::Reg(r),
        Operand::D8 => Place8::Imm(fetch_byte(cpu, bus)?),
        Operand::A16 => Place8::Mem(fetch_word(cpu, bus)?),
        Operand::Ind(rr) => Place8::Mem(cpu.pair(rr)),
        Operand::HlInc | Operand::HlDec => Place8::Mem(cpu.pair(Reg16::HL)),
        Operand::HighC => Place8::Mem(0xFF00 | cpu.reg(Reg8::C) as u16),
        Operand::HighD8 => Place8::Mem(0xFF00 | fetch_byte(cpu, bus)? as u16),
        other => unreachable!("operand {other:?} is not an 8-bit location"),
    };
    Ok(place)
}

/// Read the value held at a resolved place.
#[inline]
pub fn read8<C, B>(cpu: &C, bus: &mut B, place: Place8) -> Result<u8, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    match place {
        Place8::Reg(r) => Ok(cpu.reg(r)),
        Place8::Mem(addr) => bus.read(addr),
        Place8::Imm(v) => Ok(v),
    }
}

/// Store into a resolved place. Immediates are not writable.
#[inline]
pub fn write8<C, B>(cpu: &mut C, bus: &mut B, place: Place8, value: u8) -> Result<(), BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    match place {
        Place8::Reg(r) => {
            cpu.set_reg(r, value);
            Ok(())
        }
        Place8::Mem(addr) => bus.write(addr, value),
        Place8::Imm(_) => unreachable!("immediate operand used as a destination"),
    }
}

/// Resolve and read an 8-bit source operand in one go.
#[inline]
pub fn load8<C, B>(cpu: &mut C, bus: &mut B, operand: Operand) -> Result<u8, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let place = resolve8(cpu, bus, operand)?;
    let value = read8(cpu, bus, place)?;
    post_adjust(cpu, operand);
    Ok(value)
}

/// Resolve and write an 8-bit destination operand in one go.
#[inline]
pub fn store8<C, B>(cpu: &mut C, bus: &mut B, operand: Operand, value: u8) -> Result<(), BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let place = resolve8(cpu, bus, operand)?;
    write8(cpu, bus, place, value)?;
    post_adjust(cpu, operand);
    Ok(())
}

/// HL+/HL- adjustment, applied after the access through HL has completed.
#[inline]
pub fn post_adjust<C: CpuRegs + ?Sized>(cpu: &mut C, operand: Operand) {
    let hl = cpu.pair(Reg16::HL);
    match operand {
        Operand::HlInc => cpu.set_pair(Reg16::HL, hl.wrapping_add(1)),
        Operand::HlDec => cpu.set_pair(Reg16::HL, hl.wrapping_sub(1)),
        _ => {}
    }
}

/// Read a 16-bit source operand (register pair or immediate word).
pub fn load16<C, B>(cpu: &mut C, bus: &mut B, operand: Operand) -> Result<u16, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    match operand {
        Operand::R16(rr) => Ok(cpu.pair(rr)),
        Operand::D16 => fetch_word(cpu, bus),
        other => unreachable!("operand {other:?} is not a 16-bit source"),
    }
}

/// Target of a jump: absolute word, HL, or PC-relative displacement.
///
/// For `E8` the displacement is applied to PC *after* the operand fetch.
pub fn jump_target<C, B>(cpu: &mut C, bus: &mut B, operand: Operand) -> Result<u16, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    match operand {
        Operand::D16 => fetch_word(cpu, bus),
        Operand::R16(rr) => Ok(cpu.pair(rr)),
        Operand::E8 => {
            let e = fetch_byte(cpu, bus)? as i8;
            Ok(cpu.pc().wrapping_add(e as i16 as u16))
        }
        Operand::Vector(v) => Ok(v as u16),
        other => unreachable!("operand {other:?} is not a jump target"),
    }
}
