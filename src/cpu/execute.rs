/*!
execute.rs - Instruction semantic helpers (ALU, flag application, stack).

Overview
========
ALU helpers are pure: they take operand values (and incoming carry where the
operation consumes it) and return the result together with the value every
flag *would* take. Which of those values actually land in F is decided by the
descriptor's `FlagEffect`, applied through `apply_flags`. Handlers never poke
flag bits directly.

Arithmetic conventions
======================
- 8-bit results wrap mod 256.
- H is the carry out of bit 3 (borrow into bit 4 for subtraction).
- C is the carry out of bit 7 (borrow for subtraction).
- ADD HL,rr: H from bit 11, C from bit 15.
- ADD SP,e8 / LD HL,SP+e8: H and C from the unsigned low-byte addition.

Stack helpers use the `CpuBus` facade and propagate bus faults.
*/

use crate::bus::{BusError, CpuBus};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, HALF_CARRY, SUBTRACT, ZERO};
use crate::cpu::table::{FlagEffect, FlagRule};

/// Candidate flag values produced by an ALU helper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagValues {
    pub z: bool,
    pub n: bool,
    pub h: bool,
    pub c: bool,
}

impl FlagValues {
    #[inline]
    pub const fn new(z: bool, n: bool, h: bool, c: bool) -> Self {
        Self { z, n, h, c }
    }
}

/// Write F according to `effect`, taking computed bits from `values`.
pub fn apply_flags<C: CpuRegs + ?Sized>(cpu: &mut C, effect: FlagEffect, values: FlagValues) {
    let mut f = cpu.f();
    for (rule, mask, value) in [
        (effect.z, ZERO, values.z),
        (effect.n, SUBTRACT, values.n),
        (effect.h, HALF_CARRY, values.h),
        (effect.c, CARRY, values.c),
    ] {
        let bit = match rule {
            FlagRule::Unaffected => continue,
            FlagRule::Set => true,
            FlagRule::Reset => false,
            FlagRule::Computed => value,
        };
        if bit {
            f |= mask;
        } else {
            f &= !mask;
        }
    }
    cpu.set_f(f);
}

// -------------------------------------------------------------------------
// 8-bit arithmetic / logic
// -------------------------------------------------------------------------

/// ADD / ADC.
pub fn add8(a: u8, b: u8, carry_in: bool) -> (u8, FlagValues) {
    let c = carry_in as u16;
    let wide = a as u16 + b as u16 + c;
    let result = wide as u8;
    let h = (a & 0x0F) as u16 + (b & 0x0F) as u16 + c > 0x0F;
    (result, FlagValues::new(result == 0, false, h, wide > 0xFF))
}

/// SUB / SBC / CP.
pub fn sub8(a: u8, b: u8, borrow_in: bool) -> (u8, FlagValues) {
    let c = borrow_in as u16;
    let result = a.wrapping_sub(b).wrapping_sub(c as u8);
    let h = ((a & 0x0F) as u16) < (b & 0x0F) as u16 + c;
    let borrow = (a as u16) < b as u16 + c;
    (result, FlagValues::new(result == 0, true, h, borrow))
}

pub fn and8(a: u8, b: u8) -> (u8, FlagValues) {
    let r = a & b;
    (r, FlagValues::new(r == 0, false, true, false))
}

pub fn or8(a: u8, b: u8) -> (u8, FlagValues) {
    let r = a | b;
    (r, FlagValues::new(r == 0, false, false, false))
}

pub fn xor8(a: u8, b: u8) -> (u8, FlagValues) {
    let r = a ^ b;
    (r, FlagValues::new(r == 0, false, false, false))
}

/// INC r: C is never produced (descriptor leaves it unaffected).
pub fn inc8(v: u8) -> (u8, FlagValues) {
    let r = v.wrapping_add(1);
    (r, FlagValues::new(r == 0, false, v & 0x0F == 0x0F, false))
}

/// DEC r: C is never produced (descriptor leaves it unaffected).
pub fn dec8(v: u8) -> (u8, FlagValues) {
    let r = v.wrapping_sub(1);
    (r, FlagValues::new(r == 0, true, v & 0x0F == 0x00, false))
}

/// Decimal adjust after a BCD add or subtract.
pub fn daa(a: u8, n: bool, h: bool, c: bool) -> (u8, FlagValues) {
    let mut result = a;
    let mut carry = c;
    if !n {
        if c || a > 0x99 {
            result = result.wrapping_add(0x60);
            carry = true;
        }
        if h || (a & 0x0F) > 0x09 {
            result = result.wrapping_add(0x06);
        }
    } else {
        if c {
            result = result.wrapping_sub(0x60);
        }
        if h {
            result = result.wrapping_sub(0x06);
        }
    }
    (result, FlagValues::new(result == 0, n, false, carry))
}

// -------------------------------------------------------------------------
// 16-bit arithmetic
// -------------------------------------------------------------------------

/// ADD HL,rr.
pub fn add16(hl: u16, rr: u16) -> (u16, FlagValues) {
    let wide = hl as u32 + rr as u32;
    let h = (hl & 0x0FFF) + (rr & 0x0FFF) > 0x0FFF;
    (wide as u16, FlagValues::new(false, false, h, wide > 0xFFFF))
}

/// SP + e8 as used by ADD SP,e8 and LD HL,SP+e8.
pub fn add_sp_e8(sp: u16, e8: u8) -> (u16, FlagValues) {
    let result = sp.wrapping_add(e8 as i8 as i16 as u16);
    let h = (sp & 0x000F) + (e8 as u16 & 0x0F) > 0x0F;
    let c = (sp & 0x00FF) + e8 as u16 > 0xFF;
    (result, FlagValues::new(false, false, h, c))
}

// -------------------------------------------------------------------------
// Rotates / shifts / bit ops
// -------------------------------------------------------------------------

#[inline]
fn shifted(r: u8, carry: bool) -> (u8, FlagValues) {
    (r, FlagValues::new(r == 0, false, false, carry))
}

pub fn rlc(v: u8) -> (u8, FlagValues) {
    shifted(v.rotate_left(1), v & 0x80 != 0)
}

pub fn rrc(v: u8) -> (u8, FlagValues) {
    shifted(v.rotate_right(1), v & 0x01 != 0)
}

pub fn rl(v: u8, carry_in: bool) -> (u8, FlagValues) {
    shifted((v << 1) | carry_in as u8, v & 0x80 != 0)
}

pub fn rr(v: u8, carry_in: bool) -> (u8, FlagValues) {
    shifted((v >> 1) | ((carry_in as u8) << 7), v & 0x01 != 0)
}

pub fn sla(v: u8) -> (u8, FlagValues) {
    shifted(v << 1, v & 0x80 != 0)
}

pub fn sra(v: u8) -> (u8, FlagValues) {
    shifted((v >> 1) | (v & 0x80), v & 0x01 != 0)
}

pub fn srl(v: u8) -> (u8, FlagValues) {
    shifted(v >> 1, v & 0x01 != 0)
}

pub fn swap(v: u8) -> (u8, FlagValues) {
    shifted(v.rotate_left(4), false)
}

/// BIT n: only Z depends on the operand.
pub fn bit(n: u8, v: u8) -> FlagValues {
    FlagValues::new(v & (1 << n) == 0, false, true, false)
}

// -------------------------------------------------------------------------
// Stack
// -------------------------------------------------------------------------

/// Push a word: high byte at SP-1, low byte at SP-2.
pub fn push_word<C, B>(cpu: &mut C, bus: &mut B, value: u16) -> Result<(), BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let [hi, lo] = value.to_be_bytes();
    let sp = cpu.sp().wrapping_sub(1);
    bus.write(sp, hi)?;
    let sp = sp.wrapping_sub(1);
    bus.write(sp, lo)?;
    cpu.set_sp(sp);
    Ok(())
}

/// Pop a word pushed by `push_word`.
pub fn pop_word<C, B>(cpu: &mut C, bus: &mut B) -> Result<u16, BusError>
where
    C: CpuRegs + ?Sized,
    B: CpuBus + ?Sized,
{
    let sp = cpu.sp();
    let value = bus.read_word(sp)?;
    cpu.set_sp(sp.wrapping_add(2));
    Ok(value)
}
