/*!
regs.rs - CpuRegs trait providing the generic register + flag manipulation
interface used by the SM83 addressing, execute and dispatch layers.

The trait does NOT include:
  - Stack push/pop
  - Instruction fetch helpers
  - Bus access of any kind

Memory, stack and fetch operations stay explicit at call sites via a
`CpuBus` reference, keeping implementations of this trait trivial.

Register pairs
==============
AF, BC, DE and HL are big-endian compositions of their halves (the first
register named is the most significant byte). SP is exposed through the same
pair API so 16-bit operand resolution does not special-case it.
*/

use crate::cpu::state::{CARRY, CpuState, HALF_CARRY, SUBTRACT, ZERO};

/// 8-bit general purpose registers addressable by instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

/// 16-bit register pairs (plus SP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
}

impl std::fmt::Display for Reg8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Reg8::A => "A",
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::H => "H",
            Reg8::L => "L",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for Reg16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Reg16::AF => "AF",
            Reg16::BC => "BC",
            Reg16::DE => "DE",
            Reg16::HL => "HL",
            Reg16::SP => "SP",
        };
        f.write_str(s)
    }
}

/// Trait exposing the SM83 architectural register + flag API needed by
/// instruction semantic and dispatch code.
///
/// ALL mutating methods take &mut self, enabling generic call sites:
///   fn op<T: CpuRegs>(cpu: &mut T) { ... }
pub trait CpuRegs {
    // ---------------------------------------------------------------------
    // Required accessors
    // ---------------------------------------------------------------------
    fn reg(&self, r: Reg8) -> u8;
    fn set_reg(&mut self, r: Reg8, v: u8);
    fn f(&self) -> u8;
    /// Write F. Implementations must clear the low nibble.
    fn set_f(&mut self, v: u8);
    fn sp(&self) -> u16;
    fn set_sp(&mut self, v: u16);
    fn pc(&self) -> u16;
    fn set_pc(&mut self, v: u16);

    // ---------------------------------------------------------------------
    // Accumulator shorthands
    // ---------------------------------------------------------------------
    #[inline]
    fn a(&self) -> u8 {
        self.reg(Reg8::A)
    }

    #[inline]
    fn set_a(&mut self, v: u8) {
        self.set_reg(Reg8::A, v);
    }

    // ---------------------------------------------------------------------
    // Register pairs
    // ---------------------------------------------------------------------

    /// Read a 16-bit pair composed big-endian from its halves.
    #[inline]
    fn pair(&self, rr: Reg16) -> u16 {
        let (hi, lo) = match rr {
            Reg16::AF => (self.a(), self.f()),
            Reg16::BC => (self.reg(Reg8::B), self.reg(Reg8::C)),
            Reg16::DE => (self.reg(Reg8::D), self.reg(Reg8::E)),
            Reg16::HL => (self.reg(Reg8::H), self.reg(Reg8::L)),
            Reg16::SP => return self.sp(),
        };
        u16::from_be_bytes([hi, lo])
    }

    /// Write a 16-bit pair, splitting it into high and low halves.
    #[inline]
    fn set_pair(&mut self, rr: Reg16, v: u16) {
        let [hi, lo] = v.to_be_bytes();
        match rr {
            Reg16::AF => {
                self.set_a(hi);
                self.set_f(lo);
            }
            Reg16::BC => {
                self.set_reg(Reg8::B, hi);
                self.set_reg(Reg8::C, lo);
            }
            Reg16::DE => {
                self.set_reg(Reg8::D, hi);
                self.set_reg(Reg8::E, lo);
            }
            Reg16::HL => {
                self.set_reg(Reg8::H, hi);
                self.set_reg(Reg8::L, lo);
            }
            Reg16::SP => self.set_sp(v),
        }
    }

    // ---------------------------------------------------------------------
    // Program Counter helpers
    // ---------------------------------------------------------------------

    /// Advance PC by `delta` (wrapping at 16 bits).
    #[inline]
    fn advance_pc(&mut self, delta: u16) {
        let pc = self.pc().wrapping_add(delta);
        self.set_pc(pc);
    }

    // ---------------------------------------------------------------------
    // Flag operations
    // ---------------------------------------------------------------------

    /// Return true if mask bits are set.
    #[inline]
    fn is_flag_set(&self, mask: u8) -> bool {
        (self.f() & mask) != 0
    }

    /// Assign specific flag bits based on boolean `value` (set or clear).
    #[inline]
    fn assign_flag(&mut self, mask: u8, value: bool) {
        let f = if value {
            self.f() | mask
        } else {
            self.f() & !mask
        };
        self.set_f(f);
    }

    #[inline]
    fn zero(&self) -> bool {
        self.is_flag_set(ZERO)
    }

    #[inline]
    fn subtract(&self) -> bool {
        self.is_flag_set(SUBTRACT)
    }

    #[inline]
    fn half_carry(&self) -> bool {
        self.is_flag_set(HALF_CARRY)
    }

    #[inline]
    fn carry(&self) -> bool {
        self.is_flag_set(CARRY)
    }
}

// -------------------------------------------------------------------------
// Implementation: CpuState (canonical)
// -------------------------------------------------------------------------

impl CpuRegs for CpuState {
    #[inline]
    fn reg(&self, r: Reg8) -> u8 {
        CpuState::reg(self, r)
    }
    #[inline]
    fn set_reg(&mut self, r: Reg8, v: u8) {
        CpuState::set_reg(self, r, v);
    }
    #[inline]
    fn f(&self) -> u8 {
        CpuState::f(self)
    }
    #[inline]
    fn set_f(&mut self, v: u8) {
        CpuState::set_f(self, v);
    }
    #[inline]
    fn sp(&self) -> u16 {
        self.sp
    }
    #[inline]
    fn set_sp(&mut self, v: u16) {
        self.sp = v;
    }
    #[inline]
    fn pc(&self) -> u16 {
        self.pc
    }
    #[inline]
    fn set_pc(&mut self, v: u16) {
        self.pc = v;
    }
}
