/*!
state.rs - Canonical SM83 CPU architectural state (registers + flags + control
latches) and inline-friendly accessors.

Overview
========
`CpuState` is the single authoritative owner for all architecturally visible
registers and execution control booleans. It intentionally excludes:
  - Bus / memory logic
  - Instruction decode / dispatch logic
  - Interrupt servicing policy
Those live in higher layers (decode, dispatch, interrupts, bus modules).

Control latches
===============
- `ime`            master interrupt enable (IME).
- `ime_scheduled`  EI was executed; IME is raised once the *following*
                   instruction has completed.
- `halted`         HALT low-power state; left when any enabled interrupt is pending.
- `stopped`        STOP state; left when a joypad interrupt is requested.
- `halt_bug`       the next opcode fetch reads PC without advancing it.

F Register Bit Layout
=====================
Bit: 7 6 5 4 3 2 1 0
     Z N H C 0 0 0 0
Where:
  Z = ZERO
  N = SUBTRACT
  H = HALF_CARRY
  C = CARRY
The low nibble is forced to zero on every write (`set_f`, `set_pair(AF)`).
*/

use crate::cpu::CpuConfig;
use crate::cpu::regs::Reg8;

/// Flag bit masks (canonical definitions).
pub const ZERO: u8 = 0b1000_0000;
pub const SUBTRACT: u8 = 0b0100_0000;
pub const HALF_CARRY: u8 = 0b0010_0000;
pub const CARRY: u8 = 0b0001_0000;

/// Bits of F that can ever be set.
pub const FLAG_MASK: u8 = 0xF0;

/// Pure architectural register / control container for the SM83 CPU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,

    pub ime: bool,
    pub ime_scheduled: bool,
    pub halted: bool,
    pub stopped: bool,
    pub halt_bug: bool,

    /// Cumulative T-cycles consumed since construction/reset.
    pub cycles: u64,
}

impl CpuState {
    // ---------------------------------------------------------------------
    // Construction / Reset
    // ---------------------------------------------------------------------

    /// Create a zeroed CPU state (PC = 0x0000, as if a boot ROM were mapped).
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register values left behind by the DMG boot ROM when it hands control
    /// to the cartridge entry point at 0x0100.
    pub fn post_boot() -> Self {
        Self {
            a: 0x01,
            f: 0xB0,
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            sp: 0xFFFE,
            pc: 0x0100,
            ..Self::default()
        }
    }

    /// Build the power-on state selected by `config`.
    pub fn with_config(config: &CpuConfig) -> Self {
        if config.post_boot {
            Self::post_boot()
        } else {
            Self::new()
        }
    }

    // ---------------------------------------------------------------------
    // 8-bit registers
    // ---------------------------------------------------------------------

    #[inline]
    pub fn reg(&self, r: Reg8) -> u8 {
        match r {
            Reg8::A => self.a,
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
        }
    }

    #[inline]
    pub fn set_reg(&mut self, r: Reg8, v: u8) {
        match r {
            Reg8::A => self.a = v,
            Reg8::B => self.b = v,
            Reg8::C => self.c = v,
            Reg8::D => self.d = v,
            Reg8::E => self.e = v,
            Reg8::H => self.h = v,
            Reg8::L => self.l = v,
        }
    }

    #[inline]
    pub fn f(&self) -> u8 {
        self.f
    }

    /// Write F; the low nibble is discarded.
    #[inline]
    pub fn set_f(&mut self, v: u8) {
        self.f = v & FLAG_MASK;
    }

    // ---------------------------------------------------------------------
    // Program Counter Helpers
    // ---------------------------------------------------------------------

    /// Advance PC by `delta` (wrapping at 16 bits).
    #[inline]
    pub fn advance_pc(&mut self, delta: u16) {
        self.pc = self.pc.wrapping_add(delta);
    }

    // ---------------------------------------------------------------------
    // Misc / Convenience
    // ---------------------------------------------------------------------

    /// True when neither HALT nor STOP is suspending instruction fetch.
    #[inline]
    pub fn is_running(&self) -> bool {
        !self.halted && !self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_power_up_is_zeroed() {
        let s = CpuState::new();
        assert_eq!(s.a, 0);
        assert_eq!(s.f(), 0);
        assert_eq!(s.sp, 0);
        assert_eq!(s.pc, 0);
        assert!(!s.ime);
        assert!(s.is_running());
    }

    #[test]
    fn post_boot_matches_dmg_handoff() {
        let s = CpuState::post_boot();
        assert_eq!(s.a, 0x01);
        assert_eq!(s.f(), 0xB0);
        assert_eq!((s.b, s.c), (0x00, 0x13));
        assert_eq!((s.d, s.e), (0x00, 0xD8));
        assert_eq!((s.h, s.l), (0x01, 0x4D));
        assert_eq!(s.sp, 0xFFFE);
        assert_eq!(s.pc, 0x0100);
    }

    #[test]
    fn config_selects_initial_state() {
        let cold = CpuState::with_config(&CpuConfig {
            post_boot: false,
            ..CpuConfig::default()
        });
        assert_eq!(cold, CpuState::new());
        let warm = CpuState::with_config(&CpuConfig::default());
        assert_eq!(warm.pc, 0x0100);
    }

    #[test]
    fn set_f_clears_low_nibble() {
        let mut s = CpuState::new();
        s.set_f(0xFF);
        assert_eq!(s.f(), 0xF0);
        s.set_f(0x0F);
        assert_eq!(s.f(), 0x00);
    }

    #[test]
    fn pc_advance_wraps() {
        let mut s = CpuState::new();
        s.pc = 0xFFFF;
        s.advance_pc(1);
        assert_eq!(s.pc, 0x0000);
        s.advance_pc(2);
        assert_eq!(s.pc, 0x0002);
    }
}
