/*!
table.rs - Static instruction descriptor tables (base + $CB-prefixed).

Purpose
=======
Every opcode in both 256-entry spaces maps to one immutable `Instruction`
descriptor: operation class, operands (which encode the addressing mode),
optional condition, length, cycle costs and flag policy. The dispatcher
matches exhaustively on `Op`; nothing about an instruction's shape lives in
the handlers.

Construction
============
Both tables are `static` arrays built by `const fn` at compile time from the
usual octal decomposition of the opcode byte:

```text
    x = op >> 6, y = (op >> 3) & 7, z = op & 7, p = y >> 1, q = y & 1
```

with the operand lookup tables

```text
    r   = B C D E H L (HL) A
    rp  = BC DE HL SP
    rp2 = BC DE HL AF
    cc  = NZ Z NC C
```

Cycle counts are T-cycles. For conditional control flow `cycles` is the
not-taken cost and `cycles_taken` the taken cost; both are equal otherwise.

Illegal opcodes
===============
$D3 $DB $DD $E3 $E4 $EB $EC $ED $F4 $FC $FD decode to `Op::Illegal`.
$CB in the base table is `Op::Prefix`; the decoder never returns it.
*/

use std::fmt;

use crate::cpu::regs::{Reg8, Reg16};

/// Operation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // Misc / control
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    Daa,
    Cpl,
    Scf,
    Ccf,
    // Loads
    Ld8,
    Ld16,
    LdHlSp,
    Push,
    Pop,
    // 8-bit ALU
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
    Inc8,
    Dec8,
    // 16-bit ALU
    Inc16,
    Dec16,
    AddHl,
    AddSp,
    // Accumulator rotates
    Rlca,
    Rrca,
    Rla,
    Rra,
    // Control flow
    Jp,
    Jr,
    Call,
    Ret,
    Reti,
    Rst,
    // $CB space
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
    Bit,
    Res,
    Set,
    // Decoder markers
    Prefix,
    Illegal,
}

impl Op {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Op::Nop => "NOP",
            Op::Stop => "STOP",
            Op::Halt => "HALT",
            Op::Di => "DI",
            Op::Ei => "EI",
            Op::Daa => "DAA",
            Op::Cpl => "CPL",
            Op::Scf => "SCF",
            Op::Ccf => "CCF",
            Op::Ld8 | Op::Ld16 | Op::LdHlSp => "LD",
            Op::Push => "PUSH",
            Op::Pop => "POP",
            Op::Add | Op::AddHl | Op::AddSp => "ADD",
            Op::Adc => "ADC",
            Op::Sub => "SUB",
            Op::Sbc => "SBC",
            Op::And => "AND",
            Op::Xor => "XOR",
            Op::Or => "OR",
            Op::Cp => "CP",
            Op::Inc8 | Op::Inc16 => "INC",
            Op::Dec8 | Op::Dec16 => "DEC",
            Op::Rlca => "RLCA",
            Op::Rrca => "RRCA",
            Op::Rla => "RLA",
            Op::Rra => "RRA",
            Op::Jp => "JP",
            Op::Jr => "JR",
            Op::Call => "CALL",
            Op::Ret => "RET",
            Op::Reti => "RETI",
            Op::Rst => "RST",
            Op::Rlc => "RLC",
            Op::Rrc => "RRC",
            Op::Rl => "RL",
            Op::Rr => "RR",
            Op::Sla => "SLA",
            Op::Sra => "SRA",
            Op::Swap => "SWAP",
            Op::Srl => "SRL",
            Op::Bit => "BIT",
            Op::Res => "RES",
            Op::Set => "SET",
            Op::Prefix => "PREFIX CB",
            Op::Illegal => "ILLEGAL",
        }
    }
}

/// Operand / addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    None,
    /// 8-bit register.
    R8(Reg8),
    /// 16-bit register pair or SP.
    R16(Reg16),
    /// Immediate byte.
    D8,
    /// Immediate little-endian word (value or jump/call target).
    D16,
    /// Memory at an immediate 16-bit address.
    A16,
    /// Memory at the address held in a pair.
    Ind(Reg16),
    /// Memory at HL, HL incremented afterwards.
    HlInc,
    /// Memory at HL, HL decremented afterwards.
    HlDec,
    /// Memory at $FF00 + C.
    HighC,
    /// Memory at $FF00 + immediate byte.
    HighD8,
    /// Signed immediate displacement.
    E8,
    /// SP plus signed immediate displacement.
    SpE8,
    /// RST target.
    Vector(u8),
    /// Bit index for BIT/RES/SET.
    Bit(u8),
}

impl Operand {
    /// Immediate bytes this operand consumes from the instruction stream.
    pub const fn immediate_len(self) -> u8 {
        match self {
            Operand::D8 | Operand::HighD8 | Operand::E8 | Operand::SpE8 => 1,
            Operand::D16 | Operand::A16 => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::R8(r) => write!(f, "{r}"),
            Operand::R16(rr) => write!(f, "{rr}"),
            Operand::D8 => f.write_str("d8"),
            Operand::D16 => f.write_str("d16"),
            Operand::A16 => f.write_str("(a16)"),
            Operand::Ind(rr) => write!(f, "({rr})"),
            Operand::HlInc => f.write_str("(HL+)"),
            Operand::HlDec => f.write_str("(HL-)"),
            Operand::HighC => f.write_str("(FF00+C)"),
            Operand::HighD8 => f.write_str("(FF00+a8)"),
            Operand::E8 => f.write_str("e8"),
            Operand::SpE8 => f.write_str("SP+e8"),
            Operand::Vector(v) => write!(f, "{v:02X}H"),
            Operand::Bit(b) => write!(f, "{b}"),
        }
    }
}

/// Branch condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cond {
    Nz,
    Z,
    Nc,
    C,
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cond::Nz => "NZ",
            Cond::Z => "Z",
            Cond::Nc => "NC",
            Cond::C => "C",
        })
    }
}

/// What an instruction does to one flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagRule {
    Unaffected,
    Set,
    Reset,
    Computed,
}

/// Per-flag policy (Z, N, H, C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagEffect {
    pub z: FlagRule,
    pub n: FlagRule,
    pub h: FlagRule,
    pub c: FlagRule,
}

use FlagRule::{Computed as X, Reset as O, Set as I, Unaffected as U};

impl FlagEffect {
    pub const fn new(z: FlagRule, n: FlagRule, h: FlagRule, c: FlagRule) -> Self {
        Self { z, n, h, c }
    }

    pub const NONE: FlagEffect = FlagEffect::new(U, U, U, U);
}

const FLAGS_ADD: FlagEffect = FlagEffect::new(X, O, X, X);
const FLAGS_SUB: FlagEffect = FlagEffect::new(X, I, X, X);
const FLAGS_AND: FlagEffect = FlagEffect::new(X, O, I, O);
const FLAGS_OR: FlagEffect = FlagEffect::new(X, O, O, O);
const FLAGS_INC: FlagEffect = FlagEffect::new(X, O, X, U);
const FLAGS_DEC: FlagEffect = FlagEffect::new(X, I, X, U);
const FLAGS_ADD_HL: FlagEffect = FlagEffect::new(U, O, X, X);
const FLAGS_SP_E8: FlagEffect = FlagEffect::new(O, O, X, X);
const FLAGS_ROT_A: FlagEffect = FlagEffect::new(O, O, O, X);
const FLAGS_ROT: FlagEffect = FlagEffect::new(X, O, O, X);
const FLAGS_SWAP: FlagEffect = FlagEffect::new(X, O, O, O);
const FLAGS_BIT: FlagEffect = FlagEffect::new(X, O, I, U);
const FLAGS_DAA: FlagEffect = FlagEffect::new(X, U, O, X);
const FLAGS_CPL: FlagEffect = FlagEffect::new(U, I, I, U);
const FLAGS_SCF: FlagEffect = FlagEffect::new(U, O, O, I);
const FLAGS_CCF: FlagEffect = FlagEffect::new(U, O, O, X);
const FLAGS_ALL: FlagEffect = FlagEffect::new(X, X, X, X);

/// Immutable instruction descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub prefixed: bool,
    pub op: Op,
    pub dst: Operand,
    pub src: Operand,
    pub cond: Option<Cond>,
    /// Total encoded length including any $CB prefix.
    pub len: u8,
    /// T-cycles (not-taken cost for conditional control flow).
    pub cycles: u8,
    /// T-cycles when a condition is met.
    pub cycles_taken: u8,
    pub flags: FlagEffect,
}

impl Instruction {
    const fn new(opcode: u8, op: Op, dst: Operand, src: Operand, cycles: u8) -> Self {
        Self {
            opcode,
            prefixed: false,
            op,
            dst,
            src,
            cond: None,
            len: 1 + dst.immediate_len() + src.immediate_len(),
            cycles,
            cycles_taken: cycles,
            flags: FlagEffect::NONE,
        }
    }

    const fn with_flags(mut self, flags: FlagEffect) -> Self {
        self.flags = flags;
        self
    }

    const fn with_cond(mut self, cond: Cond, taken: u8) -> Self {
        self.cond = Some(cond);
        self.cycles_taken = taken;
        self
    }

    const fn with_len(mut self, len: u8) -> Self {
        self.len = len;
        self
    }

    const fn illegal(opcode: u8) -> Self {
        Self::new(opcode, Op::Illegal, Operand::None, Operand::None, 4)
    }

    pub fn is_conditional(&self) -> bool {
        self.cond.is_some()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op.mnemonic())?;
        if let Operand::Bit(b) = self.src {
            return write!(f, " {b},{}", self.dst);
        }
        let mut sep = " ";
        if let Some(c) = self.cond {
            write!(f, "{sep}{c}")?;
            sep = ",";
        }
        for operand in [self.dst, self.src] {
            if operand != Operand::None {
                write!(f, "{sep}{operand}")?;
                sep = ",";
            }
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------
// Operand lookup tables
// -------------------------------------------------------------------------

const fn r(i: u8) -> Operand {
    match i & 7 {
        0 => Operand::R8(Reg8::B),
        1 => Operand::R8(Reg8::C),
        2 => Operand::R8(Reg8::D),
        3 => Operand::R8(Reg8::E),
        4 => Operand::R8(Reg8::H),
        5 => Operand::R8(Reg8::L),
        6 => Operand::Ind(Reg16::HL),
        _ => Operand::R8(Reg8::A),
    }
}

const fn rp(p: u8) -> Operand {
    match p & 3 {
        0 => Operand::R16(Reg16::BC),
        1 => Operand::R16(Reg16::DE),
        2 => Operand::R16(Reg16::HL),
        _ => Operand::R16(Reg16::SP),
    }
}

const fn rp2(p: u8) -> Operand {
    match p & 3 {
        0 => Operand::R16(Reg16::BC),
        1 => Operand::R16(Reg16::DE),
        2 => Operand::R16(Reg16::HL),
        _ => Operand::R16(Reg16::AF),
    }
}

const fn cc(y: u8) -> Cond {
    match y & 3 {
        0 => Cond::Nz,
        1 => Cond::Z,
        2 => Cond::Nc,
        _ => Cond::C,
    }
}

const fn alu(y: u8) -> (Op, FlagEffect) {
    match y & 7 {
        0 => (Op::Add, FLAGS_ADD),
        1 => (Op::Adc, FLAGS_ADD),
        2 => (Op::Sub, FLAGS_SUB),
        3 => (Op::Sbc, FLAGS_SUB),
        4 => (Op::And, FLAGS_AND),
        5 => (Op::Xor, FLAGS_OR),
        6 => (Op::Or, FLAGS_OR),
        _ => (Op::Cp, FLAGS_SUB),
    }
}

const A: Operand = Operand::R8(Reg8::A);
const HL: Operand = Operand::R16(Reg16::HL);
const SP: Operand = Operand::R16(Reg16::SP);
const NONE: Operand = Operand::None;

// -------------------------------------------------------------------------
// Base table
// -------------------------------------------------------------------------

const fn base(op: u8) -> Instruction {
    let x = op >> 6;
    let y = (op >> 3) & 7;
    let z = op & 7;
    let p = y >> 1;
    let q = y & 1;
    match x {
        0 => match z {
            0 => match y {
                0 => Instruction::new(op, Op::Nop, NONE, NONE, 4),
                1 => Instruction::new(op, Op::Ld16, Operand::A16, SP, 20),
                // STOP is followed by one padding byte.
                2 => Instruction::new(op, Op::Stop, NONE, NONE, 4).with_len(2),
                3 => Instruction::new(op, Op::Jr, NONE, Operand::E8, 12),
                _ => Instruction::new(op, Op::Jr, NONE, Operand::E8, 8).with_cond(cc(y - 4), 12),
            },
            1 => {
                if q == 0 {
                    Instruction::new(op, Op::Ld16, rp(p), Operand::D16, 12)
                } else {
                    Instruction::new(op, Op::AddHl, HL, rp(p), 8).with_flags(FLAGS_ADD_HL)
                }
            }
            2 => {
                let mem = match p {
                    0 => Operand::Ind(Reg16::BC),
                    1 => Operand::Ind(Reg16::DE),
                    2 => Operand::HlInc,
                    _ => Operand::HlDec,
                };
                if q == 0 {
                    Instruction::new(op, Op::Ld8, mem, A, 8)
                } else {
                    Instruction::new(op, Op::Ld8, A, mem, 8)
                }
            }
            3 => {
                if q == 0 {
                    Instruction::new(op, Op::Inc16, rp(p), NONE, 8)
                } else {
                    Instruction::new(op, Op::Dec16, rp(p), NONE, 8)
                }
            }
            4 => Instruction::new(op, Op::Inc8, r(y), NONE, if y == 6 { 12 } else { 4 }).with_flags(FLAGS_INC),
            5 => Instruction::new(op, Op::Dec8, r(y), NONE, if y == 6 { 12 } else { 4 }).with_flags(FLAGS_DEC),
            6 => Instruction::new(op, Op::Ld8, r(y), Operand::D8, if y == 6 { 12 } else { 8 }),
            _ => match y {
                0 => Instruction::new(op, Op::Rlca, NONE, NONE, 4).with_flags(FLAGS_ROT_A),
                1 => Instruction::new(op, Op::Rrca, NONE, NONE, 4).with_flags(FLAGS_ROT_A),
                2 => Instruction::new(op, Op::Rla, NONE, NONE, 4).with_flags(FLAGS_ROT_A),
                3 => Instruction::new(op, Op::Rra, NONE, NONE, 4).with_flags(FLAGS_ROT_A),
                4 => Instruction::new(op, Op::Daa, NONE, NONE, 4).with_flags(FLAGS_DAA),
                5 => Instruction::new(op, Op::Cpl, NONE, NONE, 4).with_flags(FLAGS_CPL),
                6 => Instruction::new(op, Op::Scf, NONE, NONE, 4).with_flags(FLAGS_SCF),
                _ => Instruction::new(op, Op::Ccf, NONE, NONE, 4).with_flags(FLAGS_CCF),
            },
        },
        1 => {
            if z == 6 && y == 6 {
                Instruction::new(op, Op::Halt, NONE, NONE, 4)
            } else {
                let cycles = if z == 6 || y == 6 { 8 } else { 4 };
                Instruction::new(op, Op::Ld8, r(y), r(z), cycles)
            }
        }
        2 => {
            let (alu_op, flags) = alu(y);
            Instruction::new(op, alu_op, A, r(z), if z == 6 { 8 } else { 4 }).with_flags(flags)
        }
        _ => match z {
            0 => match y {
                0..=3 => Instruction::new(op, Op::Ret, NONE, NONE, 8).with_cond(cc(y), 20),
                4 => Instruction::new(op, Op::Ld8, Operand::HighD8, A, 12),
                5 => Instruction::new(op, Op::AddSp, SP, Operand::E8, 16).with_flags(FLAGS_SP_E8),
                6 => Instruction::new(op, Op::Ld8, A, Operand::HighD8, 12),
                _ => Instruction::new(op, Op::LdHlSp, HL, Operand::SpE8, 12).with_flags(FLAGS_SP_E8),
            },
            1 => {
                if q == 0 {
                    let pop = Instruction::new(op, Op::Pop, rp2(p), NONE, 12);
                    // POP AF loads F wholesale.
                    if p == 3 { pop.with_flags(FLAGS_ALL) } else { pop }
                } else {
                    match p {
                        0 => Instruction::new(op, Op::Ret, NONE, NONE, 16),
                        1 => Instruction::new(op, Op::Reti, NONE, NONE, 16),
                        2 => Instruction::new(op, Op::Jp, NONE, HL, 4),
                        _ => Instruction::new(op, Op::Ld16, SP, HL, 8),
                    }
                }
            }
            2 => match y {
                0..=3 => Instruction::new(op, Op::Jp, NONE, Operand::D16, 12).with_cond(cc(y), 16),
                4 => Instruction::new(op, Op::Ld8, Operand::HighC, A, 8),
                5 => Instruction::new(op, Op::Ld8, Operand::A16, A, 16),
                6 => Instruction::new(op, Op::Ld8, A, Operand::HighC, 8),
                _ => Instruction::new(op, Op::Ld8, A, Operand::A16, 16),
            },
            3 => match y {
                0 => Instruction::new(op, Op::Jp, NONE, Operand::D16, 16),
                1 => Instruction::new(op, Op::Prefix, NONE, NONE, 4),
                6 => Instruction::new(op, Op::Di, NONE, NONE, 4),
                7 => Instruction::new(op, Op::Ei, NONE, NONE, 4),
                _ => Instruction::illegal(op),
            },
            4 => match y {
                0..=3 => Instruction::new(op, Op::Call, NONE, Operand::D16, 12).with_cond(cc(y), 24),
                _ => Instruction::illegal(op),
            },
            5 => {
                if q == 0 {
                    Instruction::new(op, Op::Push, NONE, rp2(p), 16)
                } else if p == 0 {
                    Instruction::new(op, Op::Call, NONE, Operand::D16, 24)
                } else {
                    Instruction::illegal(op)
                }
            }
            6 => {
                let (alu_op, flags) = alu(y);
                Instruction::new(op, alu_op, A, Operand::D8, 8).with_flags(flags)
            }
            _ => Instruction::new(op, Op::Rst, NONE, Operand::Vector(y * 8), 16),
        },
    }
}

// -------------------------------------------------------------------------
// $CB table
// -------------------------------------------------------------------------

const fn prefixed(op: u8) -> Instruction {
    let x = op >> 6;
    let y = (op >> 3) & 7;
    let z = op & 7;
    let target = r(z);
    let hl = z == 6;

    let mut instr = match x {
        0 => {
            let (rot, flags) = match y {
                0 => (Op::Rlc, FLAGS_ROT),
                1 => (Op::Rrc, FLAGS_ROT),
                2 => (Op::Rl, FLAGS_ROT),
                3 => (Op::Rr, FLAGS_ROT),
                4 => (Op::Sla, FLAGS_ROT),
                5 => (Op::Sra, FLAGS_ROT),
                6 => (Op::Swap, FLAGS_SWAP),
                _ => (Op::Srl, FLAGS_ROT),
            };
            Instruction::new(op, rot, target, NONE, if hl { 16 } else { 8 }).with_flags(flags)
        }
        1 => Instruction::new(op, Op::Bit, target, Operand::Bit(y), if hl { 12 } else { 8 })
            .with_flags(FLAGS_BIT),
        2 => Instruction::new(op, Op::Res, target, Operand::Bit(y), if hl { 16 } else { 8 }),
        _ => Instruction::new(op, Op::Set, target, Operand::Bit(y), if hl { 16 } else { 8 }),
    };
    instr.prefixed = true;
    instr.len = 2;
    instr
}

const fn build(prefix: bool) -> [Instruction; 256] {
    let mut table = [Instruction::illegal(0); 256];
    let mut i = 0;
    while i < 256 {
        table[i] = if prefix {
            prefixed(i as u8)
        } else {
            base(i as u8)
        };
        i += 1;
    }
    table
}

/// Unprefixed opcode space.
pub static BASE: [Instruction; 256] = build(false);

/// $CB-prefixed opcode space.
pub static CB: [Instruction; 256] = build(true);

/// Descriptor for an unprefixed opcode (may be `Op::Illegal` or `Op::Prefix`).
#[inline]
pub fn lookup(opcode: u8) -> &'static Instruction {
    &BASE[opcode as usize]
}

/// Descriptor for the byte following $CB.
#[inline]
pub fn lookup_cb(opcode: u8) -> &'static Instruction {
    &CB[opcode as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ILLEGAL: [u8; 11] = [
        0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
    ];

    #[test]
    fn illegal_set_is_exact() {
        for op in 0..=255u8 {
            let illegal = lookup(op).op == Op::Illegal;
            assert_eq!(illegal, ILLEGAL.contains(&op), "opcode {op:#04x}");
        }
        assert!(CB.iter().all(|i| i.op != Op::Illegal));
    }

    #[test]
    fn descriptors_carry_their_opcode() {
        for i in 0..256 {
            assert_eq!(BASE[i].opcode as usize, i);
            assert!(!BASE[i].prefixed);
            assert_eq!(CB[i].opcode as usize, i);
            assert!(CB[i].prefixed);
            assert_eq!(CB[i].len, 2);
        }
    }

    #[test]
    fn lengths_follow_operands() {
        assert_eq!(lookup(0x00).len, 1);
        assert_eq!(lookup(0x3E).len, 2); // LD A,d8
        assert_eq!(lookup(0x21).len, 3); // LD HL,d16
        assert_eq!(lookup(0x08).len, 3); // LD (a16),SP
        assert_eq!(lookup(0xEA).len, 3); // LD (a16),A
        assert_eq!(lookup(0xE0).len, 2); // LDH (a8),A
        assert_eq!(lookup(0x10).len, 2); // STOP
        assert_eq!(lookup(0xF8).len, 2); // LD HL,SP+e8
    }

    #[test]
    fn representative_cycle_counts() {
        assert_eq!(lookup(0x00).cycles, 4);
        assert_eq!(lookup(0x36).cycles, 12); // LD (HL),d8
        assert_eq!(lookup(0x34).cycles, 12); // INC (HL)
        assert_eq!(lookup(0x46).cycles, 8); // LD B,(HL)
        assert_eq!(lookup(0xC5).cycles, 16); // PUSH BC
        assert_eq!(lookup(0xC1).cycles, 12); // POP BC
        assert_eq!(lookup(0xC9).cycles, 16); // RET
        assert_eq!(lookup(0xD9).cycles, 16); // RETI
        assert_eq!(lookup(0xE9).cycles, 4); // JP HL
        assert_eq!(lookup(0xCD).cycles, 24); // CALL
        assert_eq!(lookup(0xFF).cycles, 16); // RST 38H
        assert_eq!(lookup(0xE8).cycles, 16); // ADD SP,e8
        assert_eq!(lookup_cb(0x46).cycles, 12); // BIT 0,(HL)
        assert_eq!(lookup_cb(0x86).cycles, 16); // RES 0,(HL)
        assert_eq!(lookup_cb(0x06).cycles, 16); // RLC (HL)
        assert_eq!(lookup_cb(0x11).cycles, 8); // RL C
    }

    #[test]
    fn conditional_costs() {
        for (op, not_taken, taken) in [
            (0x20u8, 8u8, 12u8), // JR NZ
            (0xC2, 12, 16),      // JP NZ
            (0xC4, 12, 24),      // CALL NZ
            (0xC0, 8, 20),       // RET NZ
        ] {
            let i = lookup(op);
            assert!(i.is_conditional());
            assert_eq!((i.cycles, i.cycles_taken), (not_taken, taken));
        }
        assert!(!lookup(0x18).is_conditional());
        assert_eq!(lookup(0x18).cycles, 12);
    }

    #[test]
    fn prefixed_space_is_distinct() {
        let base = lookup(0x7C);
        assert_eq!(base.op, Op::Ld8);
        assert_eq!(base.dst, Operand::R8(Reg8::A));
        assert_eq!(base.src, Operand::R8(Reg8::H));

        let cb = lookup_cb(0x7C);
        assert_eq!(cb.op, Op::Bit);
        assert_eq!(cb.src, Operand::Bit(7));
        assert_eq!(cb.dst, Operand::R8(Reg8::H));
        assert_eq!(cb.flags, FLAGS_BIT);
    }

    #[test]
    fn display_forms() {
        assert_eq!(lookup(0x7C).to_string(), "LD A,H");
        assert_eq!(lookup_cb(0x7C).to_string(), "BIT 7,H");
        assert_eq!(lookup(0x20).to_string(), "JR NZ,e8");
        assert_eq!(lookup(0x22).to_string(), "LD (HL+),A");
        assert_eq!(lookup(0xE2).to_string(), "LD (FF00+C),A");
        assert_eq!(lookup(0xEF).to_string(), "RST 28H");
        assert_eq!(lookup(0xF8).to_string(), "LD HL,SP+e8");
        assert_eq!(lookup(0x76).to_string(), "HALT");
    }

    #[test]
    fn flag_policies() {
        assert_eq!(lookup(0x3C).flags, FLAGS_INC); // INC A leaves C
        assert_eq!(lookup(0x3C).flags.c, FlagRule::Unaffected);
        assert_eq!(lookup(0x90).flags, FLAGS_SUB);
        assert_eq!(lookup(0x09).flags.z, FlagRule::Unaffected);
        assert_eq!(lookup(0x07).flags.z, FlagRule::Reset);
        assert_eq!(lookup(0x06).flags, FlagEffect::NONE);
    }
}
