//! Flat opcode tables.
//!
//! Every one of the 256 base opcodes is described by an [`Instr`]: what it
//! does ([`Op`]), how many bytes it occupies and how many M-cycles it takes.
//! The tables are built at compile time from the usual `x/y/z/p/q` bit
//! fields of the opcode byte, so the executor is a single `match` on `Op`.

use std::fmt;

use super::cb::{decode_cb, CbInstr};

/// 8-bit operand locations.
///
/// The first eight variants follow the register order used by the opcode
/// encoding: B, C, D, E, H, L, (HL), A.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operand8 {
    B,
    C,
    D,
    E,
    H,
    L,
    HlInd,
    A,
    /// 8-bit immediate following the opcode.
    Imm,
    BcInd,
    DeInd,
    /// (HL), then HL += 1.
    HlInc,
    /// (HL), then HL -= 1.
    HlDec,
    /// (a16) with a 16-bit immediate address.
    Abs,
    /// ($FF00 + a8).
    HighImm,
    /// ($FF00 + C).
    HighC,
}

impl Operand8 {
    pub const fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => Operand8::B,
            1 => Operand8::C,
            2 => Operand8::D,
            3 => Operand8::E,
            4 => Operand8::H,
            5 => Operand8::L,
            6 => Operand8::HlInd,
            _ => Operand8::A,
        }
    }

    /// True for operands that cost a bus access on top of the opcode fetch.
    pub const fn is_memory(self) -> bool {
        !matches!(
            self,
            Operand8::B
                | Operand8::C
                | Operand8::D
                | Operand8::E
                | Operand8::H
                | Operand8::L
                | Operand8::A
        )
    }
}

/// 16-bit register pairs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reg16 {
    BC,
    DE,
    HL,
    SP,
    AF,
}

impl Reg16 {
    /// `rp` table: BC, DE, HL, SP.
    const fn rp(p: u8) -> Self {
        match p & 0x03 {
            0 => Reg16::BC,
            1 => Reg16::DE,
            2 => Reg16::HL,
            _ => Reg16::SP,
        }
    }

    /// `rp2` table used by PUSH/POP: BC, DE, HL, AF.
    const fn rp2(p: u8) -> Self {
        match p & 0x03 {
            0 => Reg16::BC,
            1 => Reg16::DE,
            2 => Reg16::HL,
            _ => Reg16::AF,
        }
    }
}

/// Branch conditions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cond {
    Always,
    NZ,
    Z,
    NC,
    C,
}

impl Cond {
    const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Cond::NZ,
            1 => Cond::Z,
            2 => Cond::NC,
            _ => Cond::C,
        }
    }
}

/// The eight accumulator operations of the `x = 2` block.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    const fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

/// Operation performed by a base opcode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    /// $CB: the next byte selects an entry of [`CB_OPCODES`].
    Prefix,
    /// One of the eleven holes in the opcode map.
    Undefined,
    /// `LD dst, src`.
    Ld(Operand8, Operand8),
    /// `LD rr, d16`.
    Ld16(Reg16),
    /// `LD (a16), SP`.
    LdAbsSp,
    LdSpHl,
    /// `LD HL, SP+r8`.
    LdHlSpOffset,
    Inc(Operand8),
    Dec(Operand8),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),
    /// `ADD SP, r8`.
    AddSpOffset,
    Alu(AluOp, Operand8),
    Rlca,
    Rrca,
    Rla,
    Rra,
    Daa,
    Cpl,
    Scf,
    Ccf,
    Jp(Cond),
    JpHl,
    Jr(Cond),
    Call(Cond),
    Ret(Cond),
    Reti,
    Rst(u8),
    Push(Reg16),
    Pop(Reg16),
}

/// Descriptor of one base opcode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Instr {
    pub opcode: u8,
    pub op: Op,
    /// Instruction length in bytes, opcode included.
    pub len: u8,
    /// M-cycles when the branch is not taken (or for unconditional ops).
    pub cycles: u8,
    /// M-cycles when a conditional branch is taken.
    pub cycles_taken: u8,
}

impl Instr {
    const fn new(opcode: u8, op: Op, len: u8, cycles: u8) -> Self {
        Self {
            opcode,
            op,
            len,
            cycles,
            cycles_taken: cycles,
        }
    }

    const fn branch(opcode: u8, op: Op, len: u8, cycles: u8, cycles_taken: u8) -> Self {
        Self {
            opcode,
            op,
            len,
            cycles,
            cycles_taken,
        }
    }
}

/// Base opcode table, indexed by opcode byte.
pub static OPCODES: [Instr; 256] = build_base_table();

/// CB-prefixed opcode table, indexed by the byte after $CB.
pub static CB_OPCODES: [CbInstr; 256] = build_cb_table();

const fn build_base_table() -> [Instr; 256] {
    let mut table = [Instr::new(0, Op::Nop, 1, 1); 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode(i as u8);
        i += 1;
    }
    table
}

const fn build_cb_table() -> [CbInstr; 256] {
    let mut table = [decode_cb(0); 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode_cb(i as u8);
        i += 1;
    }
    table
}

const fn decode(opcode: u8) -> Instr {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    match x {
        0 => decode_block0(opcode, y, z, p, q),
        1 => {
            if y == 6 && z == 6 {
                Instr::new(opcode, Op::Halt, 1, 1)
            } else {
                let dst = Operand8::from_index(y);
                let src = Operand8::from_index(z);
                let cycles = if dst.is_memory() || src.is_memory() {
                    2
                } else {
                    1
                };
                Instr::new(opcode, Op::Ld(dst, src), 1, cycles)
            }
        }
        2 => {
            let src = Operand8::from_index(z);
            let cycles = if src.is_memory() { 2 } else { 1 };
            Instr::new(opcode, Op::Alu(AluOp::from_index(y), src), 1, cycles)
        }
        _ => decode_block3(opcode, y, z, p, q),
    }
}

const fn decode_block0(opcode: u8, y: u8, z: u8, p: u8, q: u8) -> Instr {
    match z {
        0 => match y {
            0 => Instr::new(opcode, Op::Nop, 1, 1),
            1 => Instr::new(opcode, Op::LdAbsSp, 3, 5),
            2 => Instr::new(opcode, Op::Stop, 2, 1),
            3 => Instr::new(opcode, Op::Jr(Cond::Always), 2, 3),
            _ => Instr::branch(opcode, Op::Jr(Cond::from_index(y - 4)), 2, 2, 3),
        },
        1 => {
            if q == 0 {
                Instr::new(opcode, Op::Ld16(Reg16::rp(p)), 3, 3)
            } else {
                Instr::new(opcode, Op::AddHl(Reg16::rp(p)), 1, 2)
            }
        }
        2 => {
            let mem = match p {
                0 => Operand8::BcInd,
                1 => Operand8::DeInd,
                2 => Operand8::HlInc,
                _ => Operand8::HlDec,
            };
            if q == 0 {
                Instr::new(opcode, Op::Ld(mem, Operand8::A), 1, 2)
            } else {
                Instr::new(opcode, Op::Ld(Operand8::A, mem), 1, 2)
            }
        }
        3 => {
            if q == 0 {
                Instr::new(opcode, Op::Inc16(Reg16::rp(p)), 1, 2)
            } else {
                Instr::new(opcode, Op::Dec16(Reg16::rp(p)), 1, 2)
            }
        }
        4 | 5 => {
            let target = Operand8::from_index(y);
            let cycles = if target.is_memory() { 3 } else { 1 };
            let op = if z == 4 {
                Op::Inc(target)
            } else {
                Op::Dec(target)
            };
            Instr::new(opcode, op, 1, cycles)
        }
        6 => {
            let dst = Operand8::from_index(y);
            let cycles = if dst.is_memory() { 3 } else { 2 };
            Instr::new(opcode, Op::Ld(dst, Operand8::Imm), 2, cycles)
        }
        _ => {
            let op = match y {
                0 => Op::Rlca,
                1 => Op::Rrca,
                2 => Op::Rla,
                3 => Op::Rra,
                4 => Op::Daa,
                5 => Op::Cpl,
                6 => Op::Scf,
                _ => Op::Ccf,
            };
            Instr::new(opcode, op, 1, 1)
        }
    }
}

const fn decode_block3(opcode: u8, y: u8, z: u8, p: u8, q: u8) -> Instr {
    match z {
        0 => match y {
            0..=3 => Instr::branch(opcode, Op::Ret(Cond::from_index(y)), 1, 2, 5),
            4 => Instr::new(opcode, Op::Ld(Operand8::HighImm, Operand8::A), 2, 3),
            5 => Instr::new(opcode, Op::AddSpOffset, 2, 4),
            6 => Instr::new(opcode, Op::Ld(Operand8::A, Operand8::HighImm), 2, 3),
            _ => Instr::new(opcode, Op::LdHlSpOffset, 2, 3),
        },
        1 => {
            if q == 0 {
                Instr::new(opcode, Op::Pop(Reg16::rp2(p)), 1, 3)
            } else {
                match p {
                    0 => Instr::new(opcode, Op::Ret(Cond::Always), 1, 4),
                    1 => Instr::new(opcode, Op::Reti, 1, 4),
                    2 => Instr::new(opcode, Op::JpHl, 1, 1),
                    _ => Instr::new(opcode, Op::LdSpHl, 1, 2),
                }
            }
        }
        2 => match y {
            0..=3 => Instr::branch(opcode, Op::Jp(Cond::from_index(y)), 3, 3, 4),
            4 => Instr::new(opcode, Op::Ld(Operand8::HighC, Operand8::A), 1, 2),
            5 => Instr::new(opcode, Op::Ld(Operand8::Abs, Operand8::A), 3, 4),
            6 => Instr::new(opcode, Op::Ld(Operand8::A, Operand8::HighC), 1, 2),
            _ => Instr::new(opcode, Op::Ld(Operand8::A, Operand8::Abs), 3, 4),
        },
        3 => match y {
            0 => Instr::new(opcode, Op::Jp(Cond::Always), 3, 4),
            // Cycle count comes from the CB table.
            1 => Instr::new(opcode, Op::Prefix, 2, 0),
            6 => Instr::new(opcode, Op::Di, 1, 1),
            7 => Instr::new(opcode, Op::Ei, 1, 1),
            _ => Instr::new(opcode, Op::Undefined, 1, 0),
        },
        4 => match y {
            0..=3 => Instr::branch(opcode, Op::Call(Cond::from_index(y)), 3, 3, 6),
            _ => Instr::new(opcode, Op::Undefined, 1, 0),
        },
        5 => {
            if q == 0 {
                Instr::new(opcode, Op::Push(Reg16::rp2(p)), 1, 4)
            } else if p == 0 {
                Instr::new(opcode, Op::Call(Cond::Always), 3, 6)
            } else {
                Instr::new(opcode, Op::Undefined, 1, 0)
            }
        }
        6 => Instr::new(opcode, Op::Alu(AluOp::from_index(y), Operand8::Imm), 2, 2),
        _ => Instr::new(opcode, Op::Rst(y * 8), 1, 4),
    }
}

impl fmt::Display for Operand8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operand8::B => "B",
            Operand8::C => "C",
            Operand8::D => "D",
            Operand8::E => "E",
            Operand8::H => "H",
            Operand8::L => "L",
            Operand8::HlInd => "(HL)",
            Operand8::A => "A",
            Operand8::Imm => "d8",
            Operand8::BcInd => "(BC)",
            Operand8::DeInd => "(DE)",
            Operand8::HlInc => "(HL+)",
            Operand8::HlDec => "(HL-)",
            Operand8::Abs => "(a16)",
            Operand8::HighImm => "($FF00+a8)",
            Operand8::HighC => "($FF00+C)",
        };
        f.write_str(text)
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Reg16::BC => "BC",
            Reg16::DE => "DE",
            Reg16::HL => "HL",
            Reg16::SP => "SP",
            Reg16::AF => "AF",
        };
        f.write_str(text)
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Cond::Always => "",
            Cond::NZ => "NZ",
            Cond::Z => "Z",
            Cond::NC => "NC",
            Cond::C => "C",
        };
        f.write_str(text)
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        };
        f.write_str(text)
    }
}

/// Writes `MNEMONIC cc,rest` or `MNEMONIC rest` depending on the condition.
fn write_branch(f: &mut fmt::Formatter<'_>, name: &str, cond: Cond, rest: &str) -> fmt::Result {
    match (cond, rest.is_empty()) {
        (Cond::Always, true) => f.write_str(name),
        (Cond::Always, false) => write!(f, "{name} {rest}"),
        (_, true) => write!(f, "{name} {cond}"),
        (_, false) => write!(f, "{name} {cond},{rest}"),
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Op::Nop => f.write_str("NOP"),
            Op::Stop => f.write_str("STOP"),
            Op::Halt => f.write_str("HALT"),
            Op::Di => f.write_str("DI"),
            Op::Ei => f.write_str("EI"),
            Op::Prefix => f.write_str("PREFIX CB"),
            Op::Undefined => f.write_str("??"),
            Op::Ld(dst, src) => write!(f, "LD {dst},{src}"),
            Op::Ld16(rr) => write!(f, "LD {rr},d16"),
            Op::LdAbsSp => f.write_str("LD (a16),SP"),
            Op::LdSpHl => f.write_str("LD SP,HL"),
            Op::LdHlSpOffset => f.write_str("LD HL,SP+r8"),
            Op::Inc(target) => write!(f, "INC {target}"),
            Op::Dec(target) => write!(f, "DEC {target}"),
            Op::Inc16(rr) => write!(f, "INC {rr}"),
            Op::Dec16(rr) => write!(f, "DEC {rr}"),
            Op::AddHl(rr) => write!(f, "ADD HL,{rr}"),
            Op::AddSpOffset => f.write_str("ADD SP,r8"),
            Op::Alu(op, src) => write!(f, "{op}{src}"),
            Op::Rlca => f.write_str("RLCA"),
            Op::Rrca => f.write_str("RRCA"),
            Op::Rla => f.write_str("RLA"),
            Op::Rra => f.write_str("RRA"),
            Op::Daa => f.write_str("DAA"),
            Op::Cpl => f.write_str("CPL"),
            Op::Scf => f.write_str("SCF"),
            Op::Ccf => f.write_str("CCF"),
            Op::Jp(cond) => write_branch(f, "JP", cond, "a16"),
            Op::JpHl => f.write_str("JP HL"),
            Op::Jr(cond) => write_branch(f, "JR", cond, "r8"),
            Op::Call(cond) => write_branch(f, "CALL", cond, "a16"),
            Op::Ret(cond) => write_branch(f, "RET", cond, ""),
            Op::Reti => f.write_str("RETI"),
            Op::Rst(vector) => write!(f, "RST ${vector:02X}"),
            Op::Push(rr) => write!(f, "PUSH {rr}"),
            Op::Pop(rr) => write!(f, "POP {rr}"),
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.op, f)
    }
}
