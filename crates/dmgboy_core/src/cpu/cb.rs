use std::fmt;

use super::{Bus, Cpu, Flag, Operand8, CB_OPCODES};

/// Operation selected by bits 7..3 of a CB-prefixed opcode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CbOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
    Bit(u8),
    Res(u8),
    Set(u8),
}

/// Descriptor of one CB-prefixed opcode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CbInstr {
    pub opcode: u8,
    pub op: CbOp,
    pub target: Operand8,
    /// M-cycles including the $CB prefix fetch.
    pub cycles: u8,
}

pub(super) const fn decode_cb(opcode: u8) -> CbInstr {
    let y = (opcode >> 3) & 0x07;
    let target = Operand8::from_index(opcode);
    let op = match opcode >> 6 {
        0 => match y {
            0 => CbOp::Rlc,
            1 => CbOp::Rrc,
            2 => CbOp::Rl,
            3 => CbOp::Rr,
            4 => CbOp::Sla,
            5 => CbOp::Sra,
            6 => CbOp::Swap,
            _ => CbOp::Srl,
        },
        1 => CbOp::Bit(y),
        2 => CbOp::Res(y),
        _ => CbOp::Set(y),
    };
    // 2 for registers, 4 for read-modify-write of (HL), 3 for BIT n,(HL).
    let cycles = match (target, op) {
        (Operand8::HlInd, CbOp::Bit(_)) => 3,
        (Operand8::HlInd, _) => 4,
        _ => 2,
    };
    CbInstr {
        opcode,
        op,
        target,
        cycles,
    }
}

impl Cpu {
    /// Handle CB-prefixed instructions (bit operations, shifts, and rotates).
    pub(super) fn step_cb<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let instr = CB_OPCODES[self.fetch8(bus) as usize];
        let value = self.read_operand8(bus, instr.target);

        let result = match instr.op {
            CbOp::Bit(bit) => {
                let bit_set = (value & (1 << bit)) != 0;
                // C is preserved.
                self.set_flag(Flag::Z, !bit_set);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
                return instr.cycles as u32;
            }
            CbOp::Res(bit) => value & !(1 << bit),
            CbOp::Set(bit) => value | (1 << bit),
            shift => self.shift_op(shift, value),
        };

        self.write_operand8(bus, instr.target, result);
        instr.cycles as u32
    }

    /// Rotate/shift/swap on an arbitrary operand with CB flag rules: Z from
    /// the result, N=H=0, C = bit shifted out (cleared for SWAP).
    fn shift_op(&mut self, op: CbOp, value: u8) -> u8 {
        let carry_in = self.get_flag(Flag::C);
        let (result, carry) = match op {
            CbOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            CbOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            CbOp::Rl => ((value << 1) | carry_in as u8, value & 0x80 != 0),
            CbOp::Rr => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
            CbOp::Sla => (value << 1, value & 0x80 != 0),
            CbOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            CbOp::Swap => (value.rotate_left(4), false),
            CbOp::Srl => (value >> 1, value & 0x01 != 0),
            CbOp::Bit(_) | CbOp::Res(_) | CbOp::Set(_) => (value, carry_in),
        };

        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::C, carry);
        result
    }
}

impl fmt::Display for CbInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.target;
        match self.op {
            CbOp::Rlc => write!(f, "RLC {target}"),
            CbOp::Rrc => write!(f, "RRC {target}"),
            CbOp::Rl => write!(f, "RL {target}"),
            CbOp::Rr => write!(f, "RR {target}"),
            CbOp::Sla => write!(f, "SLA {target}"),
            CbOp::Sra => write!(f, "SRA {target}"),
            CbOp::Swap => write!(f, "SWAP {target}"),
            CbOp::Srl => write!(f, "SRL {target}"),
            CbOp::Bit(bit) => write!(f, "BIT {bit},{target}"),
            CbOp::Res(bit) => write!(f, "RES {bit},{target}"),
            CbOp::Set(bit) => write!(f, "SET {bit},{target}"),
        }
    }
}
