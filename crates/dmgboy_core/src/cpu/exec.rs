mod control;
mod ld;
mod system;

use super::{Bus, Cpu, Flag, Instr, Op};

impl Cpu {
    /// Execute one decoded base instruction whose opcode byte has already
    /// been fetched. Returns the elapsed M-cycles.
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B, instr: &Instr) -> u32 {
        let cycles = instr.cycles as u32;
        match instr.op {
            Op::Nop => cycles,
            Op::Stop => self.exec_stop(bus, cycles),
            Op::Halt => self.exec_halt(bus, cycles),
            Op::Di => self.exec_di(cycles),
            Op::Ei => self.exec_ei(cycles),
            Op::Prefix => self.step_cb(bus),
            Op::Undefined => self.exec_undefined(instr),

            Op::Ld(dst, src) => {
                let value = self.read_operand8(bus, src);
                self.write_operand8(bus, dst, value);
                cycles
            }
            Op::Ld16(rr) => {
                let value = self.fetch16(bus);
                self.write_reg16(rr, value);
                cycles
            }
            Op::LdAbsSp => self.exec_ld_abs_sp(bus, cycles),
            Op::LdSpHl => {
                self.regs.sp = self.regs.hl();
                cycles
            }
            Op::LdHlSpOffset => self.exec_ld_hl_sp_offset(bus, cycles),

            Op::Inc(target) => {
                let value = self.read_operand8(bus, target);
                let result = self.alu_inc8(value);
                self.write_operand8(bus, target, result);
                cycles
            }
            Op::Dec(target) => {
                let value = self.read_operand8(bus, target);
                let result = self.alu_dec8(value);
                self.write_operand8(bus, target, result);
                cycles
            }
            Op::Inc16(rr) => {
                let value = self.read_reg16(rr).wrapping_add(1);
                self.write_reg16(rr, value);
                cycles
            }
            Op::Dec16(rr) => {
                let value = self.read_reg16(rr).wrapping_sub(1);
                self.write_reg16(rr, value);
                cycles
            }
            Op::AddHl(rr) => {
                let value = self.read_reg16(rr);
                self.alu_add16_hl(value);
                cycles
            }
            Op::AddSpOffset => self.exec_add_sp_offset(bus, cycles),
            Op::Alu(op, src) => {
                let value = self.read_operand8(bus, src);
                self.alu(op, value);
                cycles
            }

            Op::Rlca => {
                self.rotate_a(true, false);
                cycles
            }
            Op::Rrca => {
                self.rotate_a(false, false);
                cycles
            }
            Op::Rla => {
                self.rotate_a(true, true);
                cycles
            }
            Op::Rra => {
                self.rotate_a(false, true);
                cycles
            }
            Op::Daa => {
                self.alu_daa();
                cycles
            }
            Op::Cpl => {
                self.regs.a = !self.regs.a;
                self.set_flag(Flag::N, true);
                self.set_flag(Flag::H, true);
                cycles
            }
            Op::Scf => {
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, false);
                self.set_flag(Flag::C, true);
                cycles
            }
            Op::Ccf => {
                let carry = self.get_flag(Flag::C);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, false);
                self.set_flag(Flag::C, !carry);
                cycles
            }

            Op::Jp(cond) => self.exec_jp(bus, cond, instr),
            Op::JpHl => {
                self.regs.pc = self.regs.hl();
                cycles
            }
            Op::Jr(cond) => self.exec_jr(bus, cond, instr),
            Op::Call(cond) => self.exec_call(bus, cond, instr),
            Op::Ret(cond) => self.exec_ret(bus, cond, instr),
            Op::Reti => {
                self.regs.pc = self.pop_u16(bus);
                // Unlike EI there is no one-instruction delay.
                self.ime = true;
                self.ei_delay = 0;
                cycles
            }
            Op::Rst(vector) => {
                let ret = self.regs.pc;
                self.push_u16(bus, ret);
                self.regs.pc = vector as u16;
                cycles
            }
            Op::Push(rr) => {
                let value = self.read_reg16(rr);
                self.push_u16(bus, value);
                cycles
            }
            Op::Pop(rr) => {
                let value = self.pop_u16(bus);
                self.write_reg16(rr, value);
                cycles
            }
        }
    }
}
