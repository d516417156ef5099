use crate::cpu::{Bus, Cond, Cpu, Instr};

impl Cpu {
    /// Cycle cost of a branch instruction depending on whether it was taken.
    #[inline]
    fn branch_cycles(instr: &Instr, taken: bool) -> u32 {
        if taken {
            instr.cycles_taken as u32
        } else {
            instr.cycles as u32
        }
    }

    /// `JP cc,a16`. The target is fetched whether or not the jump happens.
    pub(super) fn exec_jp<B: Bus>(&mut self, bus: &mut B, cond: Cond, instr: &Instr) -> u32 {
        let addr = self.fetch16(bus);
        let taken = self.condition(cond);
        if taken {
            self.regs.pc = addr;
        }
        Self::branch_cycles(instr, taken)
    }

    /// `JR cc,r8`. The displacement is relative to the address following
    /// the operand.
    pub(super) fn exec_jr<B: Bus>(&mut self, bus: &mut B, cond: Cond, instr: &Instr) -> u32 {
        let offset = self.fetch8(bus) as i8;
        let taken = self.condition(cond);
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add(offset as i16 as u16);
        }
        Self::branch_cycles(instr, taken)
    }

    pub(super) fn exec_call<B: Bus>(&mut self, bus: &mut B, cond: Cond, instr: &Instr) -> u32 {
        let addr = self.fetch16(bus);
        let taken = self.condition(cond);
        if taken {
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.regs.pc = addr;
        }
        Self::branch_cycles(instr, taken)
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B, cond: Cond, instr: &Instr) -> u32 {
        let taken = self.condition(cond);
        if taken {
            self.regs.pc = self.pop_u16(bus);
        }
        Self::branch_cycles(instr, taken)
    }
}
