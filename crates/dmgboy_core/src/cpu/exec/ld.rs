use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// `LD (a16),SP`: low byte first.
    pub(super) fn exec_ld_abs_sp<B: Bus>(&mut self, bus: &mut B, cycles: u32) -> u32 {
        let addr = self.fetch16(bus);
        bus.write16(addr, self.regs.sp);
        cycles
    }

    pub(super) fn exec_ld_hl_sp_offset<B: Bus>(&mut self, bus: &mut B, cycles: u32) -> u32 {
        let imm = self.fetch8(bus);
        let value = self.alu_add16_signed(self.regs.sp, imm);
        self.regs.set_hl(value);
        cycles
    }

    pub(super) fn exec_add_sp_offset<B: Bus>(&mut self, bus: &mut B, cycles: u32) -> u32 {
        let imm = self.fetch8(bus);
        self.regs.sp = self.alu_add16_signed(self.regs.sp, imm);
        cycles
    }
}
