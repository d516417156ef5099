use crate::cpu::{Bus, Cpu, CpuMode, Instr};

impl Cpu {
    pub(super) fn exec_halt<B: Bus>(&mut self, bus: &mut B, cycles: u32) -> u32 {
        if !self.ime && self.pending_interrupts(bus) != 0 {
            // HALT bug: the CPU does not halt and the next opcode fetch
            // does not increment PC.
            self.halt_bug = true;
            return cycles;
        }

        self.mode = CpuMode::Halted;
        cycles
    }

    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B, cycles: u32) -> u32 {
        // STOP is a 2-byte instruction; the padding byte is ignored.
        let _padding = self.fetch8(bus);
        self.mode = CpuMode::Stopped;
        cycles
    }

    pub(super) fn exec_di(&mut self, cycles: u32) -> u32 {
        self.ime = false;
        self.ei_delay = 0;
        cycles
    }

    pub(super) fn exec_ei(&mut self, cycles: u32) -> u32 {
        // IME becomes 1 after the *next* instruction completes.
        if !self.ime {
            self.ei_delay = 2;
        }
        cycles
    }

    /// Undefined opcodes hard-lock the DMG. The CPU stays dead until reset.
    pub(super) fn exec_undefined(&mut self, instr: &Instr) -> u32 {
        let pc = self.regs.pc.wrapping_sub(1);
        log::error!(
            "undefined opcode 0x{:02X} at 0x{:04X}; CPU locked",
            instr.opcode,
            pc
        );
        self.locked = true;
        0
    }
}
