use super::{Cpu, CpuMode, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU in the state the DMG boot ROM leaves behind at $0100.
    pub fn new() -> Self {
        let mut cpu = Self::power_on();
        cpu.apply_dmg_boot_state();
        cpu
    }

    /// CPU in its raw power-on state, for running a boot ROM from $0000.
    pub fn power_on() -> Self {
        Self {
            regs: Registers::default(),
            ime: false,
            mode: CpuMode::Running,
            halt_bug: false,
            ei_delay: 0,
            locked: false,
        }
    }

    /// Reset to the post-boot state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Initialize registers to match the DMG boot ROM's state after it
    /// hands control to cartridge code.
    ///
    /// Values follow Pan Docs ("Power Up Sequence") for the DMG.
    fn apply_dmg_boot_state(&mut self) {
        self.regs.a = 0x01;
        self.regs.f = 0xB0; // Z=1 N=0 H=1 C=1
        self.regs.b = 0x00;
        self.regs.c = 0x13;
        self.regs.d = 0x00;
        self.regs.e = 0xD8;
        self.regs.h = 0x01;
        self.regs.l = 0x4D;
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;

        // IME is clear when control reaches the cartridge entry point.
        self.ime = false;
    }
}
