use super::{Bus, Cpu, CpuMode};

/// Address of the interrupt flag register.
pub(super) const IF_ADDR: u16 = 0xFF0F;
/// Address of the interrupt enable register.
pub(super) const IE_ADDR: u16 = 0xFFFF;

/// M-cycles spent dispatching an interrupt.
const DISPATCH_CYCLES: u32 = 5;

impl Cpu {
    /// `IF & IE` restricted to the five interrupt sources.
    #[inline]
    pub(super) fn pending_interrupts<B: Bus>(&self, bus: &mut B) -> u8 {
        bus.read8(IE_ADDR) & bus.read8(IF_ADDR) & 0x1F
    }

    /// Handle maskable interrupts if IME is set and a pending interrupt
    /// exists. Returns `Some(cycles)` if an interrupt was taken.
    ///
    /// A halted CPU with IME clear wakes up here without servicing.
    pub(super) fn handle_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        if self.pending_interrupts(bus) == 0 {
            return None;
        }

        if !self.ime {
            if self.mode == CpuMode::Halted {
                self.mode = CpuMode::Running;
            }
            return None;
        }

        self.ime = false;
        self.ei_delay = 0;
        self.mode = CpuMode::Running;

        let pc = self.regs.pc;
        let [lo, hi] = pc.to_le_bytes();

        // Push high byte of PC first. When SP was 0 this lands on IE, so the
        // interrupt line is selected only after this write.
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);

        let pending = self.pending_interrupts(bus);

        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);

        if pending == 0 {
            // IE was cleared by the high-byte push: the dispatch is
            // cancelled and execution continues at $0000.
            self.regs.pc = 0x0000;
            return Some(DISPATCH_CYCLES);
        }

        let index = pending.trailing_zeros() as u16;
        let vector = 0x0040 + index * 8;
        let iflags = bus.read8(IF_ADDR);
        bus.write8(IF_ADDR, iflags & !(1 << index));
        log::debug!(
            "interrupt dispatch: idx={} vector=0x{:04X} pc=0x{:04X} sp=0x{:04X} IF=0x{:02X}",
            index,
            vector,
            pc,
            self.regs.sp,
            iflags & 0x1F,
        );
        self.regs.pc = vector;

        Some(DISPATCH_CYCLES)
    }

    /// Apply the delayed IME change requested by EI.
    #[inline]
    pub(super) fn apply_ime_delay(&mut self) {
        match self.ei_delay {
            2 => self.ei_delay = 1,
            1 => {
                self.ei_delay = 0;
                self.ime = true;
            }
            _ => {}
        }
    }
}
