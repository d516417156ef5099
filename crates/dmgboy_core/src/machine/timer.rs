//! Divider and timer unit (DIV/TIMA/TMA/TAC).
//!
//! The unit advances once per M-cycle. A hidden 16-bit counter grows by 4
//! per M-cycle and DIV exposes its upper byte. TIMA increments on falling
//! edges of `TAC.enable && counter[bit]`, where the bit is chosen by
//! TAC[1:0]. Overflow leaves TIMA at 0 for one M-cycle before the reload
//! from TMA and the interrupt request.
mod io;

use super::interrupts::InterruptFlags;

pub(crate) struct Timer {
    /// Hidden system counter; DIV exposes bits 15..8.
    pub(super) counter: u16,
    /// TIMA (FF05).
    pub(super) tima: u8,
    /// TMA (FF06).
    pub(super) tma: u8,
    /// TAC raw value (lower 3 bits meaningful).
    pub(super) tac: u8,
    /// Timer input signal sampled at the end of the previous M-cycle.
    last_signal: bool,
    /// Set when TIMA wrapped; the next M-cycle reloads TIMA from TMA and
    /// requests the timer interrupt.
    pub(super) overflow_pending: bool,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub(crate) fn new() -> Self {
        Self {
            counter: 0,
            tima: 0,
            tma: 0,
            tac: 0,
            last_signal: false,
            overflow_pending: false,
        }
    }

    /// DMG state after the boot ROM: DIV reads 0xAB at PC=0x0100.
    pub(crate) fn init_dmg(&mut self) {
        *self = Self::new();
        self.counter = 0xABCC;
    }

    /// Counter bit feeding TIMA for the current TAC speed:
    /// 00 → bit 9, 01 → bit 3, 10 → bit 5, 11 → bit 7.
    #[inline]
    fn input_bit(&self) -> u32 {
        match self.tac & 0x03 {
            0x00 => 9,
            0x01 => 3,
            0x02 => 5,
            _ => 7,
        }
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// The AND of the enable bit and the selected counter bit.
    #[inline]
    fn signal(&self) -> bool {
        self.enabled() && (self.counter >> self.input_bit()) & 1 != 0
    }

    #[inline]
    fn increment_tima(&mut self) {
        let (next, overflow) = self.tima.overflowing_add(1);
        self.tima = next;
        if overflow {
            // TIMA reads 0x00 for one M-cycle before the reload.
            self.overflow_pending = true;
        }
    }

    /// Advance the timer by one M-cycle.
    pub(crate) fn step_mcycle(&mut self, if_reg: &mut InterruptFlags) {
        if self.overflow_pending {
            self.overflow_pending = false;
            self.tima = self.tma;
            if_reg.insert(InterruptFlags::TIMER);
        }

        self.counter = self.counter.wrapping_add(4);

        let signal = self.signal();
        if self.last_signal && !signal {
            self.increment_tima();
        }
        self.last_signal = signal;
    }

    /// DIV as the CPU sees it.
    #[inline]
    pub(crate) fn div(&self) -> u8 {
        (self.counter >> 8) as u8
    }

    #[cfg(test)]
    pub(crate) fn overflow_pending(&self) -> bool {
        self.overflow_pending
    }
}
