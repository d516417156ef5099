use super::Timer;

impl Timer {
    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF04 => self.div(),
            0xFF05 => self.tima,
            0xFF06 => self.tma,
            0xFF07 => self.tac | 0b1111_1000,
            _ => 0xFF,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF04 => self.write_div(),
            0xFF05 => self.write_tima(value),
            0xFF06 => self.tma = value,
            0xFF07 => self.write_tac(value),
            _ => {}
        }
    }

    /// Writing any value to DIV clears the whole internal counter. If the
    /// selected bit was 1, the reset is a falling edge and TIMA ticks.
    fn write_div(&mut self) {
        if self.last_signal {
            self.increment_tima();
        }
        self.counter = 0;
        self.last_signal = false;
    }

    /// A TIMA write during the overflow window cancels the pending reload
    /// and interrupt.
    fn write_tima(&mut self, value: u8) {
        self.overflow_pending = false;
        self.tima = value;
    }

    /// Disabling the timer or switching the clock source while the selected
    /// input is 1 produces a falling edge and a single TIMA increment.
    fn write_tac(&mut self, value: u8) {
        let old_signal = self.signal();
        self.tac = value & 0x07;
        let new_signal = self.signal();
        if old_signal && !new_signal {
            self.increment_tima();
        }
        self.last_signal = new_signal;
    }
}
