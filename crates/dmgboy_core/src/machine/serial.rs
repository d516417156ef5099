use super::interrupts::InterruptFlags;

/// A peer on the link port.
///
/// One call is one full 8-bit exchange: the byte shifted out of SB goes in,
/// the byte shifted into SB comes back.
pub trait SerialDevice: Send {
    fn transfer(&mut self, byte_out: u8) -> u8;
}

/// Serial port modelled via SB/SC.
///
/// Transfers are collapsed: when SC is written with the start bit and the
/// internal clock selected, the byte is exchanged at once, SC bit 7 clears
/// and the serial interrupt is requested. Every byte sent is also appended
/// to `output` until the host takes it; test ROMs report their results
/// this way.
#[derive(Default)]
pub(crate) struct Serial {
    pub(crate) sb: u8,
    sc: u8,
    device: Option<Box<dyn SerialDevice>>,
    pub(crate) output: Vec<u8>,
}

impl Serial {
    pub(crate) fn attach(&mut self, device: Box<dyn SerialDevice>) {
        self.device = Some(device);
    }

    pub(crate) fn detach(&mut self) -> Option<Box<dyn SerialDevice>> {
        self.device.take()
    }

    pub(crate) fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    pub(crate) fn read_sc(&self) -> u8 {
        // Bits 6..1 are unused and read as 1.
        self.sc | 0x7E
    }

    pub(crate) fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    pub(crate) fn write_sc(&mut self, value: u8, if_reg: &mut InterruptFlags) {
        self.sc = value & 0x81;
        // Start bit with internal clock.
        if self.sc == 0x81 {
            let out = self.sb;
            self.output.push(out);
            // A disconnected link shifts in zeroes.
            self.sb = match self.device.as_mut() {
                Some(device) => device.transfer(out),
                None => 0x00,
            };
            self.sc &= !0x80;
            if_reg.insert(InterruptFlags::SERIAL);
        }
    }
}
