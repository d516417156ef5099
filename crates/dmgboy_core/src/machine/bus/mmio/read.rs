use super::super::GameBoyBus;

impl GameBoyBus {
    /// $FF00–$FF7F.
    pub(super) fn read_io(&self, addr: u16) -> u8 {
        match addr {
            0xFF00 => self.joypad.read(),
            0xFF01 => self.serial.sb,
            0xFF02 => self.serial.read_sc(),
            0xFF04..=0xFF07 => self.timer.read(addr),
            0xFF0F => self.if_reg.read_if(),
            0xFF46 => self.dma,
            0xFF40..=0xFF4B => self.ppu.read_register(addr),
            // Boot ROM disable latch is write-only.
            0xFF50 => 0xFF,
            _ => self.io[(addr & 0x7F) as usize],
        }
    }
}
