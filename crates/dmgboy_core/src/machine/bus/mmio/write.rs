use super::super::super::interrupts::InterruptFlags;
use super::super::GameBoyBus;

impl GameBoyBus {
    /// $FF00–$FF7F.
    pub(super) fn write_io(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF00 => self.joypad.write(value, &mut self.if_reg),
            0xFF01 => self.serial.write_sb(value),
            0xFF02 => self.serial.write_sc(value, &mut self.if_reg),
            0xFF04..=0xFF07 => self.timer.write(addr, value),
            0xFF0F => self.if_reg = InterruptFlags::from_write(value),
            0xFF46 => self.start_oam_dma(value),
            0xFF40..=0xFF4B => self.ppu.write_register(addr, value, &mut self.if_reg),
            0xFF50 => {
                if value != 0 && self.boot_rom.take().is_some() {
                    log::info!("boot ROM unmapped");
                }
            }
            _ => self.io[(addr & 0x7F) as usize] = value,
        }
    }
}
