mod read;
mod write;

use super::GameBoyBus;

impl GameBoyBus {
    /// Route a CPU read through the memory map.
    pub(super) fn read8_mmio(&self, addr: u16) -> u8 {
        if let Some(boot_rom) = self.boot_rom.as_deref() {
            if (addr as usize) < boot_rom.len() {
                return boot_rom[addr as usize];
            }
        }

        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => self.cartridge_read(addr),
            0x8000..=0x9FFF => self.ppu.read_vram(addr),
            0xC000..=0xFDFF => self.wram[(addr as usize - 0xC000) & 0x1FFF],
            0xFE00..=0xFE9F => self.ppu.read_oam(addr),
            // Unusable region.
            0xFEA0..=0xFEFF => 0xFF,
            0xFF00..=0xFF7F => self.read_io(addr),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],
            0xFFFF => self.ie_reg,
        }
    }

    /// Route a CPU write through the memory map.
    pub(super) fn write8_mmio(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => {
                if let Some(cart) = self.cartridge.as_mut() {
                    cart.write(addr, value);
                }
            }
            0x8000..=0x9FFF => self.ppu.write_vram(addr, value),
            // Echo RAM aliases WRAM both ways.
            0xC000..=0xFDFF => self.wram[(addr as usize - 0xC000) & 0x1FFF] = value,
            0xFE00..=0xFE9F => self.ppu.write_oam(addr, value),
            0xFEA0..=0xFEFF => {}
            0xFF00..=0xFF7F => self.write_io(addr, value),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = value,
            0xFFFF => self.ie_reg = value,
        }
    }

    /// Without a cartridge the slot floats high.
    #[inline]
    fn cartridge_read(&self, addr: u16) -> u8 {
        self.cartridge.as_ref().map_or(0xFF, |cart| cart.read(addr))
    }
}
