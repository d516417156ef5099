use super::GameBoyBus;

/// Bytes copied by one OAM DMA.
const OAM_DMA_LEN: u16 = 0xA0;

impl GameBoyBus {
    /// OAM DMA: copy `value << 8 ..= value << 8 | 0x9F` into $FE00–$FE9F.
    ///
    /// The 160 M-cycle transfer is collapsed into this write, so the CPU
    /// never observes the bus conflict window.
    pub(super) fn start_oam_dma(&mut self, value: u8) {
        self.dma = value;
        let base = (value as u16) << 8;
        log::debug!("OAM DMA from 0x{base:04X}");
        for i in 0..OAM_DMA_LEN {
            let byte = self.dma_source_read(base.wrapping_add(i));
            self.ppu.write_oam(0xFE00 + i, byte);
        }
    }

    /// DMA reads on its own path: sources from $E000 upward alias WRAM
    /// instead of reaching OAM or I/O.
    fn dma_source_read(&self, addr: u16) -> u8 {
        match addr {
            0xC000..=0xFFFF => self.wram[(addr as usize - 0xC000) & 0x1FFF],
            _ => self.read8_mmio(addr),
        }
    }
}
