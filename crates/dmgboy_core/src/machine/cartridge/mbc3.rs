use super::{ram_bank_count, ram_offset, read_rom_bank, Cartridge, RAM_BANK_SIZE};

/// MBC3 mapper without the real-time clock.
///
/// 7-bit ROM bank (0 reads as 1) and RAM banks 0–3. Selecting an RTC
/// register (0x08–0x0C) maps nothing: reads return 0xFF and writes are
/// dropped.
pub struct Mbc3 {
    rom: Vec<u8>,
    ram: Vec<u8>,
    rom_bank: u8,
    ram_rtc_select: u8,
    ram_enable: bool,
}

impl Mbc3 {
    pub fn new(rom: Vec<u8>, ram_size: usize) -> Self {
        Self {
            rom,
            ram: vec![0xFF; ram_bank_count(ram_size) * RAM_BANK_SIZE],
            rom_bank: 1,
            ram_rtc_select: 0,
            ram_enable: false,
        }
    }

    /// Selected RAM bank, or `None` when an RTC register is selected.
    fn ram_bank(&self) -> Option<usize> {
        (self.ram_rtc_select <= 0x03).then_some(self.ram_rtc_select as usize)
    }
}

impl Cartridge for Mbc3 {
    fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x3FFF => read_rom_bank(&self.rom, 0, addr),
            0x4000..=0x7FFF => read_rom_bank(&self.rom, self.rom_bank.max(1) as usize, addr),
            0xA000..=0xBFFF if self.ram_enable => self
                .ram_bank()
                .and_then(|bank| ram_offset(&self.ram, bank, addr))
                .map(|offset| self.ram[offset])
                .unwrap_or(0xFF),
            _ => 0xFF,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // RAM / RTC enable.
            0x0000..=0x1FFF => self.ram_enable = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => self.rom_bank = value & 0x7F,
            0x4000..=0x5FFF => self.ram_rtc_select = value,
            // Clock latch; no RTC to latch.
            0x6000..=0x7FFF => {}
            0xA000..=0xBFFF if self.ram_enable => {
                if let Some(offset) = self
                    .ram_bank()
                    .and_then(|bank| ram_offset(&self.ram, bank, addr))
                {
                    self.ram[offset] = value;
                }
            }
            _ => {}
        }
    }
}
