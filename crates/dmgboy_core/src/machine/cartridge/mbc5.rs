use super::{ram_bank_count, ram_offset, read_rom_bank, Cartridge, RAM_BANK_SIZE};

/// MBC5 mapper: 9-bit ROM bank (bank 0 is selectable in the upper window)
/// and up to 16 RAM banks. Rumble is not modelled.
pub struct Mbc5 {
    rom: Vec<u8>,
    ram: Vec<u8>,
    rom_bank_low8: u8,
    rom_bank_high1: u8,
    ram_bank: u8,
    ram_enable: bool,
}

impl Mbc5 {
    pub fn new(rom: Vec<u8>, ram_size: usize) -> Self {
        Self {
            rom,
            ram: vec![0xFF; ram_bank_count(ram_size) * RAM_BANK_SIZE],
            rom_bank_low8: 1,
            rom_bank_high1: 0,
            ram_bank: 0,
            ram_enable: false,
        }
    }

    #[inline]
    fn rom_bank(&self) -> usize {
        ((self.rom_bank_high1 as usize) << 8) | self.rom_bank_low8 as usize
    }
}

impl Cartridge for Mbc5 {
    fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x3FFF => read_rom_bank(&self.rom, 0, addr),
            0x4000..=0x7FFF => read_rom_bank(&self.rom, self.rom_bank(), addr),
            0xA000..=0xBFFF if self.ram_enable => {
                ram_offset(&self.ram, self.ram_bank as usize, addr)
                    .map(|offset| self.ram[offset])
                    .unwrap_or(0xFF)
            }
            _ => 0xFF,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = value & 0x0F == 0x0A,
            0x2000..=0x2FFF => self.rom_bank_low8 = value,
            0x3000..=0x3FFF => self.rom_bank_high1 = value & 0x01,
            0x4000..=0x5FFF => self.ram_bank = value & 0x0F,
            0xA000..=0xBFFF if self.ram_enable => {
                if let Some(offset) = ram_offset(&self.ram, self.ram_bank as usize, addr) {
                    self.ram[offset] = value;
                }
            }
            _ => {}
        }
    }
}
