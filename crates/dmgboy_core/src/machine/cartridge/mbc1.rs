use super::{ram_bank_count, ram_offset, read_rom_bank, Cartridge, RAM_BANK_SIZE};

/// MBC1 mapper.
///
/// ROM bank = `high2 << 5 | low5` with a zero `low5` read as 1. In mode 1
/// the two high bits also bank $0000–$3FFF and select the RAM bank; in
/// mode 0 both of those stay on bank 0. Battery persistence is not
/// modelled.
pub struct Mbc1 {
    rom: Vec<u8>,
    ram: Vec<u8>,
    rom_bank_low5: u8,
    bank_high2: u8,
    ram_enable: bool,
    advanced_mode: bool,
}

impl Mbc1 {
    pub fn new(rom: Vec<u8>, ram_size: usize) -> Self {
        Self {
            rom,
            ram: vec![0xFF; ram_bank_count(ram_size) * RAM_BANK_SIZE],
            rom_bank_low5: 1,
            bank_high2: 0,
            ram_enable: false,
            advanced_mode: false,
        }
    }

    fn rom_bank(&self, addr: u16) -> usize {
        let high = (self.bank_high2 as usize) << 5;
        if addr < 0x4000 {
            if self.advanced_mode {
                high
            } else {
                0
            }
        } else {
            high | (self.rom_bank_low5.max(1) as usize)
        }
    }

    fn ram_bank(&self) -> usize {
        if self.advanced_mode {
            self.bank_high2 as usize
        } else {
            0
        }
    }
}

impl Cartridge for Mbc1 {
    fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => read_rom_bank(&self.rom, self.rom_bank(addr), addr),
            0xA000..=0xBFFF if self.ram_enable => ram_offset(&self.ram, self.ram_bank(), addr)
                .map(|offset| self.ram[offset])
                .unwrap_or(0xFF),
            _ => 0xFF,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // RAM enable: lower 4 bits must be 0x0A.
            0x0000..=0x1FFF => self.ram_enable = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => self.rom_bank_low5 = value & 0x1F,
            0x4000..=0x5FFF => self.bank_high2 = value & 0x03,
            0x6000..=0x7FFF => self.advanced_mode = value & 0x01 != 0,
            0xA000..=0xBFFF if self.ram_enable => {
                if let Some(offset) = ram_offset(&self.ram, self.ram_bank(), addr) {
                    self.ram[offset] = value;
                }
            }
            _ => {}
        }
    }
}
