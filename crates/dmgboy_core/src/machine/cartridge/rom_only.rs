use super::{ram_offset, read_rom_bank, Cartridge, RAM_BANK_SIZE};

/// 32 KiB cartridge without a mapper, optionally with up to 8 KiB of RAM
/// at $A000–$BFFF.
pub struct RomOnly {
    rom: Vec<u8>,
    ram: Vec<u8>,
}

impl RomOnly {
    pub fn new(rom: Vec<u8>) -> Self {
        Self::with_ram(rom, 0)
    }

    pub fn with_ram(rom: Vec<u8>, ram_size: usize) -> Self {
        Self {
            rom,
            ram: vec![0xFF; ram_size.min(RAM_BANK_SIZE)],
        }
    }
}

impl Cartridge for RomOnly {
    fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x3FFF => read_rom_bank(&self.rom, 0, addr),
            0x4000..=0x7FFF => read_rom_bank(&self.rom, 1, addr),
            0xA000..=0xBFFF => ram_offset(&self.ram, 0, addr)
                .map(|offset| self.ram[offset])
                .unwrap_or(0xFF),
            _ => 0xFF,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let 0xA000..=0xBFFF = addr {
            if let Some(offset) = ram_offset(&self.ram, 0, addr) {
                self.ram[offset] = value;
            }
        }
    }
}
