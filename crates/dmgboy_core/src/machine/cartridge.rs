//! Cartridge interface and the mappers behind it.
//!
//! The bus forwards $0000–$7FFF and $A000–$BFFF to a [`Cartridge`]. ROM
//! writes are the mapper control protocol; RAM accesses go to external
//! cartridge RAM when the mapper has it enabled.
mod header;
mod mbc1;
mod mbc3;
mod mbc5;
mod rom_only;

pub use header::{header_checksum, CartridgeError, CartridgeHeader};
pub use mbc1::Mbc1;
pub use mbc3::Mbc3;
pub use mbc5::Mbc5;
pub use rom_only::RomOnly;

/// Size of one switchable ROM bank.
pub(crate) const ROM_BANK_SIZE: usize = 0x4000;
/// Size of one switchable external RAM bank.
pub(crate) const RAM_BANK_SIZE: usize = 0x2000;

/// Memory seen by the CPU through the cartridge slot.
pub trait Cartridge: Send {
    /// Read from $0000–$7FFF (ROM) or $A000–$BFFF (external RAM).
    fn read(&self, addr: u16) -> u8;
    /// Write to $0000–$7FFF (mapper registers) or $A000–$BFFF.
    fn write(&mut self, addr: u16, value: u8);
}

/// Validate the header of `rom` and wrap it in the matching mapper.
pub fn from_rom(rom: Vec<u8>) -> Result<(CartridgeHeader, Box<dyn Cartridge>), CartridgeError> {
    let header = CartridgeHeader::parse(&rom)?;
    log::info!(
        "cartridge '{}': type 0x{:02X} ({}), ROM {} KiB, RAM {} KiB",
        header.title,
        header.cart_type,
        header.mapper_name(),
        header.rom_size / 1024,
        header.ram_size / 1024,
    );

    let ram_size = header.ram_size;
    let cart: Box<dyn Cartridge> = match header.cart_type {
        0x00 | 0x08 | 0x09 => Box::new(RomOnly::with_ram(rom, ram_size)),
        0x01..=0x03 => Box::new(Mbc1::new(rom, ram_size)),
        0x0F..=0x13 => Box::new(Mbc3::new(rom, ram_size)),
        0x19..=0x1E => Box::new(Mbc5::new(rom, ram_size)),
        code => return Err(CartridgeError::UnsupportedType { code }),
    };
    Ok((header, cart))
}

/// Number of 8 KiB RAM banks needed to hold `ram_size` bytes.
#[inline]
pub(crate) fn ram_bank_count(ram_size: usize) -> usize {
    ram_size.div_ceil(RAM_BANK_SIZE)
}

/// Read one byte of `rom` from `bank`, wrapping the bank number to the
/// banks actually present.
#[inline]
pub(crate) fn read_rom_bank(rom: &[u8], bank: usize, addr: u16) -> u8 {
    let banks = (rom.len() / ROM_BANK_SIZE).max(1);
    let index = (bank % banks) * ROM_BANK_SIZE + (addr as usize & 0x3FFF);
    rom.get(index).copied().unwrap_or(0xFF)
}

/// Byte offset into external RAM for `addr` in bank `bank`, or `None` when
/// the cartridge has no RAM.
#[inline]
pub(crate) fn ram_offset(ram: &[u8], bank: usize, addr: u16) -> Option<usize> {
    let banks = ram_bank_count(ram.len());
    if banks == 0 {
        return None;
    }
    let offset = (bank % banks) * RAM_BANK_SIZE + (addr.wrapping_sub(0xA000) as usize & 0x1FFF);
    (offset < ram.len()).then_some(offset)
}
