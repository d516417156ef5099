use thiserror::Error;

/// Smallest image that contains a complete header.
const HEADER_END: usize = 0x150;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum CartridgeError {
    #[error("ROM image is {len} bytes, too short to hold a cartridge header")]
    TooShort { len: usize },

    #[error("header checksum mismatch: header says 0x{expected:02X}, computed 0x{actual:02X}")]
    HeaderChecksum { expected: u8, actual: u8 },

    #[error("invalid ROM size code 0x{code:02X}")]
    InvalidRomSize { code: u8 },

    #[error("header declares {declared} bytes of ROM but the image holds {actual}")]
    Truncated { declared: usize, actual: usize },

    #[error("unsupported cartridge type 0x{code:02X}")]
    UnsupportedType { code: u8 },

    #[error("boot ROM must be 256 bytes, got {len}")]
    BootRomSize { len: usize },
}

/// Parsed cartridge header ($0100–$014F).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CartridgeHeader {
    pub title: String,
    pub cart_type: u8,
    /// ROM size in bytes (`0x8000 << code`).
    pub rom_size: usize,
    /// External RAM size in bytes.
    pub ram_size: usize,
    pub header_checksum: u8,
    pub global_checksum: u16,
}

/// Header checksum over $0134–$014C as computed by the boot ROM.
pub fn header_checksum(rom: &[u8]) -> u8 {
    rom[0x134..=0x14C]
        .iter()
        .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1))
}

/// Sum of every ROM byte except the two global checksum bytes.
fn global_checksum(rom: &[u8]) -> u16 {
    rom.iter()
        .enumerate()
        .filter(|&(i, _)| i != 0x14E && i != 0x14F)
        .fold(0u16, |sum, (_, &b)| sum.wrapping_add(b as u16))
}

impl CartridgeHeader {
    /// Parse and validate the header of a full ROM image.
    ///
    /// A bad header checksum is fatal (the boot ROM would lock up); a bad
    /// global checksum is only logged, as on hardware.
    pub fn parse(rom: &[u8]) -> Result<Self, CartridgeError> {
        if rom.len() < HEADER_END {
            return Err(CartridgeError::TooShort { len: rom.len() });
        }

        let expected = rom[0x14D];
        let actual = header_checksum(rom);
        if expected != actual {
            return Err(CartridgeError::HeaderChecksum { expected, actual });
        }

        let rom_code = rom[0x148];
        if rom_code > 0x08 {
            return Err(CartridgeError::InvalidRomSize { code: rom_code });
        }
        let rom_size = 0x8000usize << rom_code;
        if rom.len() < rom_size {
            return Err(CartridgeError::Truncated {
                declared: rom_size,
                actual: rom.len(),
            });
        }
        if rom.len() > rom_size {
            log::warn!(
                "ROM image is {} bytes, header declares {}; extra data ignored by banking",
                rom.len(),
                rom_size
            );
        }

        let ram_size = match rom[0x149] {
            0x01 => 0x800,
            0x02 => 0x2000,
            0x03 => 0x8000,
            0x04 => 0x20000,
            0x05 => 0x10000,
            _ => 0,
        };

        let global = u16::from_be_bytes([rom[0x14E], rom[0x14F]]);
        let computed = global_checksum(rom);
        if global != computed {
            log::warn!(
                "global checksum mismatch: header says 0x{global:04X}, computed 0x{computed:04X}"
            );
        }

        Ok(Self {
            title: title(rom),
            cart_type: rom[0x147],
            rom_size,
            ram_size,
            header_checksum: expected,
            global_checksum: global,
        })
    }

    pub fn mapper_name(&self) -> &'static str {
        match self.cart_type {
            0x00 => "ROM only",
            0x08 | 0x09 => "ROM+RAM",
            0x01..=0x03 => "MBC1",
            0x05 | 0x06 => "MBC2",
            0x0F..=0x13 => "MBC3",
            0x19..=0x1E => "MBC5",
            _ => "unknown",
        }
    }
}

/// ASCII title at $0134–$0143, cut at the first NUL.
fn title(rom: &[u8]) -> String {
    let raw = &rom[0x134..0x144];
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim().to_string()
}
