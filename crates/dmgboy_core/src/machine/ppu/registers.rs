use bitflags::bitflags;

bitflags! {
    /// LCDC ($FF40).
    #[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
    pub(crate) struct Lcdc: u8 {
        const BG_WINDOW_ENABLE = 0b0000_0001;
        const OBJ_ENABLE       = 0b0000_0010;
        const OBJ_TALL         = 0b0000_0100;
        const BG_MAP_HIGH      = 0b0000_1000;
        const TILE_DATA_8000   = 0b0001_0000;
        const WINDOW_ENABLE    = 0b0010_0000;
        const WINDOW_MAP_HIGH  = 0b0100_0000;
        const LCD_ENABLE       = 0b1000_0000;
    }
}

bitflags! {
    /// Writable interrupt-select bits of STAT ($FF41).
    #[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
    pub(crate) struct StatEnable: u8 {
        const HBLANK  = 0b0000_1000;
        const VBLANK  = 0b0001_0000;
        const OAM     = 0b0010_0000;
        const LYC     = 0b0100_0000;
    }
}

impl Lcdc {
    #[inline]
    pub(crate) fn sprite_height(self) -> u8 {
        if self.contains(Lcdc::OBJ_TALL) {
            16
        } else {
            8
        }
    }
}

/// PPU mode as reported in STAT bits 1..0.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub(crate) enum Mode {
    #[default]
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Drawing = 3,
}

/// BGP/OBP0/OBP1: four 2-bit shades, colour index 0 in bits 1..0.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Palette(pub(crate) u8);

impl Palette {
    #[inline]
    pub(crate) fn shade(self, color: u8) -> u8 {
        (self.0 >> ((color & 0x03) * 2)) & 0x03
    }
}
