use bitflags::bitflags;

/// Sprites in OAM.
pub(crate) const SPRITE_COUNT: usize = 40;
/// Sprites the PPU can show on one scanline.
pub(crate) const SPRITES_PER_LINE: usize = 10;

bitflags! {
    /// Byte 3 of an OAM entry. Bits 3..0 are CGB-only.
    #[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
    pub(crate) struct SpriteAttrs: u8 {
        const PALETTE_1   = 0b0001_0000;
        const FLIP_X      = 0b0010_0000;
        const FLIP_Y      = 0b0100_0000;
        const BEHIND_BG   = 0b1000_0000;
    }
}

/// One decoded OAM entry in screen coordinates.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Sprite {
    /// Top row on screen (OAM Y − 16).
    pub(crate) y: i16,
    /// Left column on screen (OAM X − 8).
    pub(crate) x: i16,
    pub(crate) tile: u8,
    pub(crate) attrs: SpriteAttrs,
    /// Position in OAM, used to break ties between equal X.
    pub(crate) index: u8,
}

/// Object attribute memory ($FE00–$FE9F).
pub(crate) struct Oam {
    bytes: [u8; SPRITE_COUNT * 4],
}

impl Default for Oam {
    fn default() -> Self {
        Self {
            bytes: [0; SPRITE_COUNT * 4],
        }
    }
}

impl Oam {
    #[inline]
    pub(crate) fn read(&self, addr: u16) -> u8 {
        self.bytes
            .get((addr & 0xFF) as usize)
            .copied()
            .unwrap_or(0xFF)
    }

    #[inline]
    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        if let Some(slot) = self.bytes.get_mut((addr & 0xFF) as usize) {
            *slot = value;
        }
    }

    pub(crate) fn sprite(&self, index: usize) -> Sprite {
        let entry = &self.bytes[index * 4..index * 4 + 4];
        Sprite {
            y: entry[0] as i16 - 16,
            x: entry[1] as i16 - 8,
            tile: entry[2],
            attrs: SpriteAttrs::from_bits_truncate(entry[3]),
            index: index as u8,
        }
    }

    /// First [`SPRITES_PER_LINE`] sprites, in OAM order, whose rows
    /// cover `ly`.
    pub(crate) fn scan_line(&self, ly: u8, height: u8, out: &mut Vec<Sprite>) {
        out.clear();
        let ly = ly as i16;
        for index in 0..SPRITE_COUNT {
            let sprite = self.sprite(index);
            if ly >= sprite.y && ly < sprite.y + height as i16 {
                out.push(sprite);
                if out.len() == SPRITES_PER_LINE {
                    break;
                }
            }
        }
    }
}
