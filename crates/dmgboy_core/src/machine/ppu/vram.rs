/// Video RAM ($8000–$9FFF).
///
/// Tiles are decoded on demand from the raw bytes, so there is no cached
/// view to invalidate on writes.
pub(crate) struct Vram {
    bytes: Box<[u8; 0x2000]>,
}

/// How a tile-map entry selects one of the 384 tiles.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum TileAddressing {
    /// Unsigned entry, tiles 0..=255 from $8000.
    Unsigned,
    /// Signed entry around tile 256 ($9000), tiles 128..=383.
    Signed,
}

impl TileAddressing {
    #[inline]
    pub(crate) fn tile_index(self, entry: u8) -> usize {
        match self {
            TileAddressing::Unsigned => entry as usize,
            TileAddressing::Signed => (256 + entry as i8 as i32) as usize,
        }
    }
}

impl Default for Vram {
    fn default() -> Self {
        Self {
            bytes: Box::new([0; 0x2000]),
        }
    }
}

impl Vram {
    #[inline]
    pub(crate) fn read(&self, addr: u16) -> u8 {
        self.bytes[(addr & 0x1FFF) as usize]
    }

    #[inline]
    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & 0x1FFF) as usize] = value;
    }

    /// Entry (`tx`, `ty`) of the 32×32 map at $9800 (`high == false`) or
    /// $9C00.
    #[inline]
    pub(crate) fn map_entry(&self, high: bool, tx: u8, ty: u8) -> u8 {
        let base = if high { 0x1C00 } else { 0x1800 };
        self.bytes[base + (ty as usize & 31) * 32 + (tx as usize & 31)]
    }

    /// Colour index of pixel (`x`, `y`) in tile `tile` (0..384).
    #[inline]
    pub(crate) fn tile_pixel(&self, tile: usize, x: u8, y: u8) -> u8 {
        let row = tile * 16 + (y as usize & 7) * 2;
        let low = self.bytes[row];
        let high = self.bytes[row + 1];
        let bit = 7 - (x & 7);
        (((high >> bit) & 1) << 1) | ((low >> bit) & 1)
    }
}
