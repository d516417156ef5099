use bitflags::bitflags;

bitflags! {
    /// The five interrupt sources as laid out in IF ($FF0F) and IE ($FFFF).
    ///
    /// Bit order is also dispatch priority: V-blank first, joypad last.
    #[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
    pub struct InterruptFlags: u8 {
        const VBLANK   = 0b0000_0001;
        const LCD_STAT = 0b0000_0010;
        const TIMER    = 0b0000_0100;
        const SERIAL   = 0b0000_1000;
        const JOYPAD   = 0b0001_0000;
    }
}

impl InterruptFlags {
    /// Value seen by the CPU when reading IF: unused bits read as 1.
    #[inline]
    pub fn read_if(self) -> u8 {
        self.bits() | 0xE0
    }

    /// Only the five source bits are writable.
    #[inline]
    pub fn from_write(value: u8) -> Self {
        Self::from_bits_truncate(value)
    }
}
