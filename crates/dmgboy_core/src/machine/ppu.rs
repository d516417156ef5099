//! DMG picture processing unit.
//!
//! The PPU advances one T-cycle at a time through OAM scan (mode 2),
//! drawing (mode 3), H-blank (mode 0) and, for lines 144..=153, V-blank
//! (mode 1). A whole scanline is composited when drawing starts; the
//! result is a 160×144 buffer of shades 0..=3 after palette lookup.
mod oam;
mod registers;
mod render;
mod timing;
mod vram;

use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::interrupts::InterruptFlags;
use oam::{Oam, Sprite, SPRITES_PER_LINE};
use registers::{Lcdc, Mode, Palette, StatEnable};
use vram::Vram;

pub(crate) struct Ppu {
    vram: Vram,
    oam: Oam,
    lcdc: Lcdc,
    stat_enable: StatEnable,
    scy: u8,
    scx: u8,
    ly: u8,
    lyc: u8,
    bgp: Palette,
    obp0: Palette,
    obp1: Palette,
    wy: u8,
    wx: u8,
    mode: Mode,
    /// T-cycle within the current scanline, 0..456.
    line_cycle: u16,
    /// Window row to draw next; advances only on lines that showed it.
    window_line: u8,
    /// Sprites selected by the last OAM scan.
    line_sprites: Vec<Sprite>,
    /// OR of all enabled STAT sources after the last update.
    stat_line: bool,
    framebuffer: Vec<u8>,
    /// Set on V-blank entry; cleared by whoever consumes the frame.
    pub(crate) frame_ready: bool,
    pub(crate) frames: u64,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// Power-on state: LCD off, every register zero.
    pub(crate) fn new() -> Self {
        Self {
            vram: Vram::default(),
            oam: Oam::default(),
            lcdc: Lcdc::empty(),
            stat_enable: StatEnable::empty(),
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: Palette::default(),
            obp0: Palette::default(),
            obp1: Palette::default(),
            wy: 0,
            wx: 0,
            mode: Mode::HBlank,
            line_cycle: 0,
            window_line: 0,
            line_sprites: Vec::with_capacity(SPRITES_PER_LINE),
            stat_line: false,
            framebuffer: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
            frame_ready: false,
            frames: 0,
        }
    }

    /// State left behind by the DMG boot ROM: LCD and BG on, BGP=$FC.
    pub(crate) fn init_dmg(&mut self) {
        self.bgp = Palette(0xFC);
        self.write_lcdc(0x91);
    }

    #[inline]
    pub(crate) fn read_vram(&self, addr: u16) -> u8 {
        self.vram.read(addr)
    }

    #[inline]
    pub(crate) fn write_vram(&mut self, addr: u16, value: u8) {
        self.vram.write(addr, value);
    }

    #[inline]
    pub(crate) fn read_oam(&self, addr: u16) -> u8 {
        self.oam.read(addr)
    }

    #[inline]
    pub(crate) fn write_oam(&mut self, addr: u16, value: u8) {
        self.oam.write(addr, value);
    }

    /// Read one of the LCD registers $FF40–$FF4B (DMA excluded).
    pub(crate) fn read_register(&self, addr: u16) -> u8 {
        match addr {
            0xFF40 => self.lcdc.bits(),
            0xFF41 => self.read_stat(),
            0xFF42 => self.scy,
            0xFF43 => self.scx,
            0xFF44 => self.ly,
            0xFF45 => self.lyc,
            0xFF47 => self.bgp.0,
            0xFF48 => self.obp0.0,
            0xFF49 => self.obp1.0,
            0xFF4A => self.wy,
            0xFF4B => self.wx,
            _ => 0xFF,
        }
    }

    pub(crate) fn write_register(&mut self, addr: u16, value: u8, if_reg: &mut InterruptFlags) {
        match addr {
            0xFF40 => self.write_lcdc(value),
            0xFF41 => {
                self.stat_enable = StatEnable::from_bits_truncate(value);
                self.update_stat_line(if_reg);
            }
            0xFF42 => self.scy = value,
            0xFF43 => self.scx = value,
            // LY is read-only.
            0xFF44 => {}
            0xFF45 => {
                self.lyc = value;
                self.update_stat_line(if_reg);
            }
            0xFF47 => self.bgp = Palette(value),
            0xFF48 => self.obp0 = Palette(value),
            0xFF49 => self.obp1 = Palette(value),
            0xFF4A => self.wy = value,
            0xFF4B => self.wx = value,
            _ => {}
        }
    }

    fn read_stat(&self) -> u8 {
        let coincidence = ((self.ly == self.lyc) as u8) << 2;
        0x80 | self.stat_enable.bits() | coincidence | self.mode as u8
    }

    /// The composited screen, one shade (0..=3) per pixel, row-major.
    #[inline]
    pub(crate) fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    #[inline]
    pub(crate) fn lcd_enabled(&self) -> bool {
        self.lcdc.contains(Lcdc::LCD_ENABLE)
    }

    #[cfg(test)]
    pub(crate) fn ly(&self) -> u8 {
        self.ly
    }

    #[cfg(test)]
    pub(crate) fn mode(&self) -> u8 {
        self.mode as u8
    }
}
