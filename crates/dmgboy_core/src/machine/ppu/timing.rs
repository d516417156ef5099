use super::super::interrupts::InterruptFlags;
use super::{Lcdc, Mode, Ppu, StatEnable};

/// T-cycles in one scanline.
pub(super) const LINE_CYCLES: u16 = 456;
/// First T-cycle of mode 3.
const DRAWING_START: u16 = 80;
/// First T-cycle of mode 0.
const HBLANK_START: u16 = 252;
/// First V-blank line.
const VBLANK_LINE: u8 = 144;
/// Lines per frame, V-blank included.
const LINES_PER_FRAME: u8 = 154;

impl Ppu {
    /// Advance the PPU by one T-cycle.
    pub(crate) fn step_tcycle(&mut self, if_reg: &mut InterruptFlags) {
        if !self.lcd_enabled() {
            return;
        }

        self.line_cycle += 1;
        if self.line_cycle == LINE_CYCLES {
            self.line_cycle = 0;
            self.next_line(if_reg);
            return;
        }

        if self.ly >= VBLANK_LINE {
            return;
        }
        match self.line_cycle {
            DRAWING_START => {
                self.mode = Mode::Drawing;
                let height = self.lcdc.sprite_height();
                self.oam.scan_line(self.ly, height, &mut self.line_sprites);
                self.render_scanline();
            }
            HBLANK_START => self.mode = Mode::HBlank,
            _ => return,
        }
        self.update_stat_line(if_reg);
    }

    fn next_line(&mut self, if_reg: &mut InterruptFlags) {
        self.ly += 1;
        if self.ly == LINES_PER_FRAME {
            self.ly = 0;
            self.window_line = 0;
        }

        if self.ly == VBLANK_LINE {
            self.mode = Mode::VBlank;
            self.frame_ready = true;
            self.frames += 1;
            if_reg.insert(InterruptFlags::VBLANK);
            // DMG raises STAT at V-blank entry when the OAM source is on.
            if self.stat_enable.contains(StatEnable::OAM) {
                if_reg.insert(InterruptFlags::LCD_STAT);
            }
        } else if self.ly < VBLANK_LINE {
            self.mode = Mode::OamScan;
        }
        self.update_stat_line(if_reg);
    }

    /// Recompute the STAT interrupt line and request INT $48 on a rising
    /// edge.
    pub(super) fn update_stat_line(&mut self, if_reg: &mut InterruptFlags) {
        if !self.lcd_enabled() {
            self.stat_line = false;
            return;
        }

        let enable = self.stat_enable;
        let line = (enable.contains(StatEnable::LYC) && self.ly == self.lyc)
            || (enable.contains(StatEnable::HBLANK) && self.mode == Mode::HBlank)
            || (enable.contains(StatEnable::VBLANK) && self.mode == Mode::VBlank)
            || (enable.contains(StatEnable::OAM) && self.mode == Mode::OamScan);

        if line && !self.stat_line {
            if_reg.insert(InterruptFlags::LCD_STAT);
        }
        self.stat_line = line;
    }

    /// LCDC write; bit 7 switches the whole unit on or off.
    pub(super) fn write_lcdc(&mut self, value: u8) {
        let was_on = self.lcd_enabled();
        self.lcdc = Lcdc::from_bits_retain(value);
        let now_on = self.lcd_enabled();

        if was_on && !now_on {
            log::debug!("LCD off at LY={}", self.ly);
            self.ly = 0;
            self.line_cycle = 0;
            self.mode = Mode::HBlank;
            self.stat_line = false;
            self.framebuffer.fill(0);
        } else if !was_on && now_on {
            log::debug!("LCD on");
            self.ly = 0;
            self.line_cycle = 0;
            self.window_line = 0;
            self.mode = Mode::OamScan;
        }
    }
}
