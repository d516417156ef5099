use crate::SCREEN_WIDTH;

use super::oam::SpriteAttrs;
use super::vram::TileAddressing;
use super::{Lcdc, Ppu};

impl Ppu {
    /// Composite scanline `LY` into the framebuffer.
    pub(super) fn render_scanline(&mut self) {
        let ly = self.ly;
        let row_start = ly as usize * SCREEN_WIDTH;
        // Colour indices before BGP, needed for sprite priority.
        let mut bg_colors = [0u8; SCREEN_WIDTH];

        self.render_background(&mut bg_colors);
        self.render_window(&mut bg_colors);

        let row = &mut self.framebuffer[row_start..row_start + SCREEN_WIDTH];
        for (pixel, &color) in row.iter_mut().zip(bg_colors.iter()) {
            *pixel = self.bgp.shade(color);
        }

        if self.lcdc.contains(Lcdc::OBJ_ENABLE) {
            self.render_sprites(&bg_colors);
        }
    }

    #[inline]
    fn addressing(&self) -> TileAddressing {
        if self.lcdc.contains(Lcdc::TILE_DATA_8000) {
            TileAddressing::Unsigned
        } else {
            TileAddressing::Signed
        }
    }

    fn render_background(&self, colors: &mut [u8; SCREEN_WIDTH]) {
        if !self.lcdc.contains(Lcdc::BG_WINDOW_ENABLE) {
            return;
        }
        let addressing = self.addressing();
        let high_map = self.lcdc.contains(Lcdc::BG_MAP_HIGH);
        let map_y = self.ly.wrapping_add(self.scy);

        for (x, color) in colors.iter_mut().enumerate() {
            let map_x = (x as u8).wrapping_add(self.scx);
            let entry = self.vram.map_entry(high_map, map_x / 8, map_y / 8);
            let tile = addressing.tile_index(entry);
            *color = self.vram.tile_pixel(tile, map_x % 8, map_y % 8);
        }
    }

    fn render_window(&mut self, colors: &mut [u8; SCREEN_WIDTH]) {
        let enabled = self.lcdc.contains(Lcdc::BG_WINDOW_ENABLE | Lcdc::WINDOW_ENABLE);
        if !enabled || self.ly < self.wy || self.wx > 166 {
            return;
        }

        let addressing = self.addressing();
        let high_map = self.lcdc.contains(Lcdc::WINDOW_MAP_HIGH);
        let window_y = self.window_line;
        // Screen X where the window starts; WX < 7 clips its left edge.
        let start = self.wx as i16 - 7;

        for (x, color) in colors.iter_mut().enumerate() {
            let window_x = x as i16 - start;
            if window_x < 0 {
                continue;
            }
            let window_x = window_x as u8;
            let entry = self.vram.map_entry(high_map, window_x / 8, window_y / 8);
            let tile = addressing.tile_index(entry);
            *color = self.vram.tile_pixel(tile, window_x % 8, window_y % 8);
        }
        self.window_line = self.window_line.wrapping_add(1);
    }

    fn render_sprites(&mut self, bg_colors: &[u8; SCREEN_WIDTH]) {
        let ly = self.ly as i16;
        let height = self.lcdc.sprite_height() as i16;

        // Lower X wins; OAM order breaks ties.
        self.line_sprites.sort_by_key(|sprite| (sprite.x, sprite.index));

        let row_start = self.ly as usize * SCREEN_WIDTH;
        for x in 0..SCREEN_WIDTH as i16 {
            for sprite in self.line_sprites.iter().filter(|s| x >= s.x && x < s.x + 8) {
                let mut row = ly - sprite.y;
                if sprite.attrs.contains(SpriteAttrs::FLIP_Y) {
                    row = height - 1 - row;
                }
                let mut col = x - sprite.x;
                if sprite.attrs.contains(SpriteAttrs::FLIP_X) {
                    col = 7 - col;
                }

                let tile = if height == 16 {
                    (sprite.tile & 0xFE) as usize + (row / 8) as usize
                } else {
                    sprite.tile as usize
                };
                let color = self.vram.tile_pixel(tile, col as u8, (row % 8) as u8);
                if color == 0 {
                    continue;
                }

                let bg = bg_colors[x as usize];
                if !sprite.attrs.contains(SpriteAttrs::BEHIND_BG) || bg == 0 {
                    let palette = if sprite.attrs.contains(SpriteAttrs::PALETTE_1) {
                        self.obp1
                    } else {
                        self.obp0
                    };
                    self.framebuffer[row_start + x as usize] = palette.shade(color);
                }
                break;
            }
        }
    }
}
