use super::super::interrupts::InterruptFlags;
use super::GameBoyBus;

/// Sound register values the DMG boot ROM leaves behind ($FF10–$FF26).
const DMG_SOUND_DEFAULTS: [(u16, u8); 21] = [
    (0xFF10, 0x80),
    (0xFF11, 0xBF),
    (0xFF12, 0xF3),
    (0xFF13, 0xFF),
    (0xFF14, 0xBF),
    (0xFF16, 0x3F),
    (0xFF17, 0x00),
    (0xFF18, 0xFF),
    (0xFF19, 0xBF),
    (0xFF1A, 0x7F),
    (0xFF1B, 0xFF),
    (0xFF1C, 0x9F),
    (0xFF1D, 0xFF),
    (0xFF1E, 0xBF),
    (0xFF20, 0xFF),
    (0xFF21, 0x00),
    (0xFF22, 0x00),
    (0xFF23, 0xBF),
    (0xFF24, 0x77),
    (0xFF25, 0xF3),
    (0xFF26, 0xF1),
];

impl GameBoyBus {
    /// I/O state at PC=$0100 after the DMG boot ROM.
    pub(super) fn apply_dmg_initial_io_state(&mut self) {
        for (addr, value) in DMG_SOUND_DEFAULTS {
            self.io[(addr & 0x7F) as usize] = value;
        }

        self.timer.init_dmg();
        self.ppu.init_dmg();

        // IF reads $E1: a V-blank request is left pending.
        self.if_reg = InterruptFlags::VBLANK;
        self.ie_reg = 0x00;
    }

    /// Fill WRAM and HRAM with deterministic noise.
    ///
    /// Power-on RAM contents are undefined on hardware; a fixed-seed
    /// xorshift keeps runs reproducible without handing software zeroes.
    pub(super) fn randomize_internal_ram(&mut self) {
        let mut x: u32 = 0xC0DE_1234;
        let mut next_byte = || {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x as u8
        };

        for byte in self.wram.iter_mut() {
            *byte = next_byte();
        }
        for byte in self.hram.iter_mut() {
            *byte = next_byte();
        }
    }
}
