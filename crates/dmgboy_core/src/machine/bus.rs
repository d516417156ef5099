use super::{
    cartridge::Cartridge, interrupts::InterruptFlags, joypad::Joypad, ppu::Ppu, serial::Serial,
    timer::Timer,
};

mod dma;
mod init;
mod mmio;
mod traits;

/// Size of the DMG boot ROM overlay at $0000–$00FF.
pub(crate) const BOOT_ROM_SIZE: usize = 0x100;

/// Everything the CPU can reach through the address bus.
///
/// The bus owns the peripherals and advances them one M-cycle at a time on
/// behalf of the scheduler.
pub(crate) struct GameBoyBus {
    cartridge: Option<Box<dyn Cartridge>>,
    /// Mapped over $0000–$00FF until a non-zero write to $FF50.
    boot_rom: Option<Box<[u8; BOOT_ROM_SIZE]>>,
    wram: Box<[u8; 0x2000]>,
    hram: [u8; 0x7F],
    /// Backing store for I/O registers without a dedicated model (sound,
    /// unused addresses); written values read back as-is.
    io: [u8; 0x80],
    /// Last value written to $FF46.
    dma: u8,
    pub(crate) ppu: Ppu,
    pub(crate) timer: Timer,
    pub(crate) serial: Serial,
    pub(crate) joypad: Joypad,
    pub(crate) if_reg: InterruptFlags,
    pub(crate) ie_reg: u8,
}

impl Default for GameBoyBus {
    fn default() -> Self {
        let mut bus = Self::power_on();
        bus.apply_dmg_initial_io_state();
        bus
    }
}

impl GameBoyBus {
    /// Hardware state before the boot ROM runs: LCD off, timer cleared.
    pub(crate) fn power_on() -> Self {
        let mut bus = Self {
            cartridge: None,
            boot_rom: None,
            wram: Box::new([0; 0x2000]),
            hram: [0; 0x7F],
            io: [0xFF; 0x80],
            dma: 0xFF,
            ppu: Ppu::new(),
            timer: Timer::new(),
            serial: Serial::default(),
            joypad: Joypad::default(),
            if_reg: InterruptFlags::empty(),
            ie_reg: 0,
        };
        bus.randomize_internal_ram();
        bus
    }

    pub(crate) fn insert_cartridge(&mut self, cartridge: Box<dyn Cartridge>) {
        self.cartridge = Some(cartridge);
    }

    pub(crate) fn take_cartridge(&mut self) -> Option<Box<dyn Cartridge>> {
        self.cartridge.take()
    }

    pub(crate) fn map_boot_rom(&mut self, image: Box<[u8; BOOT_ROM_SIZE]>) {
        log::info!("boot ROM mapped at $0000-$00FF");
        self.boot_rom = Some(image);
    }

    /// Advance the PPU by four T-cycles and the timer by one M-cycle.
    pub(crate) fn tick_mcycle(&mut self) {
        for _ in 0..4 {
            self.ppu.step_tcycle(&mut self.if_reg);
        }
        self.timer.step_mcycle(&mut self.if_reg);
    }
}
