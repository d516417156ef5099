use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cpu::Cpu;
use crate::TCYCLES_PER_FRAME;

use super::bus::{GameBoyBus, BOOT_ROM_SIZE};
use super::cartridge::{self, Cartridge, CartridgeError, CartridgeHeader};
use super::config::EmulatorConfig;
use super::joypad::Button;
use super::pacing::FramePacer;
use super::serial::SerialDevice;
use super::video;

/// Shared flag that ends [`GameBoy::run`] at the next instruction boundary.
///
/// Clones share the flag, so a handle can be moved to another thread or
/// captured by a frame callback.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why [`GameBoy::run`] returned.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RunOutcome {
    /// A [`StopHandle`] asked for it.
    Stopped,
    /// The CPU hit an undefined opcode.
    Locked,
    /// `frame_limit` frames were produced.
    FrameLimit,
}

/// High-level DMG machine: the CPU plus everything behind the bus.
///
/// The machine is the scheduler. Each CPU step reports its M-cycles and
/// the bus then advances the PPU four T-cycles and the timer one M-cycle
/// for every one of them.
pub struct GameBoy {
    pub cpu: Cpu,
    pub(crate) bus: GameBoyBus,
    stop: StopHandle,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    /// Machine in the state the boot ROM hands to the cartridge at $0100.
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: GameBoyBus::default(),
            stop: StopHandle::default(),
        }
    }

    /// Build a machine from `config`, mapping its boot ROM if one is set.
    pub fn with_config(config: &EmulatorConfig) -> Result<Self, CartridgeError> {
        let mut gb = Self::new();
        if let Some(image) = config.boot_rom.as_deref() {
            gb.load_boot_rom(image)?;
        }
        Ok(gb)
    }

    /// Back to the post-boot state. The cartridge stays inserted.
    pub fn reset(&mut self) {
        let cartridge = self.bus.take_cartridge();
        self.cpu.reset();
        self.bus = GameBoyBus::default();
        if let Some(cartridge) = cartridge {
            self.bus.insert_cartridge(cartridge);
        }
    }

    /// Validate `rom`, pick its mapper and insert it.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<CartridgeHeader, CartridgeError> {
        let (header, cart) = cartridge::from_rom(rom.to_vec())?;
        self.bus.insert_cartridge(cart);
        Ok(header)
    }

    /// Insert a cartridge without header validation.
    pub fn insert_cartridge(&mut self, cartridge: Box<dyn Cartridge>) {
        self.bus.insert_cartridge(cartridge);
    }

    /// Switch to the power-on state with `image` mapped over $0000–$00FF.
    ///
    /// The CPU starts at $0000 with every register cleared; the boot code
    /// itself sets up the LCD, palettes and stack.
    pub fn load_boot_rom(&mut self, image: &[u8]) -> Result<(), CartridgeError> {
        let image: Box<[u8; BOOT_ROM_SIZE]> = image
            .to_vec()
            .into_boxed_slice()
            .try_into()
            .map_err(|bytes: Box<[u8]>| CartridgeError::BootRomSize { len: bytes.len() })?;

        let mut bus = GameBoyBus::power_on();
        if let Some(cartridge) = self.bus.take_cartridge() {
            bus.insert_cartridge(cartridge);
        }
        bus.serial = std::mem::take(&mut self.bus.serial);
        bus.map_boot_rom(image);

        self.bus = bus;
        self.cpu = Cpu::power_on();
        Ok(())
    }

    pub fn attach_serial_device(&mut self, device: Box<dyn SerialDevice>) {
        self.bus.serial.attach(device);
    }

    pub fn detach_serial_device(&mut self) -> Option<Box<dyn SerialDevice>> {
        self.bus.serial.detach()
    }

    /// Bytes sent over the link port that have not been taken yet.
    pub fn serial_output(&self) -> &[u8] {
        &self.bus.serial.output
    }

    /// Remove and return the pending link port output.
    ///
    /// Hosts that poll every frame should use this so the buffer stays
    /// bounded.
    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.bus.serial.take_output()
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.bus
            .joypad
            .set_button(button, pressed, &mut self.bus.if_reg);
    }

    /// 160×144 shades (0 = lightest, 3 = darkest), row-major.
    pub fn framebuffer(&self) -> &[u8] {
        self.bus.ppu.framebuffer()
    }

    /// Expand the framebuffer into 24-bit grayscale RGB.
    pub fn video_frame(&self, buffer: &mut [u8]) {
        video::render_rgb24(self.bus.ppu.framebuffer(), buffer);
    }

    /// V-blank entries since power-on.
    pub fn frames(&self) -> u64 {
        self.bus.ppu.frames
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Run one CPU step and advance the rest of the machine to match.
    ///
    /// Returns the M-cycles taken, or 0 once the CPU is locked. While the
    /// CPU sits in STOP the LCD and timer are frozen.
    pub fn step(&mut self) -> u32 {
        let mcycles = self.cpu.step(&mut self.bus);
        if !self.cpu.is_stopped() {
            for _ in 0..mcycles {
                self.bus.tick_mcycle();
            }
        }
        mcycles
    }

    /// Run until the PPU enters V-blank, or for one frame's worth of
    /// T-cycles when the LCD is off.
    pub fn step_frame(&mut self) {
        self.run_frame();
    }

    /// Returns `false` when cut short by a stop request or a locked CPU.
    fn run_frame(&mut self) -> bool {
        self.bus.ppu.frame_ready = false;
        let mut elapsed = 0u32;
        while !self.bus.ppu.frame_ready && elapsed < TCYCLES_PER_FRAME {
            if self.stop.is_stop_requested() {
                return false;
            }
            let mcycles = self.step();
            if mcycles == 0 {
                return false;
            }
            elapsed += mcycles * 4;
        }
        true
    }

    /// Run frames until stopped, locked or out of frames.
    pub fn run(&mut self, config: &EmulatorConfig) -> RunOutcome {
        self.run_with(config, |_| {})
    }

    /// [`GameBoy::run`] with a callback after every completed frame.
    pub fn run_with<F>(&mut self, config: &EmulatorConfig, mut on_frame: F) -> RunOutcome
    where
        F: FnMut(&mut GameBoy),
    {
        log::info!(
            "run loop start: mode={:?} frame_limit={:?}",
            config.run_mode,
            config.frame_limit
        );
        let mut pacer = FramePacer::new(config.run_mode);
        let mut frames = 0u64;

        let outcome = loop {
            if config.frame_limit.is_some_and(|limit| frames >= limit) {
                break RunOutcome::FrameLimit;
            }
            let completed = self.run_frame();
            if self.cpu.is_locked() {
                break RunOutcome::Locked;
            }
            if !completed || self.stop.is_stop_requested() {
                break RunOutcome::Stopped;
            }

            frames += 1;
            on_frame(self);
            pacer.wait();
        };

        log::info!("run loop stop after {frames} frames: {outcome:?}");
        outcome
    }
}
