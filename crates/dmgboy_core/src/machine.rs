mod bus;
pub mod cartridge;
mod config;
mod gameboy;
mod interrupts;
mod joypad;
mod pacing;
mod ppu;
mod serial;
mod timer;
mod video;

pub use cartridge::{Cartridge, CartridgeError, CartridgeHeader};
pub use config::{EmulatorConfig, RunMode};
pub use gameboy::{GameBoy, RunOutcome, StopHandle};
pub use interrupts::InterruptFlags;
pub use joypad::Button;
pub use serial::SerialDevice;
