mod alu;
mod bus;
mod cb;
mod decode;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;

pub use bus::Bus;
pub use cb::{CbInstr, CbOp};
pub use decode::{AluOp, Cond, Instr, Op, Operand8, Reg16, CB_OPCODES, OPCODES};
pub use regs::{Flag, Registers};

/// Execution state of the core, as seen from the outside.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CpuMode {
    #[default]
    Running,
    /// Entered by HALT; left when `IF & IE` becomes non-zero.
    Halted,
    /// Entered by STOP; left when a joypad line reads low.
    Stopped,
}

/// Sharp LR35902 CPU core.
///
/// The core is step-level: [`Cpu::step`] runs one whole instruction (or one
/// interrupt dispatch) against a [`Bus`] and reports how many M-cycles it
/// took. The owner of the bus is responsible for advancing the rest of the
/// machine by that amount.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub ime: bool,
    pub mode: CpuMode,
    /// Set by HALT when it executes with IME=0 and an interrupt already
    /// pending. The next opcode fetch does not advance PC.
    halt_bug: bool,
    /// Delayed IME enable armed by EI: 2 right after EI, 1 after the
    /// instruction that follows EI, 0 once IME has been set.
    ei_delay: u8,
    /// When true, the CPU has executed an undefined opcode that hard-locks
    /// the machine on real hardware. `step()` returns 0 cycles until reset.
    locked: bool,
}

impl Cpu {
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.mode == CpuMode::Halted
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.mode == CpuMode::Stopped
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        (self.regs.f & flag.mask()) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        if value {
            self.regs.f |= flag.mask();
        } else {
            self.regs.f &= !flag.mask();
        }
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f = 0;
    }
}

#[cfg(test)]
mod tests;
