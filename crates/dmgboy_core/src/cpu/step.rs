use super::interrupts::{IE_ADDR, IF_ADDR};
use super::{Bus, Cpu, CpuMode, CB_OPCODES, OPCODES};

/// P1 / joypad register; STOP is left when one of its input lines is low.
const P1_ADDR: u16 = 0xFF00;

impl Cpu {
    /// Execute a single instruction (or interrupt dispatch) and return the
    /// number of M-cycles it took.
    ///
    /// Returns 0 only when the CPU is locked by an undefined opcode, so
    /// callers can detect the hard stop.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.locked {
            return 0;
        }

        if self.mode == CpuMode::Stopped {
            // Resume once any selected joypad line reads low. Until then the
            // CPU idles one M-cycle at a time.
            if bus.read8(P1_ADDR) & 0x0F != 0x0F {
                self.mode = CpuMode::Running;
            }
            return 1;
        }

        if let Some(cycles) = self.handle_interrupts(bus) {
            return cycles;
        }

        if self.mode == CpuMode::Halted {
            return 1;
        }

        let pc = self.regs.pc;
        let opcode = self.fetch8(bus);
        let instr = &OPCODES[opcode as usize];
        if log::log_enabled!(log::Level::Trace) {
            self.trace_instruction(bus, pc, instr);
        }

        let cycles = self.execute(bus, instr);

        if !self.locked {
            self.apply_ime_delay();
        }
        cycles
    }

    /// Disassemble the instruction at `pc` for trace logging.
    fn trace_instruction<B: Bus>(&self, bus: &mut B, pc: u16, instr: &super::Instr) {
        let r = &self.regs;
        let next = bus.read8(pc.wrapping_add(1));
        if instr.op == super::Op::Prefix {
            let cb = &CB_OPCODES[next as usize];
            log::trace!("{pc:04X}: CB {next:02X}     {cb}");
        } else {
            let bytes = match instr.len {
                1 => format!("{:02X}", instr.opcode),
                2 => format!("{:02X} {:02X}", instr.opcode, next),
                _ => {
                    let hi = bus.read8(pc.wrapping_add(2));
                    format!("{:02X} {:02X} {:02X}", instr.opcode, next, hi)
                }
            };
            log::trace!(
                "{pc:04X}: {bytes:<8}  {instr}  A={:02X} F={:02X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} IF={:02X} IE={:02X}",
                r.a,
                r.f,
                r.bc(),
                r.de(),
                r.hl(),
                r.sp,
                bus.read8(IF_ADDR),
                bus.read8(IE_ADDR),
            );
        }
    }
}
