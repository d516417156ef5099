use super::*;
use crate::machine::GameBoy;
use once_cell::sync::OnceCell;

struct TestBus {
    memory: [u8; 0x10000],
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
        }
    }
}

impl TestBus {
    fn with_program(at: u16, program: &[u8]) -> Self {
        let mut bus = Self::default();
        let start = at as usize;
        bus.memory[start..start + program.len()].copy_from_slice(program);
        bus
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }
}

static CPU_INSTRS_ROM: OnceCell<Vec<u8>> = OnceCell::new();

fn load_cpu_instrs_rom() -> &'static [u8] {
    CPU_INSTRS_ROM.get_or_init(|| {
        use std::path::PathBuf;

        let candidates = [
            PathBuf::from("assets/roms/gb_tests/blargg/cpu_instrs.gb"),
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("../../assets/roms/gb_tests/blargg/cpu_instrs.gb"),
        ];

        for path in &candidates {
            if let Ok(data) = std::fs::read(path) {
                return data;
            }
        }

        panic!("cpu_instrs.gb not found. Tried: {:?}", candidates)
    })
}

#[test]
fn nop_then_ld_b_d8_takes_twelve_tcycles() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x00, 0x06, 0x42]);

    let c1 = cpu.step(&mut bus);
    let c2 = cpu.step(&mut bus);

    assert_eq!(c1, 1);
    assert_eq!(c2, 2);
    assert_eq!((c1 + c2) * 4, 12);
    assert_eq!(cpu.regs.b, 0x42);
    assert_eq!(cpu.regs.pc, 0x0103);
}

#[test]
fn jp_z_taken_and_not_taken() {
    let program = [0x3E, 0x00, 0xCA, 0x00, 0x02];

    // LD does not touch flags, so Z comes from F.
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &program);
    cpu.set_flag(Flag::Z, true);
    let cycles = cpu.step(&mut bus) + cpu.step(&mut bus);
    assert_eq!(cycles * 4, 24);
    assert_eq!(cpu.regs.pc, 0x0200);

    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &program);
    cpu.set_flag(Flag::Z, false);
    let cycles = cpu.step(&mut bus) + cpu.step(&mut bus);
    assert_eq!(cycles * 4, 20);
    assert_eq!(cpu.regs.pc, 0x0105);
}

#[test]
fn jr_nz_cycles_follow_condition() {
    // JR NZ,+2 ; JR NZ,-2
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x20, 0x02]);
    cpu.set_flag(Flag::Z, false);
    assert_eq!(cpu.step(&mut bus), 3);
    assert_eq!(cpu.regs.pc, 0x0104);

    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x20, 0xFE]);
    cpu.set_flag(Flag::Z, true);
    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(cpu.regs.pc, 0x0102);
}

#[test]
fn interrupt_dispatch_pushes_pc_and_jumps_to_vector() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    cpu.regs.pc = 0x1234;
    cpu.regs.sp = 0xFFFE;
    cpu.ime = true;
    bus.memory[0xFFFF] = 0x01;
    bus.memory[0xFF0F] = 0x01;

    let cycles = cpu.step(&mut bus);

    assert_eq!(cycles, 5);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFC], 0x34);
    assert_eq!(bus.memory[0xFFFD], 0x12);
    assert_eq!(bus.memory[0xFF0F] & 0x01, 0);
    assert!(!cpu.ime);
}

#[test]
fn lowest_pending_bit_wins() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    cpu.ime = true;
    bus.memory[0xFFFF] = 0x1F;
    bus.memory[0xFF0F] = 0x05;

    cpu.step(&mut bus);

    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(bus.memory[0xFF0F], 0x04);
}

#[test]
fn disabled_interrupt_is_not_dispatched() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x00]);
    cpu.ime = true;
    bus.memory[0xFFFF] = 0x02;
    bus.memory[0xFF0F] = 0x01;

    assert_eq!(cpu.step(&mut bus), 1);
    assert_eq!(cpu.regs.pc, 0x0101);
    assert_eq!(bus.memory[0xFF0F], 0x01);
}

#[test]
fn inc_and_dec_wrap_with_half_carry() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x3C, 0x3D]);
    cpu.regs.a = 0xFF;
    cpu.set_flag(Flag::C, true);

    // INC A
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::C));

    // DEC A
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xFF);
    assert!(!cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn inc_hl_indirect_reads_and_writes_memory() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x34]);
    cpu.regs.set_hl(0xC000);
    bus.memory[0xC000] = 0x0F;

    assert_eq!(cpu.step(&mut bus), 3);
    assert_eq!(bus.memory[0xC000], 0x10);
    assert!(cpu.get_flag(Flag::H));
}

#[test]
fn add_hl_hl_carries_out_of_bits_11_and_15() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x29]);
    cpu.regs.set_hl(0xFFFF);
    cpu.set_flag(Flag::Z, true);

    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(cpu.regs.hl(), 0xFFFE);
    assert!(cpu.get_flag(Flag::C));
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::N));
    // Z is untouched by 16-bit adds.
    assert!(cpu.get_flag(Flag::Z));
}

#[test]
fn sub_and_cp_set_borrow_flags() {
    // SUB B ; CP d8
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x90, 0xFE, 0x20]);
    cpu.regs.a = 0x10;
    cpu.regs.b = 0x01;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x0F);
    assert!(cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::C));

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x0F);
    assert!(cpu.get_flag(Flag::C));
    assert!(!cpu.get_flag(Flag::Z));
}

#[test]
fn push_pop_roundtrip_and_pop_af_masks_low_nibble() {
    // PUSH BC ; POP DE ; POP AF
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xC5, 0xD1, 0xF1]);
    cpu.regs.set_bc(0xBEEF);
    cpu.regs.sp = 0xD000;

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.sp, 0xCFFE);
    assert_eq!(bus.memory[0xCFFE], 0xEF);
    assert_eq!(bus.memory[0xCFFF], 0xBE);

    assert_eq!(cpu.step(&mut bus), 3);
    assert_eq!(cpu.regs.de(), 0xBEEF);
    assert_eq!(cpu.regs.sp, 0xD000);

    bus.memory[0xD000] = 0xFF;
    bus.memory[0xD001] = 0x12;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.f, 0xF0);
    assert_eq!(cpu.regs.af(), 0x12F0);
}

#[test]
fn ei_followed_by_di_leaves_ime_clear() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xFB, 0xF3, 0x00]);

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert!(!cpu.ime);
    cpu.step(&mut bus);
    assert!(!cpu.ime);
}

#[test]
fn ei_enables_interrupts_after_the_next_instruction() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xFB, 0x00, 0x00]);
    bus.memory[0xFFFF] = 0x01;
    bus.memory[0xFF0F] = 0x01;

    // EI
    assert_eq!(cpu.step(&mut bus), 1);
    assert!(!cpu.ime);

    // The instruction after EI still runs with interrupts masked.
    assert_eq!(cpu.step(&mut bus), 1);
    assert_eq!(cpu.regs.pc, 0x0102);
    assert!(cpu.ime);

    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(bus.read16(cpu.regs.sp), 0x0102);
}

#[test]
fn reti_sets_ime_without_delay() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xD9]);
    cpu.regs.sp = 0xCFFE;
    bus.write16(0xCFFE, 0x1234);

    assert_eq!(cpu.step(&mut bus), 4);
    assert!(cpu.ime);
    assert_eq!(cpu.regs.pc, 0x1234);
    assert_eq!(cpu.regs.sp, 0xD000);
}

#[test]
fn swap_twice_is_identity() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xCB, 0x37, 0xCB, 0x37]);
    cpu.regs.a = 0xAB;
    cpu.set_flag(Flag::C, true);

    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(cpu.regs.a, 0xBA);
    assert!(!cpu.get_flag(Flag::C));

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xAB);
    assert!(!cpu.get_flag(Flag::Z));
}

#[test]
fn bit_preserves_carry() {
    // BIT 7,H twice
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xCB, 0x7C, 0xCB, 0x7C]);
    cpu.set_flag(Flag::C, true);
    cpu.regs.h = 0x80;

    cpu.step(&mut bus);
    assert!(!cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::C));

    cpu.regs.h = 0x00;
    cpu.step(&mut bus);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn cb_cycle_counts_depend_on_target() {
    // RL C ; BIT 0,(HL) ; RES 0,(HL)
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xCB, 0x11, 0xCB, 0x46, 0xCB, 0x86]);
    cpu.regs.set_hl(0xC000);
    bus.memory[0xC000] = 0x01;
    cpu.set_flag(Flag::C, true);
    cpu.regs.c = 0x80;

    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(cpu.regs.c, 0x01);
    assert!(cpu.get_flag(Flag::C));

    assert_eq!(cpu.step(&mut bus), 3);
    assert!(!cpu.get_flag(Flag::Z));

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(bus.memory[0xC000], 0x00);
    assert_eq!(cpu.regs.pc, 0x0106);
}

#[test]
fn call_and_ret_roundtrip() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xCD, 0x00, 0x02]);
    bus.memory[0x0200] = 0xC9;

    assert_eq!(cpu.step(&mut bus), 6);
    assert_eq!(cpu.regs.pc, 0x0200);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.read16(0xFFFC), 0x0103);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn rst_pushes_return_address() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xEF]);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(bus.read16(cpu.regs.sp), 0x0101);
}

#[test]
fn daa_adjusts_bcd_addition() {
    // ADD A,$27 ; DAA
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xC6, 0x27, 0x27]);
    cpu.regs.a = 0x15;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x3C);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x42);
    assert!(!cpu.get_flag(Flag::Z));
    assert!(!cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::C));
}

/// Z, N, H, C in that order.
fn znhc(cpu: &Cpu) -> [bool; 4] {
    [Flag::Z, Flag::N, Flag::H, Flag::C].map(|flag| cpu.get_flag(flag))
}

#[test]
fn adc_and_sbc_fold_in_the_carry() {
    // ADC A,$00 ; ADC A,$00 ; SBC A,$0F ; SBC A,$00
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xCE, 0x00, 0xCE, 0x00, 0xDE, 0x0F, 0xDE, 0x00]);

    cpu.regs.a = 0x0F;
    cpu.set_flag(Flag::C, true);
    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(cpu.regs.a, 0x10);
    assert_eq!(znhc(&cpu), [false, false, true, false]);

    cpu.regs.a = 0xFF;
    cpu.set_flag(Flag::C, true);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(znhc(&cpu), [true, false, true, true]);

    cpu.regs.a = 0x10;
    cpu.set_flag(Flag::C, true);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(znhc(&cpu), [true, true, true, false]);

    cpu.regs.a = 0x00;
    cpu.set_flag(Flag::C, true);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xFF);
    assert_eq!(znhc(&cpu), [false, true, true, true]);
}

#[test]
fn logic_ops_clear_carry_and_only_and_sets_half_carry() {
    // AND B ; OR B ; XOR B ; XOR A
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xA0, 0xB0, 0xA8, 0xAF]);
    cpu.regs.a = 0xF0;
    cpu.regs.b = 0x0F;
    cpu.set_flag(Flag::C, true);
    cpu.set_flag(Flag::N, true);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(znhc(&cpu), [true, false, true, false]);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x0F);
    assert_eq!(znhc(&cpu), [false, false, false, false]);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(znhc(&cpu), [true, false, false, false]);

    cpu.regs.a = 0x5A;
    cpu.set_flag(Flag::C, true);
    cpu.set_flag(Flag::H, true);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(znhc(&cpu), [true, false, false, false]);
}

#[test]
fn cpl_scf_ccf_leave_zero_alone() {
    // CPL ; SCF ; CCF
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x2F, 0x37, 0x3F]);
    cpu.regs.a = 0x35;
    cpu.regs.f = 0x80;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xCA);
    assert_eq!(znhc(&cpu), [true, true, true, false]);

    cpu.step(&mut bus);
    assert_eq!(znhc(&cpu), [true, false, false, true]);

    cpu.step(&mut bus);
    assert_eq!(znhc(&cpu), [true, false, false, false]);
    assert_eq!(cpu.regs.a, 0xCA);
}

#[test]
fn accumulator_rotates_always_clear_zero() {
    // RLCA ; RRCA ; RLA ; RRA ; RRA
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x07, 0x0F, 0x17, 0x1F, 0x1F]);

    cpu.regs.a = 0x80;
    cpu.regs.f = 0xE0;
    assert_eq!(cpu.step(&mut bus), 1);
    assert_eq!(cpu.regs.a, 0x01);
    assert_eq!(znhc(&cpu), [false, false, false, true]);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x80);
    assert_eq!(znhc(&cpu), [false, false, false, true]);

    // A zero result still leaves Z clear.
    cpu.set_flag(Flag::C, false);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(znhc(&cpu), [false, false, false, true]);

    // RRA pulls the old carry into bit 7.
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x80);
    assert_eq!(znhc(&cpu), [false, false, false, false]);

    cpu.regs.a = 0x01;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(znhc(&cpu), [false, false, false, true]);
}

#[test]
fn cb_rotates_and_shifts_on_b() {
    // (opcode, B before, C before, B after, Z after, C after)
    let cases = [
        (0x00, 0x85, false, 0x0B, false, true), // RLC B
        (0x00, 0x00, true, 0x00, true, false),  // RLC B
        (0x08, 0x01, false, 0x80, false, true), // RRC B
        (0x10, 0x80, false, 0x00, true, true),  // RL B
        (0x10, 0x40, true, 0x81, false, false), // RL B
        (0x18, 0x01, true, 0x80, false, true),  // RR B
        (0x20, 0xFF, false, 0xFE, false, true), // SLA B
        (0x28, 0x81, false, 0xC0, false, true), // SRA B
        (0x28, 0x01, false, 0x00, true, true),  // SRA B
        (0x38, 0x81, true, 0x40, false, true),  // SRL B
        (0x38, 0x01, false, 0x00, true, true),  // SRL B
    ];

    for (opcode, before, carry_in, after, zero, carry_out) in cases {
        let mut cpu = Cpu::new();
        let mut bus = TestBus::with_program(0x0100, &[0xCB, opcode]);
        cpu.regs.b = before;
        cpu.regs.f = 0x60;
        cpu.set_flag(Flag::C, carry_in);

        assert_eq!(cpu.step(&mut bus), 2);
        let name = CB_OPCODES[opcode as usize].to_string();
        assert_eq!(cpu.regs.b, after, "{name} on {before:#04X}");
        assert_eq!(
            znhc(&cpu),
            [zero, false, false, carry_out],
            "{name} on {before:#04X}"
        );
    }
}

#[test]
fn res_and_set_leave_flags_alone() {
    // RES 0,A ; SET 7,A ; SET 3,(HL)
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xCB, 0x87, 0xCB, 0xFF, 0xCB, 0xDE]);
    cpu.regs.a = 0x01;
    cpu.regs.f = 0x50;
    cpu.regs.set_hl(0xC000);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, 0x50);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x80);
    assert_eq!(cpu.regs.f, 0x50);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(bus.memory[0xC000], 0x08);
    assert_eq!(cpu.regs.f, 0x50);
}

#[test]
fn daa_adjusts_bcd_subtraction() {
    // SUB $15 ; DAA ; SUB $27 ; DAA
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xD6, 0x15, 0x27, 0xD6, 0x27, 0x27]);
    cpu.regs.a = 0x42;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x2D);
    assert_eq!(znhc(&cpu), [false, true, true, false]);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x27);
    assert_eq!(znhc(&cpu), [false, true, false, false]);

    // 15 - 27 borrows: 88 with C set.
    cpu.regs.a = 0x15;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xEE);
    assert_eq!(znhc(&cpu), [false, true, true, true]);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x88);
    assert_eq!(znhc(&cpu), [false, true, false, true]);
}

#[test]
fn add_sp_r8_uses_low_byte_carries() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xE8, 0x01, 0xE8, 0xFF]);
    cpu.regs.sp = 0x00FF;

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.sp, 0x0100);
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));
    assert!(!cpu.get_flag(Flag::Z));
    assert!(!cpu.get_flag(Flag::N));

    cpu.regs.sp = 0x1000;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.sp, 0x0FFF);
    assert!(!cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::C));
}

#[test]
fn ld_hl_sp_plus_r8_leaves_sp_alone() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xF8, 0xFE]);
    cpu.regs.sp = 0xC002;

    assert_eq!(cpu.step(&mut bus), 3);
    assert_eq!(cpu.regs.hl(), 0xC000);
    assert_eq!(cpu.regs.sp, 0xC002);
}

#[test]
fn ld_a16_sp_stores_little_endian() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x08, 0x00, 0xC0]);
    cpu.regs.sp = 0xBEEF;

    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(bus.memory[0xC000], 0xEF);
    assert_eq!(bus.memory[0xC001], 0xBE);
}

#[test]
fn ldi_and_ldd_adjust_hl() {
    // LD (HL+),A ; LD A,(HL-)
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x22, 0x3A]);
    cpu.regs.a = 0x5A;
    cpu.regs.set_hl(0xC000);

    cpu.step(&mut bus);
    assert_eq!(bus.memory[0xC000], 0x5A);
    assert_eq!(cpu.regs.hl(), 0xC001);

    bus.memory[0xC001] = 0x77;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x77);
    assert_eq!(cpu.regs.hl(), 0xC000);
}

#[test]
fn halt_waits_and_wakes_without_servicing_when_ime_clear() {
    // HALT ; INC A
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x76, 0x3C]);
    cpu.regs.a = 0;
    bus.memory[0xFFFF] = 0x04;

    assert_eq!(cpu.step(&mut bus), 1);
    assert!(cpu.is_halted());
    for _ in 0..3 {
        assert_eq!(cpu.step(&mut bus), 1);
        assert_eq!(cpu.regs.pc, 0x0101);
    }

    bus.memory[0xFF0F] = 0x04;
    cpu.step(&mut bus);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.regs.a, 1);
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(bus.memory[0xFF0F], 0x04);
}

#[test]
fn halt_with_ime_set_services_the_interrupt() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x76, 0x00]);
    cpu.ime = true;
    bus.memory[0xFFFF] = 0x01;

    cpu.step(&mut bus);
    assert!(cpu.is_halted());

    bus.memory[0xFF0F] = 0x01;
    assert_eq!(cpu.step(&mut bus), 5);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(bus.read16(cpu.regs.sp), 0x0101);
}

#[test]
fn halt_bug_repeats_the_next_byte() {
    // HALT ; INC A with IME=0 and an interrupt already pending.
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x76, 0x3C]);
    cpu.regs.a = 0;
    bus.memory[0xFFFF] = 0x01;
    bus.memory[0xFF0F] = 0x01;

    cpu.step(&mut bus);
    assert!(!cpu.is_halted());
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x0101);
    cpu.step(&mut bus);

    assert_eq!(cpu.regs.a, 2);
    assert_eq!(cpu.regs.pc, 0x0102);
}

#[test]
fn stop_resumes_when_joypad_line_goes_low() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x10, 0x00, 0x3C]);
    bus.memory[0xFF00] = 0xFF;

    cpu.step(&mut bus);
    assert!(cpu.is_stopped());
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(cpu.step(&mut bus), 1);
    assert!(cpu.is_stopped());

    bus.memory[0xFF00] = 0xEE;
    cpu.step(&mut bus);
    assert!(!cpu.is_stopped());
}

#[test]
fn undefined_opcode_locks_the_cpu() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xD3, 0x00]);

    assert_eq!(cpu.step(&mut bus), 0);
    assert!(cpu.is_locked());
    assert_eq!(cpu.step(&mut bus), 0);
    assert_eq!(cpu.regs.pc, 0x0101);

    cpu.reset();
    assert!(!cpu.is_locked());
    assert_eq!(cpu.regs.pc, 0x0100);
}

#[test]
fn post_boot_registers() {
    let cpu = Cpu::new();
    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.bc(), 0x0013);
    assert_eq!(cpu.regs.de(), 0x00D8);
    assert_eq!(cpu.regs.hl(), 0x014D);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert!(!cpu.ime);

    let raw = Cpu::power_on();
    assert_eq!(raw.regs, Registers::default());
}

#[test]
fn opcode_table_has_eleven_undefined_entries() {
    let undefined: Vec<u8> = OPCODES
        .iter()
        .filter(|instr| instr.op == Op::Undefined)
        .map(|instr| instr.opcode)
        .collect();

    assert_eq!(
        undefined,
        vec![0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD]
    );
    for (i, instr) in OPCODES.iter().enumerate() {
        assert_eq!(instr.opcode as usize, i);
    }
    for (i, instr) in CB_OPCODES.iter().enumerate() {
        assert_eq!(instr.opcode as usize, i);
    }
}

#[test]
fn opcode_tables_disassemble() {
    assert_eq!(OPCODES[0x06].to_string(), "LD B,d8");
    assert_eq!(OPCODES[0xCA].to_string(), "JP Z,a16");
    assert_eq!(OPCODES[0x18].to_string(), "JR r8");
    assert_eq!(OPCODES[0xFF].to_string(), "RST $38");
    assert_eq!(OPCODES[0x80].to_string(), "ADD A,B");
    assert_eq!(OPCODES[0x90].to_string(), "SUB B");
    assert_eq!(OPCODES[0xD3].to_string(), "??");
    assert_eq!(OPCODES[0xCB].to_string(), "PREFIX CB");
    assert_eq!(CB_OPCODES[0x46].to_string(), "BIT 0,(HL)");
    assert_eq!(CB_OPCODES[0x37].to_string(), "SWAP A");
}

#[test]
fn conditional_branch_cycle_pairs() {
    let pairs = |opcode: usize| (OPCODES[opcode].cycles, OPCODES[opcode].cycles_taken);
    assert_eq!(pairs(0xC2), (3, 4));
    assert_eq!(pairs(0x20), (2, 3));
    assert_eq!(pairs(0xC4), (3, 6));
    assert_eq!(pairs(0xC0), (2, 5));
    assert_eq!(pairs(0xC9), (4, 4));
}

#[test]
#[ignore = "needs assets/roms/gb_tests/blargg/cpu_instrs.gb"]
fn run_blargg_cpu_instrs() {
    let rom = load_cpu_instrs_rom();
    let mut gb = GameBoy::new();
    gb.load_rom(rom).expect("cpu_instrs.gb should load");

    let mut budget: u64 = 400_000_000;
    let mut seen = 0;
    loop {
        let mcycles = gb.step();
        assert!(mcycles != 0, "CPU locked at {:04X}", gb.cpu.regs.pc);
        budget = budget.saturating_sub(mcycles as u64);

        let output = gb.serial_output();
        if output.len() != seen {
            seen = output.len();
            let text = String::from_utf8_lossy(output);
            if text.contains("Passed") || text.contains("Failed") {
                assert!(text.contains("Passed"), "serial output: {text}");
                break;
            }
        }
        assert!(
            budget > 0,
            "cycle budget exhausted; serial output: {:?}",
            String::from_utf8_lossy(gb.serial_output())
        );
    }
}
