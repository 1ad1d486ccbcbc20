//! 6502 CPU core.
//!
//! The interpreter steps one instruction at a time: `step` services any
//! pending interrupt, fetches and decodes through the 256-entry table,
//! resolves the effective address, charges base and page-cross cycles, and
//! dispatches on the mnemonic. DMA stalls are modeled as credits that each
//! consume one call to `step`.

use crate::addressing::AddrMode;
use crate::opcodes::{Mnemonic, OPCODES};
use crate::status::Status;
use crate::vectors;

/// Memory bus interface.
///
/// The CPU performs all memory access through this trait; the system bus
/// implements it to route RAM, MMIO registers and cartridge space.
pub trait Bus {
    /// Read a byte. May have side effects (MMIO registers).
    fn read(&mut self, addr: u16) -> u8;

    /// Write a byte.
    fn write(&mut self, addr: u16, value: u8);

    /// Read a little-endian 16-bit word.
    fn read_u16(&mut self, addr: u16) -> u16 {
        let lo = u16::from(self.read(addr));
        let hi = u16::from(self.read(addr.wrapping_add(1)));
        hi << 8 | lo
    }
}

/// Pending interrupt tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interrupt {
    /// Nothing pending.
    #[default]
    None,
    /// Maskable interrupt requested (APU frame counter, DMC, mapper).
    Irq,
    /// Non-maskable interrupt requested (PPU VBlank).
    Nmi,
}

/// NES 6502 CPU (Ricoh 2A03 core, no BCD).
#[derive(Debug)]
pub struct Cpu {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Program counter.
    pub pc: u16,
    /// Stack pointer into $0100-$01FF.
    pub sp: u8,
    /// Status flags.
    pub status: Status,
    /// Total cycles executed.
    pub cycles: u64,
    /// Stall credits owed to DMA; each consumes one `step` call.
    stall: u32,
    /// Pending interrupt tag, serviced at the top of `step`.
    pending: Interrupt,
    /// Set by the KIL opcodes; the CPU burns cycles forever afterwards.
    jammed: bool,
}

impl Cpu {
    /// Creates a CPU in the power-on state (SP=$FD, P=$24).
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: 0xFD,
            status: Status::POWER_ON,
            cycles: 0,
            stall: 0,
            pending: Interrupt::None,
            jammed: false,
        }
    }

    /// Resets the CPU: SP=$FD, P=$24, PC from the reset vector, 7 cycles.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.sp = 0xFD;
        self.status = Status::POWER_ON;
        self.pc = bus.read_u16(vectors::RESET);
        self.cycles += 7;
        self.stall = 0;
        self.pending = Interrupt::None;
        self.jammed = false;
    }

    /// Executes one instruction and returns the cycles consumed.
    ///
    /// A stalled or jammed CPU consumes a single cycle with no memory
    /// traffic, which is how OAM/DMC DMA serialize against the outer loop.
    pub fn step(&mut self, bus: &mut impl Bus) -> u32 {
        if self.stall > 0 {
            self.stall -= 1;
            self.cycles += 1;
            return 1;
        }
        if self.jammed {
            self.cycles += 1;
            return 1;
        }

        let start = self.cycles;

        match self.pending {
            Interrupt::Nmi => {
                self.interrupt(bus, vectors::NMI);
                self.pending = Interrupt::None;
            }
            Interrupt::Irq if !self.status.contains(Status::I) => {
                self.interrupt(bus, vectors::IRQ);
                self.pending = Interrupt::None;
            }
            _ => {}
        }

        let opcode = bus.read(self.pc);
        let info = OPCODES[opcode as usize];
        let (addr, page_crossed) = self.resolve(bus, info.mode);

        self.pc = self.pc.wrapping_add(u16::from(info.mode.instruction_size()));
        self.cycles += u64::from(info.cycles);
        if page_crossed && info.page_cycles {
            self.cycles += 1;
        }

        self.execute(bus, info.mnemonic, info.mode, addr);

        (self.cycles - start) as u32
    }

    /// Requests an NMI. Serviced before the next instruction.
    pub fn trigger_nmi(&mut self) {
        self.pending = Interrupt::Nmi;
    }

    /// Requests an IRQ. Serviced before the next instruction unless the
    /// I flag is set (the request stays pending until it clears). An NMI
    /// already pending takes priority.
    pub fn trigger_irq(&mut self) {
        if self.pending != Interrupt::Nmi {
            self.pending = Interrupt::Irq;
        }
    }

    /// Adds DMA stall credits.
    pub fn add_stall(&mut self, cycles: u32) {
        self.stall += cycles;
    }

    /// Whether a KIL opcode has halted the CPU.
    #[must_use]
    pub fn is_jammed(&self) -> bool {
        self.jammed
    }

    // ---------------------------------------------------------------------
    // Interrupt entry and stack
    // ---------------------------------------------------------------------

    fn interrupt(&mut self, bus: &mut impl Bus, vector: u16) {
        self.push_u16(bus, self.pc);
        self.push(bus, self.status.to_stack_byte(false));
        self.status.insert(Status::I);
        self.pc = bus.read_u16(vector);
        self.cycles += 7;
    }

    fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(0x0100 | u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn push_u16(&mut self, bus: &mut impl Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, (value & 0xFF) as u8);
    }

    fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(0x0100 | u16::from(self.sp))
    }

    fn pull_u16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = u16::from(self.pull(bus));
        let hi = u16::from(self.pull(bus));
        hi << 8 | lo
    }

    // ---------------------------------------------------------------------
    // Address resolution
    // ---------------------------------------------------------------------

    /// Reads a 16-bit word without carrying into the high address byte,
    /// replicating the JMP ($xxFF) hardware bug.
    fn read_u16_wrap(bus: &mut impl Bus, addr: u16) -> u16 {
        let lo = u16::from(bus.read(addr));
        let hi_addr = (addr & 0xFF00) | u16::from((addr as u8).wrapping_add(1));
        let hi = u16::from(bus.read(hi_addr));
        hi << 8 | lo
    }

    fn pages_differ(a: u16, b: u16) -> bool {
        a & 0xFF00 != b & 0xFF00
    }

    /// Resolves the effective address for a mode, reporting whether an
    /// index carried across a page boundary.
    fn resolve(&mut self, bus: &mut impl Bus, mode: AddrMode) -> (u16, bool) {
        let operand = self.pc.wrapping_add(1);
        match mode {
            AddrMode::Implied | AddrMode::Accumulator => (0, false),
            AddrMode::Immediate => (operand, false),
            AddrMode::ZeroPage => (u16::from(bus.read(operand)), false),
            AddrMode::ZeroPageX => (u16::from(bus.read(operand).wrapping_add(self.x)), false),
            AddrMode::ZeroPageY => (u16::from(bus.read(operand).wrapping_add(self.y)), false),
            AddrMode::Absolute => (bus.read_u16(operand), false),
            AddrMode::AbsoluteX => {
                let base = bus.read_u16(operand);
                let addr = base.wrapping_add(u16::from(self.x));
                (addr, Self::pages_differ(base, addr))
            }
            AddrMode::AbsoluteY => {
                let base = bus.read_u16(operand);
                let addr = base.wrapping_add(u16::from(self.y));
                (addr, Self::pages_differ(base, addr))
            }
            AddrMode::Indirect => {
                let ptr = bus.read_u16(operand);
                (Self::read_u16_wrap(bus, ptr), false)
            }
            AddrMode::IndexedIndirect => {
                let ptr = u16::from(bus.read(operand).wrapping_add(self.x));
                (Self::read_u16_wrap(bus, ptr), false)
            }
            AddrMode::IndirectIndexed => {
                let ptr = u16::from(bus.read(operand));
                let base = Self::read_u16_wrap(bus, ptr);
                let addr = base.wrapping_add(u16::from(self.y));
                (addr, Self::pages_differ(base, addr))
            }
            AddrMode::Relative => {
                let offset = u16::from(bus.read(operand));
                let next = self.pc.wrapping_add(2);
                if offset < 0x80 {
                    (next.wrapping_add(offset), false)
                } else {
                    (next.wrapping_add(offset).wrapping_sub(0x100), false)
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    #[allow(clippy::too_many_lines)]
    fn execute(&mut self, bus: &mut impl Bus, mnemonic: Mnemonic, mode: AddrMode, addr: u16) {
        match mnemonic {
            // Loads and stores
            Mnemonic::Lda => {
                self.a = bus.read(addr);
                self.status.set_zn(self.a);
            }
            Mnemonic::Ldx => {
                self.x = bus.read(addr);
                self.status.set_zn(self.x);
            }
            Mnemonic::Ldy => {
                self.y = bus.read(addr);
                self.status.set_zn(self.y);
            }
            Mnemonic::Sta => bus.write(addr, self.a),
            Mnemonic::Stx => bus.write(addr, self.x),
            Mnemonic::Sty => bus.write(addr, self.y),

            // Arithmetic
            Mnemonic::Adc => {
                let value = bus.read(addr);
                self.adc(value);
            }
            Mnemonic::Sbc => {
                let value = bus.read(addr);
                self.adc(!value);
            }
            Mnemonic::Cmp => {
                let value = bus.read(addr);
                self.compare(self.a, value);
            }
            Mnemonic::Cpx => {
                let value = bus.read(addr);
                self.compare(self.x, value);
            }
            Mnemonic::Cpy => {
                let value = bus.read(addr);
                self.compare(self.y, value);
            }

            // Logic
            Mnemonic::And => {
                self.a &= bus.read(addr);
                self.status.set_zn(self.a);
            }
            Mnemonic::Ora => {
                self.a |= bus.read(addr);
                self.status.set_zn(self.a);
            }
            Mnemonic::Eor => {
                self.a ^= bus.read(addr);
                self.status.set_zn(self.a);
            }
            Mnemonic::Bit => {
                let value = bus.read(addr);
                self.status.set(Status::Z, self.a & value == 0);
                self.status.set(Status::V, value & 0x40 != 0);
                self.status.set(Status::N, value & 0x80 != 0);
            }

            // Shifts and rotates
            Mnemonic::Asl => self.rmw(bus, mode, addr, Self::do_asl),
            Mnemonic::Lsr => self.rmw(bus, mode, addr, Self::do_lsr),
            Mnemonic::Rol => self.rmw(bus, mode, addr, Self::do_rol),
            Mnemonic::Ror => self.rmw(bus, mode, addr, Self::do_ror),

            // Increments and decrements
            Mnemonic::Inc => {
                let value = bus.read(addr).wrapping_add(1);
                bus.write(addr, value);
                self.status.set_zn(value);
            }
            Mnemonic::Dec => {
                let value = bus.read(addr).wrapping_sub(1);
                bus.write(addr, value);
                self.status.set_zn(value);
            }
            Mnemonic::Inx => {
                self.x = self.x.wrapping_add(1);
                self.status.set_zn(self.x);
            }
            Mnemonic::Iny => {
                self.y = self.y.wrapping_add(1);
                self.status.set_zn(self.y);
            }
            Mnemonic::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.status.set_zn(self.x);
            }
            Mnemonic::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.status.set_zn(self.y);
            }

            // Register transfers
            Mnemonic::Tax => {
                self.x = self.a;
                self.status.set_zn(self.x);
            }
            Mnemonic::Tay => {
                self.y = self.a;
                self.status.set_zn(self.y);
            }
            Mnemonic::Txa => {
                self.a = self.x;
                self.status.set_zn(self.a);
            }
            Mnemonic::Tya => {
                self.a = self.y;
                self.status.set_zn(self.a);
            }
            Mnemonic::Tsx => {
                self.x = self.sp;
                self.status.set_zn(self.x);
            }
            Mnemonic::Txs => self.sp = self.x,

            // Stack
            Mnemonic::Pha => self.push(bus, self.a),
            Mnemonic::Pla => {
                self.a = self.pull(bus);
                self.status.set_zn(self.a);
            }
            Mnemonic::Php => {
                let value = self.status.to_stack_byte(true);
                self.push(bus, value);
            }
            Mnemonic::Plp => {
                let value = self.pull(bus);
                self.status = Status::from_stack_byte(value);
            }

            // Jumps and subroutines
            Mnemonic::Jmp => self.pc = addr,
            Mnemonic::Jsr => {
                self.push_u16(bus, self.pc.wrapping_sub(1));
                self.pc = addr;
            }
            Mnemonic::Rts => self.pc = self.pull_u16(bus).wrapping_add(1),
            Mnemonic::Rti => {
                let value = self.pull(bus);
                self.status = Status::from_stack_byte(value);
                self.pc = self.pull_u16(bus);
            }

            // Branches
            Mnemonic::Bcc => self.branch(addr, !self.status.contains(Status::C)),
            Mnemonic::Bcs => self.branch(addr, self.status.contains(Status::C)),
            Mnemonic::Bne => self.branch(addr, !self.status.contains(Status::Z)),
            Mnemonic::Beq => self.branch(addr, self.status.contains(Status::Z)),
            Mnemonic::Bpl => self.branch(addr, !self.status.contains(Status::N)),
            Mnemonic::Bmi => self.branch(addr, self.status.contains(Status::N)),
            Mnemonic::Bvc => self.branch(addr, !self.status.contains(Status::V)),
            Mnemonic::Bvs => self.branch(addr, self.status.contains(Status::V)),

            // Flag operations
            Mnemonic::Clc => self.status.remove(Status::C),
            Mnemonic::Sec => self.status.insert(Status::C),
            Mnemonic::Cli => self.status.remove(Status::I),
            Mnemonic::Sei => self.status.insert(Status::I),
            Mnemonic::Clv => self.status.remove(Status::V),
            Mnemonic::Cld => self.status.remove(Status::D),
            Mnemonic::Sed => self.status.insert(Status::D),

            // Software interrupt
            Mnemonic::Brk => {
                self.pc = self.pc.wrapping_add(1);
                self.push_u16(bus, self.pc);
                let value = self.status.to_stack_byte(true);
                self.push(bus, value);
                self.status.insert(Status::I);
                self.pc = bus.read_u16(vectors::IRQ);
            }

            Mnemonic::Nop => {}

            // Undocumented combinations
            Mnemonic::Lax => {
                let value = bus.read(addr);
                self.a = value;
                self.x = value;
                self.status.set_zn(value);
            }
            Mnemonic::Sax => bus.write(addr, self.a & self.x),
            Mnemonic::Dcp => {
                let value = bus.read(addr).wrapping_sub(1);
                bus.write(addr, value);
                self.compare(self.a, value);
            }
            Mnemonic::Isb => {
                let value = bus.read(addr).wrapping_add(1);
                bus.write(addr, value);
                self.adc(!value);
            }
            Mnemonic::Slo => {
                let value = bus.read(addr);
                let shifted = self.do_asl(value);
                bus.write(addr, shifted);
                self.a |= shifted;
                self.status.set_zn(self.a);
            }
            Mnemonic::Rla => {
                let value = bus.read(addr);
                let rotated = self.do_rol(value);
                bus.write(addr, rotated);
                self.a &= rotated;
                self.status.set_zn(self.a);
            }
            Mnemonic::Sre => {
                let value = bus.read(addr);
                let shifted = self.do_lsr(value);
                bus.write(addr, shifted);
                self.a ^= shifted;
                self.status.set_zn(self.a);
            }
            Mnemonic::Rra => {
                let value = bus.read(addr);
                let rotated = self.do_ror(value);
                bus.write(addr, rotated);
                self.adc(rotated);
            }

            Mnemonic::Kil => {
                log::warn!("KIL opcode at ${:04X}; CPU jammed", self.pc.wrapping_sub(1));
                self.jammed = true;
            }
        }
    }

    /// Shift/rotate helper: accumulator mode mutates A, everything else
    /// does a read-modify-write on memory.
    fn rmw(
        &mut self,
        bus: &mut impl Bus,
        mode: AddrMode,
        addr: u16,
        f: fn(&mut Self, u8) -> u8,
    ) {
        if mode == AddrMode::Accumulator {
            let value = self.a;
            self.a = f(self, value);
            self.status.set_zn(self.a);
        } else {
            let value = bus.read(addr);
            let result = f(self, value);
            bus.write(addr, result);
            self.status.set_zn(result);
        }
    }

    fn do_asl(&mut self, value: u8) -> u8 {
        self.status.set(Status::C, value & 0x80 != 0);
        value << 1
    }

    fn do_lsr(&mut self, value: u8) -> u8 {
        self.status.set(Status::C, value & 0x01 != 0);
        value >> 1
    }

    fn do_rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.status.contains(Status::C));
        self.status.set(Status::C, value & 0x80 != 0);
        value << 1 | carry_in
    }

    fn do_ror(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.status.contains(Status::C));
        self.status.set(Status::C, value & 0x01 != 0);
        value >> 1 | carry_in << 7
    }

    /// ADC core; SBC routes through here with the operand complemented.
    fn adc(&mut self, value: u8) {
        let carry = u16::from(self.status.contains(Status::C));
        let sum = u16::from(self.a) + u16::from(value) + carry;
        let result = sum as u8;
        self.status.set(Status::C, sum > 0xFF);
        self.status.set(
            Status::V,
            !(self.a ^ value) & (self.a ^ result) & 0x80 != 0,
        );
        self.a = result;
        self.status.set_zn(self.a);
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.status.set(Status::C, register >= value);
        self.status.set_zn(register.wrapping_sub(value));
    }

    /// Takes a branch: +1 cycle, +1 more when the target crosses a page
    /// relative to the already-advanced PC.
    fn branch(&mut self, addr: u16, taken: bool) {
        if taken {
            self.cycles += 1;
            if Self::pages_differ(self.pc, addr) {
                self.cycles += 1;
            }
            self.pc = addr;
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestBus {
        memory: [u8; 0x10000],
    }

    impl TestBus {
        fn new() -> Self {
            Self {
                memory: [0; 0x10000],
            }
        }

        fn load(&mut self, addr: u16, program: &[u8]) {
            for (i, &byte) in program.iter().enumerate() {
                self.memory[addr as usize + i] = byte;
            }
            // Reset vector to the program start
            self.memory[0xFFFC] = (addr & 0xFF) as u8;
            self.memory[0xFFFD] = (addr >> 8) as u8;
        }
    }

    impl Bus for TestBus {
        fn read(&mut self, addr: u16) -> u8 {
            self.memory[addr as usize]
        }

        fn write(&mut self, addr: u16, value: u8) {
            self.memory[addr as usize] = value;
        }
    }

    fn boot(program: &[u8]) -> (Cpu, TestBus) {
        let mut bus = TestBus::new();
        bus.load(0x8000, program);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        (cpu, bus)
    }

    #[test]
    fn reset_state() {
        let (cpu, _) = boot(&[0xEA]);
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!(cpu.status.bits(), 0x24);
        assert_eq!(cpu.cycles, 7);
    }

    #[test]
    fn lda_immediate_flags() {
        let (mut cpu, mut bus) = boot(&[0xA9, 0x00, 0xA9, 0x80, 0xA9, 0x42]);
        cpu.step(&mut bus);
        assert!(cpu.status.contains(Status::Z));
        cpu.step(&mut bus);
        assert!(cpu.status.contains(Status::N));
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x42);
        assert!(!cpu.status.contains(Status::Z | Status::N));
    }

    #[test]
    fn adc_carry_and_overflow() {
        // LDA #$FF, ADC #$02 -> carry out
        let (mut cpu, mut bus) = boot(&[0xA9, 0xFF, 0x69, 0x02]);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x01);
        assert!(cpu.status.contains(Status::C));

        // LDA #$50, ADC #$50 -> signed overflow
        let (mut cpu, mut bus) = boot(&[0xA9, 0x50, 0x69, 0x50]);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.status.contains(Status::V));
    }

    #[test]
    fn sbc_is_adc_of_complement() {
        // SEC, LDA #$10, SBC #$08
        let (mut cpu, mut bus) = boot(&[0x38, 0xA9, 0x10, 0xE9, 0x08]);
        for _ in 0..3 {
            cpu.step(&mut bus);
        }
        assert_eq!(cpu.a, 0x08);
        assert!(cpu.status.contains(Status::C));
    }

    #[test]
    fn jsr_rts_round_trip() {
        let (mut cpu, mut bus) = boot(&[0x20, 0x10, 0x80]);
        bus.memory[0x8010] = 0x60; // RTS
        let sp = cpu.sp;
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x8010);
        assert_eq!(cpu.sp, sp.wrapping_sub(2));
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x8003);
        assert_eq!(cpu.sp, sp);
    }

    #[test]
    fn branch_cycle_accounting() {
        // BNE forward, not crossing a page: 3 cycles.
        let (mut cpu, mut bus) = boot(&[0xA9, 0x01, 0xD0, 0x05]);
        cpu.step(&mut bus);
        let cycles = cpu.step(&mut bus);
        assert_eq!(cycles, 3);
        assert_eq!(cpu.pc, 0x8009);

        // Branch not taken: 2 cycles.
        let (mut cpu, mut bus) = boot(&[0xA9, 0x00, 0xD0, 0x05]);
        cpu.step(&mut bus);
        let cycles = cpu.step(&mut bus);
        assert_eq!(cycles, 2);
        assert_eq!(cpu.pc, 0x8004);
    }

    #[test]
    fn page_cross_penalty() {
        // LDA $80FF,X with X=1 crosses into $8100: 5 cycles.
        let (mut cpu, mut bus) = boot(&[0xA2, 0x01, 0xBD, 0xFF, 0x80]);
        cpu.step(&mut bus);
        let cycles = cpu.step(&mut bus);
        assert_eq!(cycles, 5);

        // Same read without the cross: 4 cycles.
        let (mut cpu, mut bus) = boot(&[0xA2, 0x01, 0xBD, 0x00, 0x80]);
        cpu.step(&mut bus);
        let cycles = cpu.step(&mut bus);
        assert_eq!(cycles, 4);
    }

    #[test]
    fn jmp_indirect_page_wrap_bug() {
        let (mut cpu, mut bus) = boot(&[0x6C, 0xFF, 0x02]);
        bus.memory[0x02FF] = 0x34;
        bus.memory[0x0300] = 0xFF; // must NOT be used
        bus.memory[0x0200] = 0x12; // wrapped high byte
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x1234);
    }

    #[test]
    fn brk_pushes_pc_plus_two_and_b_set() {
        let (mut cpu, mut bus) = boot(&[0x00]);
        bus.memory[0xFFFE] = 0x00;
        bus.memory[0xFFFF] = 0x90;
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x9000);
        assert!(cpu.status.contains(Status::I));
        // Stacked PC is $8002, stacked status has B and U set.
        assert_eq!(bus.memory[0x01FD], 0x80);
        assert_eq!(bus.memory[0x01FC], 0x02);
        assert_eq!(bus.memory[0x01FB] & 0x30, 0x30);
    }

    #[test]
    fn nmi_entry() {
        let (mut cpu, mut bus) = boot(&[0xEA]);
        bus.memory[0xFFFA] = 0x00;
        bus.memory[0xFFFB] = 0xA0;
        bus.memory[0xA000] = 0xEA; // NOP at the handler
        cpu.trigger_nmi();
        let cycles = cpu.step(&mut bus);
        // 7 for the interrupt entry + 2 for the handler's first NOP.
        assert_eq!(cycles, 9);
        assert_eq!(cpu.pc, 0xA001);
        assert_eq!(bus.memory[0x01FB] & 0x30, 0x20); // B clear, U set
        assert!(cpu.status.contains(Status::I));
    }

    #[test]
    fn irq_masked_by_i_flag() {
        let (mut cpu, mut bus) = boot(&[0x58, 0xEA, 0xEA]);
        bus.memory[0xFFFE] = 0x00;
        bus.memory[0xFFFF] = 0xB0;
        bus.memory[0xB000] = 0xEA; // NOP at the handler
        cpu.trigger_irq();
        cpu.step(&mut bus); // CLI; IRQ stays pending while I is set
        cpu.step(&mut bus); // Serviced now, then the handler's NOP runs
        assert_eq!(cpu.pc, 0xB001);
    }

    #[test]
    fn stall_consumes_single_cycles() {
        let (mut cpu, mut bus) = boot(&[0xA9, 0x42]);
        cpu.add_stall(3);
        for _ in 0..3 {
            assert_eq!(cpu.step(&mut bus), 1);
        }
        assert_eq!(cpu.a, 0);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x42);
    }

    #[test]
    fn kil_jams_forever() {
        let (mut cpu, mut bus) = boot(&[0x02, 0xA9, 0x42]);
        cpu.step(&mut bus);
        assert!(cpu.is_jammed());
        for _ in 0..10 {
            assert_eq!(cpu.step(&mut bus), 1);
        }
        assert_eq!(cpu.a, 0);
    }

    #[test]
    fn undocumented_lax_and_sax() {
        let (mut cpu, mut bus) = boot(&[0xA7, 0x10, 0x87, 0x11]);
        bus.memory[0x10] = 0x5A;
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x5A);
        assert_eq!(cpu.x, 0x5A);
        cpu.step(&mut bus);
        assert_eq!(bus.memory[0x11], 0x5A);
    }

    #[test]
    fn undocumented_dcp() {
        let (mut cpu, mut bus) = boot(&[0xA9, 0x41, 0xC7, 0x10]);
        bus.memory[0x10] = 0x42;
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(bus.memory[0x10], 0x41);
        assert!(cpu.status.contains(Status::Z)); // A == M-1
        assert!(cpu.status.contains(Status::C));
    }

    #[test]
    fn stack_stays_in_page_one() {
        let (mut cpu, mut bus) = boot(&[0x48]); // PHA
        cpu.sp = 0x00; // force wrap
        cpu.a = 0x7E;
        cpu.step(&mut bus);
        assert_eq!(cpu.sp, 0xFF);
        assert_eq!(bus.memory[0x0100], 0x7E);
    }
}
