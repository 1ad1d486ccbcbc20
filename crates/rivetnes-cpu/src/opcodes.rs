//! Opcode decode tables for the 6502.
//!
//! All 256 encodings are covered: the 151 official opcodes, the stable
//! undocumented read-modify-write combinations several test ROMs exercise
//! (LAX, SAX, DCP, ISB, SLO, RLA, SRE, RRA), the KIL/JAM halts, and NOPs of
//! the proper size and cycle count for everything else. Cycle counts and
//! page-cross penalties follow the standard 6502 reference tables.

use crate::addressing::AddrMode;

/// Instruction mnemonics, one tag per distinct operation.
///
/// Undocumented encodings without a stable documented combination decode as
/// [`Mnemonic::Nop`]; the halt opcodes decode as [`Mnemonic::Kil`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // The 6502 reference names these; per-variant docs add nothing.
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    // Undocumented
    Kil, Lax, Sax, Dcp, Isb, Slo, Rla, Sre, Rra,
}

/// Decoded opcode attributes.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    /// Operation to perform.
    pub mnemonic: Mnemonic,
    /// How the operand address is formed.
    pub mode: AddrMode,
    /// Base cycle count.
    pub cycles: u8,
    /// Whether a crossed page boundary costs one extra cycle.
    pub page_cycles: bool,
}

const fn op(mnemonic: Mnemonic, mode: AddrMode, cycles: u8, page_cycles: bool) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        cycles,
        page_cycles,
    }
}

use AddrMode::{
    Absolute as Abs, AbsoluteX as Abx, AbsoluteY as Aby, Accumulator as Acc, Immediate as Imm,
    Implied as Imp, IndexedIndirect as Izx, Indirect as Ind, IndirectIndexed as Izy,
    Relative as Rel, ZeroPage as Zp0, ZeroPageX as Zpx, ZeroPageY as Zpy,
};
use Mnemonic::*;

/// Complete 256-entry decode table, indexed by opcode byte.
#[rustfmt::skip]
pub const OPCODES: [OpcodeInfo; 256] = [
    // 0x00
    op(Brk, Imp, 7, false), op(Ora, Izx, 6, false), op(Kil, Imp, 2, false), op(Slo, Izx, 8, false),
    op(Nop, Zp0, 3, false), op(Ora, Zp0, 3, false), op(Asl, Zp0, 5, false), op(Slo, Zp0, 5, false),
    op(Php, Imp, 3, false), op(Ora, Imm, 2, false), op(Asl, Acc, 2, false), op(Nop, Imm, 2, false),
    op(Nop, Abs, 4, false), op(Ora, Abs, 4, false), op(Asl, Abs, 6, false), op(Slo, Abs, 6, false),
    // 0x10
    op(Bpl, Rel, 2, true),  op(Ora, Izy, 5, true),  op(Kil, Imp, 2, false), op(Slo, Izy, 8, false),
    op(Nop, Zpx, 4, false), op(Ora, Zpx, 4, false), op(Asl, Zpx, 6, false), op(Slo, Zpx, 6, false),
    op(Clc, Imp, 2, false), op(Ora, Aby, 4, true),  op(Nop, Imp, 2, false), op(Slo, Aby, 7, false),
    op(Nop, Abx, 4, true),  op(Ora, Abx, 4, true),  op(Asl, Abx, 7, false), op(Slo, Abx, 7, false),
    // 0x20
    op(Jsr, Abs, 6, false), op(And, Izx, 6, false), op(Kil, Imp, 2, false), op(Rla, Izx, 8, false),
    op(Bit, Zp0, 3, false), op(And, Zp0, 3, false), op(Rol, Zp0, 5, false), op(Rla, Zp0, 5, false),
    op(Plp, Imp, 4, false), op(And, Imm, 2, false), op(Rol, Acc, 2, false), op(Nop, Imm, 2, false),
    op(Bit, Abs, 4, false), op(And, Abs, 4, false), op(Rol, Abs, 6, false), op(Rla, Abs, 6, false),
    // 0x30
    op(Bmi, Rel, 2, true),  op(And, Izy, 5, true),  op(Kil, Imp, 2, false), op(Rla, Izy, 8, false),
    op(Nop, Zpx, 4, false), op(And, Zpx, 4, false), op(Rol, Zpx, 6, false), op(Rla, Zpx, 6, false),
    op(Sec, Imp, 2, false), op(And, Aby, 4, true),  op(Nop, Imp, 2, false), op(Rla, Aby, 7, false),
    op(Nop, Abx, 4, true),  op(And, Abx, 4, true),  op(Rol, Abx, 7, false), op(Rla, Abx, 7, false),
    // 0x40
    op(Rti, Imp, 6, false), op(Eor, Izx, 6, false), op(Kil, Imp, 2, false), op(Sre, Izx, 8, false),
    op(Nop, Zp0, 3, false), op(Eor, Zp0, 3, false), op(Lsr, Zp0, 5, false), op(Sre, Zp0, 5, false),
    op(Pha, Imp, 3, false), op(Eor, Imm, 2, false), op(Lsr, Acc, 2, false), op(Nop, Imm, 2, false),
    op(Jmp, Abs, 3, false), op(Eor, Abs, 4, false), op(Lsr, Abs, 6, false), op(Sre, Abs, 6, false),
    // 0x50
    op(Bvc, Rel, 2, true),  op(Eor, Izy, 5, true),  op(Kil, Imp, 2, false), op(Sre, Izy, 8, false),
    op(Nop, Zpx, 4, false), op(Eor, Zpx, 4, false), op(Lsr, Zpx, 6, false), op(Sre, Zpx, 6, false),
    op(Cli, Imp, 2, false), op(Eor, Aby, 4, true),  op(Nop, Imp, 2, false), op(Sre, Aby, 7, false),
    op(Nop, Abx, 4, true),  op(Eor, Abx, 4, true),  op(Lsr, Abx, 7, false), op(Sre, Abx, 7, false),
    // 0x60
    op(Rts, Imp, 6, false), op(Adc, Izx, 6, false), op(Kil, Imp, 2, false), op(Rra, Izx, 8, false),
    op(Nop, Zp0, 3, false), op(Adc, Zp0, 3, false), op(Ror, Zp0, 5, false), op(Rra, Zp0, 5, false),
    op(Pla, Imp, 4, false), op(Adc, Imm, 2, false), op(Ror, Acc, 2, false), op(Nop, Imm, 2, false),
    op(Jmp, Ind, 5, false), op(Adc, Abs, 4, false), op(Ror, Abs, 6, false), op(Rra, Abs, 6, false),
    // 0x70
    op(Bvs, Rel, 2, true),  op(Adc, Izy, 5, true),  op(Kil, Imp, 2, false), op(Rra, Izy, 8, false),
    op(Nop, Zpx, 4, false), op(Adc, Zpx, 4, false), op(Ror, Zpx, 6, false), op(Rra, Zpx, 6, false),
    op(Sei, Imp, 2, false), op(Adc, Aby, 4, true),  op(Nop, Imp, 2, false), op(Rra, Aby, 7, false),
    op(Nop, Abx, 4, true),  op(Adc, Abx, 4, true),  op(Ror, Abx, 7, false), op(Rra, Abx, 7, false),
    // 0x80
    op(Nop, Imm, 2, false), op(Sta, Izx, 6, false), op(Nop, Imm, 2, false), op(Sax, Izx, 6, false),
    op(Sty, Zp0, 3, false), op(Sta, Zp0, 3, false), op(Stx, Zp0, 3, false), op(Sax, Zp0, 3, false),
    op(Dey, Imp, 2, false), op(Nop, Imm, 2, false), op(Txa, Imp, 2, false), op(Nop, Imm, 2, false),
    op(Sty, Abs, 4, false), op(Sta, Abs, 4, false), op(Stx, Abs, 4, false), op(Sax, Abs, 4, false),
    // 0x90
    op(Bcc, Rel, 2, true),  op(Sta, Izy, 6, false), op(Kil, Imp, 2, false), op(Nop, Izy, 6, false),
    op(Sty, Zpx, 4, false), op(Sta, Zpx, 4, false), op(Stx, Zpy, 4, false), op(Sax, Zpy, 4, false),
    op(Tya, Imp, 2, false), op(Sta, Aby, 5, false), op(Txs, Imp, 2, false), op(Nop, Aby, 5, false),
    op(Nop, Abx, 5, false), op(Sta, Abx, 5, false), op(Nop, Aby, 5, false), op(Nop, Aby, 5, false),
    // 0xA0
    op(Ldy, Imm, 2, false), op(Lda, Izx, 6, false), op(Ldx, Imm, 2, false), op(Lax, Izx, 6, false),
    op(Ldy, Zp0, 3, false), op(Lda, Zp0, 3, false), op(Ldx, Zp0, 3, false), op(Lax, Zp0, 3, false),
    op(Tay, Imp, 2, false), op(Lda, Imm, 2, false), op(Tax, Imp, 2, false), op(Nop, Imm, 2, false),
    op(Ldy, Abs, 4, false), op(Lda, Abs, 4, false), op(Ldx, Abs, 4, false), op(Lax, Abs, 4, false),
    // 0xB0
    op(Bcs, Rel, 2, true),  op(Lda, Izy, 5, true),  op(Kil, Imp, 2, false), op(Lax, Izy, 5, true),
    op(Ldy, Zpx, 4, false), op(Lda, Zpx, 4, false), op(Ldx, Zpy, 4, false), op(Lax, Zpy, 4, false),
    op(Clv, Imp, 2, false), op(Lda, Aby, 4, true),  op(Tsx, Imp, 2, false), op(Nop, Aby, 4, true),
    op(Ldy, Abx, 4, true),  op(Lda, Abx, 4, true),  op(Ldx, Aby, 4, true),  op(Lax, Aby, 4, true),
    // 0xC0
    op(Cpy, Imm, 2, false), op(Cmp, Izx, 6, false), op(Nop, Imm, 2, false), op(Dcp, Izx, 8, false),
    op(Cpy, Zp0, 3, false), op(Cmp, Zp0, 3, false), op(Dec, Zp0, 5, false), op(Dcp, Zp0, 5, false),
    op(Iny, Imp, 2, false), op(Cmp, Imm, 2, false), op(Dex, Imp, 2, false), op(Nop, Imm, 2, false),
    op(Cpy, Abs, 4, false), op(Cmp, Abs, 4, false), op(Dec, Abs, 6, false), op(Dcp, Abs, 6, false),
    // 0xD0
    op(Bne, Rel, 2, true),  op(Cmp, Izy, 5, true),  op(Kil, Imp, 2, false), op(Dcp, Izy, 8, false),
    op(Nop, Zpx, 4, false), op(Cmp, Zpx, 4, false), op(Dec, Zpx, 6, false), op(Dcp, Zpx, 6, false),
    op(Cld, Imp, 2, false), op(Cmp, Aby, 4, true),  op(Nop, Imp, 2, false), op(Dcp, Aby, 7, false),
    op(Nop, Abx, 4, true),  op(Cmp, Abx, 4, true),  op(Dec, Abx, 7, false), op(Dcp, Abx, 7, false),
    // 0xE0
    op(Cpx, Imm, 2, false), op(Sbc, Izx, 6, false), op(Nop, Imm, 2, false), op(Isb, Izx, 8, false),
    op(Cpx, Zp0, 3, false), op(Sbc, Zp0, 3, false), op(Inc, Zp0, 5, false), op(Isb, Zp0, 5, false),
    op(Inx, Imp, 2, false), op(Sbc, Imm, 2, false), op(Nop, Imp, 2, false), op(Sbc, Imm, 2, false),
    op(Cpx, Abs, 4, false), op(Sbc, Abs, 4, false), op(Inc, Abs, 6, false), op(Isb, Abs, 6, false),
    // 0xF0
    op(Beq, Rel, 2, true),  op(Sbc, Izy, 5, true),  op(Kil, Imp, 2, false), op(Isb, Izy, 8, false),
    op(Nop, Zpx, 4, false), op(Sbc, Zpx, 4, false), op(Inc, Zpx, 6, false), op(Isb, Zpx, 6, false),
    op(Sed, Imp, 2, false), op(Sbc, Aby, 4, true),  op(Nop, Imp, 2, false), op(Isb, Aby, 7, false),
    op(Nop, Abx, 4, true),  op(Sbc, Abx, 4, true),  op(Inc, Abx, 7, false), op(Isb, Abx, 7, false),
];

impl Mnemonic {
    /// Three-letter assembly name, for trace output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Adc => "ADC", And => "AND", Asl => "ASL", Bcc => "BCC", Bcs => "BCS",
            Beq => "BEQ", Bit => "BIT", Bmi => "BMI", Bne => "BNE", Bpl => "BPL",
            Brk => "BRK", Bvc => "BVC", Bvs => "BVS", Clc => "CLC", Cld => "CLD",
            Cli => "CLI", Clv => "CLV", Cmp => "CMP", Cpx => "CPX", Cpy => "CPY",
            Dec => "DEC", Dex => "DEX", Dey => "DEY", Eor => "EOR", Inc => "INC",
            Inx => "INX", Iny => "INY", Jmp => "JMP", Jsr => "JSR", Lda => "LDA",
            Ldx => "LDX", Ldy => "LDY", Lsr => "LSR", Nop => "NOP", Ora => "ORA",
            Pha => "PHA", Php => "PHP", Pla => "PLA", Plp => "PLP", Rol => "ROL",
            Ror => "ROR", Rti => "RTI", Rts => "RTS", Sbc => "SBC", Sec => "SEC",
            Sed => "SED", Sei => "SEI", Sta => "STA", Stx => "STX", Sty => "STY",
            Tax => "TAX", Tay => "TAY", Tsx => "TSX", Txa => "TXA", Txs => "TXS",
            Tya => "TYA", Kil => "KIL", Lax => "LAX", Sax => "SAX", Dcp => "DCP",
            Isb => "ISB", Slo => "SLO", Rla => "RLA", Sre => "SRE", Rra => "RRA",
        }
    }
}
