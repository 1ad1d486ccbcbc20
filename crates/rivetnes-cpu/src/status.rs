//! CPU status register (P register) flags.
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! N  V  U  B  D  I  Z  C
//! │  │  │  │  │  │  │  └─ Carry
//! │  │  │  │  │  │  └──── Zero
//! │  │  │  │  │  └─────── Interrupt Disable
//! │  │  │  │  └────────── Decimal Mode (unused on the NES, still writable)
//! │  │  │  └───────────── Break (1 when pushed by PHP/BRK, 0 by IRQ/NMI)
//! │  │  └──────────────── Unused (always 1 when pushed to the stack)
//! │  └─────────────────── Overflow
//! └────────────────────── Negative
//! ```

use bitflags::bitflags;

bitflags! {
    /// CPU status register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// Carry flag.
        const C = 1 << 0;
        /// Zero flag.
        const Z = 1 << 1;
        /// Interrupt disable flag. Masks IRQ, never NMI.
        const I = 1 << 2;
        /// Decimal mode flag. The 2A03 has no BCD unit but the bit behaves.
        const D = 1 << 3;
        /// Break flag. Only meaningful in stacked copies of the register.
        const B = 1 << 4;
        /// Unused flag. Reads as 1 in stacked copies.
        const U = 1 << 5;
        /// Overflow flag.
        const V = 1 << 6;
        /// Negative flag. Mirrors bit 7 of the last result.
        const N = 1 << 7;
    }
}

impl Status {
    /// Power-on state ($24): I and U set.
    pub const POWER_ON: Self = Self::I.union(Self::U);

    /// Creates a status register in the power-on state.
    #[must_use]
    pub const fn new() -> Self {
        Self::POWER_ON
    }

    /// Sets or clears the Zero and Negative flags from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set(Self::Z, value == 0);
        self.set(Self::N, value & 0x80 != 0);
    }

    /// Converts the register to a byte for pushing to the stack.
    /// U is always set; B is set only for PHP/BRK push sites.
    #[inline]
    #[must_use]
    pub const fn to_stack_byte(self, brk: bool) -> u8 {
        let mut value = self.bits() | Self::U.bits();
        if brk {
            value |= Self::B.bits();
        }
        value
    }

    /// Builds the register from a byte pulled off the stack.
    /// B is discarded and U forced set, so PLP/RTI never latch them.
    #[inline]
    #[must_use]
    pub fn from_stack_byte(value: u8) -> Self {
        Self::from_bits_truncate((value & !Self::B.bits()) | Self::U.bits())
    }
}
