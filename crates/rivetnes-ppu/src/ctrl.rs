//! PPUCTRL ($2000) register.

use bitflags::bitflags;

bitflags! {
    /// PPU control register.
    ///
    /// ```text
    /// 7  6  5  4  3  2  1  0
    /// V  P  H  B  S  I  N  N
    /// │  │  │  │  │  │  └──┴─ base nametable (consumed via loopy-t)
    /// │  │  │  │  │  └─────── VRAM increment (0: +1, 1: +32)
    /// │  │  │  │  └────────── sprite pattern table (8x8 mode)
    /// │  │  │  └───────────── background pattern table
    /// │  │  └──────────────── sprite size (0: 8x8, 1: 8x16)
    /// │  └─────────────────── PPU master/slave (unused here)
    /// └────────────────────── NMI at VBlank start
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Ctrl: u8 {
        /// Base nametable select, low bit.
        const NAMETABLE_LO = 1 << 0;
        /// Base nametable select, high bit.
        const NAMETABLE_HI = 1 << 1;
        /// VRAM address increment per PPUDATA access.
        const INCREMENT = 1 << 2;
        /// Sprite pattern table address for 8x8 sprites.
        const SPRITE_TABLE = 1 << 3;
        /// Background pattern table address.
        const BACKGROUND_TABLE = 1 << 4;
        /// Sprite size.
        const SPRITE_SIZE = 1 << 5;
        /// EXT pin direction (ignored).
        const MASTER_SLAVE = 1 << 6;
        /// Generate an NMI at the start of VBlank.
        const NMI_ENABLE = 1 << 7;
    }
}

impl Ctrl {
    /// VRAM address step for PPUDATA accesses.
    #[must_use]
    pub fn increment(self) -> u16 {
        if self.contains(Self::INCREMENT) {
            32
        } else {
            1
        }
    }

    /// Pattern table base for 8x8 sprites ($0000 or $1000).
    #[must_use]
    pub fn sprite_table(self) -> u16 {
        if self.contains(Self::SPRITE_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Pattern table base for the background.
    #[must_use]
    pub fn background_table(self) -> u16 {
        if self.contains(Self::BACKGROUND_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Sprite height in pixels (8 or 16).
    #[must_use]
    pub fn sprite_height(self) -> u16 {
        if self.contains(Self::SPRITE_SIZE) {
            16
        } else {
            8
        }
    }

    /// Whether the VBlank NMI is enabled.
    #[must_use]
    pub fn nmi_enabled(self) -> bool {
        self.contains(Self::NMI_ENABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoded_fields() {
        let ctrl = Ctrl::from_bits_truncate(0x00);
        assert_eq!(ctrl.increment(), 1);
        assert_eq!(ctrl.sprite_height(), 8);
        assert!(!ctrl.nmi_enabled());

        let ctrl = Ctrl::from_bits_truncate(0xBC);
        assert_eq!(ctrl.increment(), 32);
        assert_eq!(ctrl.sprite_table(), 0x1000);
        assert_eq!(ctrl.background_table(), 0x1000);
        assert_eq!(ctrl.sprite_height(), 16);
        assert!(ctrl.nmi_enabled());
    }
}
