//! PPUMASK ($2001) register.

use bitflags::bitflags;

bitflags! {
    /// PPU mask register.
    ///
    /// ```text
    /// 7  6  5  4  3  2  1  0
    /// B  G  R  s  b  M  m  g
    /// │  │  │  │  │  │  │  └─ grayscale
    /// │  │  │  │  │  │  └──── show background in the left 8 pixels
    /// │  │  │  │  │  └─────── show sprites in the left 8 pixels
    /// │  │  │  │  └────────── show background
    /// │  │  │  └───────────── show sprites
    /// └──┴──┴──────────────── color emphasis (stored, not applied)
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mask: u8 {
        /// Grayscale output.
        const GRAYSCALE = 1 << 0;
        /// Show background in the leftmost 8 pixels.
        const SHOW_LEFT_BACKGROUND = 1 << 1;
        /// Show sprites in the leftmost 8 pixels.
        const SHOW_LEFT_SPRITES = 1 << 2;
        /// Enable background rendering.
        const SHOW_BACKGROUND = 1 << 3;
        /// Enable sprite rendering.
        const SHOW_SPRITES = 1 << 4;
        /// Emphasize red.
        const EMPHASIZE_RED = 1 << 5;
        /// Emphasize green.
        const EMPHASIZE_GREEN = 1 << 6;
        /// Emphasize blue.
        const EMPHASIZE_BLUE = 1 << 7;
    }
}

impl Mask {
    /// Whether background rendering is enabled.
    #[must_use]
    pub fn show_background(self) -> bool {
        self.contains(Self::SHOW_BACKGROUND)
    }

    /// Whether sprite rendering is enabled.
    #[must_use]
    pub fn show_sprites(self) -> bool {
        self.contains(Self::SHOW_SPRITES)
    }

    /// Whether the background renders in the leftmost 8 pixels.
    #[must_use]
    pub fn show_left_background(self) -> bool {
        self.contains(Self::SHOW_LEFT_BACKGROUND)
    }

    /// Whether sprites render in the leftmost 8 pixels.
    #[must_use]
    pub fn show_left_sprites(self) -> bool {
        self.contains(Self::SHOW_LEFT_SPRITES)
    }

    /// Whether any rendering is enabled; gates scroll updates, the
    /// odd-frame skip and the MMC3 clock.
    #[must_use]
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Self::SHOW_BACKGROUND | Self::SHOW_SPRITES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_enabled_needs_either_layer() {
        assert!(!Mask::from_bits_truncate(0x00).rendering_enabled());
        assert!(Mask::from_bits_truncate(0x08).rendering_enabled());
        assert!(Mask::from_bits_truncate(0x10).rendering_enabled());
        assert!(Mask::from_bits_truncate(0x18).rendering_enabled());
    }
}
