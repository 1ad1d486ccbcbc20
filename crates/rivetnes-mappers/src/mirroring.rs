//! Nametable mirroring modes.

/// How the four logical nametables map onto the 2 KiB of internal VRAM.
///
/// Cartridge wiring fixes this for simple boards; MMC1, MMC3 and AxROM
/// rewrite it at runtime from register stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mirroring {
    /// $2000/$2400 share one table, $2800/$2C00 the other.
    #[default]
    Horizontal,
    /// $2000/$2800 share one table, $2400/$2C00 the other.
    Vertical,
    /// All four map to the first 1 KiB.
    Single0,
    /// All four map to the second 1 KiB.
    Single1,
    /// Four distinct tables (cartridge supplies the extra VRAM).
    FourScreen,
}

impl Mirroring {
    /// Physical nametable (0-3) for each logical table under this mode.
    #[must_use]
    pub const fn table(self) -> [u16; 4] {
        match self {
            Self::Horizontal => [0, 0, 1, 1],
            Self::Vertical => [0, 1, 0, 1],
            Self::Single0 => [0, 0, 0, 0],
            Self::Single1 => [1, 1, 1, 1],
            Self::FourScreen => [0, 1, 2, 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_tables() {
        assert_eq!(Mirroring::Horizontal.table(), [0, 0, 1, 1]);
        assert_eq!(Mirroring::Vertical.table(), [0, 1, 0, 1]);
        assert_eq!(Mirroring::Single1.table(), [1, 1, 1, 1]);
    }
}
