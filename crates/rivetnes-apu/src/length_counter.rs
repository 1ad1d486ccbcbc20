//! Length counter unit.
//!
//! Gates channel output and silences it after a programmed duration,
//! clocked on half frames.

/// Lengths indexed by the 5-bit load value of the $4003-family registers.
#[rustfmt::skip]
pub const LENGTH_TABLE: [u8; 32] = [
    10, 254, 20,  2, 40,  4, 80,  6, 160,  8, 60, 10, 14, 12, 26, 14,
    12,  16, 24, 18, 48, 20, 96, 22, 192, 24, 72, 26, 16, 28, 32, 30,
];

/// Length counter.
#[derive(Debug, Clone, Default)]
pub struct LengthCounter {
    enabled: bool,
    halted: bool,
    value: u8,
}

impl LengthCounter {
    /// Creates a disabled counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// $4015 channel enable; disabling zeroes the counter.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.value = 0;
        }
    }

    /// Halt flag (shared with the envelope loop bit).
    pub fn set_halted(&mut self, halted: bool) {
        self.halted = halted;
    }

    /// Loads a duration from the table (register value bits 3-7).
    pub fn load(&mut self, index: u8) {
        self.value = LENGTH_TABLE[(index & 0x1F) as usize];
    }

    /// Half-frame clock.
    pub fn clock(&mut self) {
        if !self.halted && self.value > 0 {
            self.value -= 1;
        }
    }

    /// Whether the gate is open.
    #[must_use]
    pub fn active(&self) -> bool {
        self.enabled && self.value > 0
    }

    /// Remaining count; drives the $4015 status bits.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_table() {
        let mut lc = LengthCounter::new();
        lc.set_enabled(true);
        lc.load(0);
        assert_eq!(lc.value(), 10);
        lc.load(1);
        assert_eq!(lc.value(), 254);
        lc.load(0x1F);
        assert_eq!(lc.value(), 30);
    }

    #[test]
    fn clocks_down_to_zero_unless_halted() {
        let mut lc = LengthCounter::new();
        lc.set_enabled(true);
        lc.load(0); // 10
        for _ in 0..10 {
            assert!(lc.active());
            lc.clock();
        }
        assert!(!lc.active());
        lc.clock();
        assert_eq!(lc.value(), 0);

        lc.load(0);
        lc.set_halted(true);
        lc.clock();
        assert_eq!(lc.value(), 10);
    }

    #[test]
    fn disabling_zeroes_the_counter() {
        let mut lc = LengthCounter::new();
        lc.set_enabled(true);
        lc.load(2);
        lc.set_enabled(false);
        assert_eq!(lc.value(), 0);
        assert!(!lc.active());
    }
}
