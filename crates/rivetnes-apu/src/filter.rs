//! First-order output filters.
//!
//! The mixed channel output runs through a short analog-style chain
//! before reaching the sample sink: two high-pass stages and one
//! low-pass, each `y[n] = B0*x[n] + B1*x[n-1] - A1*y[n-1]` with
//! coefficients derived from the sample rate and cutoff.

use std::f32::consts::PI;

/// Single first-order IIR stage.
#[derive(Debug, Clone)]
pub struct FirstOrderFilter {
    b0: f32,
    b1: f32,
    a1: f32,
    prev_x: f32,
    prev_y: f32,
}

impl FirstOrderFilter {
    /// Low-pass stage with the given cutoff.
    #[must_use]
    pub fn low_pass(sample_rate: f32, cutoff: f32) -> Self {
        let c = sample_rate / PI / cutoff;
        let a0i = 1.0 / (1.0 + c);
        Self {
            b0: a0i,
            b1: a0i,
            a1: (1.0 - c) * a0i,
            prev_x: 0.0,
            prev_y: 0.0,
        }
    }

    /// High-pass stage with the given cutoff.
    #[must_use]
    pub fn high_pass(sample_rate: f32, cutoff: f32) -> Self {
        let c = sample_rate / PI / cutoff;
        let a0i = 1.0 / (1.0 + c);
        Self {
            b0: c * a0i,
            b1: -c * a0i,
            a1: (1.0 - c) * a0i,
            prev_x: 0.0,
            prev_y: 0.0,
        }
    }

    /// Runs one sample through the stage.
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.prev_x - self.a1 * self.prev_y;
        self.prev_y = y;
        self.prev_x = x;
        y
    }
}

/// Ordered chain of filter stages.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<FirstOrderFilter>,
}

impl FilterChain {
    /// An empty (pass-through) chain.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard NES output chain: high-pass 90 Hz, high-pass 440 Hz,
    /// low-pass 14 kHz.
    #[must_use]
    pub fn nes_default(sample_rate: f32) -> Self {
        Self {
            filters: vec![
                FirstOrderFilter::high_pass(sample_rate, 90.0),
                FirstOrderFilter::high_pass(sample_rate, 440.0),
                FirstOrderFilter::low_pass(sample_rate, 14_000.0),
            ],
        }
    }

    /// Runs one sample through every stage in order.
    pub fn process(&mut self, mut x: f32) -> f32 {
        for filter in &mut self.filters {
            x = filter.process(x);
        }
        x
    }
}
