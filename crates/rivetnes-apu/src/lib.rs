//! NES 2A03 APU (Audio Processing Unit) emulation.
//!
//! Five channels feed a non-linear mixer:
//!
//! - **Pulse 1 & 2**: square waves with duty, envelope, and sweep
//! - **Triangle**: fixed-volume 32-step waveform with a linear counter
//! - **Noise**: 15-bit LFSR with envelope
//! - **DMC**: 1-bit delta samples streamed from CPU address space
//!
//! A frame sequencer distributes envelope/length/sweep clocks at 240 Hz
//! and raises the frame IRQ in 4-step mode. Mixed output runs through a
//! first-order filter chain and is pushed into a bounded channel at the
//! host sample rate; when the channel is full the sample is dropped so
//! emulation never stalls on audio.
//!
//! # Example
//!
//! ```
//! use rivetnes_apu::Apu;
//! use std::sync::mpsc::sync_channel;
//!
//! let mut apu = Apu::new();
//! let (tx, rx) = sync_channel(4096);
//! apu.set_sink(tx);
//! apu.set_sample_rate(44_100);
//!
//! // Pulse 1: constant volume, mid period
//! apu.write(0x4015, 0x01);
//! apu.write(0x4000, 0xBF);
//! apu.write(0x4002, 0xFD);
//! apu.write(0x4003, 0x00);
//!
//! for _ in 0..29_780 {
//!     apu.clock();
//! }
//! let frame_of_samples: Vec<f32> = rx.try_iter().collect();
//! ```

mod apu;
mod dmc;
mod envelope;
mod filter;
mod frame_counter;
mod length_counter;
mod noise;
mod pulse;
mod sweep;
mod timer;
mod triangle;

pub use apu::Apu;
pub use dmc::Dmc;
pub use envelope::Envelope;
pub use filter::{FilterChain, FirstOrderFilter};
pub use frame_counter::{FrameEvent, FrameSequencer};
pub use length_counter::{LengthCounter, LENGTH_TABLE};
pub use noise::Noise;
pub use pulse::Pulse;
pub use sweep::{PulseChannel, Sweep};
pub use timer::Timer;
pub use triangle::Triangle;

/// NTSC CPU clock rate in Hz.
pub const CPU_CLOCK_NTSC: u32 = 1_789_773;

/// Frame sequencer divider: the sequencer steps at 240 Hz.
pub const FRAME_COUNTER_RATE: f64 = CPU_CLOCK_NTSC as f64 / 240.0;
