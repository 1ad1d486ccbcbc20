//! APU register fan-out, clocking, and sample output.

use std::sync::mpsc::SyncSender;

use crate::dmc::Dmc;
use crate::filter::FilterChain;
use crate::frame_counter::{FrameEvent, FrameSequencer};
use crate::noise::Noise;
use crate::pulse::Pulse;
use crate::sweep::PulseChannel;
use crate::triangle::Triangle;
use crate::{CPU_CLOCK_NTSC, FRAME_COUNTER_RATE};

/// Non-linear pulse mixer: `95.52 / (8128 / (p1 + p2) + 100)`.
const PULSE_TABLE: [f32; 31] = {
    let mut table = [0.0f32; 31];
    let mut i = 1;
    while i < 31 {
        table[i] = 95.52 / (8128.0 / (i as f32) + 100.0);
        i += 1;
    }
    table
};

/// Non-linear TND mixer: `163.67 / (24329 / (3t + 2n + d) + 100)`.
const TND_TABLE: [f32; 203] = {
    let mut table = [0.0f32; 203];
    let mut i = 1;
    while i < 203 {
        table[i] = 163.67 / (24329.0 / (i as f32) + 100.0);
        i += 1;
    }
    table
};

/// Audio Processing Unit.
///
/// [`Apu::clock`] advances one CPU cycle: pulse/noise/DMC timers run every
/// other cycle, the triangle every cycle, the frame sequencer on 240 Hz
/// divider boundaries, and a sample is offered to the sink whenever the
/// sample divider crosses an integer boundary.
pub struct Apu {
    pulse1: Pulse,
    pulse2: Pulse,
    triangle: Triangle,
    noise: Noise,
    dmc: Dmc,
    sequencer: FrameSequencer,
    cycle: u64,
    cycles_per_sample: f64,
    sink: Option<SyncSender<f32>>,
    filters: FilterChain,
}

impl Apu {
    /// Creates an APU with no sample sink attached.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pulse1: Pulse::new(PulseChannel::One),
            pulse2: Pulse::new(PulseChannel::Two),
            triangle: Triangle::new(),
            noise: Noise::new(),
            dmc: Dmc::new(),
            sequencer: FrameSequencer::new(),
            cycle: 0,
            cycles_per_sample: 0.0,
            sink: None,
            filters: FilterChain::empty(),
        }
    }

    /// Attaches the outbound sample channel. The APU only ever pushes;
    /// a full channel drops the sample.
    pub fn set_sink(&mut self, sink: SyncSender<f32>) {
        self.sink = Some(sink);
    }

    /// Sets the host sample rate, deriving the cycle divisor and
    /// rebuilding the filter chain.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        if sample_rate == 0 {
            self.cycles_per_sample = 0.0;
            self.filters = FilterChain::empty();
        } else {
            self.cycles_per_sample = f64::from(CPU_CLOCK_NTSC) / f64::from(sample_rate);
            self.filters = FilterChain::nes_default(sample_rate as f32);
        }
    }

    /// Advances one CPU cycle.
    pub fn clock(&mut self) {
        let cycle1 = self.cycle;
        self.cycle += 1;
        let cycle2 = self.cycle;

        self.clock_timers();

        let f1 = (cycle1 as f64 / FRAME_COUNTER_RATE) as u64;
        let f2 = (cycle2 as f64 / FRAME_COUNTER_RATE) as u64;
        if f1 != f2 {
            self.clock_sequencer();
        }

        if self.sink.is_some() && self.cycles_per_sample > 0.0 {
            let s1 = (cycle1 as f64 / self.cycles_per_sample) as u64;
            let s2 = (cycle2 as f64 / self.cycles_per_sample) as u64;
            if s1 != s2 {
                self.send_sample();
            }
        }
    }

    fn clock_timers(&mut self) {
        if self.cycle % 2 == 0 {
            self.pulse1.clock_timer();
            self.pulse2.clock_timer();
            self.noise.clock_timer();
            self.dmc.clock_timer();
        }
        self.triangle.clock_timer();
    }

    fn clock_sequencer(&mut self) {
        match self.sequencer.advance() {
            FrameEvent::None => {}
            FrameEvent::Quarter => self.clock_quarter(),
            FrameEvent::Half | FrameEvent::HalfWithIrq => {
                self.clock_quarter();
                self.clock_half();
            }
        }
    }

    fn clock_quarter(&mut self) {
        self.pulse1.clock_envelope();
        self.pulse2.clock_envelope();
        self.triangle.clock_linear();
        self.noise.clock_envelope();
    }

    fn clock_half(&mut self) {
        self.pulse1.clock_sweep();
        self.pulse2.clock_sweep();
        self.pulse1.clock_length();
        self.pulse2.clock_length();
        self.triangle.clock_length();
        self.noise.clock_length();
    }

    /// Whether the frame or DMC IRQ line is asserted.
    #[must_use]
    pub fn irq_pending(&self) -> bool {
        self.sequencer.irq_pending() || self.dmc.irq_pending()
    }

    /// Pending DMC sample fetch, answered with [`Apu::provide_dmc_byte`].
    #[must_use]
    pub fn dmc_fetch_request(&self) -> Option<u16> {
        self.dmc.fetch_request()
    }

    /// Delivers a DMC sample byte fetched from CPU address space.
    pub fn provide_dmc_byte(&mut self, value: u8) {
        self.dmc.provide_byte(value);
    }

    /// Writes an APU register ($4000-$4013, $4015, $4017).
    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x4000 => self.pulse1.write_ctrl(value),
            0x4001 => self.pulse1.write_sweep(value),
            0x4002 => self.pulse1.write_timer_lo(value),
            0x4003 => self.pulse1.write_timer_hi(value),
            0x4004 => self.pulse2.write_ctrl(value),
            0x4005 => self.pulse2.write_sweep(value),
            0x4006 => self.pulse2.write_timer_lo(value),
            0x4007 => self.pulse2.write_timer_hi(value),
            0x4008 => self.triangle.write_ctrl(value),
            0x400A => self.triangle.write_timer_lo(value),
            0x400B => self.triangle.write_timer_hi(value),
            0x400C => self.noise.write_ctrl(value),
            0x400E => self.noise.write_period(value),
            0x400F => self.noise.write_length(value),
            0x4010 => self.dmc.write_ctrl(value),
            0x4011 => self.dmc.write_value(value),
            0x4012 => self.dmc.write_address(value),
            0x4013 => self.dmc.write_length(value),
            0x4015 => self.write_control(value),
            0x4017 => self.write_frame_counter(value),
            0x4009 | 0x400D => {} // unused channel slots
            _ => log::debug!("ignored APU write ${addr:04X} <- {value:#04X}"),
        }
    }

    /// $4015 write: per-channel enables. Clears the DMC IRQ.
    fn write_control(&mut self, value: u8) {
        self.pulse1.set_enabled(value & 0x01 != 0);
        self.pulse2.set_enabled(value & 0x02 != 0);
        self.triangle.set_enabled(value & 0x04 != 0);
        self.noise.set_enabled(value & 0x08 != 0);
        self.dmc.set_enabled(value & 0x10 != 0);
        self.dmc.clear_irq();
    }

    /// $4017 write: sequencer mode; 5-step mode clocks immediately.
    fn write_frame_counter(&mut self, value: u8) {
        if self.sequencer.write(value) {
            self.clock_quarter();
            self.clock_half();
        }
    }

    /// $4015 read: channel length status and IRQ flags. Acknowledges the
    /// frame IRQ.
    pub fn read_status(&mut self) -> u8 {
        let status = self.peek_status();
        self.sequencer.clear_irq();
        status
    }

    /// $4015 without the read side effect, for debug front-ends.
    #[must_use]
    pub fn peek_status(&self) -> u8 {
        let mut status = 0u8;
        if self.pulse1.active() {
            status |= 0x01;
        }
        if self.pulse2.active() {
            status |= 0x02;
        }
        if self.triangle.active() {
            status |= 0x04;
        }
        if self.noise.active() {
            status |= 0x08;
        }
        if self.dmc.active() {
            status |= 0x10;
        }
        if self.sequencer.irq_pending() {
            status |= 0x40;
        }
        if self.dmc.irq_pending() {
            status |= 0x80;
        }
        status
    }

    /// Current mixed output before filtering (0.0 to ~1.6).
    #[must_use]
    pub fn output(&self) -> f32 {
        let p1 = self.pulse1.output() as usize;
        let p2 = self.pulse2.output() as usize;
        let t = self.triangle.output() as usize;
        let n = self.noise.output() as usize;
        let d = self.dmc.output() as usize;
        PULSE_TABLE[p1 + p2] + TND_TABLE[3 * t + 2 * n + d]
    }

    fn send_sample(&mut self) {
        let sample = self.filters.process(self.output());
        if let Some(sink) = &self.sink {
            // Lossy on purpose: a full sink must not stall emulation
            let _ = sink.try_send(sample);
        }
    }
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}
