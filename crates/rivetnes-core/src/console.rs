//! Console facade.
//!
//! Owns the CPU and the system bus and drives them in lock-step: each
//! instruction's N CPU cycles are followed by 3N PPU dots (each one
//! giving the mapper a look at the dot clock) and N APU ticks, then any
//! DMA and IRQ bookkeeping. The host calls [`Console::step`],
//! [`Console::run_for`], or [`Console::run_frame`] and reads the finished
//! frame out of [`Console::framebuffer`].

use crate::bus::NesBus;
use crate::input::Button;
use rivetnes_cpu::{Bus, Cpu};
use rivetnes_mappers::{Cartridge, Mapper, PpuView, RomError};

use std::sync::mpsc::SyncSender;

/// NTSC timing constants.
pub mod timing {
    /// Master clock frequency.
    pub const MASTER_CLOCK_NTSC: u32 = 21_477_272;
    /// CPU clock frequency (master / 12).
    pub const CPU_CLOCK_NTSC: u32 = rivetnes_apu::CPU_CLOCK_NTSC;
    /// PPU clock frequency (master / 4).
    pub const PPU_CLOCK_NTSC: u32 = 3 * CPU_CLOCK_NTSC;
    /// Approximate CPU cycles per frame.
    pub const CPU_CYCLES_PER_FRAME: u32 = 29_780;
    /// PPU dots per scanline.
    pub const DOTS_PER_SCANLINE: u16 = rivetnes_ppu::DOTS_PER_SCANLINE;
    /// Scanlines per frame.
    pub const SCANLINES_PER_FRAME: u16 = rivetnes_ppu::SCANLINES_PER_FRAME;
    /// Frame rate.
    pub const FRAME_RATE_NTSC: f64 = 60.0988;
}

/// Console construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    /// The ROM image failed to load or uses an unsupported mapper.
    #[error(transparent)]
    Rom(#[from] RomError),
}

/// The assembled console.
pub struct Console {
    cpu: Cpu,
    bus: NesBus,
    total_cycles: u64,
}

impl Console {
    /// Builds a console from an iNES image and resets it.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Rom`] when the image is malformed or the mapper is
    /// unsupported.
    pub fn new(rom: &[u8]) -> Result<Self, ConsoleError> {
        let cart = Cartridge::from_ines(rom)?;
        let mapper = Mapper::new(cart)?;
        let mut console = Self {
            cpu: Cpu::new(),
            bus: NesBus::new(mapper),
            total_cycles: 0,
        };
        console.reset();
        Ok(console)
    }

    /// Resets the CPU and PPU, as the front-panel button does.
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
        self.bus.ppu.reset();
        self.total_cycles = 0;
    }

    /// Executes one CPU instruction (or one stall cycle) and brings the
    /// PPU, mapper, and APU up to date. Returns the CPU cycles consumed.
    pub fn step(&mut self) -> u32 {
        let cycles = self.cpu.step(&mut self.bus);

        // An instruction that wrote $4014 kicks off OAM DMA now
        if let Some(page) = self.bus.take_dma_page() {
            self.run_oam_dma(page);
        }

        // Three dots per CPU cycle; the mapper watches every dot so the
        // MMC3 counter lines up with the exact clock position
        for _ in 0..cycles * 3 {
            if self.bus.step_ppu() {
                self.cpu.trigger_nmi();
            }
            let view = PpuView {
                scanline: self.bus.ppu.scanline(),
                dot: self.bus.ppu.dot(),
                rendering_enabled: self.bus.ppu.rendering_enabled(),
            };
            self.bus.mapper.step(view);
            if self.bus.mapper.take_irq() {
                self.cpu.trigger_irq();
            }
        }

        for _ in 0..cycles {
            self.bus.apu.clock();
            if let Some(addr) = self.bus.apu.dmc_fetch_request() {
                let value = self.bus.mapper.read(addr);
                self.bus.apu.provide_dmc_byte(value);
                self.cpu.add_stall(4);
            }
        }
        if self.bus.apu.irq_pending() {
            self.cpu.trigger_irq();
        }

        self.total_cycles += u64::from(cycles);
        cycles
    }

    /// 256-byte OAM transfer plus the CPU stall it costs.
    fn run_oam_dma(&mut self, page: u8) {
        let base = u16::from(page) << 8;
        for i in 0..256 {
            let value = self.bus.read(base.wrapping_add(i));
            self.bus.ppu.write_oam_data(value);
        }
        let stall = if self.cpu.cycles % 2 == 1 { 514 } else { 513 };
        self.cpu.add_stall(stall);
    }

    /// Steps until at least `cycles` CPU cycles have elapsed.
    pub fn run_for(&mut self, cycles: u64) {
        let target = self.total_cycles + cycles;
        while self.total_cycles < target {
            self.step();
        }
    }

    /// Steps until the PPU finishes the current frame.
    pub fn run_frame(&mut self) {
        let frame = self.bus.ppu.frame();
        while self.bus.ppu.frame() == frame {
            self.step();
        }
    }

    /// Finished frame: 256x240 RGBA, row-major, A=0xFF.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        self.bus.ppu.frame_buffer()
    }

    /// Updates a button on controller port 1 or 2.
    pub fn set_button(&mut self, port: u8, button: Button, pressed: bool) {
        match port {
            1 => self.bus.controller1.set_button(button, pressed),
            2 => self.bus.controller2.set_button(button, pressed),
            _ => log::warn!("ignored input for controller port {port}"),
        }
    }

    /// Connects the audio sink; samples are pushed at `sample_rate` Hz
    /// and silently dropped when the queue is full.
    pub fn set_audio_sink(&mut self, sink: SyncSender<f32>, sample_rate: u32) {
        self.bus.apu.set_sink(sink);
        self.bus.apu.set_sample_rate(sample_rate);
    }

    /// Total CPU cycles since reset.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Frames completed since power-on.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.bus.ppu.frame()
    }

    /// Side-effect-free memory read, for test harnesses.
    #[must_use]
    pub fn peek_memory(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }

    /// Whether the cartridge has battery-backed save RAM.
    #[must_use]
    pub fn has_battery(&self) -> bool {
        self.bus.mapper.cartridge().battery
    }

    /// Save RAM contents, for the host to persist.
    #[must_use]
    pub fn sram(&self) -> &[u8] {
        &self.bus.mapper.cartridge().sram
    }

    /// Restores previously saved RAM.
    pub fn load_sram(&mut self, data: &[u8]) {
        let sram = &mut self.bus.mapper.cartridge_mut().sram;
        let len = sram.len().min(data.len());
        sram[..len].copy_from_slice(&data[..len]);
    }

    /// CPU access for trace/debug harnesses.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Mutable CPU access, e.g. to force the headless entry point of CPU
    /// verification ROMs.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// Bus access for trace/debug harnesses.
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    /// Bus access.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// iNES mapper number of the loaded cartridge.
    #[must_use]
    pub fn mapper_id(&self) -> u8 {
        self.bus.mapper.mapper_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivetnes_mappers::PRG_BANK_SIZE;

    /// Builds a headered NROM image whose reset vector points at an
    /// endless NOP loop.
    fn nop_rom() -> Vec<u8> {
        let mut prg = vec![0xEA; 2 * PRG_BANK_SIZE];
        prg[0x7FFC] = 0x00;
        prg[0x7FFD] = 0x80;
        let mut rom = vec![0x4E, 0x45, 0x53, 0x1A, 2, 1, 0, 0];
        rom.resize(16, 0);
        rom.extend_from_slice(&prg);
        rom.extend(std::iter::repeat(0).take(0x2000));
        rom
    }

    fn nop_console() -> Console {
        Console::new(&nop_rom()).unwrap()
    }

    #[test]
    fn boots_from_reset_vector() {
        let console = nop_console();
        assert_eq!(console.cpu().pc, 0x8000);
        assert_eq!(console.mapper_id(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Console::new(b"definitely not a rom").is_err());
        let mut rom = nop_rom();
        rom[7] = 0xF0; // mapper 240
        assert!(matches!(
            Console::new(&rom),
            Err(ConsoleError::Rom(RomError::UnsupportedMapper(240)))
        ));
    }

    #[test]
    fn step_advances_cycles() {
        let mut console = nop_console();
        let cycles = console.step();
        assert_eq!(cycles, 2); // NOP
        assert_eq!(console.total_cycles(), 2);
    }

    #[test]
    fn run_for_reaches_target() {
        let mut console = nop_console();
        console.run_for(1000);
        assert!(console.total_cycles() >= 1000);
    }

    #[test]
    fn run_frame_increments_frame_counter() {
        let mut console = nop_console();
        let frame = console.frame_count();
        console.run_frame();
        assert_eq!(console.frame_count(), frame + 1);
    }

    #[test]
    fn framebuffer_shape_and_alpha() {
        let mut console = nop_console();
        console.run_frame();
        let fb = console.framebuffer();
        assert_eq!(fb.len(), 256 * 240 * 4);
        assert!(fb.chunks_exact(4).all(|px| px[3] == 0xFF || px[3] == 0));
    }

    #[test]
    fn oam_dma_copies_a_page_and_stalls() {
        let mut console = nop_console();
        // Fill RAM page 2 with a pattern
        for i in 0..256u16 {
            console.bus_mut().write(0x0200 + i, i as u8);
        }
        // Set OAMADDR, then trigger DMA from page 2
        console.bus_mut().write(0x2003, 0x00);
        console.bus_mut().write(0x4014, 0x02);
        let before = console.total_cycles();
        console.step(); // executes the pending DMA before anything else

        // The stall drains one cycle per step
        let mut stall_steps = 0u32;
        loop {
            let cycles = console.step();
            if cycles != 1 {
                break;
            }
            stall_steps += 1;
        }
        assert!(stall_steps >= 512, "stalled only {stall_steps} steps");
        assert!(console.total_cycles() > before + 512);
    }

    #[test]
    fn audio_sink_receives_samples() {
        let mut console = nop_console();
        let (tx, rx) = std::sync::mpsc::sync_channel(65536);
        console.set_audio_sink(tx, 44_100);
        console.run_frame();
        assert!(rx.try_iter().count() > 500);
    }

    #[test]
    fn sram_persistence_surface() {
        let mut console = nop_console();
        console.bus_mut().write(0x6000, 0x5A);
        let saved = console.sram().to_vec();
        assert_eq!(saved[0], 0x5A);

        let mut fresh = nop_console();
        fresh.load_sram(&saved);
        assert_eq!(fresh.peek_memory(0x6000), 0x5A);
    }

    #[test]
    fn buttons_reach_the_selected_port() {
        let mut console = nop_console();
        console.set_button(1, Button::Start, true);
        console.bus_mut().write(0x4016, 1);
        console.bus_mut().write(0x4016, 0);
        let mut reads = Vec::new();
        for _ in 0..4 {
            reads.push(console.bus_mut().read(0x4016) & 1);
        }
        assert_eq!(reads, [0, 0, 0, 1]); // A, B, Select, Start
    }
}
