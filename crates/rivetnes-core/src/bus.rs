//! CPU-side system bus.
//!
//! Routes the 16-bit CPU address space to its owners:
//!
//! ```text
//! $0000-$1FFF  2 KiB internal RAM, mirrored every $0800
//! $2000-$3FFF  PPU registers, mirrored every 8 bytes
//! $4000-$4013  APU channel registers
//! $4014        OAM DMA trigger
//! $4015        APU status/control
//! $4016        controller 1 data / strobe for both ports
//! $4017        controller 2 data / APU frame counter
//! $4020-$FFFF  cartridge (save RAM from $6000, PRG from $8000)
//! ```

use crate::input::Controller;
use rivetnes_apu::Apu;
use rivetnes_cpu::Bus;
use rivetnes_mappers::{Mapper, Mirroring};
use rivetnes_ppu::{Ppu, PpuBus};

/// Adapter giving the PPU its view of the cartridge: pattern tables and
/// the live mirroring mode.
pub(crate) struct ChrBus<'a> {
    mapper: &'a mut Mapper,
}

impl<'a> ChrBus<'a> {
    pub(crate) fn new(mapper: &'a mut Mapper) -> Self {
        Self { mapper }
    }
}

impl PpuBus for ChrBus<'_> {
    fn read_chr(&mut self, addr: u16) -> u8 {
        self.mapper.read(addr)
    }

    fn write_chr(&mut self, addr: u16, value: u8) {
        self.mapper.write(addr, value);
    }

    fn mirroring(&self) -> Mirroring {
        self.mapper.mirroring()
    }
}

/// System bus connecting the CPU to RAM, PPU, APU, cartridge, and pads.
pub struct NesBus {
    /// 2 KiB internal RAM.
    pub ram: [u8; 2048],
    /// Picture processor.
    pub ppu: Ppu,
    /// Audio processor.
    pub apu: Apu,
    /// Cartridge and board logic.
    pub mapper: Mapper,
    /// Controller port 1.
    pub controller1: Controller,
    /// Controller port 2.
    pub controller2: Controller,
    dma_page: Option<u8>,
    open_bus: u8,
}

impl NesBus {
    /// Creates the bus around a mapped cartridge.
    #[must_use]
    pub fn new(mapper: Mapper) -> Self {
        Self {
            ram: [0; 2048],
            ppu: Ppu::new(),
            apu: Apu::new(),
            mapper,
            controller1: Controller::new(),
            controller2: Controller::new(),
            dma_page: None,
            open_bus: 0,
        }
    }

    /// Advances the PPU one dot; true when the NMI edge fired.
    pub fn step_ppu(&mut self) -> bool {
        let Self { ppu, mapper, .. } = self;
        ppu.step(&mut ChrBus::new(mapper))
    }

    /// Takes a latched $4014 DMA page, if an instruction wrote one.
    pub fn take_dma_page(&mut self) -> Option<u8> {
        self.dma_page.take()
    }

    /// Reads without side effects, for test harnesses and debuggers.
    /// MMIO windows return the open-bus value instead of disturbing
    /// register state.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x2000..=0x3FFF => self.open_bus,
            0x4015 => self.apu.peek_status(),
            0x4000..=0x401F => self.open_bus,
            0x4020..=0x5FFF => self.open_bus,
            0x6000..=0xFFFF => self.mapper.read(addr),
        }
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        let value = match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x2000..=0x3FFF => {
                let Self { ppu, mapper, .. } = self;
                ppu.read_register(addr & 0x07, &mut ChrBus::new(mapper))
            }
            0x4015 => self.apu.read_status(),
            0x4016 => self.controller1.read(),
            0x4017 => self.controller2.read(),
            // Write-only APU/DMA registers read back the open bus
            0x4000..=0x401F => self.open_bus,
            0x4020..=0x5FFF => {
                log::debug!("read from unmapped ${addr:04X}");
                self.open_bus
            }
            0x6000..=0xFFFF => self.mapper.read(addr),
        };
        self.open_bus = value;
        value
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.open_bus = value;
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize] = value,
            0x2000..=0x3FFF => {
                let Self { ppu, mapper, .. } = self;
                ppu.write_register(addr & 0x07, value, &mut ChrBus::new(mapper));
            }
            0x4014 => self.dma_page = Some(value),
            0x4016 => {
                // One strobe line feeds both ports
                self.controller1.write(value);
                self.controller2.write(value);
            }
            0x4000..=0x4013 | 0x4015 | 0x4017 => self.apu.write(addr, value),
            0x4018..=0x401F => {} // test-mode registers, disabled
            0x4020..=0x5FFF => log::debug!("write to unmapped ${addr:04X}"),
            0x6000..=0xFFFF => self.mapper.write(addr, value),
        }
    }
}
