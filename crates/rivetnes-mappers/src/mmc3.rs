//! Mapper 4 (MMC3): fine-grained banking with a scanline IRQ.
//!
//! Eight 1 KiB CHR windows and four 8 KiB PRG windows, arranged by two mode
//! bits. The IRQ counter clocks once per rendered scanline (observed at dot
//! 280) and asserts the CPU IRQ line on the transition to zero while
//! enabled.

use crate::bank_offset;
use crate::cartridge::Cartridge;
use crate::mirroring::Mirroring;
use crate::PpuView;

const PRG_WINDOW: usize = 0x2000;
const CHR_WINDOW: usize = 0x0400;

/// MMC3 banking and IRQ state.
#[derive(Debug, Clone)]
pub struct Mmc3 {
    register: u8,
    registers: [u8; 8],
    prg_mode: u8,
    chr_mode: u8,
    prg_offsets: [usize; 4],
    chr_offsets: [usize; 8],
    reload: u8,
    counter: u8,
    irq_enable: bool,
    irq_pending: bool,
}

impl Mmc3 {
    /// Creates the mapper with the hardwired PRG windows in place.
    #[must_use]
    pub fn new(cart: &Cartridge) -> Self {
        let prg = |index: i32| bank_offset(cart.prg.len(), index, PRG_WINDOW);
        Self {
            register: 0,
            registers: [0; 8],
            prg_mode: 0,
            chr_mode: 0,
            prg_offsets: [prg(0), prg(1), prg(-2), prg(-1)],
            chr_offsets: [0; 8],
            reload: 0,
            counter: 0,
            irq_enable: false,
            irq_pending: false,
        }
    }

    pub(crate) fn read(&self, cart: &Cartridge, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => {
                let window = (addr as usize) / CHR_WINDOW;
                let offset = (addr as usize) % CHR_WINDOW;
                cart.chr[self.chr_offsets[window] + offset]
            }
            0x6000..=0x7FFF => cart.sram[(addr - 0x6000) as usize],
            0x8000..=0xFFFF => {
                let rel = (addr - 0x8000) as usize;
                let window = rel / PRG_WINDOW;
                let offset = rel % PRG_WINDOW;
                cart.prg[self.prg_offsets[window] + offset]
            }
            _ => {
                log::debug!("MMC3 read from unmapped ${addr:04X}");
                0
            }
        }
    }

    pub(crate) fn write(&mut self, cart: &mut Cartridge, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                let window = (addr as usize) / CHR_WINDOW;
                let offset = self.chr_offsets[window] + (addr as usize) % CHR_WINDOW;
                cart.write_chr(offset, value);
            }
            0x6000..=0x7FFF => cart.sram[(addr - 0x6000) as usize] = value,
            0x8000..=0xFFFF => self.write_register(cart, addr, value),
            _ => log::debug!("MMC3 write to unmapped ${addr:04X}"),
        }
    }

    fn write_register(&mut self, cart: &mut Cartridge, addr: u16, value: u8) {
        let even = addr & 1 == 0;
        match (addr, even) {
            // Bank select / bank data
            (0x8000..=0x9FFF, true) => {
                self.prg_mode = (value >> 6) & 1;
                self.chr_mode = (value >> 7) & 1;
                self.register = value & 0x07;
                self.update_offsets(cart);
            }
            (0x8000..=0x9FFF, false) => {
                self.registers[self.register as usize] = value;
                self.update_offsets(cart);
            }
            // Mirroring / PRG-RAM protect
            (0xA000..=0xBFFF, true) => {
                cart.mirroring = if value & 1 == 0 {
                    Mirroring::Vertical
                } else {
                    Mirroring::Horizontal
                };
            }
            (0xA000..=0xBFFF, false) => {} // RAM protect: not emulated
            // IRQ latch / reload
            (0xC000..=0xDFFF, true) => self.reload = value,
            (0xC000..=0xDFFF, false) => self.counter = 0,
            // IRQ disable (and acknowledge) / enable
            (_, true) => {
                self.irq_enable = false;
                self.irq_pending = false;
            }
            (_, false) => self.irq_enable = true,
        }
    }

    fn update_offsets(&mut self, cart: &Cartridge) {
        let prg = |index: i32| bank_offset(cart.prg.len(), index, PRG_WINDOW);
        let chr = |index: i32| bank_offset(cart.chr.len(), index, CHR_WINDOW);
        let r = &self.registers;

        self.prg_offsets = match self.prg_mode {
            0 => [prg(i32::from(r[6])), prg(i32::from(r[7])), prg(-2), prg(-1)],
            _ => [prg(-2), prg(i32::from(r[7])), prg(i32::from(r[6])), prg(-1)],
        };

        self.chr_offsets = match self.chr_mode {
            0 => [
                chr(i32::from(r[0] & 0xFE)),
                chr(i32::from(r[0] | 0x01)),
                chr(i32::from(r[1] & 0xFE)),
                chr(i32::from(r[1] | 0x01)),
                chr(i32::from(r[2])),
                chr(i32::from(r[3])),
                chr(i32::from(r[4])),
                chr(i32::from(r[5])),
            ],
            _ => [
                chr(i32::from(r[2])),
                chr(i32::from(r[3])),
                chr(i32::from(r[4])),
                chr(i32::from(r[5])),
                chr(i32::from(r[0] & 0xFE)),
                chr(i32::from(r[0] | 0x01)),
                chr(i32::from(r[1] & 0xFE)),
                chr(i32::from(r[1] | 0x01)),
            ],
        };
    }

    /// Observes the PPU clock; the counter ticks once per rendered line.
    pub(crate) fn step(&mut self, view: PpuView) {
        if view.dot != 280 {
            return;
        }
        if view.scanline > 239 && view.scanline < 261 {
            return;
        }
        if !view.rendering_enabled {
            return;
        }
        if self.counter == 0 {
            self.counter = self.reload;
        } else {
            self.counter -= 1;
            if self.counter == 0 && self.irq_enable {
                self.irq_pending = true;
            }
        }
    }

    pub(crate) fn take_irq(&mut self) -> bool {
        std::mem::take(&mut self.irq_pending)
    }
}
