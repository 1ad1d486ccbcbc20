//! Mapper 1 (MMC1): serial-port banking.
//!
//! Register loads arrive one bit at a time through writes to $8000-$FFFF,
//! low bit first. The fifth bit completes a 5-bit value routed to one of
//! four internal registers by address bits 13-14. A write with bit 7 set
//! resets the shift register and forces PRG mode 3.

use crate::bank_offset;
use crate::cartridge::Cartridge;
use crate::mirroring::Mirroring;

const PRG_WINDOW: usize = 0x4000;
const CHR_WINDOW: usize = 0x1000;

/// MMC1 banking state.
#[derive(Debug, Clone)]
pub struct Mmc1 {
    shift: u8,
    control: u8,
    prg_mode: u8,
    chr_mode: u8,
    prg_bank: u8,
    chr_bank0: u8,
    chr_bank1: u8,
    prg_offsets: [usize; 2],
    chr_offsets: [usize; 2],
}

impl Mmc1 {
    /// Creates the mapper; the high PRG window starts on the last bank.
    #[must_use]
    pub fn new(cart: &Cartridge) -> Self {
        Self {
            shift: 0x10,
            control: 0,
            prg_mode: 0,
            chr_mode: 0,
            prg_bank: 0,
            chr_bank0: 0,
            chr_bank1: 0,
            prg_offsets: [0, bank_offset(cart.prg.len(), -1, PRG_WINDOW)],
            chr_offsets: [0, 0],
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
                log::debug!("MMC1 read from unmapped ${addr:04X}");
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
            0x8000..=0xFFFF => self.load_register(cart, addr, value),
            _ => log::debug!("MMC1 write to unmapped ${addr:04X}"),
        }
    }

    /// Shifts one bit into the serial port, or resets it when bit 7 is set.
    fn load_register(&mut self, cart: &mut Cartridge, addr: u16, value: u8) {
        if value & 0x80 != 0 {
            self.shift = 0x10;
            let control = self.control | 0x0C;
            self.write_control(cart, control);
        } else {
            let complete = self.shift & 1 == 1;
            self.shift >>= 1;
            self.shift |= (value & 1) << 4;
            if complete {
                self.write_register(cart, addr, self.shift);
                self.shift = 0x10;
            }
        }
    }

    /// Routes a completed 5-bit value by address bits 13-14.
    fn write_register(&mut self, cart: &mut Cartridge, addr: u16, value: u8) {
        match (addr >> 13) & 0x03 {
            0 => self.write_control(cart, value),
            1 => {
                self.chr_bank0 = value;
                self.update_offsets(cart);
            }
            2 => {
                self.chr_bank1 = value;
                self.update_offsets(cart);
            }
            _ => {
                self.prg_bank = value & 0x0F;
                self.update_offsets(cart);
            }
        }
    }

    /// Control register: CHR mode, PRG mode, mirroring.
    fn write_control(&mut self, cart: &mut Cartridge, value: u8) {
        self.control = value;
        self.chr_mode = (value >> 4) & 1;
        self.prg_mode = (value >> 2) & 3;
        cart.mirroring = match value & 3 {
            0 => Mirroring::Single0,
            1 => Mirroring::Single1,
            2 => Mirroring::Vertical,
            _ => Mirroring::Horizontal,
        };
        self.update_offsets(cart);
    }

    fn update_offsets(&mut self, cart: &Cartridge) {
        let prg = |index: i32| bank_offset(cart.prg.len(), index, PRG_WINDOW);
        let chr = |index: i32| bank_offset(cart.chr.len(), index, CHR_WINDOW);

        match self.prg_mode {
            // 32 KiB: ignore the low bank bit
            0 | 1 => {
                self.prg_offsets[0] = prg(i32::from(self.prg_bank & 0xFE));
                self.prg_offsets[1] = prg(i32::from(self.prg_bank | 0x01));
            }
            // Fix first window, switch the last
            2 => {
                self.prg_offsets[0] = 0;
                self.prg_offsets[1] = prg(i32::from(self.prg_bank));
            }
            // Switch first window, fix the last
            _ => {
                self.prg_offsets[0] = prg(i32::from(self.prg_bank));
                self.prg_offsets[1] = prg(-1);
            }
        }

        if self.chr_mode == 0 {
            // Single 8 KiB window
            self.chr_offsets[0] = chr(i32::from(self.chr_bank0 & 0xFE));
            self.chr_offsets[1] = chr(i32::from(self.chr_bank0 | 0x01));
        } else {
            // Two independent 4 KiB windows
            self.chr_offsets[0] = chr(i32::from(self.chr_bank0));
            self.chr_offsets[1] = chr(i32::from(self.chr_bank1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Cartridge {
        let mut prg = vec![0; 8 * PRG_WINDOW];
        for bank in 0..8 {
            prg[bank * PRG_WINDOW] = bank as u8;
        }
        let mut chr = vec![0; 8 * CHR_WINDOW];
        for bank in 0..8 {
            chr[bank * CHR_WINDOW] = 0x40 + bank as u8;
        }
        Cartridge::from_parts(prg, chr, 1, Mirroring::Horizontal)
    }

    /// Clocks five serial writes carrying `value` low bit first.
    fn serial_write(mmc1: &mut Mmc1, cart: &mut Cartridge, addr: u16, value: u8) {
        for bit in 0..5 {
            mmc1.write(cart, addr, (value >> bit) & 1);
        }
    }

    #[test]
    fn power_on_fixes_last_bank_high() {
        let cart = cart();
        let mmc1 = Mmc1::new(&cart);
        assert_eq!(mmc1.read(&cart, 0xC000), 7);
    }

    #[test]
    fn serial_load_assembles_low_bit_first() {
        let mut cart = cart();
        let mut mmc1 = Mmc1::new(&cart);
        // PRG mode 3: switch $8000, fix $C000
        serial_write(&mut mmc1, &mut cart, 0x8000, 0x0C);
        serial_write(&mut mmc1, &mut cart, 0xE000, 0x05);
        assert_eq!(mmc1.read(&cart, 0x8000), 5);
        assert_eq!(mmc1.read(&cart, 0xC000), 7);
    }

    #[test]
    fn reset_bit_aborts_sequence_and_forces_mode_3() {
        let mut cart = cart();
        let mut mmc1 = Mmc1::new(&cart);
        // Two bits in, then a reset write
        mmc1.write(&mut cart, 0xE000, 1);
        mmc1.write(&mut cart, 0xE000, 1);
        mmc1.write(&mut cart, 0xE000, 0x80);
        assert_eq!(mmc1.prg_mode, 3);
        // A fresh 5-write sequence still works
        serial_write(&mut mmc1, &mut cart, 0xE000, 0x06);
        assert_eq!(mmc1.read(&cart, 0x8000), 6);
    }

    #[test]
    fn control_sets_mirroring() {
        let mut cart = cart();
        let mut mmc1 = Mmc1::new(&cart);
        serial_write(&mut mmc1, &mut cart, 0x8000, 0x02);
        assert_eq!(cart.mirroring, Mirroring::Vertical);
        serial_write(&mut mmc1, &mut cart, 0x8000, 0x03);
        assert_eq!(cart.mirroring, Mirroring::Horizontal);
        serial_write(&mut mmc1, &mut cart, 0x8000, 0x00);
        assert_eq!(cart.mirroring, Mirroring::Single0);
    }

    #[test]
    fn chr_modes() {
        let mut cart = cart();
        let mut mmc1 = Mmc1::new(&cart);
        // 4 KiB CHR mode with banks 3 and 5
        serial_write(&mut mmc1, &mut cart, 0x8000, 0x10);
        serial_write(&mut mmc1, &mut cart, 0xA000, 0x03);
        serial_write(&mut mmc1, &mut cart, 0xC000, 0x05);
        assert_eq!(mmc1.read(&cart, 0x0000), 0x43);
        assert_eq!(mmc1.read(&cart, 0x1000), 0x45);

        // 8 KiB CHR mode drops the low bank bit
        serial_write(&mut mmc1, &mut cart, 0x8000, 0x00);
        serial_write(&mut mmc1, &mut cart, 0xA000, 0x03);
        assert_eq!(mmc1.read(&cart, 0x0000), 0x42);
        assert_eq!(mmc1.read(&cart, 0x1000), 0x43);
    }

    #[test]
    fn prg_mode_32k() {
        let mut cart = cart();
        let mut mmc1 = Mmc1::new(&cart);
        serial_write(&mut mmc1, &mut cart, 0x8000, 0x00); // PRG mode 0
        serial_write(&mut mmc1, &mut cart, 0xE000, 0x05); // banks 4/5
        assert_eq!(mmc1.read(&cart, 0x8000), 4);
        assert_eq!(mmc1.read(&cart, 0xC000), 5);
    }
}
