//! Cartridge model and iNES loader.
//!
//! An iNES image is a 16-byte header, an optional 512-byte trainer, then
//! PRG-ROM in 16 KiB units and CHR-ROM in 8 KiB units:
//!
//! ```text
//! 0-3   magic "NES\x1A"
//! 4     PRG-ROM banks (16 KiB each)
//! 5     CHR-ROM banks (8 KiB each, 0 means the board carries CHR-RAM)
//! 6     bit 0 mirroring (0 horizontal, 1 vertical), bit 1 battery,
//!       bit 2 trainer, bit 3 four-screen, bits 4-7 mapper low nibble
//! 7     bits 4-7 mapper high nibble
//! 8-15  ignored for the supported subset
//! ```

use crate::mirroring::Mirroring;
use crate::RomError;

/// PRG-ROM bank granularity.
pub const PRG_BANK_SIZE: usize = 0x4000;
/// CHR bank granularity.
pub const CHR_BANK_SIZE: usize = 0x2000;
/// Battery/work RAM size mapped at $6000-$7FFF.
pub const SRAM_SIZE: usize = 0x2000;

const INES_MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];
const HEADER_SIZE: usize = 16;
const TRAINER_SIZE: usize = 512;

/// Cartridge contents: PRG/CHR images, save RAM, and board metadata.
///
/// The mirroring mode is mutable because MMC1, MMC3 and AxROM rewrite it
/// from register stores.
#[derive(Debug, Clone)]
pub struct Cartridge {
    /// PRG-ROM image (multiple of 16 KiB).
    pub prg: Vec<u8>,
    /// CHR-ROM image, or 8 KiB of CHR-RAM when the header reports none.
    pub chr: Vec<u8>,
    /// 8 KiB save/work RAM at $6000-$7FFF.
    pub sram: Vec<u8>,
    /// iNES mapper number.
    pub mapper_id: u8,
    /// Current nametable mirroring.
    pub mirroring: Mirroring,
    /// Whether the save RAM is battery-backed.
    pub battery: bool,
    chr_is_ram: bool,
}

impl Cartridge {
    /// Parses an iNES image.
    ///
    /// # Errors
    ///
    /// [`RomError::InvalidMagic`] if the signature is wrong,
    /// [`RomError::Truncated`] if the declared PRG/CHR data is missing.
    pub fn from_ines(data: &[u8]) -> Result<Self, RomError> {
        if data.len() < HEADER_SIZE {
            return Err(RomError::Truncated);
        }
        if data[0..4] != INES_MAGIC {
            return Err(RomError::InvalidMagic);
        }

        let prg_banks = data[4] as usize;
        let chr_banks = data[5] as usize;
        let flags6 = data[6];
        let flags7 = data[7];

        let mapper_id = (flags7 & 0xF0) | (flags6 >> 4);
        let battery = flags6 & 0x02 != 0;
        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let mut offset = HEADER_SIZE;
        if flags6 & 0x04 != 0 {
            offset += TRAINER_SIZE;
        }

        let prg_len = prg_banks * PRG_BANK_SIZE;
        let chr_len = chr_banks * CHR_BANK_SIZE;
        if data.len() < offset + prg_len + chr_len {
            return Err(RomError::Truncated);
        }

        let prg = data[offset..offset + prg_len].to_vec();
        let chr_is_ram = chr_banks == 0;
        let chr = if chr_is_ram {
            vec![0; CHR_BANK_SIZE]
        } else {
            data[offset + prg_len..offset + prg_len + chr_len].to_vec()
        };

        log::info!(
            "loaded iNES image: mapper {mapper_id}, {prg_banks}x16K PRG, \
             {chr_banks}x8K CHR{}, {mirroring:?} mirroring{}",
            if chr_is_ram { " (CHR-RAM)" } else { "" },
            if battery { ", battery" } else { "" },
        );

        Ok(Self {
            prg,
            chr,
            sram: vec![0; SRAM_SIZE],
            mapper_id,
            mirroring,
            battery,
            chr_is_ram,
        })
    }

    /// Whether CHR is writable RAM (header reported zero CHR banks).
    #[must_use]
    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }

    /// Writes a byte into CHR at a pre-banked offset. Silently ignored for
    /// CHR-ROM boards.
    pub fn write_chr(&mut self, offset: usize, value: u8) {
        if self.chr_is_ram {
            let len = self.chr.len();
            self.chr[offset % len] = value;
        } else {
            log::debug!("ignored write to CHR-ROM at offset {offset:#06X}");
        }
    }

    /// Builds a cartridge from raw parts, for tests and synthetic images.
    #[must_use]
    pub fn from_parts(prg: Vec<u8>, chr: Vec<u8>, mapper_id: u8, mirroring: Mirroring) -> Self {
        let chr_is_ram = chr.is_empty();
        let chr = if chr_is_ram {
            vec![0; CHR_BANK_SIZE]
        } else {
            chr
        };
        Self {
            prg,
            chr,
            sram: vec![0; SRAM_SIZE],
            mapper_id,
            mirroring,
            battery: false,
            chr_is_ram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_ines(prg_banks: u8, chr_banks: u8, flags6: u8, flags7: u8) -> Vec<u8> {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, prg_banks, chr_banks, flags6, flags7];
        data.resize(HEADER_SIZE, 0);
        if flags6 & 0x04 != 0 {
            data.extend(std::iter::repeat(0xAA).take(TRAINER_SIZE));
        }
        data.extend(std::iter::repeat(0x11).take(prg_banks as usize * PRG_BANK_SIZE));
        data.extend(std::iter::repeat(0x22).take(chr_banks as usize * CHR_BANK_SIZE));
        data
    }

    #[test]
    fn parses_basic_image() {
        let cart = Cartridge::from_ines(&build_ines(2, 1, 0x01, 0x00)).unwrap();
        assert_eq!(cart.prg.len(), 2 * PRG_BANK_SIZE);
        assert_eq!(cart.chr.len(), CHR_BANK_SIZE);
        assert_eq!(cart.sram.len(), SRAM_SIZE);
        assert_eq!(cart.mapper_id, 0);
        assert_eq!(cart.mirroring, Mirroring::Vertical);
        assert!(!cart.battery);
        assert!(!cart.chr_is_ram());
    }

    #[test]
    fn extracts_mapper_nibbles() {
        // Low nibble 4, high nibble 0 -> MMC3
        let cart = Cartridge::from_ines(&build_ines(2, 1, 0x40, 0x00)).unwrap();
        assert_eq!(cart.mapper_id, 4);
        // Low nibble 1, high nibble 1 -> mapper 17
        let cart = Cartridge::from_ines(&build_ines(2, 1, 0x10, 0x10)).unwrap();
        assert_eq!(cart.mapper_id, 17);
    }

    #[test]
    fn zero_chr_banks_allocates_ram() {
        let cart = Cartridge::from_ines(&build_ines(1, 0, 0x00, 0x00)).unwrap();
        assert!(cart.chr_is_ram());
        assert_eq!(cart.chr.len(), CHR_BANK_SIZE);
        assert!(cart.chr.iter().all(|&b| b == 0));
    }

    #[test]
    fn trainer_is_skipped() {
        let cart = Cartridge::from_ines(&build_ines(1, 1, 0x04, 0x00)).unwrap();
        // PRG starts after the trainer, so it holds the PRG fill byte.
        assert_eq!(cart.prg[0], 0x11);
        assert_eq!(cart.chr[0], 0x22);
    }

    #[test]
    fn four_screen_beats_vertical_bit() {
        let cart = Cartridge::from_ines(&build_ines(1, 1, 0x09, 0x00)).unwrap();
        assert_eq!(cart.mirroring, Mirroring::FourScreen);
    }

    #[test]
    fn battery_flag() {
        let cart = Cartridge::from_ines(&build_ines(1, 1, 0x02, 0x00)).unwrap();
        assert!(cart.battery);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = build_ines(1, 1, 0, 0);
        data[0] = b'X';
        assert!(matches!(
            Cartridge::from_ines(&data),
            Err(RomError::InvalidMagic)
        ));
    }

    #[test]
    fn rejects_truncated_image() {
        let mut data = build_ines(2, 1, 0, 0);
        data.truncate(data.len() - 1);
        assert!(matches!(
            Cartridge::from_ines(&data),
            Err(RomError::Truncated)
        ));
        assert!(matches!(
            Cartridge::from_ines(&[0x4E, 0x45]),
            Err(RomError::Truncated)
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Arbitrary byte soup either parses or errors; it never panics.
            #[test]
            fn loader_total_on_garbage(data in proptest::collection::vec(any::<u8>(), 0..128)) {
                let _ = Cartridge::from_ines(&data);
            }

            #[test]
            fn header_only_images_are_rejected_or_empty(
                prg_banks in 1u8..8,
                chr_banks in 0u8..4,
            ) {
                let mut data = vec![0x4E, 0x45, 0x53, 0x1A, prg_banks, chr_banks, 0, 0];
                data.resize(HEADER_SIZE, 0);
                prop_assert!(matches!(
                    Cartridge::from_ines(&data),
                    Err(RomError::Truncated)
                ));
            }
        }
    }

    #[test]
    fn chr_rom_writes_ignored() {
        let mut cart = Cartridge::from_ines(&build_ines(1, 1, 0, 0)).unwrap();
        cart.write_chr(0, 0x99);
        assert_eq!(cart.chr[0], 0x22);

        let mut cart = Cartridge::from_ines(&build_ines(1, 0, 0, 0)).unwrap();
        cart.write_chr(0, 0x99);
        assert_eq!(cart.chr[0], 0x99);
    }
}
