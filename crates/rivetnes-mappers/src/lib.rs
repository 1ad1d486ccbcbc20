//! NES cartridge model and mapper implementations.
//!
//! Mappers translate CPU/PPU addresses through switchable banks backed by
//! the cartridge's PRG/CHR images, rewrite the nametable mirroring mode,
//! and (for MMC3) raise a scanline-counted IRQ.
//!
//! # Supported mappers
//!
//! | Mapper | Name | Banking |
//! |--------|-------|---------|
//! | 0 | NROM | none |
//! | 1 | MMC1 | serial 5-bit port, PRG+CHR modes, mirroring |
//! | 2 | UxROM | switchable low 16 KiB PRG window |
//! | 3 | CNROM | switchable 8 KiB CHR window |
//! | 4 | MMC3 | 8×1 KiB CHR + 4×8 KiB PRG windows, scanline IRQ |
//! | 7 | AxROM | switchable 32 KiB PRG window, single-screen mirroring |
//!
//! Dispatch is a tagged enum rather than trait objects: the central
//! `read`/`write`/`step` methods match on the mapper kind, which keeps the
//! hot paths monomorphic.
//!
//! # Example
//!
//! ```no_run
//! use rivetnes_mappers::{Cartridge, Mapper};
//!
//! let data = std::fs::read("game.nes").expect("failed to read ROM");
//! let cart = Cartridge::from_ines(&data).expect("failed to parse ROM");
//! let mapper = Mapper::new(cart).expect("unsupported mapper");
//!
//! let reset_lo = mapper.read(0xFFFC);
//! let tile = mapper.read(0x0000);
//! ```

mod axrom;
mod cartridge;
mod cnrom;
mod mirroring;
mod mmc1;
mod mmc3;
mod nrom;
mod uxrom;

pub use axrom::Axrom;
pub use cartridge::{Cartridge, CHR_BANK_SIZE, PRG_BANK_SIZE, SRAM_SIZE};
pub use cnrom::Cnrom;
pub use mirroring::Mirroring;
pub use mmc1::Mmc1;
pub use mmc3::Mmc3;
pub use nrom::Nrom;
pub use uxrom::Uxrom;

/// ROM loading and mapper construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RomError {
    /// The image does not start with the iNES magic number.
    #[error("invalid iNES magic number")]
    InvalidMagic,
    /// The image ends before the declared PRG/CHR data.
    #[error("iNES image truncated")]
    Truncated,
    /// The mapper number is not in the supported set.
    #[error("unsupported mapper {0}")]
    UnsupportedMapper(u8),
}

/// PPU timing snapshot threaded into [`Mapper::step`] so MMC3 can observe
/// the dot clock without holding a PPU reference.
#[derive(Debug, Clone, Copy)]
pub struct PpuView {
    /// Current scanline (0-261).
    pub scanline: u16,
    /// Current dot within the scanline (0-340).
    pub dot: u16,
    /// Whether background or sprite rendering is enabled.
    pub rendering_enabled: bool,
}

/// Per-board banking state.
#[derive(Debug, Clone)]
enum MapperKind {
    Nrom(Nrom),
    Mmc1(Mmc1),
    Uxrom(Uxrom),
    Cnrom(Cnrom),
    Mmc3(Mmc3),
    Axrom(Axrom),
}

/// A cartridge plugged into its board logic.
///
/// Owns the [`Cartridge`] and the per-mapper banking state; all access to
/// PRG, CHR and save RAM routes through here.
#[derive(Debug, Clone)]
pub struct Mapper {
    cart: Cartridge,
    kind: MapperKind,
}

impl Mapper {
    /// Builds the board logic for the cartridge's mapper number.
    ///
    /// # Errors
    ///
    /// [`RomError::UnsupportedMapper`] for numbers outside
    /// {0, 1, 2, 3, 4, 7}.
    pub fn new(cart: Cartridge) -> Result<Self, RomError> {
        let kind = match cart.mapper_id {
            0 => MapperKind::Nrom(Nrom::new(&cart)),
            1 => MapperKind::Mmc1(Mmc1::new(&cart)),
            2 => MapperKind::Uxrom(Uxrom::new(&cart)),
            3 => MapperKind::Cnrom(Cnrom::new(&cart)),
            4 => MapperKind::Mmc3(Mmc3::new(&cart)),
            7 => MapperKind::Axrom(Axrom::new(&cart)),
            n => return Err(RomError::UnsupportedMapper(n)),
        };
        Ok(Self { cart, kind })
    }

    /// Reads a byte: $0000-$1FFF CHR, $6000-$7FFF save RAM, $8000+ PRG.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        match &self.kind {
            MapperKind::Nrom(m) => m.read(&self.cart, addr),
            MapperKind::Mmc1(m) => m.read(&self.cart, addr),
            MapperKind::Uxrom(m) => m.read(&self.cart, addr),
            MapperKind::Cnrom(m) => m.read(&self.cart, addr),
            MapperKind::Mmc3(m) => m.read(&self.cart, addr),
            MapperKind::Axrom(m) => m.read(&self.cart, addr),
        }
    }

    /// Writes a byte; $8000+ stores drive the board's bank registers.
    pub fn write(&mut self, addr: u16, value: u8) {
        match &mut self.kind {
            MapperKind::Nrom(m) => m.write(&mut self.cart, addr, value),
            MapperKind::Mmc1(m) => m.write(&mut self.cart, addr, value),
            MapperKind::Uxrom(m) => m.write(&mut self.cart, addr, value),
            MapperKind::Cnrom(m) => m.write(&mut self.cart, addr, value),
            MapperKind::Mmc3(m) => m.write(&mut self.cart, addr, value),
            MapperKind::Axrom(m) => m.write(&mut self.cart, addr, value),
        }
    }

    /// Clocks the board once per PPU dot. Only MMC3 cares.
    pub fn step(&mut self, view: PpuView) {
        if let MapperKind::Mmc3(m) = &mut self.kind {
            m.step(view);
        }
    }

    /// Drains the board's IRQ assertion, if any.
    pub fn take_irq(&mut self) -> bool {
        match &mut self.kind {
            MapperKind::Mmc3(m) => m.take_irq(),
            _ => false,
        }
    }

    /// Current nametable mirroring.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.cart.mirroring
    }

    /// iNES mapper number.
    #[must_use]
    pub fn mapper_id(&self) -> u8 {
        self.cart.mapper_id
    }

    /// Borrow the cartridge.
    #[must_use]
    pub fn cartridge(&self) -> &Cartridge {
        &self.cart
    }

    /// Mutably borrow the cartridge (save-RAM loading).
    pub fn cartridge_mut(&mut self) -> &mut Cartridge {
        &mut self.cart
    }
}

/// Resolves a signed bank index to a byte offset, wrapping modulo the
/// number of banks so out-of-range selections stay in bounds. Negative
/// indices count from the end (-1 is the last bank).
pub(crate) fn bank_offset(data_len: usize, mut index: i32, bank_size: usize) -> usize {
    if index >= 0x80 {
        index -= 0x100;
    }
    let banks = (data_len / bank_size).max(1) as i32;
    let bank = index.rem_euclid(banks);
    bank as usize * bank_size
}
