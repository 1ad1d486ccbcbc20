//! Ricoh 2C02 PPU emulation.
//!
//! A dot-clocked implementation of the NES picture processor: background
//! tile fetches on the 8-dot cadence into a 64-bit shift register, sprite
//! evaluation at dot 257, per-pixel composition with priority and
//! sprite-0-hit detection, and the delayed VBlank NMI edge.
//!
//! # Timing (NTSC)
//!
//! - 341 dots per scanline, 262 scanlines per frame
//! - three dots per CPU cycle
//! - odd frames skip one dot of the pre-render line while rendering
//!
//! # Usage
//!
//! ```no_run
//! use rivetnes_mappers::Mirroring;
//! use rivetnes_ppu::{Ppu, PpuBus};
//!
//! struct ChrRam {
//!     chr: [u8; 0x2000],
//! }
//!
//! impl PpuBus for ChrRam {
//!     fn read_chr(&mut self, addr: u16) -> u8 {
//!         self.chr[addr as usize]
//!     }
//!     fn write_chr(&mut self, addr: u16, value: u8) {
//!         self.chr[addr as usize] = value;
//!     }
//!     fn mirroring(&self) -> Mirroring {
//!         Mirroring::Horizontal
//!     }
//! }
//!
//! let mut ppu = Ppu::new();
//! let mut bus = ChrRam { chr: [0; 0x2000] };
//!
//! // Step three dots per CPU cycle; raise the CPU NMI when told to.
//! let nmi = ppu.step(&mut bus);
//! ```

mod ctrl;
mod mask;
pub mod palette;
mod ppu;
mod scroll;

pub use ctrl::Ctrl;
pub use mask::Mask;
pub use ppu::{
    Ppu, PpuBus, DOTS_PER_SCANLINE, FRAMEBUFFER_SIZE, FRAME_HEIGHT, FRAME_WIDTH,
    PRE_RENDER_SCANLINE, SCANLINES_PER_FRAME, VBLANK_SCANLINE,
};
pub use scroll::Scroll;
