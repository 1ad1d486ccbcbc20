//! RivetNES core — the assembled NES.
//!
//! Integrates the CPU, PPU, APU, and mapper crates behind a console
//! facade driven by a host front-end:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                       Console                          │
//! │  ┌──────────────────────────────────────────────────┐  │
//! │  │                     NesBus                       │  │
//! │  │  ┌─────┐  ┌─────┐  ┌─────┐  ┌────────┐  ┌─────┐  │  │
//! │  │  │ RAM │  │ PPU │  │ APU │  │ Mapper │  │ I/O │  │  │
//! │  │  └─────┘  └─────┘  └─────┘  └────────┘  └─────┘  │  │
//! │  └──────────────────────────────────────────────────┘  │
//! │                          ▲                             │
//! │                     ┌────┴────┐                        │
//! │                     │  6502   │                        │
//! │                     └─────────┘                        │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Per instruction the console runs the CPU, then 3N PPU dots (each
//! visible to the mapper for MMC3 IRQ timing), then N APU ticks, then
//! DMA and interrupt bookkeeping.
//!
//! # Usage
//!
//! ```no_run
//! use rivetnes_core::{Button, Console};
//!
//! let rom = std::fs::read("game.nes").expect("failed to read ROM");
//! let mut console = Console::new(&rom).expect("failed to load ROM");
//!
//! loop {
//!     console.set_button(1, Button::Start, true);
//!     console.run_frame();
//!     let _frame = console.framebuffer(); // 256x240 RGBA
//! }
//! ```

mod bus;
mod console;
mod input;

pub use bus::NesBus;
pub use console::{timing, Console, ConsoleError};
pub use input::{Button, Controller};

// Re-export the component crates' main types
pub use rivetnes_apu::Apu;
pub use rivetnes_cpu::{Bus, Cpu};
pub use rivetnes_mappers::{Cartridge, Mapper, Mirroring, RomError};
pub use rivetnes_ppu::Ppu;

/// NES screen geometry.
pub mod screen {
    /// Screen width in pixels.
    pub const WIDTH: usize = rivetnes_ppu::FRAME_WIDTH;
    /// Screen height in pixels.
    pub const HEIGHT: usize = rivetnes_ppu::FRAME_HEIGHT;
    /// Bytes per RGBA frame.
    pub const FRAMEBUFFER_SIZE: usize = rivetnes_ppu::FRAMEBUFFER_SIZE;
}
