//! Shared helpers for the ROM-driven integration tests.
//!
//! Test ROMs are not redistributable, so they are looked up under the
//! workspace `test-roms/` directory and each test skips with a notice
//! when its ROM is absent.

#![allow(dead_code)] // Not every test binary uses every helper

use rivetnes_core::Console;
use std::path::{Path, PathBuf};

/// Workspace-relative directory the test ROMs live in.
pub fn test_rom_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("workspace root")
        .join("test-roms")
}

/// Loads a test ROM into a console, or None (with a notice) when the
/// file is not present.
pub fn load_console(relative: &str) -> Option<Console> {
    let path = test_rom_dir().join(relative);
    let Ok(data) = std::fs::read(&path) else {
        eprintln!("skipping: {} not found", path.display());
        return None;
    };
    Some(Console::new(&data).expect("test ROM failed to load"))
}

/// Reads the NUL-terminated message the blargg test ROMs leave at $6004.
pub fn read_message(console: &Console) -> String {
    let mut message = String::new();
    for addr in 0x6004..0x8000u16 {
        let byte = console.peek_memory(addr);
        if byte == 0 {
            break;
        }
        message.push(byte as char);
    }
    message
}

/// Outcome of a blargg-protocol run.
pub struct BlarggResult {
    pub status: u8,
    pub message: String,
}

/// Drives a blargg test ROM to completion.
///
/// Protocol: the ROM writes $DE $B0 $61 at $6001 once it is running and
/// keeps $6000 at $80 until the verdict (0 = pass) lands there. A status
/// of $81 asks the harness to press reset after a short delay.
pub fn run_blargg(console: &mut Console, max_cycles: u64) -> BlarggResult {
    let mut started = false;
    let mut executed: u64 = 0;
    let mut reset_at: Option<u64> = None;

    while executed < max_cycles {
        executed += u64::from(console.step());

        let signature = [
            console.peek_memory(0x6001),
            console.peek_memory(0x6002),
            console.peek_memory(0x6003),
        ];
        if signature != [0xDE, 0xB0, 0x61] {
            continue;
        }
        started = true;

        match console.peek_memory(0x6000) {
            0x81 => match reset_at {
                None => reset_at = Some(executed + 150_000),
                Some(at) if executed >= at => {
                    console.reset();
                    reset_at = None;
                }
                Some(_) => {}
            },
            status if status < 0x80 => {
                return BlarggResult {
                    status,
                    message: read_message(console),
                };
            }
            _ => {}
        }
    }
    assert!(started, "test ROM never wrote its signature");
    panic!("test ROM did not finish within {max_cycles} cycles");
}
