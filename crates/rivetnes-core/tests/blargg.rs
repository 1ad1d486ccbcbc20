//! blargg test-ROM suites.
//!
//! These ROMs self-report through the $6000 protocol: $80 while running,
//! the verdict afterwards (0 = pass), with a text report at $6004.

mod common;

use common::{load_console, run_blargg};

#[test]
fn instr_test_v5_official_only() {
    let Some(mut console) = load_console("instr_test-v5/official_only.nes") else {
        return;
    };
    let result = run_blargg(&mut console, 3_000_000_000);
    assert_eq!(
        result.status, 0x00,
        "instr_test-v5 failed: {}",
        result.message
    );
    assert!(
        result.message.contains("All tests passed"),
        "unexpected report: {}",
        result.message
    );
}

#[test]
fn instr_test_v5_all_instrs() {
    let Some(mut console) = load_console("instr_test-v5/all_instrs.nes") else {
        return;
    };
    let result = run_blargg(&mut console, 5_000_000_000);
    assert_eq!(
        result.status, 0x00,
        "all_instrs failed: {}",
        result.message
    );
}

#[test]
fn ppu_vbl_basics() {
    let Some(mut console) = load_console("ppu_vbl_nmi/rom_singles/01-vbl_basics.nes") else {
        return;
    };
    let result = run_blargg(&mut console, 600_000_000);
    assert_eq!(result.status, 0x00, "vbl_basics failed: {}", result.message);
}

#[test]
fn apu_length_counter() {
    let Some(mut console) = load_console("apu_test/rom_singles/1-len_ctr.nes") else {
        return;
    };
    let result = run_blargg(&mut console, 600_000_000);
    assert_eq!(result.status, 0x00, "len_ctr failed: {}", result.message);
}
