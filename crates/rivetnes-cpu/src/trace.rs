//! Nestest-format execution trace.
//!
//! Produces one log line per instruction in the layout the nestest golden
//! log uses, so a run can be diffed against it field by field:
//!
//! ```text
//! C000  4C F5 C5  JMP $C5F5    A:00 X:00 Y:00 P:24 SP:FD CYC:7
//! ```

use crate::cpu::{Bus, Cpu};
use crate::opcodes::OPCODES;

/// Formats the state of `cpu` at its current PC as a trace line.
///
/// Reads the instruction bytes through the bus; callers should only trace
/// while the PC sits in ROM, where reads have no side effects.
#[must_use]
pub fn trace_line(cpu: &Cpu, bus: &mut impl Bus) -> String {
    let info = OPCODES[bus.read(cpu.pc) as usize];
    let size = info.mode.instruction_size();

    let mut bytes = String::with_capacity(8);
    for i in 0..u16::from(size) {
        if i > 0 {
            bytes.push(' ');
        }
        bytes.push_str(&format!("{:02X}", bus.read(cpu.pc.wrapping_add(i))));
    }

    format!(
        "{:04X}  {:<8}  {}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        cpu.pc,
        bytes,
        info.mnemonic.name(),
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.status.bits(),
        cpu.sp,
        cpu.cycles,
    )
}
