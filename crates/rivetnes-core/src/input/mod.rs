//! Controller input.
//!
//! The standard controller latches eight buttons in parallel and shifts
//! them out one bit per read:
//!
//! 1. **Strobe** ($4016 write, bit 0): while set, the read index is held
//!    at the first button. A single $4016 write strobes both ports.
//! 2. **Serial read** ($4016/$4017): one button per read in the order
//!    A, B, Select, Start, Up, Down, Left, Right; further reads return 0.

mod controller;

pub use controller::{Button, Controller};
