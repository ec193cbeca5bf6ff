//! The capability set the engine needs from the console.
//!
//! Every component takes a `&mut impl Device` instead of poking fixed
//! addresses, so the same code runs on hardware ([`Mmio`]) and against an
//! in-memory register file ([`SimulatedDevice`]).
//!
//! The crate itself links `std` (heap buffers, and wall-clock pacing in
//! [`IntervalClock`](crate::frame::IntervalClock)), so only the host build
//! with [`SimulatedDevice`] runs today. [`Mmio`] is the binding a
//! `no_std` GBA build would use; nothing in this workspace constructs it.

mod mmio;
mod simulated;

pub use mmio::Mmio;
pub use simulated::SimulatedDevice;

use crate::hardware::keypad::{KEYINPUT, KeyInput};
use crate::hardware::registers::VCOUNT;

pub trait Device {
    fn read_u16(&mut self, address: u32) -> u16;

    fn write_u16(&mut self, address: u32, value: u16);

    fn write_u32(&mut self, address: u32, value: u32);

    /// Copies `source` to `destination` in 16 bit units.
    /// Returns once every unit has landed.
    fn block_copy(&mut self, destination: u32, source: &[u16]);

    fn key_input(&mut self) -> KeyInput {
        KeyInput(self.read_u16(KEYINPUT))
    }

    fn scanline(&mut self) -> u16 {
        self.read_u16(VCOUNT)
    }
}
