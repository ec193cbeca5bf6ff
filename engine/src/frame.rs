//! Frame pacing.
//!
//! The main loop hands control to a [`FrameClock`] twice per frame: once to
//! wait for the vertical blank before touching scroll registers and OAM, and
//! once after the commit to slow the loop down.

use std::time::{Duration, Instant};

use crate::device::Device;
use crate::hardware::VBLANK_START_LINE;

pub trait FrameClock {
    /// Blocks until the display is in vertical blank.
    fn wait_for_vblank(&mut self, device: &mut impl Device);

    /// Called once the frame's state is committed.
    fn throttle(&mut self);
}

/// Spins on the VCOUNT register, then burns a fixed number of iterations.
pub struct VCountClock {
    throttle_iterations: u32,
}

impl VCountClock {
    #[must_use]
    pub const fn new(throttle_iterations: u32) -> Self {
        Self {
            throttle_iterations,
        }
    }
}

impl FrameClock for VCountClock {
    fn wait_for_vblank(&mut self, device: &mut impl Device) {
        while device.scanline() < VBLANK_START_LINE {
            std::hint::spin_loop();
        }
    }

    fn throttle(&mut self) {
        for _ in 0..self.throttle_iterations {
            std::hint::spin_loop();
        }
    }
}

/// Host-side clock that paces frames on wall time. Needs `std`.
///
/// Still polls VCOUNT so the device sees the same register traffic as on
/// hardware.
pub struct IntervalClock {
    frame_duration: Duration,
    next_frame: Instant,
}

impl IntervalClock {
    /// GBA refresh rate, 280,896 cycles per frame at 16.78 MHz.
    pub const GBA_FRAME: Duration = Duration::from_nanos(16_742_706);

    #[must_use]
    pub fn new(frame_duration: Duration) -> Self {
        Self {
            frame_duration,
            next_frame: Instant::now() + frame_duration,
        }
    }
}

impl FrameClock for IntervalClock {
    fn wait_for_vblank(&mut self, device: &mut impl Device) {
        while device.scanline() < VBLANK_START_LINE {
            std::hint::spin_loop();
        }
    }

    fn throttle(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next_frame.checked_duration_since(now) {
            std::thread::sleep(remaining);
            self.next_frame += self.frame_duration;
        } else {
            // Running late, don't try to catch up.
            self.next_frame = now + self.frame_duration;
        }
    }
}
