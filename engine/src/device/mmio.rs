use crate::hardware::dma::{DMA3CNT, DMA3DAD, DMA3SAD, MAX_UNITS_PER_TRANSFER, transfer_control};

use super::Device;

/// Direct access to the memory-mapped registers of a real GBA.
///
/// Not deployable yet: the engine depends on `std`, which the GBA target
/// doesn't provide. Host builds only ever use it through its type.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Only sound when running on GBA hardware (or an emulator), where every
    /// address the engine uses is a valid memory-mapped register or graphics
    /// memory location, and when no other `Mmio` is alive.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Device for Mmio {
    fn read_u16(&mut self, address: u32) -> u16 {
        // SAFETY: the constructor contract guarantees `address` is mapped.
        unsafe { core::ptr::read_volatile(address as usize as *const u16) }
    }

    fn write_u16(&mut self, address: u32, value: u16) {
        // SAFETY: the constructor contract guarantees `address` is mapped.
        unsafe { core::ptr::write_volatile(address as usize as *mut u16, value) }
    }

    fn write_u32(&mut self, address: u32, value: u32) {
        // SAFETY: the constructor contract guarantees `address` is mapped.
        unsafe { core::ptr::write_volatile(address as usize as *mut u32, value) }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn block_copy(&mut self, destination: u32, source: &[u16]) {
        let mut destination = destination;
        for chunk in source.chunks(MAX_UNITS_PER_TRANSFER) {
            // The GBA address space is 32 bits wide.
            self.write_u32(DMA3SAD, chunk.as_ptr() as usize as u32);
            self.write_u32(DMA3DAD, destination);
            self.write_u32(DMA3CNT, transfer_control(chunk.len() as u16));
            destination += (chunk.len() * 2) as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::dma::unit_count;
    use pretty_assertions::assert_eq;

    fn drives_the_engine<D: Device>() {}

    #[test]
    fn mmio_is_a_device() {
        drives_the_engine::<Mmio>();
    }

    #[test]
    fn largest_chunk_fits_the_control_word() {
        let control = transfer_control(MAX_UNITS_PER_TRANSFER as u16);
        assert_eq!(usize::from(unit_count(control)), MAX_UNITS_PER_TRANSFER);
    }
}
