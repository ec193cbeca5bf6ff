//! Addresses and register encodings of the GBA hardware the engine drives.
//!
//! Nothing in here touches memory: the values are handed to a
//! [`Device`](crate::device::Device), which owns the actual accesses.

pub mod dma;
pub mod keypad;
pub mod memory;
pub mod registers;

/// GBA display width
pub const LCD_WIDTH: u16 = 240;

/// GBA display height
pub const LCD_HEIGHT: u16 = 160;

/// First scanline of the vertical blank period.
pub const VBLANK_START_LINE: u16 = 160;

/// Scanlines per frame, visible ones and vblank ones.
pub const SCANLINES_PER_FRAME: u16 = 228;
