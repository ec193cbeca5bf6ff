//! Graphics memory map - palette RAM, VRAM and OAM.
//!
//! | Region          | Address Range           | Size    | Purpose                          |
//! |-----------------|-------------------------|---------|----------------------------------|
//! | BG Palette RAM  | 0x0500_0000-0x0500_01FF | 512 B   | Background color palettes        |
//! | OBJ Palette RAM | 0x0500_0200-0x0500_03FF | 512 B   | Sprite color palettes            |
//! | VRAM            | 0x0600_0000-0x0601_7FFF | 96 KB   | Tile data and tilemaps           |
//! | OAM             | 0x0700_0000-0x0700_03FF | 1 KB    | Sprite attributes                |
//!
//! In the tiled modes VRAM is split in four 16KB character blocks holding tile
//! pixels, overlapped by thirty-two 2KB screen blocks holding tilemaps:
//!
//! ```text
//! 0x0600_0000  char block 0 | screen blocks  0-7
//! 0x0600_4000  char block 1 | screen blocks  8-15
//! 0x0600_8000  char block 2 | screen blocks 16-23
//! 0x0600_C000  char block 3 | screen blocks 24-31
//! 0x0601_0000  OBJ tiles (sprites)
//! ```

pub const BG_PALETTE: u32 = 0x0500_0000;
pub const OBJ_PALETTE: u32 = 0x0500_0200;
pub const PALETTE_RAM_SIZE: u32 = 0x400;

pub const VRAM: u32 = 0x0600_0000;
pub const VRAM_SIZE: u32 = 0x1_8000;

/// Sprite tile pixels in the tiled modes.
pub const OBJ_TILES: u32 = 0x0601_0000;

pub const OAM: u32 = 0x0700_0000;
pub const OAM_SIZE: u32 = 0x400;

/// Colors in one palette bank (8bpp).
pub const PALETTE_SIZE: usize = 256;

const CHARACTER_BLOCK_SIZE: u32 = 0x4000;
const SCREEN_BLOCK_SIZE: u32 = 0x800;

/// Address of character block `block` (0-3).
#[must_use]
pub const fn character_block(block: u32) -> u32 {
    debug_assert!(block < 4);
    VRAM + block * CHARACTER_BLOCK_SIZE
}

/// Address of screen block `block` (0-31).
#[must_use]
pub const fn screen_block(block: u32) -> u32 {
    debug_assert!(block < 32);
    VRAM + block * SCREEN_BLOCK_SIZE
}
