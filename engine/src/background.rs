//! Map and sprite sheet uploads.
//!
//! A map uses two stacked text backgrounds sharing one 256 color palette and
//! one tile image:
//!
//! | Layer | Screen block | Priority | Content                           |
//! |-------|--------------|----------|-----------------------------------|
//! | BG1   | 16           | 0        | Visible tile layout               |
//! | BG0   | 17           | 1        | Boundary grid, hidden behind BG1  |
//!
//! The boundary layer is enabled but drawn behind the opaque visible layer;
//! its screen block is only read back through [`BoundaryGrid`] lookups.

use tracing::debug;

use crate::boundary::BoundaryGrid;
use crate::device::Device;
use crate::error::EngineError;
use crate::hardware::memory::{
    BG_PALETTE, OBJ_PALETTE, OBJ_TILES, PALETTE_SIZE, character_block, screen_block,
};
use crate::hardware::registers::{Background, BackgroundControl, ScreenSize};

pub const VISIBLE_LAYER: Background = Background::Bg1;
pub const BOUNDARY_LAYER: Background = Background::Bg0;

const TILE_CHARACTER_BLOCK: u16 = 0;
const VISIBLE_SCREEN_BLOCK: u16 = 16;
const BOUNDARY_SCREEN_BLOCK: u16 = 17;

/// Tiles per row and per column of one screen block.
const SCREEN_BLOCK_SIDE: usize = 32;

/// Bytes between two rows of a screen block.
const SCREEN_BLOCK_ROW_BYTES: u32 = 64;

/// Halfwords between character block 0 and the first screen block in use.
const TILE_IMAGE_CAPACITY: usize = 0x4000;

/// Halfwords of OBJ tile memory in the tiled modes.
const OBJ_IMAGE_CAPACITY: usize = 0x4000;

/// Everything needed to show one map and walk on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapAssets {
    palette: Vec<u16>,
    tile_image: Vec<u16>,
    layout: Vec<u16>,
    layout_width: usize,
    layout_height: usize,
    boundary: BoundaryGrid,
}

impl MapAssets {
    /// # Errors
    ///
    /// Fails when an asset doesn't fit its slot in graphics memory, the
    /// layout doesn't match its dimensions or the boundary grid has other
    /// dimensions than the layout.
    pub fn new(
        palette: Vec<u16>,
        tile_image: Vec<u16>,
        layout: Vec<u16>,
        layout_width: usize,
        layout_height: usize,
        boundary: BoundaryGrid,
    ) -> Result<Self, EngineError> {
        check_capacity("palette", palette.len(), PALETTE_SIZE)?;
        check_capacity("tile image", tile_image.len(), TILE_IMAGE_CAPACITY)?;

        if layout_width == 0 || layout_height == 0 {
            return Err(EngineError::EmptyGrid);
        }
        if layout_width > SCREEN_BLOCK_SIDE || layout_height > SCREEN_BLOCK_SIDE {
            return Err(EngineError::GridTooLarge {
                width: layout_width,
                height: layout_height,
            });
        }
        let expected = layout_width * layout_height;
        if layout.len() != expected {
            return Err(EngineError::InvalidGrid {
                expected,
                actual: layout.len(),
            });
        }
        // Collisions wrap with the boundary grid, so it must wrap where the
        // visible map does.
        if (boundary.width(), boundary.height()) != (layout_width, layout_height) {
            return Err(EngineError::GridMismatch {
                layout: (layout_width, layout_height),
                boundary: (boundary.width(), boundary.height()),
            });
        }

        Ok(Self {
            palette,
            tile_image,
            layout,
            layout_width,
            layout_height,
            boundary,
        })
    }

    #[must_use]
    pub const fn boundary(&self) -> &BoundaryGrid {
        &self.boundary
    }
}

/// Palette and pixels shared by every sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    palette: Vec<u16>,
    image: Vec<u16>,
}

impl SpriteSheet {
    /// # Errors
    ///
    /// Fails when the palette or the image doesn't fit its memory region.
    pub fn new(palette: Vec<u16>, image: Vec<u16>) -> Result<Self, EngineError> {
        check_capacity("sprite palette", palette.len(), PALETTE_SIZE)?;
        check_capacity("sprite image", image.len(), OBJ_IMAGE_CAPACITY)?;
        Ok(Self { palette, image })
    }
}

const fn check_capacity(
    asset: &'static str,
    units: usize,
    capacity: usize,
) -> Result<(), EngineError> {
    if units > capacity {
        Err(EngineError::AssetTooLarge {
            asset,
            units,
            capacity,
        })
    } else {
        Ok(())
    }
}

#[must_use]
pub fn visible_layer_control() -> BackgroundControl {
    BackgroundControl::new()
        .with_priority(0)
        .with_character_base_block(TILE_CHARACTER_BLOCK)
        .with_256_colors(true)
        .with_screen_base_block(VISIBLE_SCREEN_BLOCK)
        .with_wrap(true)
        .with_screen_size(ScreenSize::Size32x32)
}

#[must_use]
pub fn boundary_layer_control() -> BackgroundControl {
    BackgroundControl::new()
        .with_priority(1)
        .with_character_base_block(TILE_CHARACTER_BLOCK)
        .with_256_colors(true)
        .with_screen_base_block(BOUNDARY_SCREEN_BLOCK)
        .with_wrap(true)
        .with_screen_size(ScreenSize::Size32x32)
}

/// Uploads a map into both background layers.
///
/// Every copy is a synchronous block transfer, so once this returns the
/// whole map is in place. Call it before waiting for vblank to have the new
/// map show up on the next frame in one piece.
pub fn load_map(device: &mut impl Device, map: &MapAssets) {
    device.block_copy(BG_PALETTE, &map.palette);
    device.block_copy(
        character_block(u32::from(TILE_CHARACTER_BLOCK)),
        &map.tile_image,
    );

    copy_grid(
        device,
        VISIBLE_SCREEN_BLOCK,
        &map.layout,
        map.layout_width,
    );
    device.write_u16(
        VISIBLE_LAYER.control_address(),
        visible_layer_control().bits(),
    );

    copy_grid(
        device,
        BOUNDARY_SCREEN_BLOCK,
        map.boundary.cells(),
        map.layout_width,
    );
    device.write_u16(
        BOUNDARY_LAYER.control_address(),
        boundary_layer_control().bits(),
    );

    debug!(
        "map loaded: {}x{} tiles, {} tile image halfwords",
        map.layout_width,
        map.layout_height,
        map.tile_image.len()
    );
}

/// Lays a row-major grid out in a screen block, whose rows are always 32
/// entries apart.
fn copy_grid(device: &mut impl Device, block: u16, cells: &[u16], width: usize) {
    let base = screen_block(u32::from(block));
    if width == SCREEN_BLOCK_SIDE {
        device.block_copy(base, cells);
        return;
    }

    for (row, cells) in (0_u32..).zip(cells.chunks(width)) {
        device.block_copy(base + row * SCREEN_BLOCK_ROW_BYTES, cells);
    }
}

/// Uploads the sprite palette and pixels.
pub fn load_sprite_sheet(device: &mut impl Device, sheet: &SpriteSheet) {
    device.block_copy(OBJ_PALETTE, &sheet.palette);
    device.block_copy(OBJ_TILES, &sheet.image);
}
