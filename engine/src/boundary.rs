//! Boundary layer lookups.
//!
//! Every map ships an invisible tile grid parallel to the visible one. The
//! value of the cell under a point tells the main loop what happens when the
//! character walks there.

use crate::error::EngineError;

/// Boundary cell value of a wall.
pub const WALL_TILE: u16 = 149;

/// Tiles are 8x8 pixels.
const TILE_SHIFT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    /// Nothing special, keep walking.
    Free,
    /// A wall.
    Blocked,
    /// Something the player can interact with.
    Interactive,
    /// Leads to another map.
    Transition,
}

/// Row-major grid of boundary cell values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryGrid {
    cells: Vec<u16>,
    width: usize,
    height: usize,
}

impl BoundaryGrid {
    /// # Errors
    ///
    /// Fails when a dimension is zero or `cells` doesn't hold exactly
    /// `width * height` values.
    pub fn new(cells: Vec<u16>, width: usize, height: usize) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::EmptyGrid);
        }

        let expected = width * height;
        if cells.len() != expected {
            return Err(EngineError::InvalidGrid {
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            cells,
            width,
            height,
        })
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn cells(&self) -> &[u16] {
        &self.cells
    }

    /// Cell at tile coordinates, wrapped onto the grid.
    #[must_use]
    pub fn cell(&self, tile_x: i32, tile_y: i32) -> u16 {
        let column = wrap(i64::from(tile_x), self.width);
        let row = wrap(i64::from(tile_y), self.height);
        self.cells[row * self.width + column]
    }

    /// Tile coordinates (wrapped) under a screen point seen through `scroll`.
    #[must_use]
    pub fn tile_at(&self, probe: (i32, i32), scroll: (i32, i32)) -> (usize, usize) {
        let tile_x = (i64::from(probe.0) + i64::from(scroll.0)) >> TILE_SHIFT;
        let tile_y = (i64::from(probe.1) + i64::from(scroll.1)) >> TILE_SHIFT;
        (wrap(tile_x, self.width), wrap(tile_y, self.height))
    }
}

/// Folds `value` into `[0, extent)` the way the map wraps around: stepping
/// one full extent in either direction lands on the same cell.
fn wrap(value: i64, extent: usize) -> usize {
    let extent = i64::try_from(extent).unwrap_or(i64::MAX);
    value.rem_euclid(extent) as usize
}

/// Classifies the boundary cell under `probe` once the map is scrolled by
/// `scroll`. Checked in order: transition, interaction, wall.
#[must_use]
pub fn resolve(
    probe: (i32, i32),
    scroll: (i32, i32),
    grid: &BoundaryGrid,
    transition_tile: u16,
    interaction_tile: u16,
) -> TileKind {
    let (column, row) = grid.tile_at(probe, scroll);
    let cell = grid.cells[row * grid.width + column];

    if cell == transition_tile {
        TileKind::Transition
    } else if cell == interaction_tile {
        TileKind::Interactive
    } else if cell == WALL_TILE {
        TileKind::Blocked
    } else {
        TileKind::Free
    }
}
