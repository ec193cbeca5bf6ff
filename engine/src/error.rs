use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("all {} sprite slots are in use", crate::sprite::SPRITE_COUNT)]
    SpriteTableFull,
    #[error("grid holds {actual} cells, {expected} expected from its dimensions")]
    InvalidGrid { expected: usize, actual: usize },
    #[error("grid dimensions must be non-zero")]
    EmptyGrid,
    #[error("{width}x{height} tiles don't fit a 32x32 screen block")]
    GridTooLarge { width: usize, height: usize },
    #[error("boundary grid is {boundary:?} tiles but the layout is {layout:?}")]
    GridMismatch {
        layout: (usize, usize),
        boundary: (usize, usize),
    },
    #[error("{asset} is {units} halfwords, only {capacity} fit")]
    AssetTooLarge {
        asset: &'static str,
        units: usize,
        capacity: usize,
    },
    #[error("no map with id {0}")]
    UnknownMap(usize),
}
