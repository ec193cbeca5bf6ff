//! Placeholder art for the two-room demo world.
//!
//! Tiles and sprites are flat colour blocks. The layouts are what matter: a
//! wall ring, a door in each room leading to the other one and a sign.

use engine::EngineError;
use engine::background::{MapAssets, SpriteSheet};
use engine::boundary::{BoundaryGrid, WALL_TILE};
use engine::character::Direction;
use engine::config::GameConfig;
use engine::game::World;

pub const MAP_SIDE: usize = 32;

/// Tile columns of the door.
const DOOR_COLUMNS: [usize; 2] = [15, 16];
const SIGN: (usize, usize) = (8, 8);

const FLOOR: u16 = 1;
const WALL: u16 = 2;
const DOOR: u16 = 3;
const SIGNPOST: u16 = 4;

/// Halfwords of one 8x8 tile at 8 bits per pixel.
const TILE_HALFWORDS: usize = 32;

/// Halfwords of one 16x16 pose at 8 bits per pixel.
const POSE_HALFWORDS: usize = 4 * TILE_HALFWORDS;

#[derive(Clone, Copy)]
enum DoorRow {
    Top,
    Bottom,
}

/// GBA colour, 5 bits per channel, blue in the high bits.
const fn rgb15(red: u16, green: u16, blue: u16) -> u16 {
    (red & 0x1F) | ((green & 0x1F) << 5) | ((blue & 0x1F) << 10)
}

fn background_palette(grass: u16) -> Vec<u16> {
    let mut palette = vec![0; 256];
    palette[usize::from(FLOOR)] = grass;
    palette[usize::from(WALL)] = rgb15(12, 12, 12);
    palette[usize::from(DOOR)] = rgb15(16, 8, 2);
    palette[usize::from(SIGNPOST)] = rgb15(28, 24, 6);
    palette
}

/// One solid tile per palette entry in use, tile `n` drawn in colour `n`.
fn tile_image() -> Vec<u16> {
    (0..=SIGNPOST)
        .flat_map(|colour| std::iter::repeat_n(colour | (colour << 8), TILE_HALFWORDS))
        .collect()
}

fn room(
    config: &GameConfig,
    door_row: DoorRow,
    sign: bool,
    grass: u16,
) -> Result<MapAssets, EngineError> {
    let mut layout = vec![FLOOR; MAP_SIDE * MAP_SIDE];
    let mut boundary = vec![0; MAP_SIDE * MAP_SIDE];
    let last = MAP_SIDE - 1;

    for row in 0..MAP_SIDE {
        for column in 0..MAP_SIDE {
            if row == 0 || row == last || column == 0 || column == last {
                layout[row * MAP_SIDE + column] = WALL;
                boundary[row * MAP_SIDE + column] = WALL_TILE;
            }
        }
    }

    let door = match door_row {
        DoorRow::Top => 0,
        DoorRow::Bottom => last,
    };
    for column in DOOR_COLUMNS {
        layout[door * MAP_SIDE + column] = DOOR;
        boundary[door * MAP_SIDE + column] = config.transition_tile;
    }

    if sign {
        let (column, row) = SIGN;
        layout[row * MAP_SIDE + column] = SIGNPOST;
        boundary[row * MAP_SIDE + column] = config.interaction_tile;
    }

    MapAssets::new(
        background_palette(grass),
        tile_image(),
        layout,
        MAP_SIDE,
        MAP_SIDE,
        BoundaryGrid::new(boundary, MAP_SIDE, MAP_SIDE)?,
    )
}

const POSE_COLOURS: [(Direction, u16); 4] = [
    (Direction::Down, rgb15(31, 0, 0)),
    (Direction::Up, rgb15(0, 0, 31)),
    (Direction::Left, rgb15(31, 31, 0)),
    (Direction::Right, rgb15(31, 0, 31)),
];

/// Standing pose solid, stepping pose striped, one palette entry per
/// direction. Directions are in frame offset order so each pose lands on the
/// offset the character shows it at.
fn sprite_image() -> Vec<u16> {
    let mut image = Vec::new();
    for (index, _) in (1_u16..).zip(POSE_COLOURS) {
        let pixels = index | (index << 8);
        image.extend(std::iter::repeat_n(pixels, POSE_HALFWORDS));
        image.extend((0..POSE_HALFWORDS).map(|i| if i % 8 < 4 { pixels } else { 0 }));
    }
    image
}

fn sprite_sheet() -> Result<SpriteSheet, EngineError> {
    let mut palette = vec![0; 256];
    for (index, (_, colour)) in (1..).zip(POSE_COLOURS) {
        palette[index] = colour;
    }
    SpriteSheet::new(palette, sprite_image())
}

/// Room 0 has its door on top and a sign, room 1 its door at the bottom.
/// Each door leads to the other room.
pub fn world(config: &GameConfig) -> Result<World, EngineError> {
    let first = room(config, DoorRow::Top, true, rgb15(4, 20, 4))?;
    let second = room(config, DoorRow::Bottom, false, rgb15(6, 14, 10))?;
    World::new(sprite_sheet()?, vec![(first, 1), (second, 0)], 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rooms_have_wall_ring_and_door() {
        let config = GameConfig::default();
        let room = room(&config, DoorRow::Top, true, 0).unwrap();
        let grid = room.boundary();

        assert_eq!(grid.cell(0, 5), WALL_TILE);
        assert_eq!(grid.cell(31, 5), WALL_TILE);
        assert_eq!(grid.cell(5, 31), WALL_TILE);
        assert_eq!(grid.cell(15, 0), 34);
        assert_eq!(grid.cell(16, 0), 34);
        assert_eq!(grid.cell(8, 8), 999);
        assert_eq!(grid.cell(16, 5), 0);
    }

    #[test]
    fn door_and_sign_follow_config() {
        let config = GameConfig {
            transition_tile: 7,
            interaction_tile: 8,
            ..GameConfig::default()
        };
        let room = room(&config, DoorRow::Bottom, true, 0).unwrap();

        assert_eq!(room.boundary().cell(15, 31), 7);
        assert_eq!(room.boundary().cell(15, 0), WALL_TILE);
        assert_eq!(room.boundary().cell(8, 8), 8);
    }

    #[test]
    fn poses_sit_at_their_frame_offsets() {
        let image = sprite_image();
        // Frame offsets count 32 byte units, 16 halfwords each.
        let at = |frame: u16| image[usize::from(frame) * 16];

        assert_eq!(image.len(), 64 * 16);
        for (index, (direction, _)) in (1_u16..).zip(POSE_COLOURS) {
            assert_eq!(at(direction.base_frame()), index | (index << 8));
            assert_eq!(at(direction.last_frame()), index | (index << 8));
        }
        assert!(sprite_sheet().is_ok());
    }

    #[test]
    fn one_tile_per_colour() {
        let image = tile_image();
        assert_eq!(image.len(), 5 * TILE_HALFWORDS);
        assert_eq!(image[usize::from(WALL) * TILE_HALFWORDS], 0x0202);
    }

    #[test]
    fn world_links_both_rooms() {
        let world = world(&GameConfig::default()).unwrap();
        assert_eq!(world.len(), 2);
    }
}
