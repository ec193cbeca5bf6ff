//! The main loop.
//!
//! One call to [`Game::run_frame`] is one displayed frame:
//!
//! ```text
//! read KEYINPUT ──► Character::step ──► at border? ──► boundary::resolve
//!                                                        │
//!        ┌──────────────┬──────────────┬─────────────────┤
//!        ▼              ▼              ▼                 ▼
//!      Free          Blocked      Interactive        Transition
//!   scroll map    stop walking   report it        load next map,
//!                                                 respawn at entry
//!
//! Character::update ──► wait vblank ──► write scroll ──► commit OAM ──► throttle
//! ```

use std::convert::Infallible;

use tracing::{debug, trace, warn};

use crate::background::{
    BOUNDARY_LAYER, MapAssets, SpriteSheet, VISIBLE_LAYER, load_map, load_sprite_sheet,
};
use crate::boundary::{TileKind, resolve};
use crate::character::{Character, Direction, Step};
use crate::config::GameConfig;
use crate::device::Device;
use crate::error::EngineError;
use crate::frame::FrameClock;
use crate::hardware::registers::{Background, DISPCNT, DisplayControl};
use crate::sprite::{SpriteSize, SpriteTable};

/// Mode 0 with the visible and boundary layers and sprites on, sprite tiles
/// mapped linearly.
#[must_use]
pub fn display_control() -> DisplayControl {
    DisplayControl::new()
        .with_mode(0)
        .with_background(BOUNDARY_LAYER, true)
        .with_background(VISIBLE_LAYER, true)
        .with_obj(true)
        .with_obj_mapping_1d(true)
}

struct WorldMap {
    assets: MapAssets,
    exit: usize,
}

/// The maps of the game and how their transition tiles link them.
pub struct World {
    maps: Vec<WorldMap>,
    sprite_sheet: SpriteSheet,
    start: usize,
}

impl World {
    /// `maps` pairs each map with the index of the map its transition tiles
    /// lead to.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownMap`] when `start` or an exit names a map that
    /// isn't in `maps`.
    pub fn new(
        sprite_sheet: SpriteSheet,
        maps: Vec<(MapAssets, usize)>,
        start: usize,
    ) -> Result<Self, EngineError> {
        if start >= maps.len() {
            return Err(EngineError::UnknownMap(start));
        }
        if let Some((_, exit)) = maps.iter().find(|(_, exit)| *exit >= maps.len()) {
            return Err(EngineError::UnknownMap(*exit));
        }

        Ok(Self {
            maps: maps
                .into_iter()
                .map(|(assets, exit)| WorldMap { assets, exit })
                .collect(),
            sprite_sheet,
            start,
        })
    }

    #[must_use]
    pub fn map(&self, id: usize) -> Option<&MapAssets> {
        self.maps.get(id).map(|map| &map.assets)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

/// What happened during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// No direction held.
    Idle,
    /// The character walked one pixel.
    Walked(Direction),
    /// The character stood at the border and the map scrolled instead.
    Scrolled(Direction),
    /// A wall stopped the character.
    Blocked(Direction),
    /// The character reached an interaction tile. Nothing reacts to those
    /// yet; the event carries the boundary tile coordinates.
    UnhandledInteraction { tile: (usize, usize) },
    /// A transition tile moved the player to another map.
    MapChanged { from: usize, to: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub event: FrameEvent,
}

pub struct Game<D: Device, C: FrameClock> {
    device: D,
    clock: C,
    world: World,
    current_map: usize,
    sprites: SpriteTable,
    character: Character,
    scroll: (i32, i32),
    config: GameConfig,
    frame: u64,
}

impl<D: Device, C: FrameClock> Game<D, C> {
    /// Sets up the display, uploads the sprite sheet and the start map and
    /// places the character at the entry point.
    ///
    /// # Errors
    ///
    /// Fails when the character sprite can't be allocated.
    pub fn new(
        mut device: D,
        clock: C,
        world: World,
        config: GameConfig,
    ) -> Result<Self, EngineError> {
        device.write_u16(DISPCNT, display_control().bits());
        load_sprite_sheet(&mut device, &world.sprite_sheet);

        let current_map = world.start;
        load_map(&mut device, &world.maps[current_map].assets);

        let mut sprites = SpriteTable::new();
        let (x, y) = config.entry_point;
        let character = Character::new(&mut sprites, x, y, SpriteSize::Size16x16, &config)?;

        debug!("game started on map {current_map}");

        Ok(Self {
            device,
            clock,
            world,
            current_map,
            sprites,
            character,
            scroll: (0, 0),
            config,
            frame: 0,
        })
    }

    /// Runs frames until an error stops the game.
    ///
    /// # Errors
    ///
    /// Whatever [`run_frame`](Self::run_frame) fails with.
    pub fn run(&mut self) -> Result<Infallible, EngineError> {
        loop {
            self.run_frame()?;
        }
    }

    /// Advances the game by one frame and commits it at vertical blank.
    ///
    /// # Errors
    ///
    /// Fails when a map change can't allocate the character sprite.
    pub fn run_frame(&mut self) -> Result<FrameReport, EngineError> {
        let keys = self.device.key_input();
        let held = Direction::POLL_ORDER
            .into_iter()
            .find(|direction| keys.is_pressed(direction.button()));

        let event = match held {
            None => {
                self.character.stop(&mut self.sprites);
                FrameEvent::Idle
            }
            Some(direction) => match self.character.step(direction) {
                Step::Moved => FrameEvent::Walked(direction),
                Step::AtBorder => self.handle_border(direction)?,
            },
        };

        self.character.update(&mut self.sprites);

        self.clock.wait_for_vblank(&mut self.device);
        self.commit_scroll();
        self.sprites.commit(&mut self.device);
        self.clock.throttle();

        let report = FrameReport {
            frame: self.frame,
            event,
        };
        trace!("frame {}: {:?}", self.frame, event);
        self.frame += 1;

        Ok(report)
    }

    fn handle_border(&mut self, direction: Direction) -> Result<FrameEvent, EngineError> {
        let boundary = self.world.maps[self.current_map].assets.boundary();
        let probe = self.character.probe_point(direction);
        let kind = resolve(
            probe,
            self.scroll,
            boundary,
            self.config.transition_tile,
            self.config.interaction_tile,
        );

        let event = match kind {
            TileKind::Free => {
                let (dx, dy) = direction.delta();
                // Only the low 9 bits reach the scroll registers.
                self.scroll.0 = self.scroll.0.wrapping_add(dx);
                self.scroll.1 = self.scroll.1.wrapping_add(dy);
                FrameEvent::Scrolled(direction)
            }
            TileKind::Blocked => {
                self.character.stop(&mut self.sprites);
                FrameEvent::Blocked(direction)
            }
            TileKind::Interactive => {
                let tile = boundary.tile_at(probe, self.scroll);
                warn!("interaction tile at {tile:?} on map {} is not handled", self.current_map);
                FrameEvent::UnhandledInteraction { tile }
            }
            TileKind::Transition => {
                let from = self.current_map;
                let to = self.world.maps[from].exit;
                self.enter_map(to)?;
                FrameEvent::MapChanged { from, to }
            }
        };

        Ok(event)
    }

    /// Swaps in another map and puts the character at its entry point.
    fn enter_map(&mut self, id: usize) -> Result<(), EngineError> {
        let map = self.world.maps.get(id).ok_or(EngineError::UnknownMap(id))?;
        load_map(&mut self.device, &map.assets);

        self.current_map = id;
        self.scroll = (0, 0);
        self.sprites.clear_all();

        let (x, y) = self.config.entry_point;
        self.character.respawn(&mut self.sprites, x, y)?;

        debug!("entered map {id} at ({x}, {y})");
        Ok(())
    }

    /// Both layers scroll together so the boundary grid stays under the
    /// visible map.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    fn commit_scroll(&mut self) {
        let (x, y) = self.scroll;
        for layer in [Background::Bg0, Background::Bg1] {
            self.device
                .write_u16(layer.horizontal_offset_address(), x as u16);
            self.device
                .write_u16(layer.vertical_offset_address(), y as u16);
        }
    }

    #[must_use]
    pub const fn scroll(&self) -> (i32, i32) {
        self.scroll
    }

    #[must_use]
    pub const fn current_map(&self) -> usize {
        self.current_map
    }

    #[must_use]
    pub const fn character(&self) -> &Character {
        &self.character
    }

    #[must_use]
    pub const fn sprites(&self) -> &SpriteTable {
        &self.sprites
    }

    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub const fn device(&self) -> &D {
        &self.device
    }

    pub const fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{BoundaryGrid, WALL_TILE};
    use crate::character::Motion;
    use crate::device::SimulatedDevice;
    use crate::frame::VCountClock;
    use crate::hardware::keypad::GbaButton;
    use crate::hardware::memory::screen_block;
    use pretty_assertions::assert_eq;

    const SIDE: usize = 32;

    fn uniform_map(cell: u16, marker: u16) -> MapAssets {
        let boundary = BoundaryGrid::new(vec![cell; SIDE * SIDE], SIDE, SIDE).unwrap();
        MapAssets::new(
            vec![0; 256],
            vec![marker; 32],
            vec![marker; SIDE * SIDE],
            SIDE,
            SIDE,
            boundary,
        )
        .unwrap()
    }

    fn game_with(first: MapAssets, second: MapAssets) -> Game<SimulatedDevice, VCountClock> {
        let sheet = SpriteSheet::new(vec![0; 256], vec![0; 256]).unwrap();
        let world = World::new(sheet, vec![(first, 1), (second, 0)], 0).unwrap();
        Game::new(
            SimulatedDevice::new(),
            VCountClock::new(0),
            world,
            GameConfig::default(),
        )
        .unwrap()
    }

    /// Holds `button` until the character stands on the border inset.
    fn walk_to_border(game: &mut Game<SimulatedDevice, VCountClock>, button: GbaButton) {
        game.device_mut().press(button);
        loop {
            let report = game.run_frame().unwrap();
            assert!(
                matches!(report.event, FrameEvent::Walked(_)),
                "stopped walking early: {report:?}"
            );
            let (x, y) = game.character().position();
            let border = game.character().border();
            let at_inset = match button {
                GbaButton::Up => y == border,
                GbaButton::Down => y == 160 - border,
                GbaButton::Left => x == border,
                GbaButton::Right => x == 240 - border,
                _ => unreachable!(),
            };
            if at_inset {
                break;
            }
        }
    }

    #[test]
    fn setup_writes_display_control_and_start_map() {
        let game = game_with(uniform_map(0, 1), uniform_map(0, 2));

        assert_eq!(game.device().peek(DISPCNT), 0x1340);
        assert_eq!(game.device().peek(screen_block(16)), 1);
        assert_eq!(game.current_map(), 0);
        assert_eq!(game.character().position(), (120, 80));
        assert_eq!(game.sprites().len(), 1);
    }

    #[test]
    fn no_input_keeps_character_idle() {
        let mut game = game_with(uniform_map(0, 1), uniform_map(0, 2));

        let report = game.run_frame().unwrap();

        assert_eq!(report.event, FrameEvent::Idle);
        assert_eq!(game.character().motion(), Motion::Idle);
        assert_eq!(game.frame(), 1);
    }

    #[test]
    fn first_direction_in_poll_order_wins() {
        let mut game = game_with(uniform_map(0, 1), uniform_map(0, 2));
        game.device_mut().press(GbaButton::Left);
        game.device_mut().press(GbaButton::Up);

        let report = game.run_frame().unwrap();

        assert_eq!(report.event, FrameEvent::Walked(Direction::Up));
        assert_eq!(game.character().position(), (120, 79));
    }

    #[test]
    fn every_frame_commits_sprites_to_oam() {
        let mut game = game_with(uniform_map(0, 1), uniform_map(0, 2));
        game.device_mut().press(GbaButton::Right);

        game.run_frame().unwrap();

        let slot = game.character().sprite().slot();
        let [attribute0, attribute1, _, _] = game.device().oam_entry(slot);
        assert_eq!(attribute1 & 0x1FF, 121);
        assert_eq!(attribute0 & 0xFF, 80);
    }

    #[test]
    fn free_tile_at_border_scrolls_instead_of_moving() {
        let mut game = game_with(uniform_map(0, 1), uniform_map(0, 2));
        walk_to_border(&mut game, GbaButton::Up);
        let position = game.character().position();

        let report = game.run_frame().unwrap();

        assert_eq!(report.event, FrameEvent::Scrolled(Direction::Up));
        assert_eq!(game.character().position(), position);
        assert_eq!(game.scroll(), (0, -1));
        assert_eq!(
            game.device().peek(Background::Bg0.vertical_offset_address()),
            0xFFFF
        );
        assert_eq!(
            game.device().peek(Background::Bg1.vertical_offset_address()),
            0xFFFF
        );
    }

    #[test]
    fn scrolling_continues_while_direction_is_held() {
        let mut game = game_with(uniform_map(0, 1), uniform_map(0, 2));
        walk_to_border(&mut game, GbaButton::Right);

        for _ in 0..10 {
            game.run_frame().unwrap();
        }

        assert_eq!(game.scroll(), (10, 0));
        assert_eq!(game.character().position(), (200, 80));
        assert_eq!(
            game.device().peek(Background::Bg1.horizontal_offset_address()),
            10
        );
    }

    #[test]
    fn scroll_wraps_at_the_i32_limits() {
        let mut game = game_with(uniform_map(0, 1), uniform_map(0, 2));
        walk_to_border(&mut game, GbaButton::Right);
        game.scroll = (i32::MAX, 0);

        let report = game.run_frame().unwrap();

        assert_eq!(report.event, FrameEvent::Scrolled(Direction::Right));
        assert_eq!(game.scroll(), (i32::MIN, 0));
        assert_eq!(
            game.device().peek(Background::Bg0.horizontal_offset_address()),
            0
        );

        walk_to_border(&mut game, GbaButton::Up);
        game.scroll = (0, i32::MIN);
        let report = game.run_frame().unwrap();

        assert_eq!(report.event, FrameEvent::Scrolled(Direction::Up));
        assert_eq!(game.scroll(), (0, i32::MAX));
        assert_eq!(
            game.device().peek(Background::Bg1.vertical_offset_address()),
            0xFFFF
        );
    }

    #[test]
    fn wall_at_border_stops_character_and_keeps_scroll() {
        let mut game = game_with(uniform_map(WALL_TILE, 1), uniform_map(0, 2));
        walk_to_border(&mut game, GbaButton::Down);

        let report = game.run_frame().unwrap();

        assert_eq!(report.event, FrameEvent::Blocked(Direction::Down));
        assert_eq!(game.character().motion(), Motion::Idle);
        assert_eq!(game.scroll(), (0, 0));

        let report = game.run_frame().unwrap();
        assert_eq!(report.event, FrameEvent::Blocked(Direction::Down));
        assert_eq!(game.scroll(), (0, 0));
        assert_eq!(game.character().position(), (120, 120));
    }

    #[test]
    fn interaction_tile_is_reported() {
        let mut game = game_with(uniform_map(999, 1), uniform_map(0, 2));
        walk_to_border(&mut game, GbaButton::Left);

        let report = game.run_frame().unwrap();

        // Probe is the sprite centre one pixel left: (39 + 8, 80 + 8).
        assert_eq!(
            report.event,
            FrameEvent::UnhandledInteraction { tile: (5, 11) }
        );
        assert_eq!(game.scroll(), (0, 0));
        assert_eq!(game.character().position(), (40, 80));
    }

    #[test]
    fn transition_tile_swaps_map_and_respawns() {
        let mut game = game_with(uniform_map(34, 1), uniform_map(0, 2));
        walk_to_border(&mut game, GbaButton::Up);

        let report = game.run_frame().unwrap();

        assert_eq!(report.event, FrameEvent::MapChanged { from: 0, to: 1 });
        assert_eq!(game.current_map(), 1);
        assert_eq!(game.character().position(), (120, 80));
        assert_eq!(game.character().motion(), Motion::Idle);
        assert_eq!(game.character().sprite().slot(), 0);
        assert_eq!(game.sprites().len(), 1);
        assert_eq!(game.scroll(), (0, 0));
        assert_eq!(game.device().peek(screen_block(16)), 2);
        assert_eq!(game.device().peek(screen_block(17)), 0);
    }

    #[test]
    fn transition_on_second_map_leads_back() {
        let mut game = game_with(uniform_map(34, 1), uniform_map(34, 2));
        walk_to_border(&mut game, GbaButton::Up);
        game.run_frame().unwrap();
        assert_eq!(game.current_map(), 1);

        walk_to_border(&mut game, GbaButton::Up);
        let report = game.run_frame().unwrap();

        assert_eq!(report.event, FrameEvent::MapChanged { from: 1, to: 0 });
        assert_eq!(game.device().peek(screen_block(16)), 1);
    }

    #[test]
    fn scroll_and_movement_never_happen_in_the_same_frame() {
        let mut game = game_with(uniform_map(0, 1), uniform_map(0, 2));
        game.device_mut().press(GbaButton::Left);

        for _ in 0..200 {
            let position = game.character().position();
            let scroll = game.scroll();
            game.run_frame().unwrap();

            let moved = game.character().position() != position;
            let scrolled = game.scroll() != scroll;
            assert!(moved != scrolled);
        }
    }

    #[test]
    fn world_rejects_dangling_exit() {
        let sheet = SpriteSheet::new(vec![], vec![]).unwrap();
        let result = World::new(sheet, vec![(uniform_map(0, 0), 3)], 0);
        assert!(matches!(result, Err(EngineError::UnknownMap(3))));
    }
}
