//! The player character: position, facing, walk animation.
//!
//! The sprite sheet holds two walking poses per direction, 8 tiles apart,
//! grouped in one band per direction:
//!
//! | Direction | Frames   |
//! |-----------|----------|
//! | Down      | 0, 8     |
//! | Up        | 16, 24   |
//! | Left      | 32, 40   |
//! | Right     | 48, 56   |

use crate::config::GameConfig;
use crate::error::EngineError;
use crate::hardware::keypad::GbaButton;
use crate::hardware::{LCD_HEIGHT, LCD_WIDTH};
use crate::sprite::{SpriteHandle, SpriteSize, SpriteTable};

/// Tiles between two poses of the same direction.
pub const FRAME_STRIDE: u16 = 8;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Down,
    Left,
    Up,
    Right,
}

impl Direction {
    /// Order the main loop checks the d-pad in. Only the first pressed
    /// direction is handled in a frame.
    pub const POLL_ORDER: [Self; 4] = [Self::Down, Self::Up, Self::Right, Self::Left];

    /// Standing pose, first frame of the band.
    #[must_use]
    pub const fn base_frame(self) -> u16 {
        match self {
            Self::Down => 0,
            Self::Up => 16,
            Self::Left => 32,
            Self::Right => 48,
        }
    }

    /// Last frame of the band.
    #[must_use]
    pub const fn last_frame(self) -> u16 {
        self.base_frame() + FRAME_STRIDE
    }

    /// One step in this direction, in screen coordinates (y grows downwards).
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
            Self::Right => (1, 0),
        }
    }

    #[must_use]
    pub const fn button(self) -> GbaButton {
        match self {
            Self::Down => GbaButton::Down,
            Self::Left => GbaButton::Left,
            Self::Up => GbaButton::Up,
            Self::Right => GbaButton::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Idle,
    Moving(Direction),
}

/// What a call to [`Character::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The character walked one pixel.
    Moved,
    /// The character stands at the border inset; the map should scroll
    /// instead, if the boundary layer allows it.
    AtBorder,
}

pub struct Character {
    sprite: SpriteHandle,
    size: SpriteSize,
    x: i32,
    y: i32,
    direction: Direction,
    moving: bool,
    frame: u16,
    counter: u32,
    animation_delay: u32,
    border: i32,
}

impl Character {
    /// Places a new character at `(x, y)` facing down, with its own sprite.
    ///
    /// # Errors
    ///
    /// Fails when the sprite table has no free slot.
    pub fn new(
        sprites: &mut SpriteTable,
        x: i32,
        y: i32,
        size: SpriteSize,
        config: &GameConfig,
    ) -> Result<Self, EngineError> {
        let direction = Direction::default();
        let sprite = sprites.allocate(x, y, size, direction.base_frame(), 0)?;

        Ok(Self {
            sprite,
            size,
            x,
            y,
            direction,
            moving: false,
            frame: direction.base_frame(),
            counter: config.animation_delay.saturating_sub(1),
            animation_delay: config.animation_delay,
            border: config.border,
        })
    }

    /// Walks one pixel towards `direction` unless that would cross the
    /// border inset. The candidate position is decided first, so a frame
    /// either moves the character or reports [`Step::AtBorder`], never both.
    pub fn step(&mut self, direction: Direction) -> Step {
        if !self.moving || self.direction != direction {
            self.frame = direction.base_frame();
        }
        self.moving = true;
        self.direction = direction;

        let (x, y) = self.candidate(direction);
        let crosses_border = match direction {
            Direction::Left => x < self.border,
            Direction::Right => x > i32::from(LCD_WIDTH) - self.border,
            Direction::Up => y < self.border,
            Direction::Down => y > i32::from(LCD_HEIGHT) - self.border,
        };

        if crosses_border {
            Step::AtBorder
        } else {
            self.x = x;
            self.y = y;
            Step::Moved
        }
    }

    /// The screen point the character would stand on after one more step
    /// towards `direction`: the centre of the sprite at the candidate
    /// position.
    #[must_use]
    pub fn probe_point(&self, direction: Direction) -> (i32, i32) {
        let (x, y) = self.candidate(direction);
        let (width, height) = self.size.dimensions();
        (x + i32::from(width / 2), y + i32::from(height / 2))
    }

    /// Advances the walk animation and writes the sprite position.
    pub fn update(&mut self, sprites: &mut SpriteTable) {
        if self.moving {
            self.counter += 1;
            if self.counter >= self.animation_delay {
                self.frame += FRAME_STRIDE;
                if self.frame > self.direction.last_frame() {
                    self.frame = self.direction.base_frame();
                }
                sprites.set_frame_offset(self.sprite, self.frame);
                self.counter = 0;
            }
        }
        sprites.set_position(self.sprite, self.x, self.y);
    }

    /// Stands still facing the current direction.
    pub fn stop(&mut self, sprites: &mut SpriteTable) {
        self.moving = false;
        // The first step of the next walk animates right away.
        self.counter = self.animation_delay.saturating_sub(1);
        self.frame = self.direction.base_frame();
        sprites.set_frame_offset(self.sprite, self.frame);
    }

    /// Takes a fresh sprite after the table was cleared and stands at
    /// `(x, y)`, keeping the facing direction.
    ///
    /// # Errors
    ///
    /// Fails when the sprite table has no free slot.
    pub fn respawn(&mut self, sprites: &mut SpriteTable, x: i32, y: i32) -> Result<(), EngineError> {
        self.sprite = sprites.allocate(x, y, self.size, self.direction.base_frame(), 0)?;
        self.x = x;
        self.y = y;
        self.moving = false;
        self.frame = self.direction.base_frame();
        self.counter = self.animation_delay.saturating_sub(1);
        Ok(())
    }

    fn candidate(&self, direction: Direction) -> (i32, i32) {
        let (dx, dy) = direction.delta();
        (self.x + dx, self.y + dy)
    }

    #[must_use]
    pub const fn motion(&self) -> Motion {
        if self.moving {
            Motion::Moving(self.direction)
        } else {
            Motion::Idle
        }
    }

    #[must_use]
    pub const fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn frame(&self) -> u16 {
        self.frame
    }

    #[must_use]
    pub const fn sprite(&self) -> SpriteHandle {
        self.sprite
    }

    #[must_use]
    pub const fn border(&self) -> i32 {
        self.border
    }
}
