//! LCD I/O registers used by the engine.
//!
//! | Address       | Register | Description                              |
//! |---------------|----------|------------------------------------------|
//! | `0x0400_0000` | DISPCNT  | LCD control (mode, layer enables)        |
//! | `0x0400_0006` | VCOUNT   | Current scanline (0-227)                 |
//! | `0x0400_0008` | BG0CNT   | BG0 control (priority, tiles, size)      |
//! | `0x0400_000A` | BG1CNT   | BG1 control                              |
//! | `0x0400_000C` | BG2CNT   | BG2 control                              |
//! | `0x0400_000E` | BG3CNT   | BG3 control                              |
//! | `0x0400_0010` | BG0HOFS  | BG0 horizontal scroll                    |
//! | `0x0400_0012` | BG0VOFS  | BG0 vertical scroll                      |
//! | ...           | ...      | (similar for BG1-BG3)                    |

use crate::bitwise::Bits;

/// LCD Control
pub const DISPCNT: u32 = 0x0400_0000;
/// Vertical Counter (LY)
pub const VCOUNT: u32 = 0x0400_0006;

const BG0CNT: u32 = 0x0400_0008;
const BG0HOFS: u32 = 0x0400_0010;

/// One of the four tiled background layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Bg0,
    Bg1,
    Bg2,
    Bg3,
}

impl Background {
    const fn index(self) -> u32 {
        match self {
            Self::Bg0 => 0,
            Self::Bg1 => 1,
            Self::Bg2 => 2,
            Self::Bg3 => 3,
        }
    }

    /// Address of BGxCNT.
    #[must_use]
    pub const fn control_address(self) -> u32 {
        BG0CNT + self.index() * 2
    }

    /// Address of BGxHOFS.
    #[must_use]
    pub const fn horizontal_offset_address(self) -> u32 {
        BG0HOFS + self.index() * 4
    }

    /// Address of BGxVOFS.
    #[must_use]
    pub const fn vertical_offset_address(self) -> u32 {
        self.horizontal_offset_address() + 2
    }

    /// DISPCNT bit that turns this layer on.
    const fn enable_bit(self) -> u8 {
        8 + self.index() as u8
    }
}

/// Builder for the DISPCNT word.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DisplayControl(u16);

impl DisplayControl {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Background mode (0-5). Only the tiled mode 0 is used by the game.
    #[must_use]
    pub fn with_mode(self, mode: u16) -> Self {
        Self(self.0.with_bits(0..=2, mode))
    }

    /// When set, OBJ tiles are laid out linearly instead of in a 32x32 grid.
    #[must_use]
    pub fn with_obj_mapping_1d(self, value: bool) -> Self {
        Self(self.0.with_bit(6, value))
    }

    #[must_use]
    pub fn with_background(self, background: Background, enabled: bool) -> Self {
        Self(self.0.with_bit(background.enable_bit(), enabled))
    }

    #[must_use]
    pub fn with_obj(self, enabled: bool) -> Self {
        Self(self.0.with_bit(12, enabled))
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn is_background_enabled(self, background: Background) -> bool {
        self.0.get_bit(background.enable_bit())
    }
}

impl From<u16> for DisplayControl {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// Text background screen size, in tiles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSize {
    /// 32x32 tiles (256x256 pixels), one screen block.
    #[default]
    Size32x32,
    /// 64x32 tiles, two screen blocks side by side.
    Size64x32,
    /// 32x64 tiles, two screen blocks stacked.
    Size32x64,
    /// 64x64 tiles, four screen blocks.
    Size64x64,
}

impl From<u16> for ScreenSize {
    fn from(value: u16) -> Self {
        match value & 0b11 {
            0 => Self::Size32x32,
            1 => Self::Size64x32,
            2 => Self::Size32x64,
            _ => Self::Size64x64,
        }
    }
}

impl ScreenSize {
    const fn bits(self) -> u16 {
        match self {
            Self::Size32x32 => 0,
            Self::Size64x32 => 1,
            Self::Size32x64 => 2,
            Self::Size64x64 => 3,
        }
    }
}

/// Builder for a BGxCNT word.
///
/// | Bits  | Field                                |
/// |-------|--------------------------------------|
/// | 0-1   | Priority (0 = front)                 |
/// | 2-3   | Character base block (0-3)           |
/// | 7     | 256 colors (8bpp) when set           |
/// | 8-12  | Screen base block (0-31)             |
/// | 13    | Display area overflow (wrap)         |
/// | 14-15 | Screen size                          |
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundControl(u16);

impl BackgroundControl {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn with_priority(self, priority: u16) -> Self {
        Self(self.0.with_bits(0..=1, priority))
    }

    #[must_use]
    pub fn with_character_base_block(self, block: u16) -> Self {
        Self(self.0.with_bits(2..=3, block))
    }

    #[must_use]
    pub fn with_256_colors(self, value: bool) -> Self {
        Self(self.0.with_bit(7, value))
    }

    #[must_use]
    pub fn with_screen_base_block(self, block: u16) -> Self {
        Self(self.0.with_bits(8..=12, block))
    }

    #[must_use]
    pub fn with_wrap(self, value: bool) -> Self {
        Self(self.0.with_bit(13, value))
    }

    #[must_use]
    pub fn with_screen_size(self, size: ScreenSize) -> Self {
        Self(self.0.with_bits(14..=15, size.bits()))
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn priority(self) -> u16 {
        self.0.get_bits(0..=1)
    }

    #[must_use]
    pub fn character_base_block(self) -> u16 {
        self.0.get_bits(2..=3)
    }

    #[must_use]
    pub fn screen_base_block(self) -> u16 {
        self.0.get_bits(8..=12)
    }

    #[must_use]
    pub fn is_256_colors(self) -> bool {
        self.0.get_bit(7)
    }

    #[must_use]
    pub fn screen_size(self) -> ScreenSize {
        self.0.get_bits(14..=15).into()
    }
}

impl From<u16> for BackgroundControl {
    fn from(value: u16) -> Self {
        Self(value)
    }
}
