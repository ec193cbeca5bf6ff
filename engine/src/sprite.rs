//! Sprite attribute table.
//!
//! We use nomenclature coming from <https://www.coranac.com/tonc/text/regobj.htm#sec-oam>.
//!
//! The table is kept in RAM and uploaded to OAM once per frame by
//! [`SpriteTable::commit`]. Each entry is four halfwords:
//! - Attribute 0: Y position (bits 0-7), 256 colors (bit 13), shape (bits 14-15)
//! - Attribute 1: X position (bits 0-8), size (bits 14-15)
//! - Attribute 2: tile index (bits 0-9), priority (bits 10-11)
//! - Attribute 3: rotation/scaling parameter, unused here

use tracing::error;

use crate::bitwise::Bits;
use crate::device::Device;
use crate::error::EngineError;
use crate::hardware::memory::OAM;
use crate::hardware::{LCD_HEIGHT, LCD_WIDTH};

/// Number of entries in OAM.
pub const SPRITE_COUNT: usize = 128;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ObjShape {
    #[default]
    Square,
    Horizontal,
    Vertical,
}

impl TryFrom<u16> for ObjShape {
    type Error = &'static str;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Square),
            1 => Ok(Self::Horizontal),
            2 => Ok(Self::Vertical),
            3 => Err("Prohibited ObjShape"),
            _ => unreachable!(),
        }
    }
}

impl ObjShape {
    const fn bits(self) -> u16 {
        match self {
            Self::Square => 0,
            Self::Horizontal => 1,
            Self::Vertical => 2,
        }
    }
}

/// The sprite dimensions the game uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteSize {
    Size16x16,
    Size16x32,
    Size64x64,
}

impl SpriteSize {
    /// Shape and size fields that select these dimensions.
    const fn encoding(self) -> (ObjShape, u16) {
        match self {
            Self::Size16x16 => (ObjShape::Square, 1),
            Self::Size16x32 => (ObjShape::Vertical, 2),
            Self::Size64x64 => (ObjShape::Square, 3),
        }
    }

    fn decode(shape: ObjShape, size: u16) -> Option<Self> {
        match (shape, size) {
            (ObjShape::Square, 1) => Some(Self::Size16x16),
            (ObjShape::Vertical, 2) => Some(Self::Size16x32),
            (ObjShape::Square, 3) => Some(Self::Size64x64),
            _ => None,
        }
    }

    /// Width and height in pixels.
    #[must_use]
    pub const fn dimensions(self) -> (u16, u16) {
        match self {
            Self::Size16x16 => (16, 16),
            Self::Size16x32 => (16, 32),
            Self::Size64x64 => (64, 64),
        }
    }
}

/// Raw OAM entry, laid out as the hardware reads it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct SpriteAttributes {
    pub attribute0: u16,
    pub attribute1: u16,
    pub attribute2: u16,
    pub attribute3: u16,
}

impl SpriteAttributes {
    fn new(x: i32, y: i32, size: SpriteSize, tile_offset: u16, priority: u16) -> Self {
        let (shape, size) = size.encoding();

        let attribute0 = 0_u16
            .with_bits(0..=7, y as u16)
            .with_bit(13, true)
            .with_bits(14..=15, shape.bits());
        let attribute1 = 0_u16.with_bits(0..=8, x as u16).with_bits(14..=15, size);
        let attribute2 = 0_u16
            .with_bits(0..=9, tile_offset)
            .with_bits(10..=11, priority);

        Self {
            attribute0,
            attribute1,
            attribute2,
            attribute3: 0,
        }
    }

    /// Parks the sprite just outside the visible area.
    const fn off_screen() -> Self {
        Self {
            attribute0: LCD_HEIGHT,
            attribute1: LCD_WIDTH,
            attribute2: 0,
            attribute3: 0,
        }
    }

    #[must_use]
    pub fn x(&self) -> u16 {
        self.attribute1.get_bits(0..=8)
    }

    #[must_use]
    pub fn y(&self) -> u16 {
        self.attribute0.get_bits(0..=7)
    }

    #[must_use]
    pub fn tile_offset(&self) -> u16 {
        self.attribute2.get_bits(0..=9)
    }

    #[must_use]
    pub fn priority(&self) -> u16 {
        self.attribute2.get_bits(10..=11)
    }

    #[must_use]
    pub fn is_256_colors(&self) -> bool {
        self.attribute0.get_bit(13)
    }

    /// The size class, if the shape/size fields hold one the game uses.
    #[must_use]
    pub fn size(&self) -> Option<SpriteSize> {
        let shape = ObjShape::try_from(self.attribute0.get_bits(14..=15)).ok()?;
        SpriteSize::decode(shape, self.attribute1.get_bits(14..=15))
    }

    /// Whether the sprite's top-left corner is inside the 240x160 screen.
    #[must_use]
    pub fn is_on_screen(&self) -> bool {
        self.x() < LCD_WIDTH && self.y() < LCD_HEIGHT
    }

    const fn words(&self) -> [u16; 4] {
        [
            self.attribute0,
            self.attribute1,
            self.attribute2,
            self.attribute3,
        ]
    }
}

impl From<[u16; 4]> for SpriteAttributes {
    fn from(value: [u16; 4]) -> Self {
        Self {
            attribute0: value[0],
            attribute1: value[1],
            attribute2: value[2],
            attribute3: value[3],
        }
    }
}

/// Index of an allocated slot in the [`SpriteTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteHandle(usize);

impl SpriteHandle {
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0
    }
}

/// Fixed-capacity table of sprite attributes with a bump allocator.
///
/// Slots are handed out in order from 0. There is no per-sprite release:
/// [`SpriteTable::clear_all`] takes every slot back at once.
pub struct SpriteTable {
    entries: [SpriteAttributes; SPRITE_COUNT],
    next_slot: usize,
}

impl Default for SpriteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteTable {
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            entries: [SpriteAttributes::default(); SPRITE_COUNT],
            next_slot: 0,
        };
        table.clear_all();
        table
    }

    /// Takes the next free slot.
    ///
    /// # Errors
    ///
    /// [`EngineError::SpriteTableFull`] when all slots were handed out since
    /// the last [`clear_all`](Self::clear_all).
    pub fn allocate(
        &mut self,
        x: i32,
        y: i32,
        size: SpriteSize,
        tile_offset: u16,
        priority: u16,
    ) -> Result<SpriteHandle, EngineError> {
        if self.next_slot == SPRITE_COUNT {
            error!("sprite table exhausted, {SPRITE_COUNT} sprites already live");
            return Err(EngineError::SpriteTableFull);
        }

        let slot = self.next_slot;
        self.next_slot += 1;
        self.entries[slot] = SpriteAttributes::new(x, y, size, tile_offset, priority);

        Ok(SpriteHandle(slot))
    }

    /// Out of range coordinates wrap around: x keeps 9 bits and y keeps 8,
    /// exactly as the hardware fields do.
    pub fn set_position(&mut self, handle: SpriteHandle, x: i32, y: i32) {
        let entry = &mut self.entries[handle.0];
        entry.attribute0 = entry.attribute0.with_bits(0..=7, y as u16);
        entry.attribute1 = entry.attribute1.with_bits(0..=8, x as u16);
    }

    pub fn move_by(&mut self, handle: SpriteHandle, dx: i32, dy: i32) {
        let (x, y) = self.position(handle);
        self.set_position(handle, i32::from(x) + dx, i32::from(y) + dy);
    }

    /// Selects the first tile of the sprite image; keeps 10 bits.
    pub fn set_frame_offset(&mut self, handle: SpriteHandle, offset: u16) {
        let entry = &mut self.entries[handle.0];
        entry.attribute2 = entry.attribute2.with_bits(0..=9, offset);
    }

    #[must_use]
    pub fn position(&self, handle: SpriteHandle) -> (u16, u16) {
        let entry = &self.entries[handle.0];
        (entry.x(), entry.y())
    }

    #[must_use]
    pub fn frame_offset(&self, handle: SpriteHandle) -> u16 {
        self.entries[handle.0].tile_offset()
    }

    #[must_use]
    pub fn attributes(&self, handle: SpriteHandle) -> &SpriteAttributes {
        &self.entries[handle.0]
    }

    /// Number of slots handed out since the last clear.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.next_slot
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.next_slot == 0
    }

    /// Takes every slot back and moves all sprites off screen.
    pub fn clear_all(&mut self) {
        self.next_slot = 0;
        self.entries.fill(SpriteAttributes::off_screen());
    }

    /// Uploads the whole table to OAM.
    /// Meant to run once per frame, inside vertical blank.
    pub fn commit(&self, device: &mut impl Device) {
        device.block_copy(OAM, &self.words());
    }

    /// The table as OAM sees it, four halfwords per entry.
    fn words(&self) -> [u16; SPRITE_COUNT * 4] {
        let mut words = [0; SPRITE_COUNT * 4];
        for (chunk, entry) in words.chunks_exact_mut(4).zip(&self.entries) {
            chunk.copy_from_slice(&entry.words());
        }
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SimulatedDevice;
    use pretty_assertions::assert_eq;
    use rand::Rng;

    #[test]
    fn allocate_encodes_every_field() {
        let mut table = SpriteTable::new();
        let handle = table
            .allocate(120, 80, SpriteSize::Size16x32, 48, 2)
            .unwrap();
        let attributes = table.attributes(handle);

        assert_eq!(handle.slot(), 0);
        assert_eq!(table.position(handle), (120, 80));
        assert_eq!(attributes.tile_offset(), 48);
        assert_eq!(attributes.priority(), 2);
        assert!(attributes.is_256_colors());
        assert_eq!(attributes.size(), Some(SpriteSize::Size16x32));
    }

    #[test]
    fn size_classes_round_trip_through_shape_and_size() {
        let mut table = SpriteTable::new();
        for size in [
            SpriteSize::Size16x16,
            SpriteSize::Size16x32,
            SpriteSize::Size64x64,
        ] {
            let handle = table.allocate(0, 0, size, 0, 0).unwrap();
            assert_eq!(table.attributes(handle).size(), Some(size));
        }
    }

    #[test]
    fn slots_are_handed_out_in_order() {
        let mut table = SpriteTable::new();
        for expected in 0..5 {
            let handle = table.allocate(0, 0, SpriteSize::Size16x16, 0, 0).unwrap();
            assert_eq!(handle.slot(), expected);
        }
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn exhausted_table_rejects_allocation() {
        let mut table = SpriteTable::new();
        for _ in 0..SPRITE_COUNT {
            table.allocate(0, 0, SpriteSize::Size16x16, 0, 0).unwrap();
        }

        let result = table.allocate(0, 0, SpriteSize::Size16x16, 0, 0);
        assert!(matches!(result, Err(EngineError::SpriteTableFull)));
        assert_eq!(table.len(), SPRITE_COUNT);
    }

    #[test]
    fn clear_all_reuses_slot_zero_and_hides_old_sprites() {
        let mut table = SpriteTable::new();
        let handles: Vec<_> = (0..10)
            .map(|n| {
                table
                    .allocate(n * 10, n * 5, SpriteSize::Size16x16, 0, 0)
                    .unwrap()
            })
            .collect();

        table.clear_all();

        for handle in &handles {
            assert!(!table.attributes(*handle).is_on_screen());
            assert_eq!(table.position(*handle), (240, 160));
        }

        let handle = table.allocate(1, 1, SpriteSize::Size16x16, 0, 0).unwrap();
        assert_eq!(handle.slot(), 0);
        assert!(!table.is_empty());
    }

    #[test]
    fn set_position_wraps_by_field_width() {
        let mut table = SpriteTable::new();
        let handle = table.allocate(0, 0, SpriteSize::Size16x16, 0, 0).unwrap();

        for x in -1000..=1000 {
            let y = -x / 2;
            table.set_position(handle, x, y);
            assert_eq!(
                table.position(handle),
                ((x & 0x1FF) as u16, (y & 0xFF) as u16)
            );
        }
    }

    #[test]
    fn set_position_round_trips_random_coordinates() {
        let mut rng = rand::thread_rng();
        let mut table = SpriteTable::new();
        let handle = table.allocate(0, 0, SpriteSize::Size64x64, 7, 3).unwrap();

        for _ in 0..10_000 {
            let x = rng.gen_range(-1000..=1000);
            let y = rng.gen_range(-1000..=1000);
            table.set_position(handle, x, y);

            assert_eq!(
                table.position(handle),
                ((x & 0x1FF) as u16, (y & 0xFF) as u16)
            );
            // Neighbouring fields survive.
            assert_eq!(table.attributes(handle).size(), Some(SpriteSize::Size64x64));
            assert_eq!(table.frame_offset(handle), 7);
        }
    }

    #[test]
    fn frame_offset_keeps_ten_bits() {
        let mut table = SpriteTable::new();
        let handle = table.allocate(0, 0, SpriteSize::Size16x16, 0, 3).unwrap();

        table.set_frame_offset(handle, 0x7FF);
        assert_eq!(table.frame_offset(handle), 0x3FF);
        assert_eq!(table.attributes(handle).priority(), 3);
    }

    #[test]
    fn move_by_offsets_current_position() {
        let mut table = SpriteTable::new();
        let handle = table.allocate(10, 250, SpriteSize::Size16x16, 0, 0).unwrap();

        table.move_by(handle, -20, 10);
        assert_eq!(table.position(handle), (((10 - 20) & 0x1FF) as u16, 4));
    }

    #[test]
    fn commit_uploads_the_whole_table() {
        let mut device = SimulatedDevice::new();
        let mut table = SpriteTable::new();
        let handle = table.allocate(33, 44, SpriteSize::Size16x16, 16, 1).unwrap();

        table.commit(&mut device);

        let entry = SpriteAttributes::from(device.oam_entry(handle.slot()));
        assert_eq!(entry, *table.attributes(handle));
        assert_eq!(device.oam_entry(127), [160, 240, 0, 0]);
        assert_eq!(device.block_transfers(), 1);
    }

    #[test]
    fn words_follow_slot_order() {
        let mut table = SpriteTable::new();
        let first = table.allocate(1, 2, SpriteSize::Size16x16, 8, 0).unwrap();
        let second = table.allocate(3, 4, SpriteSize::Size64x64, 16, 2).unwrap();

        let words = table.words();

        assert_eq!(words.len(), SPRITE_COUNT * 4);
        assert_eq!(words[0..4], table.attributes(first).words());
        assert_eq!(words[4..8], table.attributes(second).words());
        assert_eq!(words[8..12], SpriteAttributes::off_screen().words());
    }

    #[test]
    fn later_commit_overwrites_earlier_one() {
        let mut device = SimulatedDevice::new();
        let mut table = SpriteTable::new();
        let handle = table.allocate(0, 0, SpriteSize::Size16x16, 0, 0).unwrap();

        table.commit(&mut device);
        table.set_position(handle, 100, 50);
        table.commit(&mut device);

        let entry = SpriteAttributes::from(device.oam_entry(handle.slot()));
        assert_eq!((entry.x(), entry.y()), (100, 50));
        assert_eq!(device.block_transfers(), 2);
    }
}
