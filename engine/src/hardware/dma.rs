//! DMA channel 3, the only bulk-copy mechanism the engine uses.
//!
//! A transfer is started by writing the source pointer, the destination
//! pointer and then the control word `count | flags`. With the immediate
//! start timing the CPU is halted until the copy is done, so from the
//! program's point of view the copy is synchronous.

use crate::bitwise::Bits;

/// DMA 3 Source Address
pub const DMA3SAD: u32 = 0x0400_00D4;
/// DMA 3 Destination Address
pub const DMA3DAD: u32 = 0x0400_00D8;
/// DMA 3 Word Count (low half) and Control (high half)
pub const DMA3CNT: u32 = 0x0400_00DC;

/// Transfer 16 bit units.
pub const DMA_16: u32 = 0x0000_0000;
/// Start the channel.
pub const DMA_ENABLE: u32 = 0x8000_0000;

/// Largest unit count a single DMA 3 transfer can move.
pub const MAX_UNITS_PER_TRANSFER: usize = 0xFFFF;

/// Control word for an immediate 16 bit transfer of `count` units.
#[must_use]
pub fn transfer_control(count: u16) -> u32 {
    DMA_16 | DMA_ENABLE | u32::from(count)
}

/// Number of units a control word asks to transfer.
#[must_use]
pub fn unit_count(control: u32) -> u16 {
    control.get_bits(0..=15) as u16
}

#[must_use]
pub fn is_enabled(control: u32) -> bool {
    control & DMA_ENABLE != 0
}
