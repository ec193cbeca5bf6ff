use crate::hardware::dma::{DMA3CNT, DMA3DAD, MAX_UNITS_PER_TRANSFER, transfer_control};
use crate::hardware::keypad::{GbaButton, KEYINPUT, KeyInput};
use crate::hardware::memory::{OAM, OAM_SIZE, PALETTE_RAM_SIZE, VRAM, VRAM_SIZE};
use crate::hardware::registers::VCOUNT;
use crate::hardware::{SCANLINES_PER_FRAME, memory::BG_PALETTE};

use super::Device;

const IO_REGISTERS: u32 = 0x0400_0000;
const IO_REGISTERS_SIZE: u32 = 0x400;

/// An in-memory stand-in for the console.
///
/// Holds the I/O register block, palette RAM, VRAM and OAM at their hardware
/// sizes. The scanline counter moves forward by one line every time VCOUNT is
/// read, so code that spins on it makes progress.
pub struct SimulatedDevice {
    io_registers: Box<[u8; IO_REGISTERS_SIZE as usize]>,
    palette_ram: Box<[u8; PALETTE_RAM_SIZE as usize]>,
    video_ram: Box<[u8; VRAM_SIZE as usize]>,
    obj_attributes: Box<[u8; OAM_SIZE as usize]>,
    scanline: u16,
    block_transfers: usize,
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedDevice {
    #[must_use]
    pub fn new() -> Self {
        let mut device = Self {
            io_registers: Box::new([0; IO_REGISTERS_SIZE as usize]),
            palette_ram: Box::new([0; PALETTE_RAM_SIZE as usize]),
            video_ram: vec![0; VRAM_SIZE as usize]
                .into_boxed_slice()
                .try_into()
                .unwrap_or_else(|_| unreachable!()),
            obj_attributes: Box::new([0; OAM_SIZE as usize]),
            scanline: 0,
            block_transfers: 0,
        };
        device.set_key_input(KeyInput::RELEASED);
        device
    }

    pub fn set_key_input(&mut self, keys: KeyInput) {
        self.store(KEYINPUT, keys.0);
    }

    pub fn press(&mut self, button: GbaButton) {
        let keys = self.peek(KEYINPUT);
        self.set_key_input(KeyInput(keys).with_button(button, true));
    }

    pub fn release(&mut self, button: GbaButton) {
        let keys = self.peek(KEYINPUT);
        self.set_key_input(KeyInput(keys).with_button(button, false));
    }

    pub fn release_all(&mut self) {
        self.set_key_input(KeyInput::RELEASED);
    }

    pub const fn set_scanline(&mut self, line: u16) {
        self.scanline = line % SCANLINES_PER_FRAME;
    }

    /// Reads a halfword without side effects.
    #[must_use]
    pub fn peek(&self, address: u32) -> u16 {
        if address & !1 == VCOUNT {
            return self.scanline;
        }

        let (memory, offset) = self.region(address);
        u16::from_le_bytes([memory[offset], memory[offset + 1]])
    }

    #[must_use]
    pub fn read_region(&self, address: u32, units: usize) -> Vec<u16> {
        (0..units as u32).map(|unit| self.peek(address + unit * 2)).collect()
    }

    /// The four halfwords of OAM entry `slot`.
    #[must_use]
    pub fn oam_entry(&self, slot: usize) -> [u16; 4] {
        let base = OAM + (slot as u32) * 8;
        [
            self.peek(base),
            self.peek(base + 2),
            self.peek(base + 4),
            self.peek(base + 6),
        ]
    }

    /// How many block copies were issued so far.
    #[must_use]
    pub const fn block_transfers(&self) -> usize {
        self.block_transfers
    }

    fn store(&mut self, address: u32, value: u16) {
        let (memory, offset) = self.region_mut(address);
        let [low, high] = value.to_le_bytes();
        memory[offset] = low;
        memory[offset + 1] = high;
    }

    fn region(&self, address: u32) -> (&[u8], usize) {
        let address = address & !1;
        match address {
            IO_REGISTERS..0x0400_0400 => {
                (&self.io_registers[..], (address - IO_REGISTERS) as usize)
            }
            BG_PALETTE..0x0500_0400 => (&self.palette_ram[..], (address - BG_PALETTE) as usize),
            VRAM..0x0601_8000 => (&self.video_ram[..], (address - VRAM) as usize),
            OAM..0x0700_0400 => (&self.obj_attributes[..], (address - OAM) as usize),
            _ => panic!("Not implemented read memory address: {address:x}"),
        }
    }

    fn region_mut(&mut self, address: u32) -> (&mut [u8], usize) {
        let address = address & !1;
        match address {
            IO_REGISTERS..0x0400_0400 => {
                (&mut self.io_registers[..], (address - IO_REGISTERS) as usize)
            }
            BG_PALETTE..0x0500_0400 => {
                (&mut self.palette_ram[..], (address - BG_PALETTE) as usize)
            }
            VRAM..0x0601_8000 => (&mut self.video_ram[..], (address - VRAM) as usize),
            OAM..0x0700_0400 => (&mut self.obj_attributes[..], (address - OAM) as usize),
            _ => panic!("Not implemented write memory address: {address:x}"),
        }
    }
}

impl Device for SimulatedDevice {
    fn read_u16(&mut self, address: u32) -> u16 {
        let value = self.peek(address);
        if address & !1 == VCOUNT {
            self.scanline = (self.scanline + 1) % SCANLINES_PER_FRAME;
        }
        value
    }

    fn write_u16(&mut self, address: u32, value: u16) {
        // VCOUNT is read-only
        if address & !1 == VCOUNT {
            return;
        }
        self.store(address, value);
    }

    fn write_u32(&mut self, address: u32, value: u32) {
        self.write_u16(address, value as u16);
        self.write_u16(address + 2, (value >> 16) as u16);
    }

    fn block_copy(&mut self, destination: u32, source: &[u16]) {
        let mut destination = destination;
        for chunk in source.chunks(MAX_UNITS_PER_TRANSFER) {
            // The source lives in host memory, so DMA3SAD is left alone.
            self.write_u32(DMA3DAD, destination);
            self.write_u32(DMA3CNT, transfer_control(chunk.len() as u16));

            for unit in chunk {
                self.write_u16(destination, *unit);
                destination += 2;
            }
            self.block_transfers += 1;
        }
    }
}
