/// Address of KEYINPUT.
pub const KEYINPUT: u32 = 0x0400_0130;

/// GBA button bit positions in KEYINPUT register (when pressed are set to 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GbaButton {
    A = 1 << 0,
    B = 1 << 1,
    Select = 1 << 2,
    Start = 1 << 3,
    Right = 1 << 4,
    Left = 1 << 5,
    Up = 1 << 6,
    Down = 1 << 7,
    R = 1 << 8,
    L = 1 << 9,
}

impl GbaButton {
    #[must_use]
    pub const fn mask(self) -> u16 {
        self as u16
    }
}

/// Snapshot of the KEYINPUT register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput(pub u16);

impl Default for KeyInput {
    fn default() -> Self {
        Self::RELEASED
    }
}

impl KeyInput {
    /// All 10 buttons released (bits 0-9 = 1).
    pub const RELEASED: Self = Self(0x03FF);

    /// GBA uses active-low logic: bit 0 = pressed, bit 1 = released.
    #[must_use]
    pub const fn is_pressed(self, button: GbaButton) -> bool {
        self.0 & button.mask() == 0
    }

    #[must_use]
    pub const fn with_button(self, button: GbaButton, pressed: bool) -> Self {
        if pressed {
            Self(self.0 & !button.mask())
        } else {
            Self(self.0 | button.mask())
        }
    }
}
