//! Scripted d-pad input for runs without a player.

use engine::device::SimulatedDevice;
use engine::hardware::keypad::GbaButton;

/// Hold `button` (or nothing) for `frames` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub button: Option<GbaButton>,
    pub frames: u32,
}

const fn hold(button: GbaButton, frames: u32) -> Segment {
    Segment {
        button: Some(button),
        frames,
    }
}

const fn rest(frames: u32) -> Segment {
    Segment {
        button: None,
        frames,
    }
}

/// Walks out of the first room's door, wanders the second room, goes back
/// through its door and stops by the sign on the way.
pub const DEMO_SCRIPT: [Segment; 8] = [
    hold(GbaButton::Up, 100),
    rest(10),
    hold(GbaButton::Right, 30),
    hold(GbaButton::Left, 30),
    hold(GbaButton::Down, 200),
    rest(10),
    hold(GbaButton::Left, 90),
    hold(GbaButton::Up, 60),
];

/// Replays a script in a loop.
pub struct Autopilot {
    script: Vec<Segment>,
    segment: usize,
    elapsed: u32,
}

impl Autopilot {
    #[must_use]
    pub fn new(script: &[Segment]) -> Self {
        Self {
            script: script.iter().copied().filter(|s| s.frames > 0).collect(),
            segment: 0,
            elapsed: 0,
        }
    }

    /// Sets the keypad for the next frame.
    pub fn apply(&mut self, device: &mut SimulatedDevice) {
        device.release_all();

        let Some(segment) = self.script.get(self.segment).copied() else {
            return;
        };
        if let Some(button) = segment.button {
            device.press(button);
        }

        self.elapsed += 1;
        if self.elapsed >= segment.frames {
            self.elapsed = 0;
            self.segment = (self.segment + 1) % self.script.len();
        }
    }
}
