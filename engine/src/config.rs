//! Tunable constants of the game.
//!
//! Every field has a default matching the shipped demo, so a config file only
//! needs the values it changes.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Minimum distance in pixels between the character and the screen edge.
    /// Walking further scrolls the map instead.
    pub border: i32,
    /// Frames between two animation steps while walking.
    pub animation_delay: u32,
    /// Where the character appears when a map is entered.
    pub entry_point: (i32, i32),
    /// Boundary cell value that moves the player to the next map.
    pub transition_tile: u16,
    /// Boundary cell value that marks something to interact with.
    pub interaction_tile: u16,
    /// Spin iterations after every frame.
    pub throttle_iterations: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            border: 40,
            animation_delay: 5,
            entry_point: (120, 80),
            transition_tile: 34,
            interaction_tile: 999,
            throttle_iterations: 5000,
        }
    }
}
