use std::{error, fs, path::Path, path::PathBuf};

use engine::config::GameConfig;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Frames to run before stopping.
    pub frames: u64,
    /// Writes logs to this file instead of stdout.
    pub log_file: Option<PathBuf>,
    /// Paces frames at the GBA refresh rate instead of spinning.
    pub realtime: bool,
    pub game: GameConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            log_file: None,
            realtime: false,
            game: GameConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Reads the config file at `path`, or the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn error::Error>> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .map_err(|e| format!("can't read {}: {e}", path.display()))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, Box<dyn error::Error>> {
        Ok(toml::from_str(text)?)
    }
}
