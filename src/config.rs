//! The two player-tunable knobs.

use crate::error::GameError;
use crate::water::{FULL_LEVEL, START_LEVEL};

pub const DEFAULT_CHARACTERS_TO_TOP: u32 = 10;
pub const DEFAULT_FALL_SPEED: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Landings needed to take the water from its starting 10% to 100%.
    pub characters_to_top: u32,
    /// Multiplier applied to the base speed of every newly spawned character.
    pub fall_speed: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            characters_to_top: DEFAULT_CHARACTERS_TO_TOP,
            fall_speed: DEFAULT_FALL_SPEED,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.characters_to_top == 0 {
            return Err(GameError::InvalidCharactersToTop);
        }
        if !self.fall_speed.is_finite() || self.fall_speed <= 0.0 {
            return Err(GameError::InvalidFallSpeed(self.fall_speed));
        }
        Ok(())
    }

    /// Water target after `landings` landings; the first 10% is already filled.
    /// Computed from the count so exactly `characters_to_top` landings read as full.
    pub fn water_target(&self, landings: u32) -> f64 {
        (START_LEVEL + landings as f64 * 90.0 / self.characters_to_top as f64).min(FULL_LEVEL)
    }

    /// Parse and validate a config from JSON. Missing fields take their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let cfg: GameConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
