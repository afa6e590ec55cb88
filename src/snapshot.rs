//! Read-only view of a frame, handed to whatever draws the game.

use crate::game::GameState;
use crate::particles::{ConfettiParticle, FallingChar, SplashParticle};
use crate::water::Water;

#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameSnapshot<'a> {
    pub show_water: bool,
    pub show_config: bool,
    pub game_over: bool,
    pub score: u32,
    pub popped: u32,
    pub water: Water,
    pub characters_to_top: u32,
    pub fall_speed: f64,
    /// CSS background for the danger tint, if any.
    pub background: Option<String>,
    pub chars: &'a [FallingChar],
    pub confetti: &'a [ConfettiParticle],
    pub splashes: &'a [SplashParticle],
}

impl GameState {
    pub fn snapshot(&self) -> GameSnapshot<'_> {
        let config = self.config();
        GameSnapshot {
            show_water: self.show_water(),
            show_config: self.show_config(),
            game_over: self.is_game_over(),
            score: self.score(),
            popped: self.popped(),
            water: self.water(),
            characters_to_top: config.characters_to_top,
            fall_speed: config.fall_speed,
            background: self.danger_gradient().map(|g| g.css()),
            chars: self.chars(),
            confetti: self.confetti(),
            splashes: self.splashes(),
        }
    }
}

#[cfg(feature = "serde_json")]
impl GameSnapshot<'_> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
