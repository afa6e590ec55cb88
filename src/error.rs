use thiserror::Error;

/// Everything that can go wrong outside the (total) simulation itself.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("characters_to_top must be at least 1")]
    InvalidCharactersToTop,
    #[error("fall_speed must be a finite positive number, got {0}")]
    InvalidFallSpeed(f64),
    #[cfg(feature = "serde_json")]
    #[error("config parse error: {source}")]
    Config {
        #[from]
        source: serde_json::Error,
    },
}
