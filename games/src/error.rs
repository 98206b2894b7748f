use std::io;

/// Everything that can go wrong while setting up or running a maze game.
///
/// Gameplay itself never fails; these come from configuration and from the
/// few setup operations that can be handed impossible requests.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Carving works on a stride of two, so both sides must be odd.
    #[error(
        "maze dimensions {rows}x{cols} are invalid: both must be odd, at least 3 and at most {}",
        crate::maze::map::MAX_SIDE
    )]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("cannot place {requested} items: only {available} free cells")]
    NotEnoughRoom { requested: usize, available: usize },

    #[error("invalid setting '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
