use thiserror::Error;

/// Setup-time failures. Gameplay itself never errors: invalid transitions
/// are ignored and empty statistics are reported as `None`.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("a panel set needs at least one panel")]
    EmptyPanelSet,

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
