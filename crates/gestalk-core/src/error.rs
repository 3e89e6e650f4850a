use thiserror::Error;

/// Top-level error type for the gestalk system.
///
/// Recognition itself never fails: unknown poses and empty frames are
/// ordinary outcomes. Errors only come from the edges (configuration,
/// frame capture, speech synthesis, I/O).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GestalkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for GestalkError {
    fn from(err: toml::de::Error) -> Self {
        GestalkError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for GestalkError {
    fn from(err: toml::ser::Error) -> Self {
        GestalkError::Config(err.to_string())
    }
}

/// A specialized `Result` type for gestalk operations.
pub type Result<T> = std::result::Result<T, GestalkError>;
