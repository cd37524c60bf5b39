use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkshopError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Command failed: {0}")]
    Command(String),

    /// A state name that the machine has no handler for.
    #[error("unimplemented state: {0:?}")]
    UnimplementedState(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type Result<T> = std::result::Result<T, WorkshopError>;
