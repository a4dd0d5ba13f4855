use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlashError {
    #[error("command not found in metadata: {0}")]
    CommandNotFound(String),

    #[error("command file not found: {0}")]
    CommandFileNotFound(String),

    #[error("invalid command name '{0}': must use lowercase-hyphen format")]
    InvalidCommandName(String),

    #[error("invalid version format: {0}")]
    InvalidVersion(String),

    #[error("version {0} cannot be bumped further")]
    VersionOverflow(String),

    #[error("invalid change type '{0}': expected major, minor, or patch")]
    InvalidChangeType(String),

    #[error("at least one change description is required")]
    NoChanges,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlashError>;
