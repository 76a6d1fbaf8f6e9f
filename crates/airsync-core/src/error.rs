use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirsyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, AirsyncError>;
