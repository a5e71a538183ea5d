use thiserror::Error;

#[derive(Debug, Error)]
pub enum HfError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Backend error: {0}")]
    BackendError(String),
    #[error("Image error: {0}")]
    ImageError(String),
    #[error("I/O error: {0}")]
    IoError(String),
}

pub type Result<T> = std::result::Result<T, HfError>;
