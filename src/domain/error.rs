use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Invalid or empty URL")]
    InvalidInput,

    #[error("I/O error: {0}")]
    Io(String),
}
