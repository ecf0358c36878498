use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid country code: {0:?}")]
    InvalidCountryCode(String),
    #[error("invalid comparison options: {message}")]
    InvalidOptions { message: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
