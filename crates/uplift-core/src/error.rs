use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpliftError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, UpliftError>;
