use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapSheetError {
    #[error("Invalid page dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, SnapSheetError>;
