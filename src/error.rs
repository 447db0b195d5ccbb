use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid section id: {0}")]
    Format(String),
    #[error("Failed to read register: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to create PDF: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
