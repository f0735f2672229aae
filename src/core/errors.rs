use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanjiFillError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Record not found: {0}")]
    RecordNotFound(u64),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("KanjiFillError: {0}")]
    Custom(String),
}
