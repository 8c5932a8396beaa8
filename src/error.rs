use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Missing mandatory field: {0}")]
    MissingField(&'static str),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
