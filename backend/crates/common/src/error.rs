use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FamtreeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl FamtreeError {
    /// True for failures of the store itself, as opposed to bad input or
    /// missing records.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }
}

pub type FamtreeResult<T> = Result<T, FamtreeError>;
