use crate::storage::StoreError;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures surfaced by domain services.
///
/// Text-generation failures never appear here; the reply generator absorbs
/// them with its fallback templates.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("{0}")]
    Validation(String),
    #[error("Record store failure: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    /// Store failures are transient from the caller's point of view
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Store(_))
    }
}
