use crate::domain::error::DomainError;
use crate::domain::repository::{StoreError, StoreErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage error: {0}")]
    Io(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("catalog data is corrupt: {0}")]
    CorruptData(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    /// Repositoryのエラーを種別に応じて振り分ける。
    pub fn from_store<E: StoreError>(e: E) -> Self {
        match e.kind() {
            StoreErrorKind::Io => Self::Io(Box::new(e)),
            StoreErrorKind::CorruptData => Self::CorruptData(Box::new(e)),
        }
    }
}
