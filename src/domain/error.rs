#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("catalog is empty: nothing to report")]
    EmptyCatalog,

    #[error("book not found: {0}")]
    BookNotFound(String),
}
