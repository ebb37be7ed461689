use thiserror::Error;

/// Failure of a document operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),

    #[error("element is detached from the document")]
    Detached,

    #[error("document has no body")]
    NoBody,

    #[error("host DOM call failed: {0}")]
    Host(String),
}

/// Failure of a clipboard write. Always recoverable by the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard is unavailable")]
    Unavailable,

    /// The platform refused the write (permissions, size, unsupported types).
    #[error("clipboard write rejected: {0}")]
    Rejected(String),

    #[error("clipboard backend error: {0}")]
    Backend(String),
}

/// Failure to fetch a linked file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("invalid url `{0}`")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to read body: {0}")]
    Body(String),
}
