/// Errors that can occur during asset storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested asset was not found.
    #[error("asset not found: {0}")]
    NotFound(String),
    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The asset path is malformed or unsafe.
    #[error("invalid asset path: {0}")]
    InvalidPath(String),
    /// The asset exceeds the configured size limit.
    #[error("asset exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
