use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    /// A store file exists but cannot be decoded.
    #[error("store file is corrupt: {0}")]
    Corrupt(String),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn storage_errors_keep_the_io_detail() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "backups dir denied");
        let err = CoreError::from(io);
        assert!(matches!(err, CoreError::Storage(_)));
        assert!(err.to_string().contains("backups dir denied"));
    }
}
