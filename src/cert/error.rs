use std::path::PathBuf;
use thiserror::Error;

/// Certificate formatter errors
#[derive(Error, Debug)]
pub enum CertError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid hex token: {0:?}")]
    InvalidToken(String),

    #[error("Invalid C identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Tokens per line must be at least 1")]
    InvalidWrap,
}
