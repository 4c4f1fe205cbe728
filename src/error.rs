use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovpageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read source file {}: {source}", path.display())]
    Source {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CovpageError>;
