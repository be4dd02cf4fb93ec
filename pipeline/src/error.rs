use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SplitError>;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' is not valid UTF-8", path.display())]
    InvalidUtf8 { path: PathBuf },

    #[error("cannot load config '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SplitError {
    /// Adapter for `map_err` that tags an I/O error with the path involved.
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> SplitError + '_ {
        move |source| SplitError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
