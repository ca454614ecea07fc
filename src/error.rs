//! Error type shared by the scanner, resolver and matcher.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a staleness scan
#[derive(Debug, Error)]
pub enum CleanError {
    /// A stat, read or remove failed for a file
    #[error("{}: {}", .path.display(), describe_io(.source))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Listing the scanned directory failed
    #[error("{0}")]
    Walk(#[from] ignore::Error),

    /// The compiled-in patterns table is malformed
    #[error("invalid patterns table: {0}")]
    Patterns(#[from] toml::de::Error),
}

impl CleanError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        CleanError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// The system message of `err` without the trailing ` (os error N)`
fn describe_io(err: &io::Error) -> String {
    let message = err.to_string();
    match (err.raw_os_error(), message.rfind(" (os error ")) {
        (Some(_), Some(at)) if message.ends_with(')') => message[..at].to_string(),
        _ => message,
    }
}

/// Result type for staleness operations
pub type Result<T> = std::result::Result<T, CleanError>;
