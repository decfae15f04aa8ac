// Error types shared by every procfs reader
//
// Per-process reads distinguish "the process is gone" and "the process
// belongs to someone else" from hard I/O failures, so callers can tolerate
// the first two exactly where it makes sense.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while reading and parsing procfs
#[derive(Error, Debug)]
pub enum Error {
    /// The process directory vanished between enumeration and the read
    #[error("{} not found (process exited?)", path.display())]
    NotFound { path: PathBuf },

    /// The entry belongs to another principal
    #[error("permission denied reading {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// A field or row could not be parsed
    #[error("malformed {what}: {reason}")]
    MalformedData { what: String, reason: String },

    /// Any other I/O failure
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn malformed(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedData {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error without classifying it.
    ///
    /// Used for the mount root and the protocol tables, where a missing or
    /// unreadable file is always fatal.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap an I/O error from a per-process read, classifying vanished and
    /// foreign-owned processes.
    pub fn from_process_io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Error::NotFound { path },
            io::ErrorKind::PermissionDenied => Error::PermissionDenied { path },
            _ => Error::Io { path, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Error::PermissionDenied { .. })
    }
}
