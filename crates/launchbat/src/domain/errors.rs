//! Domain-specific errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort catalog scanning at startup.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("unable to locate the desktop directory")]
    DesktopUnavailable,
    #[error("failed to list desktop directory {}", path.display())]
    DesktopUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open uninstall registry branch {path}")]
    RegistryUnreadable {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Failures while producing a batch script.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no software selected")]
    NothingSelected,
    #[error("failed to write batch file {}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
