//! Error types for the vulnmerge library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vulnmerge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting, parsing or writing reports.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An archive entry would be written outside the destination root.
    #[error("Illegal path in archive: {entry} escapes {}", dest.display())]
    PathViolation {
        /// Entry name as stored in the archive
        entry: String,
        /// Destination root the entry was resolved against
        dest: PathBuf,
    },

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Extraction of one archive in a batch failed.
    #[error("Failed to extract {}: {source}", archive.display())]
    Archive {
        /// Archive that failed
        archive: PathBuf,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// The markup could not be decoded into the workbook structure.
    #[error("Format error: {0}")]
    Format(String),

    /// The final report could not be persisted.
    #[error("Output error: {0}")]
    Output(String),
}

impl Error {
    /// Whether this error (or the archive failure it wraps) is a path violation.
    pub fn is_path_violation(&self) -> bool {
        match self {
            Error::PathViolation { .. } => true,
            Error::Archive { source, .. } => source.is_path_violation(),
            _ => false,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::ZipArchive(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Format(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Output(err.to_string())
    }
}

#[cfg(feature = "xlsx")]
impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Output(err.to_string())
    }
}
