use dicom_core::Tag;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for dcmtags operations
pub type Result<T> = std::result::Result<T, DcmTagsError>;

/// Error types for dcmtags operations
#[derive(Error, Debug)]
pub enum DcmTagsError {
    /// Malformed invocation, rejected before any I/O
    #[error("Usage error: {0}")]
    Usage(String),

    /// Tag name not present in the dictionary
    #[error("Unknown tag name: {0}")]
    UnknownTag(String),

    /// Required input path is missing
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File is not a valid DICOM dataset
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Replacement value cannot be encoded for the target tag
    #[error("Invalid value for tag {tag}: {message}")]
    InvalidValue { tag: Tag, message: String },

    /// A shared-scope identifier is already populated
    #[error("{} already has {name} {tag} set to '{value}'", path.display())]
    PreconditionViolation {
        path: PathBuf,
        name: &'static str,
        tag: Tag,
        value: String,
    },

    /// I/O failure while saving
    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DcmTagsError {
    /// Builds a parse error for the given file
    pub fn parse(path: &Path, err: impl std::fmt::Display) -> Self {
        DcmTagsError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Builds a write error for the given file
    pub fn write(path: &Path, err: impl std::fmt::Display) -> Self {
        DcmTagsError::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Process exit status for a fatal error
    pub fn exit_code(&self) -> i32 {
        1
    }
}
