//! Error handling for layercfg
//!
//! Every failure the store can produce maps onto one of a small set of kinds
//! so callers can branch on [`ErrorKind`] without matching each variant.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for layer store operations
pub type Result<T> = std::result::Result<T, LayerError>;

/// Coarse classification of a [`LayerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Filesystem,
    CorruptDocument,
    KeyNotFound,
    InvalidLayerPath,
    InvalidInput,
}

/// Main error type for layer store operations
#[derive(Error, Debug)]
pub enum LayerError {
    // Lookup Errors
    #[error("Config dir not found: {path}")]
    LayerNotFound { path: PathBuf },

    #[error("Config file not found: {path}")]
    DocumentNotFound { path: PathBuf },

    #[error("Key '{key}' not found in {path}")]
    KeyNotFound { key: String, path: PathBuf },

    #[error("Invalid layer path '{path}': {reason}")]
    InvalidLayerPath { path: PathBuf, reason: String },

    #[error("Invalid value for {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    // Filesystem Errors
    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory removal failed: {path}: {source}")]
    DirectoryRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Document Errors
    #[error("Corrupt document {path}: {reason}")]
    CorruptDocument { path: PathBuf, reason: String },

    #[error("Value for '{key}' in {path} has an unexpected shape: {source}")]
    ValueType {
        key: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LayerError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LayerError::LayerNotFound { .. } | LayerError::DocumentNotFound { .. } => {
                ErrorKind::NotFound
            }
            LayerError::KeyNotFound { .. } => ErrorKind::KeyNotFound,
            LayerError::InvalidLayerPath { .. } => ErrorKind::InvalidLayerPath,
            LayerError::InvalidArgument { .. } => ErrorKind::InvalidInput,
            LayerError::DirectoryCreate { .. }
            | LayerError::DirectoryRemove { .. }
            | LayerError::Read { .. }
            | LayerError::Write { .. } => ErrorKind::Filesystem,
            LayerError::CorruptDocument { .. }
            | LayerError::ValueType { .. }
            | LayerError::Serialization(_) => ErrorKind::CorruptDocument,
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            LayerError::LayerNotFound { .. } => "LAYER_NOT_FOUND",
            LayerError::DocumentNotFound { .. } => "DOCUMENT_NOT_FOUND",
            LayerError::KeyNotFound { .. } => "KEY_NOT_FOUND",
            LayerError::InvalidLayerPath { .. } => "INVALID_LAYER_PATH",
            LayerError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            LayerError::DirectoryCreate { .. } => "DIRECTORY_CREATE_FAILED",
            LayerError::DirectoryRemove { .. } => "DIRECTORY_REMOVE_FAILED",
            LayerError::Read { .. } => "READ_FAILED",
            LayerError::Write { .. } => "WRITE_FAILED",
            LayerError::CorruptDocument { .. } => "CORRUPT_DOCUMENT",
            LayerError::ValueType { .. } => "VALUE_TYPE_MISMATCH",
            LayerError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            LayerError::LayerNotFound { .. } => vec![
                "Initialize the layer first with 'layercfg init <layer>'",
                "Check that --root points at the right directory",
            ],
            LayerError::DocumentNotFound { .. } => vec![
                "The layer exists but has no config.json",
                "Re-run 'layercfg init <layer>' without --no-document",
            ],
            LayerError::KeyNotFound { .. } => vec![
                "Set the key with 'layercfg set <layer> <key> <value>'",
                "Pass --default to fall back to a value",
            ],
            LayerError::InvalidLayerPath { .. } => {
                vec!["Layer paths are relative and may not contain '..'"]
            }
            LayerError::InvalidArgument { .. } => {
                vec!["Pass the initial document as a JSON object, e.g. '{\"name\": \"x\"}'"]
            }
            LayerError::CorruptDocument { .. } => vec![
                "The config.json was edited outside layercfg and is no longer a JSON object",
                "Fix the file by hand or re-create the layer with 'layercfg init <layer> --reset'",
            ],
            LayerError::DirectoryCreate { .. } | LayerError::Write { .. } => vec![
                "Check permissions on the root directory",
                "A file may exist where a layer directory is expected",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = LayerError::DocumentNotFound {
            path: PathBuf::from("root/a"),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.error_code(), "DOCUMENT_NOT_FOUND");

        let err = LayerError::Write {
            path: PathBuf::from("root/a/config.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.kind(), ErrorKind::Filesystem);
    }

    #[test]
    fn test_invalid_argument_is_not_corruption() {
        let err = LayerError::InvalidArgument {
            name: "--document".to_string(),
            reason: "expected a JSON object".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
        assert!(err.to_string().contains("--document"));
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = LayerError::CorruptDocument {
            path: PathBuf::from("root/config.json"),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::CorruptDocument);
        assert!(!err.recovery_suggestions().is_empty());
    }

    #[test]
    fn test_display_names_path() {
        let err = LayerError::LayerNotFound {
            path: PathBuf::from("LWConfig/project"),
        };
        assert!(err.to_string().contains("LWConfig/project"));
    }
}
