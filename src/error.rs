//! Error types for awsm-md
//!
//! The Markdown dialect itself never fails; these errors cover the fallible
//! edges around it (reading and writing documents, configuration, export).
//! Error types are organized by category for clear error handling and user-friendly messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type encompassing all error categories
#[derive(Error, Debug)]
pub enum AppError {
    /// File I/O related errors
    #[error(transparent)]
    FileIO(#[from] FileError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Export errors
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Generic unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// File I/O related errors
#[derive(Error, Debug)]
pub enum FileError {
    /// File not found at specified path
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when accessing file
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// File is too large to open
    #[error("File too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Path is not a file
    #[error("Path is not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Error reading file
    #[error("Could not read file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing file
    #[error("Could not save file: {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error renaming temp file to target
    #[error("Could not complete file save (rename failed): {path}")]
    RenameError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {0}")]
    LoadError(String),

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Errors that can occur during export
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing the exported document failed
    #[error(transparent)]
    File(#[from] FileError),

    #[error("Invalid export path: {0}")]
    InvalidPath(PathBuf),

    #[error("Export format not supported: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

impl FileError {
    /// Classify an I/O error raised while reading `path`
    pub fn from_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => FileError::NotFound(path),
            std::io::ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            _ => FileError::ReadError { path, source },
        }
    }

    /// Create a user-friendly error message suitable for the terminal
    pub fn user_message(&self) -> String {
        match self {
            FileError::NotFound(_) => {
                "The file could not be found. It may have been moved or deleted.".to_string()
            }
            FileError::PermissionDenied { .. } => {
                "You don't have permission to access this file. Check file permissions.".to_string()
            }
            FileError::FileTooLarge { max_size, .. } => {
                format!(
                    "This file is too large to convert. Maximum file size is {} bytes.",
                    max_size
                )
            }
            FileError::WriteError { .. } | FileError::RenameError { .. } => {
                "Could not save the file. Check disk space and permissions.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl ConfigError {
    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::ParseError(_) => {
                format!("{}. Fix or remove the configuration file to use defaults.", self)
            }
            ConfigError::DirectoryError => {
                "Could not determine the configuration directory. Pass --config explicitly."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl ExportError {
    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ExportError::File(err) => err.user_message(),
            ExportError::UnsupportedFormat(format) => {
                format!("Cannot export to '{}'. Supported formats are md and html.", format)
            }
            _ => self.to_string(),
        }
    }
}

impl AppError {
    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AppError::FileIO(err) => err.user_message(),
            AppError::Config(err) => err.user_message(),
            AppError::Export(err) => err.user_message(),
            AppError::Unexpected(_) => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_display() {
        let err = FileError::NotFound(PathBuf::from("/test/file.md"));
        assert!(err.to_string().contains("/test/file.md"));
    }

    #[test]
    fn test_file_error_user_message() {
        let err = FileError::PermissionDenied {
            path: PathBuf::from("/test/file.md"),
        };
        let msg = err.user_message();
        assert!(msg.contains("permission"));
    }

    #[test]
    fn test_from_read_classifies_kind() {
        let err = FileError::from_read(
            "/missing.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, FileError::NotFound(_)));

        let err = FileError::from_read(
            "/other.md",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        assert!(matches!(err, FileError::ReadError { .. }));
    }

    #[test]
    fn test_app_error_from_file_error() {
        let file_err = FileError::NotFound(PathBuf::from("/test.md"));
        let app_err: AppError = file_err.into();
        assert!(matches!(app_err, AppError::FileIO(_)));
    }

    #[test]
    fn test_export_error_user_message() {
        let err: AppError = ExportError::UnsupportedFormat("pdf".to_string()).into();
        assert!(matches!(err, AppError::Export(_)));
        assert!(err.user_message().contains("'pdf'"));
    }
}
