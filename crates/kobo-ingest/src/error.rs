//! Error types for form loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering or loading forms.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A form directory lacks one of its sheet files.
    #[error("form {dir} has no {sheet} sheet")]
    MissingSheet { dir: PathBuf, sheet: String },

    // === CSV Errors ===
    /// Failed to read or parse a sheet.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The sheet has no header row.
    #[error("sheet is empty: {path}")]
    EmptySheet { path: PathBuf },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
