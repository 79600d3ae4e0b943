//! Error types for mesh I/O operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur during mesh I/O operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Unknown file format (unrecognized extension).
    #[error("unknown file format: {path}")]
    UnknownFormat {
        /// The path with the unrecognized extension.
        path: PathBuf,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// File ended before the declared content was read.
    #[error("unexpected end of file: needed {needed} more bytes for {context}")]
    UnexpectedEof {
        /// Bytes still required.
        needed: usize,
        /// What was being read.
        context: &'static str,
    },

    /// Unrecognized magic number in a FreeSurfer surface file.
    #[error("unsupported surface file: magic {magic:02x?} is not a triangle surface")]
    UnsupportedSurface {
        /// The three magic bytes found.
        magic: [u8; 3],
    },

    /// A face referenced a vertex index outside the vertex array.
    #[error("face index {index} out of range for {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of vertices available.
        vertex_count: usize,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error (ASCII STL).
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }
}
