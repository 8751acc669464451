//! Error types for the registry CLI.

use std::path::Path;

use thiserror::Error;

use crate::domain::ports::BookLookupError;
use crate::domain::{GiftValidationError, IsbnValidationError, SnapshotError};

/// Errors surfaced by the CLI load, transition, and render flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// The state file could not be read.
    #[error("failed to read state file {path}: {message}")]
    ReadState {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
    /// The state file is not a valid registry snapshot.
    #[error("invalid state file {path}: {message}")]
    DecodeState {
        /// Path that was being decoded.
        path: String,
        /// Decoder error message.
        message: String,
    },
    /// The produced snapshot could not be encoded.
    #[error("failed to encode snapshot: {message}")]
    EncodeState {
        /// Encoder error message.
        message: String,
    },
    /// A gift identifier argument was rejected.
    #[error("invalid gift id: {source}")]
    InvalidGiftId {
        /// Underlying validation error.
        #[from]
        source: GiftValidationError,
    },
    /// An ISBN argument was rejected.
    #[error("invalid isbn: {source}")]
    InvalidIsbn {
        /// Underlying validation error.
        #[from]
        source: IsbnValidationError,
    },
    /// The transition refused the input snapshot.
    #[error("transition failed: {source}")]
    Transition {
        /// Underlying snapshot error.
        #[from]
        source: SnapshotError,
    },
    /// A book lookup failed.
    #[error("book lookup failed: {source}")]
    Lookup {
        /// Underlying lookup error.
        #[from]
        source: BookLookupError,
    },
}

impl CliError {
    pub(super) fn read_state(path: &Path, error: &std::io::Error) -> Self {
        Self::ReadState {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    pub(super) fn decode_state(path: &Path, error: &serde_json::Error) -> Self {
        Self::DecodeState {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }
}
