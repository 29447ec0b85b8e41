//! Checkpoint error types.

use std::fmt;
use thiserror::Error;

/// Wire format of a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointFormat {
    Json,
    Binary,
}

impl fmt::Display for CheckpointFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Binary => f.write_str("binary"),
        }
    }
}

/// Failure while saving or loading a store checkpoint.
///
/// The store itself is never affected; these only concern the snapshot.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The state or history could not be written in the given format
    #[error("Could not encode {format} checkpoint: {reason}")]
    Encode {
        format: CheckpointFormat,
        reason: String,
    },

    /// The input is not a checkpoint of the expected state type
    #[error("Could not decode {format} checkpoint: {reason}")]
    Decode {
        format: CheckpointFormat,
        reason: String,
    },

    /// Written by an incompatible version of the checkpoint layout
    #[error("Checkpoint layout version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The embedded dispatch history is inconsistent
    #[error("Checkpoint history is invalid: {reason}")]
    InvalidHistory { reason: String },
}

impl CheckpointError {
    pub(crate) fn encode(format: CheckpointFormat, reason: impl fmt::Display) -> Self {
        Self::Encode {
            format,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn decode(format: CheckpointFormat, reason: impl fmt::Display) -> Self {
        Self::Decode {
            format,
            reason: reason.to_string(),
        }
    }
}
