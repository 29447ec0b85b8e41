//! Checkpoints: serializable snapshots of a store's state.
//!
//! A checkpoint captures the current state and, when enabled, the dispatch
//! history, so an application can persist them wherever it likes and later
//! rebuild the store with [`StoreBuilder::restore`](crate::builder::StoreBuilder::restore).
//! Reducers, middleware and subscribers are not part of a checkpoint.

use crate::core::{Command, DispatchHistory};
use crate::store::Store;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::{CheckpointError, CheckpointFormat};

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint<S> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// State of the store at that time
    pub state: S,

    /// Dispatch history, if the store kept one
    pub history: Option<DispatchHistory>,
}

impl<S> Checkpoint<S> {
    pub fn new(state: S, history: Option<DispatchHistory>) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            state,
            history,
        }
    }

    /// Reject foreign versions and broken histories; trim an oversized
    /// history to its own limit.
    fn check(mut self) -> Result<Self, CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        if let Some(history) = self.history.take() {
            history
                .check()
                .map_err(|reason| CheckpointError::InvalidHistory { reason })?;
            let limit = history.limit();
            self.history = Some(history.rebound(limit));
        }
        Ok(self)
    }
}

impl<S: Serialize> Checkpoint<S> {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::encode(CheckpointFormat::Json, e))
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::encode(CheckpointFormat::Binary, e))
    }
}

impl<S: DeserializeOwned> Checkpoint<S> {
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::decode(CheckpointFormat::Json, e))?;
        checkpoint.check()
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::decode(CheckpointFormat::Binary, e))?;
        checkpoint.check()
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Command,
{
    /// Capture the current state and history.
    pub fn checkpoint(&self) -> Checkpoint<S> {
        Checkpoint::new((*self.get_state()).clone(), self.history())
    }
}
