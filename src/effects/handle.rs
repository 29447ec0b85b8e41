//! Handle to an effect running on the tokio runtime.

use crate::effects::effect::{EffectError, EffectResult};
use std::fmt;
use tokio::task::JoinHandle;

/// Pending result of a dispatched effect.
///
/// Dropping the handle does not stop the effect.
pub struct EffectHandle {
    label: String,
    task: JoinHandle<EffectResult>,
}

impl EffectHandle {
    pub(crate) fn new(label: String, task: JoinHandle<EffectResult>) -> Self {
        Self { label, task }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the effect to finish and report how it ended.
    ///
    /// The failure has already been logged and, where configured,
    /// turned into a command by the time this returns.
    pub async fn wait(self) -> EffectResult {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => Err(EffectError::Panicked { label: self.label }),
            Err(_) => Err(EffectError::Cancelled { label: self.label }),
        }
    }
}

impl fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectHandle")
            .field("label", &self.label)
            .field("finished", &self.task.is_finished())
            .finish()
    }
}
