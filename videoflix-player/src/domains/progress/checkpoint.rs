//! Progress checkpoints
//!
//! Each trigger independently posts the current position. Writes are
//! fire-and-forget: they run on the runtime after the caller returns, are
//! never retried, and outlive the session that started them.

use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use videoflix_model::ProgressRecord;

use crate::domains::player::errors::PlayerError;
use crate::infra::services::{ProgressApi, TokenProvider};

/// Lifecycle point a checkpoint was taken at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointTrigger {
    /// The user closed the player
    Closed,
    /// The hosting view was torn down
    Teardown,
    /// The hosting environment is unloading
    Unload,
}

impl fmt::Display for CheckpointTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckpointTrigger::Closed => "close",
            CheckpointTrigger::Teardown => "teardown",
            CheckpointTrigger::Unload => "unload",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoToken,
    NoActiveMedia,
    UnloadHookDisabled,
}

#[derive(Debug)]
pub enum CheckpointOutcome {
    /// The write is in flight; awaiting the handle is optional
    Dispatched(JoinHandle<Result<(), PlayerError>>),
    Skipped(SkipReason),
}

impl CheckpointOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, CheckpointOutcome::Dispatched(_))
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            CheckpointOutcome::Skipped(reason) => Some(*reason),
            CheckpointOutcome::Dispatched(_) => None,
        }
    }

    /// Wait for the write to settle.
    ///
    /// A missing token reports `CheckpointSkipped`; the other skip reasons
    /// are not errors.
    pub async fn wait(self) -> Result<(), PlayerError> {
        match self {
            CheckpointOutcome::Dispatched(handle) => match handle.await {
                Ok(result) => result,
                Err(e) => Err(PlayerError::CheckpointFailed(e.into())),
            },
            CheckpointOutcome::Skipped(SkipReason::NoToken) => {
                Err(PlayerError::CheckpointSkipped)
            }
            CheckpointOutcome::Skipped(_) => Ok(()),
        }
    }
}

#[derive(Clone)]
pub struct CheckpointService {
    api: Arc<dyn ProgressApi>,
    tokens: Arc<dyn TokenProvider>,
    runtime: Handle,
}

impl fmt::Debug for CheckpointService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckpointService")
            .field("api", &self.api)
            .field("tokens", &"<redacted>")
            .finish()
    }
}

impl CheckpointService {
    pub fn new(
        api: Arc<dyn ProgressApi>,
        tokens: Arc<dyn TokenProvider>,
        runtime: Handle,
    ) -> Self {
        Self {
            api,
            tokens,
            runtime,
        }
    }

    /// Post `record` in the background.
    ///
    /// The token is read now, so a logout between triggers is respected.
    /// Without a token nothing touches the network.
    pub fn checkpoint(
        &self,
        trigger: CheckpointTrigger,
        record: ProgressRecord,
    ) -> CheckpointOutcome {
        let Some(token) = self.tokens.token() else {
            debug!(
                "[Checkpoint] No session token, skipping {} checkpoint",
                trigger
            );
            return CheckpointOutcome::Skipped(SkipReason::NoToken);
        };

        info!(
            "[Checkpoint] {} checkpoint for video {} at {:.3}s (viewed: {})",
            trigger, record.video, record.last_viewed_position, record.viewed
        );

        let api = Arc::clone(&self.api);
        let handle = self.runtime.spawn(async move {
            match api.post_progress(&record, &token).await {
                Ok(()) => {
                    debug!(
                        "[Checkpoint] Stored progress for video {}",
                        record.video
                    );
                    Ok(())
                }
                Err(e) => {
                    warn!(
                        "[Checkpoint] Failed to store progress for video {}: {:#}",
                        record.video, e
                    );
                    Err(PlayerError::CheckpointFailed(e))
                }
            }
        });
        CheckpointOutcome::Dispatched(handle)
    }
}
