use anyhow::{Result, bail};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use videoflix_model::ProgressRecord;

use crate::infra::services::ProgressApi;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub record: ProgressRecord,
    pub token: String,
}

/// Progress API double.
///
/// `attempt_count` counts posts that reached the API, `calls` holds the
/// ones that completed. A gated API holds every post until
/// [`RecordingProgressApi::release`] lets it through.
#[derive(Debug, Clone, Default)]
pub struct RecordingProgressApi {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    attempts: Arc<AtomicUsize>,
    fail: bool,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingProgressApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    /// Let `count` held posts complete
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProgressApi for RecordingProgressApi {
    async fn post_progress(
        &self,
        record: &ProgressRecord,
        token: &str,
    ) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }
        self.calls.lock().push(RecordedCall {
            record: *record,
            token: token.to_string(),
        });
        if self.fail {
            bail!("progress endpoint unavailable");
        }
        Ok(())
    }
}
