//! Progress API service trait and the HTTP adapter

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use videoflix_model::ProgressRecord;

use crate::infra::api_client::ApiClient;

/// Remote collaborator that stores watch progress.
#[async_trait]
pub trait ProgressApi: Send + Sync + Debug {
    /// Post a progress record with the caller's session token attached
    async fn post_progress(
        &self,
        record: &ProgressRecord,
        token: &str,
    ) -> Result<()>;
}

#[async_trait]
impl ProgressApi for ApiClient {
    async fn post_progress(
        &self,
        record: &ProgressRecord,
        token: &str,
    ) -> Result<()> {
        self.update_progress(record, token).await
    }
}
