//! Progress domain
//!
//! Persists the last viewed position of the active asset to the backend.

pub mod checkpoint;

pub use checkpoint::{
    CheckpointOutcome, CheckpointService, CheckpointTrigger, SkipReason,
};
