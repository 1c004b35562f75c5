//! Core data model definitions shared across Videoflix crates.
#![allow(missing_docs)]

pub mod asset;
pub mod error;
pub mod ids;
pub mod progress;
pub mod quality;

pub use asset::{MediaAsset, VideoRecord};
pub use error::{ModelError, Result as ModelResult};
pub use ids::AssetId;
pub use progress::ProgressRecord;
pub use quality::{QualityLabel, QualityOption, QualitySelection};
