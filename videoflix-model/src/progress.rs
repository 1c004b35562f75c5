//! Watch progress checkpoints.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::AssetId;

/// Progress snapshot posted to the backend.
///
/// Field names match the `progress/` endpoint body:
/// `{video, last_viewed_position, viewed}`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressRecord {
    pub video: AssetId,
    pub last_viewed_position: f64,
    pub viewed: bool,
}

impl ProgressRecord {
    /// Build a record from the surface position and duration.
    ///
    /// `viewed` is true iff the position reached the duration. An unknown
    /// (NaN) duration never counts as viewed. Invalid positions are
    /// recorded as zero.
    pub fn new(video: AssetId, position: f64, duration: f64) -> Self {
        let last_viewed_position = if position.is_finite() && position > 0.0 {
            position
        } else {
            0.0
        };
        Self {
            video,
            last_viewed_position,
            viewed: last_viewed_position >= duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewed_is_inclusive_at_duration() {
        assert!(ProgressRecord::new(AssetId(1), 120.0, 120.0).viewed);
        assert!(ProgressRecord::new(AssetId(1), 121.0, 120.0).viewed);
        assert!(!ProgressRecord::new(AssetId(1), 119.9, 120.0).viewed);
    }

    #[test]
    fn unknown_duration_is_never_viewed() {
        let record = ProgressRecord::new(AssetId(1), 30.0, f64::NAN);
        assert!(!record.viewed);
        assert_eq!(record.last_viewed_position, 30.0);
    }

    #[test]
    fn invalid_position_is_clamped_to_zero() {
        let record = ProgressRecord::new(AssetId(4), f64::NAN, 60.0);
        assert_eq!(record.last_viewed_position, 0.0);
        assert!(!record.viewed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_to_endpoint_body() {
        let record = ProgressRecord::new(AssetId(9), 61.5, 600.0);
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "video": 9,
                "last_viewed_position": 61.5,
                "viewed": false
            })
        );
    }
}
