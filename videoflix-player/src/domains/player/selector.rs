//! Resolution selection
//!
//! Maps a viewport width and the user's quality selection to exactly one of
//! the asset's options. Pure: the same inputs always give the same option.

use serde::{Deserialize, Serialize};
use videoflix_model::{MediaAsset, QualityLabel, QualityOption, QualitySelection};

use crate::infra::constants::viewport;

/// Inclusive upper width bounds for automatic tier selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportThresholds {
    pub small_max: u32,
    pub medium_max: u32,
    pub large_max: u32,
}

impl Default for ViewportThresholds {
    fn default() -> Self {
        Self {
            small_max: viewport::SMALL_MAX_WIDTH,
            medium_max: viewport::MEDIUM_MAX_WIDTH,
            large_max: viewport::LARGE_MAX_WIDTH,
        }
    }
}

impl ViewportThresholds {
    pub fn is_ordered(&self) -> bool {
        self.small_max < self.medium_max && self.medium_max < self.large_max
    }
}

/// Tier the automatic policy wants for `width`, first match wins.
pub fn resolve_auto_label(
    width: u32,
    thresholds: &ViewportThresholds,
) -> QualityLabel {
    if width <= thresholds.small_max {
        QualityLabel::P120
    } else if width <= thresholds.medium_max {
        QualityLabel::P360
    } else if width <= thresholds.large_max {
        QualityLabel::P720
    } else {
        QualityLabel::P1080
    }
}

/// Pick the option to play.
///
/// When the wanted tier is missing from the asset this falls back to 720p,
/// then to the first available option, so a sparse asset still plays.
pub fn select_quality<'a>(
    asset: &'a MediaAsset,
    width: u32,
    selection: QualitySelection,
    thresholds: &ViewportThresholds,
) -> &'a QualityOption {
    let wanted = match selection {
        QualitySelection::Auto => resolve_auto_label(width, thresholds),
        QualitySelection::Fixed(label) => label,
    };

    asset
        .option(wanted)
        .or_else(|| asset.option(QualityLabel::P720))
        // MediaAsset never holds an empty option list
        .unwrap_or_else(|| &asset.quality_options()[0])
}
