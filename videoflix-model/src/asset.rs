//! Media assets as handed over by the upstream selection collaborator.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::AssetId;
use crate::quality::{QualityLabel, QualityOption};

/// A playable asset: its identity, one source URL per available quality
/// tier, and an optional resume hint in seconds.
///
/// Options are kept in [`QualityLabel::ALL`] order and never change after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
    id: AssetId,
    options: Vec<QualityOption>,
    resume_hint: Option<f64>,
}

impl MediaAsset {
    /// Build an asset from (label, url) pairs.
    ///
    /// Empty URLs are skipped and the first URL wins for a duplicated label.
    /// An asset without any usable source is rejected.
    pub fn new<I, S>(id: AssetId, sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (QualityLabel, S)>,
        S: Into<String>,
    {
        let mut options: Vec<QualityOption> = Vec::new();
        for (label, url) in sources {
            let url = url.into();
            if url.trim().is_empty()
                || options.iter().any(|option| option.label == label)
            {
                continue;
            }
            options.push(QualityOption::new(label, url));
        }

        if options.is_empty() {
            return Err(ModelError::NoSources(id));
        }

        options.sort_by_key(|option| option.label);

        Ok(Self {
            id,
            options,
            resume_hint: None,
        })
    }

    /// Attach a resume hint. Zero, negative and non-finite positions mean
    /// "nothing to resume" and are dropped.
    pub fn with_resume_hint(mut self, seconds: f64) -> Self {
        self.resume_hint =
            (seconds.is_finite() && seconds > 0.0).then_some(seconds);
        self
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn quality_options(&self) -> &[QualityOption] {
        &self.options
    }

    pub fn option(&self, label: QualityLabel) -> Option<&QualityOption> {
        self.options.iter().find(|option| option.label == label)
    }

    pub fn has_label(&self, label: QualityLabel) -> bool {
        self.option(label).is_some()
    }

    pub fn resume_hint(&self) -> Option<f64> {
        self.resume_hint
    }
}

/// Wire representation of a video as served by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VideoRecord {
    pub id: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub video_1080p: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub video_720p: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub video_360p: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub video_120p: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "startTime", default, skip_serializing_if = "Option::is_none")
    )]
    pub start_time: Option<f64>,
}

impl TryFrom<VideoRecord> for MediaAsset {
    type Error = ModelError;

    fn try_from(record: VideoRecord) -> Result<Self> {
        let sources = [
            (QualityLabel::P1080, record.video_1080p),
            (QualityLabel::P720, record.video_720p),
            (QualityLabel::P360, record.video_360p),
            (QualityLabel::P120, record.video_120p),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.map(|url| (label, url)));

        let asset = MediaAsset::new(AssetId(record.id), sources)?;
        Ok(match record.start_time {
            Some(start) => asset.with_resume_hint(start),
            None => asset,
        })
    }
}
