//! Quality tiers and the user's quality selection.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One discrete rendition of an asset.
///
/// Declaration order is the display order (highest first), which is also
/// the order the quality menu lists options in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QualityLabel {
    #[cfg_attr(feature = "serde", serde(rename = "1080p"))]
    P1080,
    #[cfg_attr(feature = "serde", serde(rename = "720p"))]
    P720,
    #[cfg_attr(feature = "serde", serde(rename = "360p"))]
    P360,
    #[cfg_attr(feature = "serde", serde(rename = "120p"))]
    P120,
}

impl QualityLabel {
    pub const ALL: [Self; 4] = [Self::P1080, Self::P720, Self::P360, Self::P120];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P1080 => "1080p",
            Self::P720 => "720p",
            Self::P360 => "360p",
            Self::P120 => "120p",
        }
    }

    /// Vertical resolution in pixels
    pub fn height(&self) -> u32 {
        match self {
            Self::P1080 => 1080,
            Self::P720 => 720,
            Self::P360 => 360,
            Self::P120 => 120,
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityLabel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownQuality(s.to_string()))
    }
}

/// What the user asked for: automatic tier selection or a fixed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QualitySelection {
    #[default]
    Auto,
    Fixed(QualityLabel),
}

impl QualitySelection {
    pub const AUTO_LABEL: &'static str = "Auto";

    pub fn is_auto(&self) -> bool {
        matches!(self, QualitySelection::Auto)
    }

    pub fn label(&self) -> Option<QualityLabel> {
        match self {
            QualitySelection::Auto => None,
            QualitySelection::Fixed(label) => Some(*label),
        }
    }
}

impl From<QualityLabel> for QualitySelection {
    fn from(label: QualityLabel) -> Self {
        QualitySelection::Fixed(label)
    }
}

impl fmt::Display for QualitySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualitySelection::Auto => f.write_str(Self::AUTO_LABEL),
            QualitySelection::Fixed(label) => label.fmt(f),
        }
    }
}

impl FromStr for QualitySelection {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(Self::AUTO_LABEL) {
            Ok(QualitySelection::Auto)
        } else {
            s.parse().map(QualitySelection::Fixed)
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for QualitySelection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for QualitySelection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A (label, source URL) pair derived from a [`crate::MediaAsset`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QualityOption {
    pub label: QualityLabel,
    #[cfg_attr(feature = "serde", serde(rename = "src"))]
    pub source_url: String,
}

impl QualityOption {
    pub fn new(label: QualityLabel, source_url: impl Into<String>) -> Self {
        Self {
            label,
            source_url: source_url.into(),
        }
    }
}
