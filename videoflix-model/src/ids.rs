#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a video asset as assigned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn new(id: u64) -> Self {
        AssetId(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for AssetId {
    fn from(id: u64) -> Self {
        AssetId(id)
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
