use std::fmt::{self, Display};

use crate::ids::AssetId;

/// Errors produced by model constructors and parsing routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownQuality(String),
    NoSources(AssetId),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownQuality(label) => {
                write!(f, "unknown quality label: {label}")
            }
            ModelError::NoSources(id) => {
                write!(f, "asset {id} has no playable sources")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
