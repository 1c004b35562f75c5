//! Player error types
//!
//! None of these abort a session. Callers log them and degrade: an
//! unsupported stream puts the session in its failed state, everything else
//! leaves playback where it was.

use thiserror::Error;

use crate::infra::media::SurfaceError;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// A manifest URL was handed to a platform without segmented streaming
    #[error("Segmented streaming is not supported for {url}")]
    StreamUnsupported { url: String },

    /// The platform refused to (re)start playback, e.g. autoplay policy
    #[error("Playback could not be resumed")]
    ResumeFailed(#[source] SurfaceError),

    /// No session token; checkpoints are silently dropped
    #[error("Checkpoint skipped: no session token")]
    CheckpointSkipped,

    /// The progress write reached the network and failed
    #[error("Checkpoint failed")]
    CheckpointFailed(#[source] anyhow::Error),

    /// The backstop seek after a quality switch did not stick
    #[error(
        "Seek to {target:.3}s did not take effect, surface reports {reached:.3}s"
    )]
    SeekRaceUnresolved { target: f64, reached: f64 },

    /// An action needed a selected asset or a bound source
    #[error("No active media")]
    NoActiveMedia,
}

impl PlayerError {
    /// Whether the user should see this error. Everything else is logged only.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, PlayerError::StreamUnsupported { .. })
    }
}
