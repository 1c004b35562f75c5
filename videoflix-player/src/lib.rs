//! Videoflix Player library
//!
//! Client-side playback engine: picks a rendition for the viewport, binds it
//! to a playback surface (natively or through a segmented-streaming engine),
//! keeps the playback position across quality switches, and checkpoints
//! watch progress to the backend.
//!
//! Notes
//! - The surface, the streaming engine and the session store are
//!   collaborators behind traits in [`infra::media`] and [`infra::services`].
//! - Everything that mutates the surface runs through
//!   [`domains::player::controller::SessionController`].
#![allow(missing_docs)]

pub mod domains;
pub mod infra;

pub use domains::player::controller::{
    SessionController, SessionControllerBuilder,
};
pub use domains::player::errors::PlayerError;
pub use domains::player::messages::{
    PlayerEvent, PlayerEventSender, SurfaceEvent,
};
pub use domains::player::state::PlaybackState;
pub use domains::progress::checkpoint::{
    CheckpointOutcome, CheckpointService, CheckpointTrigger, SkipReason,
};
pub use infra::config::PlayerConfig;
