//! Playback domains
//!
//! - `player`: rendition selection, stream binding, the quality-switch state
//!   machine and the session controller that drives them
//! - `progress`: watch progress checkpoints

pub mod player;
pub mod progress;
