//! Player domain
//!
//! Contains rendition selection, stream loading, the playback state machine
//! and the session controller.

pub mod controller;
pub mod errors;
pub mod loader;
pub mod messages;
pub mod selector;
pub mod state;
pub mod tracker;

pub use controller::SessionController;
pub use errors::PlayerError;
pub use loader::{LoadPath, StreamLoader, is_manifest_url};
pub use messages::{PlayerEvent, PlayerEventSender, SurfaceEvent};
pub use selector::{ViewportThresholds, resolve_auto_label, select_quality};
pub use state::{
    LoadIntent, PlaybackSession, PlaybackState, Restore, SwitchCapture,
};
pub use tracker::{PlaybackTracker, ScheduledBackstop};
