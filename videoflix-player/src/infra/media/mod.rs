//! Playback surface and segmented-streaming engine seams
//!
//! The surface is the platform media element. It is owned by the session
//! controller and mutated only by the stream loader and the playback
//! tracker, both of which run on the controller's single event timeline.

use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The platform refused to start playback (autoplay policy and friends)
    #[error("Playback denied by platform: {0}")]
    PlaybackDenied(String),

    #[error("Surface error: {0}")]
    Other(String),
}

/// The media element a source is bound to.
pub trait PlaybackSurface: Debug {
    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    /// Media duration in seconds, NaN until metadata is known
    fn duration(&self) -> f64;

    fn is_paused(&self) -> bool;

    fn play(&mut self) -> Result<(), SurfaceError>;

    fn pause(&mut self);

    /// Assign a progressive-download source
    fn set_source(&mut self, url: &str);

    /// Drop buffered state and start loading the bound source
    fn load(&mut self);

    /// Whether the surface plays streaming manifests on its own
    fn supports_native_manifest(&self) -> bool {
        false
    }
}

/// One segmented-streaming engine instance, bound to a single load.
pub trait StreamingEngine: Debug {
    fn load_source(&mut self, url: &str);

    fn attach_media(&mut self, surface: &mut dyn PlaybackSurface);

    /// Release network connections and buffers held by the engine
    fn destroy(&mut self);
}

/// Capability query plus engine construction for the current platform.
pub trait StreamingBackend: Debug {
    fn is_supported(&self) -> bool;

    fn create_engine(&self) -> Box<dyn StreamingEngine>;
}

/// Backend for platforms without segmented streaming support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedStreaming;

#[derive(Debug)]
struct InertEngine;

impl StreamingEngine for InertEngine {
    fn load_source(&mut self, _url: &str) {}

    fn attach_media(&mut self, _surface: &mut dyn PlaybackSurface) {}

    fn destroy(&mut self) {}
}

impl StreamingBackend for UnsupportedStreaming {
    fn is_supported(&self) -> bool {
        false
    }

    fn create_engine(&self) -> Box<dyn StreamingEngine> {
        Box::new(InertEngine)
    }
}
