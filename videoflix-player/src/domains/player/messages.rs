use tokio::sync::mpsc;

/// Readiness and state notifications raised by the playback surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    MetadataLoaded,
    CanPlay,
    /// Playback started, possibly through native controls
    Played,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    Surface(SurfaceEvent),
    /// Post-switch seek check, scheduled after a quality switch binds
    RestoreBackstop { switch_id: u64 },
}

impl From<SurfaceEvent> for PlayerEvent {
    fn from(event: SurfaceEvent) -> Self {
        PlayerEvent::Surface(event)
    }
}

/// Cloneable handle the host uses to feed surface events into a
/// [`super::controller::SessionController`].
#[derive(Debug, Clone)]
pub struct PlayerEventSender {
    tx: mpsc::UnboundedSender<PlayerEvent>,
}

impl PlayerEventSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<PlayerEvent>) -> Self {
        Self { tx }
    }

    /// Queue an event. Returns false once the controller is gone.
    pub fn send(&self, event: impl Into<PlayerEvent>) -> bool {
        self.tx.send(event.into()).is_ok()
    }

    pub fn metadata_loaded(&self) -> bool {
        self.send(SurfaceEvent::MetadataLoaded)
    }

    pub fn can_play(&self) -> bool {
        self.send(SurfaceEvent::CanPlay)
    }
}
