use videoflix_model::{MediaAsset, QualityOption, QualitySelection};

/// Position and play flag taken from the surface before a new source is
/// bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchCapture {
    pub position: f64,
    pub was_playing: bool,
}

/// Seek (and optional resume) owed to the surface once the next source is
/// ready.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Restore {
    pub capture: SwitchCapture,
    /// Set for quality switches; the backstop timer carries the same id
    pub switch_id: Option<u64>,
}

/// What a load in progress still has to do when the surface reports in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadIntent {
    pub restore: Option<Restore>,
    pub seek_applied: bool,
    /// Playback had already started before this load; a paused reload
    /// settles in `Paused` rather than `Ready`
    pub was_started: bool,
}

impl LoadIntent {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn restoring(restore: Restore, was_started: bool) -> Self {
        Self {
            restore: Some(restore),
            seek_applied: false,
            was_started,
        }
    }

    pub fn wants_playback(&self) -> bool {
        self.restore.is_some_and(|r| r.capture.was_playing)
    }

    /// Whether this load belongs to a quality switch
    pub fn is_switch(&self) -> bool {
        self.restore.is_some_and(|r| r.switch_id.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading(LoadIntent),
    Ready,
    Playing,
    Paused,
    Switching(SwitchCapture),
    /// Unrecoverable for the current source; message is user-facing
    Failed(String),
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PlaybackState::Loading(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PlaybackState::Failed(_))
    }

    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Loading(_) => "Loading",
            PlaybackState::Ready => "Ready",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Switching(_) => "Switching",
            PlaybackState::Failed(_) => "Failed",
        }
    }
}

/// Live state of the one playback instance a controller drives.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub asset: MediaAsset,
    /// What the user asked for; `Auto` follows the viewport
    pub selection: QualitySelection,
    /// Rendition currently bound to the surface
    pub active_option: QualityOption,
    pub viewport_width: u32,
    pub show_intro_controls: bool,
    pub quality_menu_open: bool,
}

impl PlaybackSession {
    pub fn new(
        asset: MediaAsset,
        active_option: QualityOption,
        viewport_width: u32,
    ) -> Self {
        Self {
            asset,
            selection: QualitySelection::Auto,
            active_option,
            viewport_width,
            show_intro_controls: true,
            quality_menu_open: false,
        }
    }

    /// Label shown in the quality menu: `Auto` or the fixed label
    pub fn current_quality_label(&self) -> String {
        self.selection.to_string()
    }
}
