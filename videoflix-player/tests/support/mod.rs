#![allow(dead_code)]

use std::sync::Arc;

use videoflix_model::{AssetId, MediaAsset, QualityLabel};
use videoflix_player::infra::services::{SelectionState, SessionTokenStore};
use videoflix_player::infra::testing::{
    FakeStreamingBackend, FakeSurface, RecordingProgressApi,
};
use videoflix_player::{
    PlayerConfig, SessionController, SurfaceEvent,
};

/// Viewport that resolves to 720p under the default thresholds
pub const DESKTOP_WIDTH: u32 = 1000;
pub const VIDEO_ID: u64 = 17;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `{1080p: "a", 720p: "b", 360p: "c", 120p: "d"}`
pub fn sample_asset() -> MediaAsset {
    MediaAsset::new(
        AssetId(VIDEO_ID),
        [
            (QualityLabel::P1080, "a"),
            (QualityLabel::P720, "b"),
            (QualityLabel::P360, "c"),
            (QualityLabel::P120, "d"),
        ],
    )
    .expect("valid asset")
}

pub fn manifest_asset() -> MediaAsset {
    MediaAsset::new(
        AssetId(VIDEO_ID),
        [
            (QualityLabel::P1080, "https://cdn.test/17/1080p/index.m3u8"),
            (QualityLabel::P720, "https://cdn.test/17/720p/index.m3u8"),
            (QualityLabel::P360, "https://cdn.test/17/360p/index.m3u8"),
        ],
    )
    .expect("valid asset")
}

pub struct PlayerHarness {
    pub controller: SessionController,
    pub surface: FakeSurface,
    pub backend: FakeStreamingBackend,
    pub api: RecordingProgressApi,
    pub tokens: SessionTokenStore,
    pub selection: Arc<SelectionState>,
}

#[derive(Debug, Clone)]
pub struct HarnessOptions {
    pub width: u32,
    pub backend: FakeStreamingBackend,
    pub api: RecordingProgressApi,
    pub token: Option<&'static str>,
    pub config: PlayerConfig,
    pub duration: f64,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            width: DESKTOP_WIDTH,
            backend: FakeStreamingBackend::supported(),
            api: RecordingProgressApi::new(),
            token: Some("session-token"),
            config: PlayerConfig::default(),
            duration: 600.0,
        }
    }
}

impl PlayerHarness {
    /// Must run inside a tokio runtime
    pub fn new(options: HarnessOptions) -> Self {
        init_logging();

        let surface = FakeSurface::new().with_duration(options.duration);
        let tokens = SessionTokenStore::new();
        tokens.set_token(options.token.map(str::to_string));
        let selection = Arc::new(SelectionState::new());

        let controller = SessionController::builder(Box::new(surface.clone()))
            .streaming_backend(Arc::new(options.backend.clone()))
            .progress_api(Arc::new(options.api.clone()))
            .token_provider(Arc::new(tokens.clone()))
            .asset_selection(selection.clone())
            .config(options.config)
            .viewport_width(options.width)
            .build()
            .expect("inside runtime");

        Self {
            controller,
            surface,
            backend: options.backend,
            api: options.api,
            tokens,
            selection,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(HarnessOptions::default())
    }

    /// Select `asset` upstream and start a session for it
    pub fn open(&mut self, asset: MediaAsset) {
        self.selection.open(asset);
        self.controller.start_session().expect("session starts");
    }

    /// Deliver the readiness events a real surface raises after `load`
    pub fn surface_ready(&mut self) {
        let events = self.controller.event_sender();
        events.metadata_loaded();
        events.can_play();
        self.controller.process_pending_events();
    }

    pub fn emit(&mut self, event: SurfaceEvent) {
        self.controller.event_sender().send(event);
        self.controller.process_pending_events();
    }

    /// Open the sample asset and play it up to `position`
    pub fn playing_at(&mut self, position: f64) {
        self.open(sample_asset());
        self.surface_ready();
        self.controller.start().expect("playback starts");
        self.surface.set_time(position);
    }
}
