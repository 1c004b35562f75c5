//! Session controller
//!
//! Orchestrates selection, loading, the playback state machine and
//! checkpoints for one player instance. All surface mutations and all
//! surface events go through `&mut self`, so transitions never interleave.

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::mpsc;
use videoflix_model::{
    MediaAsset, ProgressRecord, QualityOption, QualitySelection,
};

use super::errors::PlayerError;
use super::loader::{LoadPath, StreamLoader};
use super::messages::{PlayerEvent, PlayerEventSender, SurfaceEvent};
use super::selector::select_quality;
use super::state::{PlaybackSession, PlaybackState};
use super::tracker::{PlaybackTracker, ScheduledBackstop};
use crate::domains::progress::checkpoint::{
    CheckpointOutcome, CheckpointService, CheckpointTrigger, SkipReason,
};
use crate::infra::api_client::ApiClient;
use crate::infra::config::PlayerConfig;
use crate::infra::media::{
    PlaybackSurface, StreamingBackend, UnsupportedStreaming,
};
use crate::infra::services::{
    AssetSelection, ProgressApi, SelectionState, StaticToken, TokenProvider,
};

/// Collects the collaborators of a [`SessionController`].
///
/// Only the surface is mandatory. Without an explicit progress API the
/// controller talks to `config.server_url` over HTTP.
#[derive(Debug)]
pub struct SessionControllerBuilder {
    surface: Box<dyn PlaybackSurface>,
    backend: Option<Arc<dyn StreamingBackend>>,
    progress_api: Option<Arc<dyn ProgressApi>>,
    tokens: Option<Arc<dyn TokenProvider>>,
    selection: Option<Arc<dyn AssetSelection>>,
    config: Option<PlayerConfig>,
    viewport_width: u32,
}

impl SessionControllerBuilder {
    pub fn streaming_backend(mut self, backend: Arc<dyn StreamingBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn progress_api(mut self, api: Arc<dyn ProgressApi>) -> Self {
        self.progress_api = Some(api);
        self
    }

    pub fn token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn asset_selection(mut self, selection: Arc<dyn AssetSelection>) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn config(mut self, config: PlayerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn viewport_width(mut self, width: u32) -> Self {
        self.viewport_width = width;
        self
    }

    /// Fails outside a tokio runtime, which checkpoints and backstop timers
    /// are spawned on.
    pub fn build(self) -> Result<SessionController, TryCurrentError> {
        let runtime = Handle::try_current()?;
        let config = self.config.unwrap_or_default();

        let progress_api = self.progress_api.unwrap_or_else(|| {
            Arc::new(
                ApiClient::new(config.server_url.clone())
                    .with_auth_scheme(config.auth_scheme),
            )
        });
        let tokens = self
            .tokens
            .unwrap_or_else(|| Arc::new(StaticToken::none()));
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(UnsupportedStreaming));
        let selection = self
            .selection
            .unwrap_or_else(|| Arc::new(SelectionState::new()));

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(SessionController {
            surface: self.surface,
            loader: StreamLoader::new(backend),
            tracker: PlaybackTracker::new(config.restore_backstop()),
            checkpoints: CheckpointService::new(
                progress_api,
                tokens,
                runtime.clone(),
            ),
            selection,
            session: None,
            viewport_width: self.viewport_width,
            config,
            events_tx,
            events_rx,
            runtime,
        })
    }
}

#[derive(Debug)]
pub struct SessionController {
    surface: Box<dyn PlaybackSurface>,
    loader: StreamLoader,
    tracker: PlaybackTracker,
    checkpoints: CheckpointService,
    selection: Arc<dyn AssetSelection>,
    config: PlayerConfig,
    session: Option<PlaybackSession>,
    viewport_width: u32,
    events_tx: mpsc::UnboundedSender<PlayerEvent>,
    events_rx: mpsc::UnboundedReceiver<PlayerEvent>,
    runtime: Handle,
}

impl SessionController {
    pub fn builder(
        surface: Box<dyn PlaybackSurface>,
    ) -> SessionControllerBuilder {
        SessionControllerBuilder {
            surface,
            backend: None,
            progress_api: None,
            tokens: None,
            selection: None,
            config: None,
            viewport_width: 0,
        }
    }

    // Accessors

    pub fn state(&self) -> &PlaybackState {
        self.tracker.state()
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn quality_options(&self) -> &[QualityOption] {
        self.session
            .as_ref()
            .map(|s| s.asset.quality_options())
            .unwrap_or_default()
    }

    pub fn show_intro_controls(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.show_intro_controls)
    }

    pub fn quality_menu_open(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.quality_menu_open)
    }

    /// Best known playback position of the active session
    pub fn position(&self) -> f64 {
        self.tracker.effective_position(self.surface.as_ref())
    }

    /// Handle for the host to deliver surface events
    pub fn event_sender(&self) -> PlayerEventSender {
        PlayerEventSender::new(self.events_tx.clone())
    }

    // Session lifecycle

    /// Open a session for the upstream selection's current asset.
    pub fn start_session(&mut self) -> Result<(), PlayerError> {
        let asset = self
            .selection
            .selected_asset()
            .ok_or(PlayerError::NoActiveMedia)?;
        self.start_session_with(asset)
    }

    /// Open a session for `asset`: pick the tier for the viewport, bind it
    /// and arm the resume hint without auto-playing.
    pub fn start_session_with(
        &mut self,
        asset: MediaAsset,
    ) -> Result<(), PlayerError> {
        // Events still queued belong to the previous source
        while self.events_rx.try_recv().is_ok() {}
        self.tracker.reset();

        let option = select_quality(
            &asset,
            self.viewport_width,
            QualitySelection::Auto,
            &self.config.viewport,
        )
        .clone();
        let resume_hint = asset.resume_hint();
        info!(
            "[Session] Starting video {} at {} (viewport {}px)",
            asset.id(),
            option.label,
            self.viewport_width
        );

        let url = option.source_url.clone();
        self.session =
            Some(PlaybackSession::new(asset, option, self.viewport_width));
        self.bind(&url)?;
        self.tracker.begin_initial_load(resume_hint);
        Ok(())
    }

    fn bind(&mut self, url: &str) -> Result<LoadPath, PlayerError> {
        match self.loader.load(self.surface.as_mut(), url) {
            Ok(path) => Ok(path),
            Err(e) => {
                self.surface.pause();
                self.tracker.fail(e.to_string());
                Err(e)
            }
        }
    }

    fn session_mut(&mut self) -> Result<&mut PlaybackSession, PlayerError> {
        self.session.as_mut().ok_or(PlayerError::NoActiveMedia)
    }

    fn hide_intro_controls(&mut self) -> Result<(), PlayerError> {
        self.session_mut()?.show_intro_controls = false;
        Ok(())
    }

    // User actions

    /// First play; hides the intro controls.
    pub fn start(&mut self) -> Result<(), PlayerError> {
        self.hide_intro_controls()?;
        self.play()
    }

    /// Play from the resume hint. Does nothing for assets without one.
    pub fn continue_from_resume(&mut self) -> Result<(), PlayerError> {
        let Some(hint) = self.session_mut()?.asset.resume_hint() else {
            return Ok(());
        };
        self.hide_intro_controls()?;
        self.tracker.seek(self.surface.as_mut(), hint);
        self.play()
    }

    pub fn restart_from_zero(&mut self) -> Result<(), PlayerError> {
        self.hide_intro_controls()?;
        self.tracker.seek(self.surface.as_mut(), 0.0);
        self.play()
    }

    pub fn play(&mut self) -> Result<(), PlayerError> {
        let result = self.tracker.request_playback(self.surface.as_mut());
        if let Err(e) = &result {
            warn!("[Session] Play request failed: {}", e);
        }
        result
    }

    pub fn pause(&mut self) {
        self.tracker.pause(self.surface.as_mut());
    }

    /// Step back, never before zero
    pub fn rewind(&mut self) -> Result<(), PlayerError> {
        self.session_mut()?;
        let target = (self.position() - self.config.seek_step_secs).max(0.0);
        self.tracker.seek(self.surface.as_mut(), target);
        Ok(())
    }

    /// Step forward, never past the duration once it is known
    pub fn fast_forward(&mut self) -> Result<(), PlayerError> {
        self.session_mut()?;
        let mut target = self.position() + self.config.seek_step_secs;
        let duration = self.surface.duration();
        if duration.is_finite() {
            target = target.min(duration);
        }
        self.tracker.seek(self.surface.as_mut(), target);
        Ok(())
    }

    /// Flip the quality menu; returns whether it is now open
    pub fn toggle_quality_menu(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.quality_menu_open = !session.quality_menu_open;
                session.quality_menu_open
            }
            None => false,
        }
    }

    /// Switch rendition while keeping position and play state.
    ///
    /// Completes asynchronously: the seek and resume happen as surface
    /// events arrive. A call while a switch is still loading pre-empts it.
    pub fn change_quality(
        &mut self,
        selection: QualitySelection,
    ) -> Result<(), PlayerError> {
        let width = self.viewport_width;
        let thresholds = self.config.viewport;
        let session = self.session_mut()?;
        session.quality_menu_open = false;

        let option =
            select_quality(&session.asset, width, selection, &thresholds)
                .clone();
        // A missing tier falls back, so record the label actually bound
        session.selection = match selection {
            QualitySelection::Auto => QualitySelection::Auto,
            QualitySelection::Fixed(_) => QualitySelection::Fixed(option.label),
        };
        if option == session.active_option && !self.tracker.state().is_failed()
        {
            debug!("[Session] {} already bound", option.label);
            return Ok(());
        }

        self.flush_stale_events();
        let Some(intent) = self.tracker.prepare_switch(self.surface.as_ref())
        else {
            return Ok(());
        };

        info!(
            "[Session] Switching to {} ({})",
            option.label, selection
        );
        let url = option.source_url.clone();
        if let Some(session) = self.session.as_mut() {
            session.active_option = option;
        }
        self.bind(&url)?;
        if let Some(backstop) = self.tracker.enter_loading(intent) {
            self.schedule_backstop(backstop);
        }
        Ok(())
    }

    /// Re-resolve an automatic selection for a new viewport width.
    pub fn on_viewport_resized(&mut self, width: u32) -> Result<(), PlayerError> {
        self.viewport_width = width;
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        session.viewport_width = width;
        if !session.selection.is_auto() {
            return Ok(());
        }

        let wanted = select_quality(
            &session.asset,
            width,
            QualitySelection::Auto,
            &self.config.viewport,
        );
        if wanted.label == session.active_option.label {
            return Ok(());
        }
        self.change_quality(QualitySelection::Auto)
    }

    /// Settle events queued against the source about to be replaced.
    ///
    /// Play/pause changes still describe the user's intent and are applied
    /// before the capture. Readiness signals and backstops would complete
    /// the next load early, so they are dropped.
    fn flush_stale_events(&mut self) {
        let mut dropped = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                PlayerEvent::Surface(
                    SurfaceEvent::Played | SurfaceEvent::Paused,
                ) => self.handle_event(event),
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            debug!("[Session] Dropped {} stale events", dropped);
        }
    }

    fn schedule_backstop(&self, backstop: ScheduledBackstop) {
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(backstop.delay).await;
            let _ = tx.send(PlayerEvent::RestoreBackstop {
                switch_id: backstop.switch_id,
            });
        });
    }

    // Checkpoints

    fn checkpoint(&self, trigger: CheckpointTrigger) -> CheckpointOutcome {
        let Some(session) = &self.session else {
            debug!("[Session] No active media, skipping {} checkpoint", trigger);
            return CheckpointOutcome::Skipped(SkipReason::NoActiveMedia);
        };
        let record = ProgressRecord::new(
            session.asset.id(),
            self.position(),
            self.surface.duration(),
        );
        self.checkpoints.checkpoint(trigger, record)
    }

    /// Checkpoint, clear the upstream "player open" flag and pause.
    ///
    /// Safe to call repeatedly; each call attempts its own write.
    pub fn close(&mut self) -> CheckpointOutcome {
        let outcome = self.checkpoint(CheckpointTrigger::Closed);
        self.selection.set_player_open(false);
        self.pause();
        outcome
    }

    /// Hosting environment is unloading. Only checkpoints when enabled in
    /// the config.
    pub fn on_unload(&mut self) -> CheckpointOutcome {
        if !self.config.checkpoint_on_unload {
            return CheckpointOutcome::Skipped(SkipReason::UnloadHookDisabled);
        }
        self.checkpoint(CheckpointTrigger::Unload)
    }

    /// Hosting view is going away: checkpoint, release the streaming engine
    /// and end the session.
    pub fn teardown(&mut self) -> CheckpointOutcome {
        let outcome = self.checkpoint(CheckpointTrigger::Teardown);
        self.loader.release();
        self.surface.pause();
        self.session = None;
        self.tracker.reset();
        outcome
    }

    // Events

    pub fn handle_event(&mut self, event: PlayerEvent) {
        let result = match event {
            PlayerEvent::Surface(surface_event) => self
                .tracker
                .handle_surface_event(surface_event, self.surface.as_mut()),
            PlayerEvent::RestoreBackstop { switch_id } => self
                .tracker
                .handle_backstop(switch_id, self.surface.as_mut()),
        };
        if let Err(e) = result {
            match &e {
                PlayerError::ResumeFailed(source) => {
                    warn!("[Session] {}: {}", e, source)
                }
                _ => warn!("[Session] {}", e),
            }
        }
    }

    /// Wait for the next queued event and apply it.
    pub async fn process_next_event(&mut self) -> Option<PlayerEvent> {
        let event = self.events_rx.recv().await?;
        self.handle_event(event);
        Some(event)
    }

    /// Apply every event queued so far without waiting; returns how many
    /// were handled.
    pub fn process_pending_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }
}
