//! Playback state tracker
//!
//! Single owner of [`PlaybackState`]. Every transition goes through one of
//! the methods here, called from the session controller's event loop, so
//! metadata, can-play and backstop handling never race each other.

use log::{debug, info, warn};
use std::time::Duration;

use super::errors::PlayerError;
use super::messages::SurfaceEvent;
use super::state::{LoadIntent, PlaybackState, Restore, SwitchCapture};
use crate::infra::constants::restore::POSITION_EPSILON;
use crate::infra::media::PlaybackSurface;

/// Backstop timer the controller must start after binding a switch source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledBackstop {
    pub switch_id: u64,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingBackstop {
    switch_id: u64,
    target: f64,
}

fn is_zero(seconds: f64) -> bool {
    !seconds.is_finite() || seconds <= POSITION_EPSILON
}

fn sane_position(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

#[derive(Debug)]
pub struct PlaybackTracker {
    state: PlaybackState,
    backstop: Option<PendingBackstop>,
    next_switch_id: u64,
    backstop_delay: Duration,
}

impl PlaybackTracker {
    pub fn new(backstop_delay: Duration) -> Self {
        Self {
            state: PlaybackState::Idle,
            backstop: None,
            next_switch_id: 0,
            backstop_delay,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn has_pending_backstop(&self) -> bool {
        self.backstop.is_some()
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            debug!("[Tracker] {} -> {}", self.state.name(), next.name());
        }
        self.state = next;
    }

    /// First load of a session. A resume hint is armed as a restore that
    /// never auto-plays and has no backstop.
    pub fn begin_initial_load(&mut self, resume_hint: Option<f64>) {
        self.backstop = None;
        let intent = match resume_hint {
            Some(position) if !is_zero(position) => LoadIntent::restoring(
                Restore {
                    capture: SwitchCapture {
                        position,
                        was_playing: false,
                    },
                    switch_id: None,
                },
                false,
            ),
            _ => LoadIntent::plain(),
        };
        self.transition(PlaybackState::Loading(intent));
    }

    /// Best known playback position.
    ///
    /// While a restore is still owed the surface reports the start of the
    /// new source, so the restore target is the truthful answer.
    pub fn effective_position(&self, surface: &dyn PlaybackSurface) -> f64 {
        let reported = sane_position(surface.current_time());
        match &self.state {
            PlaybackState::Switching(capture) => capture.position,
            PlaybackState::Loading(LoadIntent {
                restore: Some(restore),
                seek_applied: false,
                ..
            }) => restore.capture.position,
            _ => match self.backstop {
                Some(pending) if is_zero(reported) => pending.target,
                _ => reported,
            },
        }
    }

    /// Capture what the next source has to restore.
    ///
    /// Returns `None` when there is no source yet. A switch issued while a
    /// previous one is still loading reuses the original capture, since the
    /// surface position is meaningless mid-reload.
    pub fn prepare_switch(
        &mut self,
        surface: &dyn PlaybackSurface,
    ) -> Option<LoadIntent> {
        let (capture, was_started) = match &self.state {
            PlaybackState::Idle => return None,
            PlaybackState::Playing | PlaybackState::Paused => {
                let capture = SwitchCapture {
                    position: self.effective_position(surface),
                    was_playing: self.state.is_playing(),
                };
                self.transition(PlaybackState::Switching(capture));
                (capture, true)
            }
            PlaybackState::Switching(capture) => (*capture, true),
            PlaybackState::Loading(intent) => {
                let capture = match intent.restore {
                    Some(restore) => restore.capture,
                    None => SwitchCapture {
                        position: 0.0,
                        was_playing: false,
                    },
                };
                (capture, intent.was_started)
            }
            PlaybackState::Ready | PlaybackState::Failed(_) => (
                SwitchCapture {
                    position: self.effective_position(surface),
                    was_playing: false,
                },
                false,
            ),
        };

        self.next_switch_id += 1;
        Some(LoadIntent::restoring(
            Restore {
                capture,
                switch_id: Some(self.next_switch_id),
            },
            was_started,
        ))
    }

    /// Enter `Loading` for a freshly bound source and hand back the backstop
    /// to schedule, if the restore needs one.
    pub fn enter_loading(
        &mut self,
        intent: LoadIntent,
    ) -> Option<ScheduledBackstop> {
        self.backstop = None;
        let scheduled = match intent.restore {
            Some(Restore {
                capture,
                switch_id: Some(switch_id),
            }) if !is_zero(capture.position) => {
                self.backstop = Some(PendingBackstop {
                    switch_id,
                    target: capture.position,
                });
                Some(ScheduledBackstop {
                    switch_id,
                    delay: self.backstop_delay,
                })
            }
            _ => None,
        };
        self.transition(PlaybackState::Loading(intent));
        scheduled
    }

    pub fn handle_surface_event(
        &mut self,
        event: SurfaceEvent,
        surface: &mut dyn PlaybackSurface,
    ) -> Result<(), PlayerError> {
        match event {
            SurfaceEvent::MetadataLoaded => {
                self.apply_restore_seek(surface);
                Ok(())
            }
            SurfaceEvent::CanPlay => self.on_can_play(surface),
            SurfaceEvent::Played => {
                if matches!(
                    self.state,
                    PlaybackState::Ready | PlaybackState::Paused
                ) {
                    self.transition(PlaybackState::Playing);
                }
                Ok(())
            }
            SurfaceEvent::Paused => {
                if self.state.is_playing() {
                    self.transition(PlaybackState::Paused);
                }
                Ok(())
            }
        }
    }

    fn apply_restore_seek(&mut self, surface: &mut dyn PlaybackSurface) {
        if let PlaybackState::Loading(intent) = &mut self.state
            && !intent.seek_applied
        {
            intent.seek_applied = true;
            if let Some(restore) = intent.restore {
                debug!(
                    "[Tracker] Restoring position {:.3}s",
                    restore.capture.position
                );
                surface.set_current_time(restore.capture.position);
            }
        }
    }

    fn on_can_play(
        &mut self,
        surface: &mut dyn PlaybackSurface,
    ) -> Result<(), PlayerError> {
        let PlaybackState::Loading(intent) = self.state else {
            return Ok(());
        };
        self.apply_restore_seek(surface);

        if intent.wants_playback() {
            return self.resume(surface);
        }
        if intent.was_started {
            self.transition(PlaybackState::Paused);
        } else {
            self.transition(PlaybackState::Ready);
        }
        Ok(())
    }

    fn resume(
        &mut self,
        surface: &mut dyn PlaybackSurface,
    ) -> Result<(), PlayerError> {
        match surface.play() {
            Ok(()) => {
                self.transition(PlaybackState::Playing);
                Ok(())
            }
            Err(e) => {
                self.transition(PlaybackState::Paused);
                Err(PlayerError::ResumeFailed(e))
            }
        }
    }

    /// Second chance for the post-switch seek.
    ///
    /// Re-seeks once when the surface still sits at zero although the
    /// capture did not. Timers from superseded switches are ignored.
    pub fn handle_backstop(
        &mut self,
        switch_id: u64,
        surface: &mut dyn PlaybackSurface,
    ) -> Result<(), PlayerError> {
        let pending = match self.backstop {
            Some(pending) if pending.switch_id == switch_id => pending,
            _ => {
                debug!("[Tracker] Ignoring stale backstop {}", switch_id);
                return Ok(());
            }
        };
        self.backstop = None;

        if !is_zero(surface.current_time()) {
            return Ok(());
        }

        info!(
            "[Tracker] Seek did not stick, re-seeking to {:.3}s",
            pending.target
        );
        surface.set_current_time(pending.target);
        if let PlaybackState::Loading(intent) = &mut self.state {
            intent.seek_applied = true;
        }

        let reached = sane_position(surface.current_time());
        if is_zero(reached) {
            return Err(PlayerError::SeekRaceUnresolved {
                target: pending.target,
                reached,
            });
        }
        Ok(())
    }

    /// User asked for playback. Deferred until can-play while loading.
    pub fn request_playback(
        &mut self,
        surface: &mut dyn PlaybackSurface,
    ) -> Result<(), PlayerError> {
        match &mut self.state {
            PlaybackState::Idle | PlaybackState::Failed(_) => {
                Err(PlayerError::NoActiveMedia)
            }
            PlaybackState::Loading(intent) => {
                let restore = intent.restore.get_or_insert(Restore {
                    capture: SwitchCapture {
                        position: 0.0,
                        was_playing: false,
                    },
                    switch_id: None,
                });
                restore.capture.was_playing = true;
                Ok(())
            }
            PlaybackState::Switching(capture) => {
                capture.was_playing = true;
                Ok(())
            }
            PlaybackState::Ready
            | PlaybackState::Paused
            | PlaybackState::Playing => self.resume(surface),
        }
    }

    /// Pause the surface whatever the state; a deferred resume is cancelled.
    pub fn pause(&mut self, surface: &mut dyn PlaybackSurface) {
        match &mut self.state {
            PlaybackState::Loading(LoadIntent {
                restore: Some(restore),
                ..
            }) => restore.capture.was_playing = false,
            PlaybackState::Switching(capture) => capture.was_playing = false,
            PlaybackState::Playing => self.transition(PlaybackState::Paused),
            _ => {}
        }
        surface.pause();
    }

    /// User seek. Supersedes any restore or backstop still in flight.
    pub fn seek(&mut self, surface: &mut dyn PlaybackSurface, target: f64) {
        let target = sane_position(target);
        self.backstop = None;
        if let PlaybackState::Loading(intent) = &mut self.state {
            let restore = intent.restore.get_or_insert(Restore {
                capture: SwitchCapture {
                    position: target,
                    was_playing: false,
                },
                switch_id: None,
            });
            restore.capture.position = target;
        }
        surface.set_current_time(target);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.backstop = None;
        let message = message.into();
        warn!("[Tracker] Playback failed: {}", message);
        self.transition(PlaybackState::Failed(message));
    }

    pub fn reset(&mut self) {
        self.backstop = None;
        self.transition(PlaybackState::Idle);
    }
}
