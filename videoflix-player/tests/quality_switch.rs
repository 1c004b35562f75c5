//! Quality switches keep the playback position and play state.

use videoflix_model::{AssetId, MediaAsset, QualityLabel, QualitySelection};
use videoflix_player::{PlaybackState, PlayerEvent, SurfaceEvent};

#[path = "support/mod.rs"]
mod support;

use support::{HarnessOptions, PlayerHarness, manifest_asset};

const EPSILON: f64 = 0.05;

fn fixed(label: QualityLabel) -> QualitySelection {
    QualitySelection::Fixed(label)
}

#[tokio::test(start_paused = true)]
async fn switch_round_trip_restores_time_and_playback() {
    let mut h = PlayerHarness::with_defaults();
    h.playing_at(125.0);
    assert_eq!(h.controller.state(), &PlaybackState::Playing);

    h.controller.change_quality(fixed(QualityLabel::P1080)).unwrap();
    assert!(h.controller.state().is_loading());
    assert_eq!(h.surface.source().as_deref(), Some("a"));
    assert_eq!(h.surface.time(), 0.0);

    h.surface_ready();
    let event = h.controller.process_next_event().await;
    assert!(matches!(event, Some(PlayerEvent::RestoreBackstop { .. })));

    assert!((h.surface.time() - 125.0).abs() < EPSILON);
    assert!(!h.surface.paused());
    assert_eq!(h.controller.state(), &PlaybackState::Playing);
    let session = h.controller.session().unwrap();
    assert_eq!(session.active_option.label, QualityLabel::P1080);
    assert_eq!(session.current_quality_label(), "1080p");
}

#[tokio::test(start_paused = true)]
async fn paused_switch_stays_paused() {
    let mut h = PlayerHarness::with_defaults();
    h.playing_at(48.0);
    h.controller.pause();

    h.controller.change_quality(fixed(QualityLabel::P360)).unwrap();
    h.surface_ready();

    assert_eq!(h.controller.state(), &PlaybackState::Paused);
    assert!(h.surface.paused());
    assert_eq!(h.surface.time(), 48.0);
}

#[tokio::test(start_paused = true)]
async fn backstop_recovers_seek_lost_to_metadata_race() {
    let mut h = PlayerHarness::with_defaults();
    h.playing_at(125.0);

    h.controller.change_quality(fixed(QualityLabel::P360)).unwrap();
    h.surface.drop_next_seeks(1);
    h.surface_ready();
    assert_eq!(h.surface.time(), 0.0);
    assert!(!h.surface.paused());

    h.controller.process_next_event().await;

    assert!((h.surface.time() - 125.0).abs() < EPSILON);
    assert_eq!(h.controller.state(), &PlaybackState::Playing);
}

#[tokio::test(start_paused = true)]
async fn unresolved_seek_race_keeps_playing() {
    let mut h = PlayerHarness::with_defaults();
    h.playing_at(125.0);

    h.controller.change_quality(fixed(QualityLabel::P360)).unwrap();
    h.surface.drop_next_seeks(2);
    h.surface_ready();
    h.controller.process_next_event().await;

    assert_eq!(h.surface.time(), 0.0);
    assert_eq!(h.controller.state(), &PlaybackState::Playing);
}

#[tokio::test(start_paused = true)]
async fn latest_switch_wins_with_original_position() {
    let mut h = PlayerHarness::with_defaults();
    h.playing_at(40.0);

    h.controller.change_quality(fixed(QualityLabel::P1080)).unwrap();
    h.controller.change_quality(fixed(QualityLabel::P120)).unwrap();
    assert_eq!(h.surface.source().as_deref(), Some("d"));

    h.surface_ready();
    assert_eq!(h.surface.time(), 40.0);
    assert_eq!(h.controller.state(), &PlaybackState::Playing);

    tokio::time::sleep(std::time::Duration::from_millis(250)).await;
    assert_eq!(h.controller.process_pending_events(), 2);
    assert_eq!(h.surface.time(), 40.0);
    assert_eq!(
        h.controller.session().unwrap().active_option.label,
        QualityLabel::P120
    );
}

#[tokio::test(start_paused = true)]
async fn denied_resume_leaves_session_paused() {
    let mut h = PlayerHarness::with_defaults();
    h.playing_at(30.0);

    h.controller.change_quality(fixed(QualityLabel::P1080)).unwrap();
    h.surface.set_play_denied(true);
    h.surface_ready();

    assert_eq!(h.controller.state(), &PlaybackState::Paused);
    assert_eq!(h.surface.time(), 30.0);

    h.surface.set_play_denied(false);
    h.controller.play().unwrap();
    assert_eq!(h.controller.state(), &PlaybackState::Playing);
}

#[tokio::test(start_paused = true)]
async fn selecting_bound_quality_is_a_no_op() {
    let mut h = PlayerHarness::with_defaults();
    h.playing_at(12.0);
    let loads = h.surface.load_count();

    h.controller.toggle_quality_menu();
    h.controller.change_quality(fixed(QualityLabel::P720)).unwrap();

    assert_eq!(h.surface.load_count(), loads);
    assert_eq!(h.controller.state(), &PlaybackState::Playing);
    assert!(!h.controller.quality_menu_open());
}

#[tokio::test(start_paused = true)]
async fn viewport_resize_follows_auto_selection_only() {
    let mut h = PlayerHarness::with_defaults();
    h.playing_at(10.0);

    h.controller.on_viewport_resized(400).unwrap();
    assert_eq!(h.surface.source().as_deref(), Some("d"));
    h.surface_ready();
    assert_eq!(h.surface.time(), 10.0);
    assert_eq!(h.controller.state(), &PlaybackState::Playing);

    h.controller.change_quality(fixed(QualityLabel::P720)).unwrap();
    h.surface_ready();
    let loads = h.surface.load_count();
    h.controller.on_viewport_resized(2000).unwrap();
    assert_eq!(h.surface.load_count(), loads);
    assert_eq!(h.surface.source().as_deref(), Some("b"));
}

#[tokio::test(start_paused = true)]
async fn switching_manifests_releases_previous_engine() {
    let mut h = PlayerHarness::with_defaults();
    h.open(manifest_asset());
    h.surface_ready();
    h.controller.start().unwrap();
    assert_eq!(h.backend.live_engines(), 1);

    h.controller.change_quality(fixed(QualityLabel::P1080)).unwrap();
    h.controller.change_quality(fixed(QualityLabel::P360)).unwrap();

    assert_eq!(h.backend.created(), 3);
    assert_eq!(h.backend.destroyed(), 2);
    assert_eq!(h.backend.live_engines(), 1);
    assert_eq!(
        h.backend.last_loaded_source().as_deref(),
        Some("https://cdn.test/17/360p/index.m3u8")
    );
}

#[tokio::test(start_paused = true)]
async fn unsupported_manifest_fails_visibly() {
    let mut h = PlayerHarness::new(HarnessOptions {
        backend: videoflix_player::infra::testing::FakeStreamingBackend::unsupported(),
        ..HarnessOptions::default()
    });
    h.selection.open(manifest_asset());

    let err = h.controller.start_session().unwrap_err();

    assert!(err.is_user_visible());
    assert!(h.controller.state().is_failed());
    assert_eq!(h.surface.load_count(), 0);
    assert_eq!(h.backend.created(), 0);
    assert!(h.controller.start().is_err());
}

fn two_tier_asset() -> MediaAsset {
    MediaAsset::new(
        AssetId(support::VIDEO_ID),
        [(QualityLabel::P1080, "a"), (QualityLabel::P720, "b")],
    )
    .expect("valid asset")
}

#[tokio::test(start_paused = true)]
async fn missing_tier_records_the_bound_label() {
    let mut h = PlayerHarness::with_defaults();
    h.open(two_tier_asset());
    h.surface_ready();
    h.controller.start().unwrap();
    h.surface.set_time(30.0);

    h.controller.change_quality(fixed(QualityLabel::P120)).unwrap();
    let session = h.controller.session().unwrap();
    assert_eq!(session.active_option.label, QualityLabel::P720);
    assert_eq!(session.current_quality_label(), "720p");
    assert_eq!(session.selection, fixed(QualityLabel::P720));

    h.controller.change_quality(fixed(QualityLabel::P1080)).unwrap();
    h.surface_ready();
    h.controller.change_quality(fixed(QualityLabel::P360)).unwrap();
    h.surface_ready();

    let session = h.controller.session().unwrap();
    assert_eq!(h.surface.source().as_deref(), Some("b"));
    assert_eq!(session.current_quality_label(), "720p");
    assert!(session.asset.has_label(session.active_option.label));
    assert_eq!(h.surface.time(), 30.0);
}

#[tokio::test(start_paused = true)]
async fn readiness_queued_before_switch_does_not_complete_it() {
    let mut h = PlayerHarness::with_defaults();
    h.playing_at(50.0);
    h.controller.pause();
    h.controller.event_sender().can_play();

    h.controller.change_quality(fixed(QualityLabel::P1080)).unwrap();
    h.controller.process_pending_events();
    assert!(h.controller.state().is_loading());
    assert_eq!(h.surface.time(), 0.0);

    h.surface_ready();
    assert_eq!(h.controller.state(), &PlaybackState::Paused);
    assert_eq!(h.surface.time(), 50.0);
}

#[tokio::test(start_paused = true)]
async fn native_pause_queued_before_switch_is_honoured() {
    let mut h = PlayerHarness::with_defaults();
    h.playing_at(50.0);
    h.controller.event_sender().send(SurfaceEvent::Paused);

    h.controller.change_quality(fixed(QualityLabel::P1080)).unwrap();
    h.surface_ready();

    assert_eq!(h.controller.state(), &PlaybackState::Paused);
    assert!(h.surface.paused());
    assert_eq!(h.surface.time(), 50.0);
}
