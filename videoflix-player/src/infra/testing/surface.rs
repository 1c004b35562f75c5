use parking_lot::Mutex;
use std::sync::Arc;

use crate::infra::media::{PlaybackSurface, SurfaceError};

#[derive(Debug)]
struct SurfaceInner {
    time: f64,
    duration: f64,
    paused: bool,
    source: Option<String>,
    load_count: usize,
    seek_count: usize,
    play_count: usize,
    play_denied: bool,
    dropped_seeks: u32,
    native_manifest: bool,
}

/// Media element double.
///
/// `load` rewinds to zero and pauses like a real element; seeks can be
/// dropped on purpose to reproduce the metadata/seek race.
#[derive(Debug, Clone)]
pub struct FakeSurface {
    inner: Arc<Mutex<SurfaceInner>>,
}

impl Default for FakeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SurfaceInner {
                time: 0.0,
                duration: f64::NAN,
                paused: true,
                source: None,
                load_count: 0,
                seek_count: 0,
                play_count: 0,
                play_denied: false,
                dropped_seeks: 0,
                native_manifest: false,
            })),
        }
    }

    pub fn with_duration(self, seconds: f64) -> Self {
        self.set_duration(seconds);
        self
    }

    pub fn with_native_manifest_support(self) -> Self {
        self.inner.lock().native_manifest = true;
        self
    }

    pub fn set_duration(&self, seconds: f64) {
        self.inner.lock().duration = seconds;
    }

    /// Move the playhead as playback would, bypassing seek bookkeeping
    pub fn set_time(&self, seconds: f64) {
        self.inner.lock().time = seconds;
    }

    pub fn time(&self) -> f64 {
        self.inner.lock().time
    }

    pub fn paused(&self) -> bool {
        self.inner.lock().paused
    }

    pub fn source(&self) -> Option<String> {
        self.inner.lock().source.clone()
    }

    pub fn load_count(&self) -> usize {
        self.inner.lock().load_count
    }

    /// Seeks requested through the surface API, dropped ones included
    pub fn seek_count(&self) -> usize {
        self.inner.lock().seek_count
    }

    pub fn play_count(&self) -> usize {
        self.inner.lock().play_count
    }

    pub fn set_play_denied(&self, denied: bool) {
        self.inner.lock().play_denied = denied;
    }

    /// Ignore the next `count` seeks
    pub fn drop_next_seeks(&self, count: u32) {
        self.inner.lock().dropped_seeks = count;
    }
}

impl PlaybackSurface for FakeSurface {
    fn current_time(&self) -> f64 {
        self.time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        let mut inner = self.inner.lock();
        inner.seek_count += 1;
        if inner.dropped_seeks > 0 {
            inner.dropped_seeks -= 1;
            return;
        }
        inner.time = seconds.max(0.0);
    }

    fn duration(&self) -> f64 {
        self.inner.lock().duration
    }

    fn is_paused(&self) -> bool {
        self.paused()
    }

    fn play(&mut self) -> Result<(), SurfaceError> {
        let mut inner = self.inner.lock();
        if inner.play_denied {
            return Err(SurfaceError::PlaybackDenied(
                "autoplay blocked".to_string(),
            ));
        }
        inner.paused = false;
        inner.play_count += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.inner.lock().paused = true;
    }

    fn set_source(&mut self, url: &str) {
        self.inner.lock().source = Some(url.to_string());
    }

    fn load(&mut self) {
        let mut inner = self.inner.lock();
        inner.time = 0.0;
        inner.paused = true;
        inner.load_count += 1;
    }

    fn supports_native_manifest(&self) -> bool {
        self.inner.lock().native_manifest
    }
}
