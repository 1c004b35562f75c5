use parking_lot::Mutex;
use std::sync::Arc;

use crate::infra::media::{PlaybackSurface, StreamingBackend, StreamingEngine};

#[derive(Debug, Default)]
struct BackendInner {
    supported: bool,
    created: usize,
    destroyed: usize,
    attached: usize,
    last_source: Option<String>,
}

/// Streaming backend that counts engine lifecycles.
#[derive(Debug, Clone)]
pub struct FakeStreamingBackend {
    inner: Arc<Mutex<BackendInner>>,
}

impl FakeStreamingBackend {
    pub fn supported() -> Self {
        Self::with_support(true)
    }

    pub fn unsupported() -> Self {
        Self::with_support(false)
    }

    fn with_support(supported: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BackendInner {
                supported,
                ..BackendInner::default()
            })),
        }
    }

    pub fn created(&self) -> usize {
        self.inner.lock().created
    }

    pub fn destroyed(&self) -> usize {
        self.inner.lock().destroyed
    }

    /// Engines created and not yet destroyed
    pub fn live_engines(&self) -> usize {
        let inner = self.inner.lock();
        inner.created - inner.destroyed
    }

    pub fn attached(&self) -> usize {
        self.inner.lock().attached
    }

    pub fn last_loaded_source(&self) -> Option<String> {
        self.inner.lock().last_source.clone()
    }
}

impl StreamingBackend for FakeStreamingBackend {
    fn is_supported(&self) -> bool {
        self.inner.lock().supported
    }

    fn create_engine(&self) -> Box<dyn StreamingEngine> {
        self.inner.lock().created += 1;
        Box::new(FakeEngine {
            backend: Arc::clone(&self.inner),
            destroyed: false,
        })
    }
}

#[derive(Debug)]
struct FakeEngine {
    backend: Arc<Mutex<BackendInner>>,
    destroyed: bool,
}

impl StreamingEngine for FakeEngine {
    fn load_source(&mut self, url: &str) {
        self.backend.lock().last_source = Some(url.to_string());
    }

    fn attach_media(&mut self, surface: &mut dyn PlaybackSurface) {
        self.backend.lock().attached += 1;
        // A real engine feeds segments through a media source; the fake
        // exposes the manifest so assertions can see what is bound.
        if let Some(source) = self.backend.lock().last_source.clone() {
            surface.set_source(&source);
        }
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.backend.lock().destroyed += 1;
        }
    }
}
