//! Stream loading
//!
//! Binds a source URL to the playback surface, either directly (progressive
//! download) or through a segmented-streaming engine for manifest URLs.

use log::{debug, error, info};
use std::sync::Arc;

use super::errors::PlayerError;
use crate::infra::media::{PlaybackSurface, StreamingBackend, StreamingEngine};

/// File suffix of segmented-streaming manifests
pub const MANIFEST_SUFFIX: &str = ".m3u8";

/// How a source ended up bound to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPath {
    /// URL assigned to the surface directly
    Progressive,
    /// Manifest handed to a streaming engine attached to the surface
    Segmented,
    /// Manifest assigned to a surface that plays it natively
    NativeManifest,
}

/// Whether `url` points at a streaming manifest.
///
/// Query strings and fragments are ignored for absolute URLs, so signed
/// CDN links are still recognised.
pub fn is_manifest_url(url: &str) -> bool {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    path.to_ascii_lowercase().ends_with(MANIFEST_SUFFIX)
}

/// Owns at most one streaming engine at a time.
#[derive(Debug)]
pub struct StreamLoader {
    backend: Arc<dyn StreamingBackend>,
    engine: Option<Box<dyn StreamingEngine>>,
}

impl StreamLoader {
    pub fn new(backend: Arc<dyn StreamingBackend>) -> Self {
        Self {
            backend,
            engine: None,
        }
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Bind `url` to `surface` and trigger a reload.
    ///
    /// Any engine from a previous load is destroyed first, whichever path
    /// the new source takes.
    pub fn load(
        &mut self,
        surface: &mut dyn PlaybackSurface,
        url: &str,
    ) -> Result<LoadPath, PlayerError> {
        self.release();

        let path = if is_manifest_url(url) {
            if self.backend.is_supported() {
                let mut engine = self.backend.create_engine();
                engine.load_source(url);
                engine.attach_media(surface);
                self.engine = Some(engine);
                LoadPath::Segmented
            } else if surface.supports_native_manifest() {
                surface.set_source(url);
                LoadPath::NativeManifest
            } else {
                error!("[Loader] No segmented streaming support for {}", url);
                return Err(PlayerError::StreamUnsupported {
                    url: url.to_string(),
                });
            }
        } else {
            surface.set_source(url);
            LoadPath::Progressive
        };

        surface.load();
        info!("[Loader] Bound {} via {:?}", url, path);
        Ok(path)
    }

    /// Destroy the current streaming engine, if any
    pub fn release(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            debug!("[Loader] Releasing streaming engine");
            engine.destroy();
        }
    }
}

impl Drop for StreamLoader {
    fn drop(&mut self) {
        self.release();
    }
}
