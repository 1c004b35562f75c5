//! Session-scoped collaborators: the token store and the upstream asset
//! selection.

use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use videoflix_model::MediaAsset;

/// Read-only lookup of the session's authentication token.
///
/// No token is a valid state, not an error.
pub trait TokenProvider: Send + Sync + Debug {
    fn token(&self) -> Option<String>;
}

/// A token fixed at construction time
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Shared token cell updated by the login flow and read at checkpoint time.
#[derive(Debug, Clone, Default)]
pub struct SessionTokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl SessionTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.inner.write() = token.filter(|t| !t.trim().is_empty());
    }

    pub fn clear(&self) {
        self.set_token(None);
    }
}

impl TokenProvider for SessionTokenStore {
    fn token(&self) -> Option<String> {
        self.inner.read().clone()
    }
}

/// Upstream collaborator that picked the asset and owns the "player open"
/// flag.
pub trait AssetSelection: Send + Sync + Debug {
    fn selected_asset(&self) -> Option<MediaAsset>;

    fn set_player_open(&self, open: bool);
}

#[derive(Debug, Default)]
pub struct SelectionState {
    selected: RwLock<Option<MediaAsset>>,
    player_open: AtomicBool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an asset and mark the player as open
    pub fn open(&self, asset: MediaAsset) {
        *self.selected.write() = Some(asset);
        self.player_open.store(true, Ordering::Release);
    }

    pub fn is_player_open(&self) -> bool {
        self.player_open.load(Ordering::Acquire)
    }
}

impl AssetSelection for SelectionState {
    fn selected_asset(&self) -> Option<MediaAsset> {
        self.selected.read().clone()
    }

    fn set_player_open(&self, open: bool) {
        self.player_open.store(open, Ordering::Release);
    }
}
