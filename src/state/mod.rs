//! Shared application state plus the client-side round core.

pub mod clock;
pub mod progress;
pub mod refresh;
pub mod round;
pub mod scoring;
pub mod session;
mod sse;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::score_store::ScoreStore, error::ServiceError};

pub use self::sse::SseHub;

/// Cheap-to-clone handle over [`AppState`].
pub type SharedState = Arc<AppState>;

/// Broadcast capacity of the ranking-change stream.
const SSE_CHANNEL_CAPACITY: usize = 16;

/// Central application state storing the score store handle, the SSE hub,
/// and the player token registry.
pub struct AppState {
    config: AppConfig,
    score_store: RwLock<Option<Arc<dyn ScoreStore>>>,
    sse: SseHub,
    tokens: DashMap<String, String>,
    player_names: DashMap<String, String>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a score store is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            score_store: RwLock::new(None),
            sse: SseHub::new(SSE_CHANNEL_CAPACITY),
            tokens: DashMap::new(),
            player_names: DashMap::new(),
            degraded: degraded_tx,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current score store, if one is installed.
    pub async fn score_store(&self) -> Option<Arc<dyn ScoreStore>> {
        let guard = self.score_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the score store or fail with the degraded-mode service error.
    pub async fn require_score_store(&self) -> Result<Arc<dyn ScoreStore>, ServiceError> {
        self.score_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a score store implementation and leave degraded mode.
    pub async fn set_score_store(&self, store: Arc<dyn ScoreStore>) {
        {
            let mut guard = self.score_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current score store and enter degraded mode.
    pub async fn clear_score_store(&self) {
        {
            let mut guard = self.score_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        if *self.degraded.borrow() == value {
            return;
        }
        let _ = self.degraded.send(value);
    }

    /// Broadcast hub for the ranking-change SSE stream.
    pub fn rankings_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Registry of live bearer tokens keyed by the token string.
    pub fn tokens(&self) -> &DashMap<String, String> {
        &self.tokens
    }

    /// Registered display names keyed by their lowercase form.
    pub fn player_names(&self) -> &DashMap<String, String> {
        &self.player_names
    }
}
