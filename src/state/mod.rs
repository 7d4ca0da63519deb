pub mod assignment;
pub mod derived;
pub mod engine;
pub mod error;
pub mod game;
pub mod history;
pub mod scoring;
mod sse;
pub mod tie_breaker;
pub mod transitions;

use std::sync::Arc;

use tokio::sync::{Mutex, Notify, RwLock};

use crate::{
    config::AppConfig,
    dao::snapshot_store::SnapshotStore,
    state::{engine::GameEngine, game::Game},
};

pub use self::sse::SseHub;

/// Shared handle passed to every handler and background task.
pub type SharedState = Arc<AppState>;

/// Capacity of the SSE broadcast channel.
const SSE_CAPACITY: usize = 64;

/// Outcome of the most recent snapshot write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistStatus {
    /// A save was requested and has not been written yet.
    pub pending: bool,
    /// RFC 3339 time of the last successful write.
    pub last_saved_at: Option<String>,
    /// Error of the last failed write, cleared on success.
    pub last_error: Option<String>,
}

/// Central application state: the game engine, its broadcast hub and snapshot storage.
pub struct AppState {
    config: AppConfig,
    engine: RwLock<GameEngine>,
    sse: SseHub,
    snapshot_store: Arc<dyn SnapshotStore>,
    save_signal: Notify,
    save_lock: Mutex<()>,
    persist_status: RwLock<PersistStatus>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, snapshot_store: Arc<dyn SnapshotStore>) -> SharedState {
        let engine = GameEngine::new(config.engine_settings());
        Arc::new(Self {
            config,
            engine: RwLock::new(engine),
            sse: SseHub::new(SSE_CAPACITY),
            snapshot_store,
            save_signal: Notify::new(),
            save_lock: Mutex::new(()),
            persist_status: RwLock::new(PersistStatus::default()),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Broadcast hub used for the SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Storage backend for game snapshots.
    pub fn snapshot_store(&self) -> &Arc<dyn SnapshotStore> {
        &self.snapshot_store
    }

    /// Clone of the current game.
    pub async fn game_snapshot(&self) -> Game {
        self.engine.read().await.game().clone()
    }

    /// Run `f` against the current game under a read lock.
    pub async fn with_game<R>(&self, f: impl FnOnce(&Game) -> R) -> R {
        let guard = self.engine.read().await;
        f(guard.game())
    }

    /// Run `f` against the engine under the write lock, serializing mutations.
    pub async fn with_engine_mut<R>(&self, f: impl FnOnce(&mut GameEngine) -> R) -> R {
        let mut guard = self.engine.write().await;
        f(&mut guard)
    }

    /// Ask the persistence task to write a snapshot soon.
    pub async fn request_save(&self) {
        self.persist_status.write().await.pending = true;
        self.save_signal.notify_one();
    }

    /// Wait until a save has been requested.
    pub async fn save_requested(&self) {
        self.save_signal.notified().await;
    }

    /// Held for the whole snapshot-and-write of a save, so writes never interleave.
    pub fn save_lock(&self) -> &Mutex<()> {
        &self.save_lock
    }

    /// Status of the last snapshot write.
    pub async fn persist_status(&self) -> PersistStatus {
        self.persist_status.read().await.clone()
    }

    /// Record the outcome of a snapshot write.
    pub async fn record_save(&self, result: Result<String, String>) {
        let mut status = self.persist_status.write().await;
        status.pending = false;
        match result {
            Ok(saved_at) => {
                status.last_saved_at = Some(saved_at);
                status.last_error = None;
            }
            Err(error) => status.last_error = Some(error),
        }
    }
}
