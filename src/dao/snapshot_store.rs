use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use crate::{
    dao::storage::{StorageError, StorageResult},
    state::game::Game,
};

/// What a load attempt found.
#[derive(Debug)]
pub enum SnapshotLoad {
    /// A well-formed snapshot.
    Loaded(Box<Game>),
    /// Nothing stored yet.
    Missing,
    /// Stored data does not look like a game; the reason is attached.
    Invalid(String),
}

/// Abstraction over where game snapshots live.
pub trait SnapshotStore: Send + Sync {
    /// Persist the game, replacing any previous snapshot.
    fn save(&self, game: Game) -> BoxFuture<'static, StorageResult<()>>;
    /// Read the stored snapshot, if any.
    fn load(&self) -> BoxFuture<'static, StorageResult<SnapshotLoad>>;
    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Snapshot store writing one JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: Arc<PathBuf>,
}

impl FileSnapshotStore {
    /// Store backed by `path`; parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&self, game: Game) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.path.clone();
        Box::pin(async move { write_atomically(&path, &game).await })
    }

    fn load(&self) -> BoxFuture<'static, StorageResult<SnapshotLoad>> {
        let path = self.path.clone();
        Box::pin(async move { read_snapshot(&path).await })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

async fn write_atomically(path: &Path, game: &Game) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|err| StorageError::io("create", parent, err))?;
    }

    let payload = serde_json::to_vec_pretty(game)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, payload)
        .await
        .map_err(|err| StorageError::io("write", &tmp, err))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|err| StorageError::io("replace", path, err))?;
    debug!(path = %path.display(), "snapshot written");
    Ok(())
}

async fn read_snapshot(path: &Path) -> StorageResult<SnapshotLoad> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(SnapshotLoad::Missing),
        Err(err) => return Err(StorageError::io("read", path, err)),
    };

    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => return Ok(SnapshotLoad::Invalid(format!("not JSON: {err}"))),
    };
    if let Err(reason) = check_shape(&value) {
        return Ok(SnapshotLoad::Invalid(reason));
    }
    match serde_json::from_value::<Game>(value) {
        Ok(game) => Ok(SnapshotLoad::Loaded(Box::new(game))),
        Err(err) => Ok(SnapshotLoad::Invalid(err.to_string())),
    }
}

/// Shallow check that `value` has the top-level structure of a game.
pub fn check_shape(value: &Value) -> Result<(), String> {
    let object = value
        .as_object()
        .ok_or_else(|| "snapshot is not an object".to_string())?;
    let expectations: [(&str, fn(&Value) -> bool); 4] = [
        ("state", Value::is_object),
        ("teams", Value::is_array),
        ("proctors", Value::is_array),
        ("tieBreaker", Value::is_object),
    ];
    for (key, matches) in expectations {
        if !object.get(key).is_some_and(matches) {
            return Err(format!("missing or malformed `{key}`"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::engine::DEFAULT_PROCTOR_NAMES;
    use serde_json::json;

    fn sample_game() -> Game {
        let names: Vec<String> = DEFAULT_PROCTOR_NAMES.iter().map(|n| n.to_string()).collect();
        let mut game = Game::new(&names);
        let team = game.mint_team("Owls".into()).unwrap();
        game.teams.push(team);
        game
    }

    #[tokio::test]
    async fn save_then_load_returns_the_game() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested/game.json"));
        let game = sample_game();

        store.save(game.clone()).await.unwrap();
        match store.load().await.unwrap() {
            SnapshotLoad::Loaded(loaded) => assert_eq!(*loaded, game),
            other => panic!("unexpected load result: {other:?}"),
        }
        assert!(!dir.path().join("nested/game.json.tmp").exists());
    }

    #[tokio::test]
    async fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load().await.unwrap(), SnapshotLoad::Missing));
    }

    #[tokio::test]
    async fn malformed_snapshot_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, r#"{"state": {}, "teams": {}}"#).unwrap();

        let store = FileSnapshotStore::new(&path);
        match store.load().await.unwrap() {
            SnapshotLoad::Invalid(reason) => assert!(reason.contains("teams"), "{reason}"),
            other => panic!("unexpected load result: {other:?}"),
        }
    }

    #[test]
    fn shape_check_names_the_first_problem() {
        let value = json!({"state": {}, "teams": [], "proctors": [], "tieBreaker": null});
        assert_eq!(check_shape(&value), Err("missing or malformed `tieBreaker`".into()));
        assert!(check_shape(&json!([])).is_err());
        assert!(check_shape(&json!({"state": {}, "teams": [], "proctors": [], "tieBreaker": {}})).is_ok());
    }
}
