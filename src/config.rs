//! Application-level configuration loading: access code, proctor roster and snapshot settings.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{
    engine::{DEFAULT_PROCTOR_NAMES, EngineSettings, ScoringClosePolicy},
    game::PROCTOR_COUNT,
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "JEOPARDY_SCORESHEET_CONFIG_PATH";
/// Environment variable overriding the access code.
const GAME_ID_ENV: &str = "GAME_ID";
/// Environment variable overriding the snapshot location.
const SNAPSHOT_PATH_ENV: &str = "SNAPSHOT_PATH";

const DEFAULT_GAME_ID: &str = "JPD2026";
const DEFAULT_SNAPSHOT_PATH: &str = "data/game.json";
const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 200;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    game_id: String,
    proctor_names: Vec<String>,
    scoring_close_policy: ScoringClosePolicy,
    snapshot_path: PathBuf,
    save_debounce: Duration,
}

impl AppConfig {
    /// Load the configuration from disk, then apply environment overrides.
    pub fn load() -> Self {
        Self::load_file().with_env_overrides()
    }

    fn load_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        policy = ?app_config.scoring_close_policy,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(game_id) = non_empty_env(GAME_ID_ENV) {
            self.game_id = game_id;
        }
        if let Some(path) = non_empty_env(SNAPSHOT_PATH_ENV) {
            self.snapshot_path = PathBuf::from(path);
        }
        self
    }

    /// Access code clients must present.
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Display names of proctors `p1..p8`.
    pub fn proctor_names(&self) -> &[String] {
        &self.proctor_names
    }

    /// File the game snapshot is written to.
    pub fn snapshot_path(&self) -> &PathBuf {
        &self.snapshot_path
    }

    /// Quiet period before a requested save is written.
    pub fn save_debounce(&self) -> Duration {
        self.save_debounce
    }

    /// Settings handed to the game engine.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            proctor_names: self.proctor_names.clone(),
            close_policy: self.scoring_close_policy,
        }
    }

    /// Same configuration with another snapshot location.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game_id: DEFAULT_GAME_ID.to_string(),
            proctor_names: default_proctor_names(),
            scoring_close_policy: ScoringClosePolicy::default(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            save_debounce: Duration::from_millis(DEFAULT_SAVE_DEBOUNCE_MS),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    game_id: Option<String>,
    proctor_names: Option<Vec<String>>,
    scoring_close_policy: Option<ScoringClosePolicy>,
    snapshot_path: Option<PathBuf>,
    save_debounce_ms: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        let proctor_names = match value.proctor_names {
            Some(names) if names.len() == PROCTOR_COUNT => names,
            Some(names) => {
                warn!(
                    count = names.len(),
                    expected = PROCTOR_COUNT,
                    "ignoring proctorNames with wrong length"
                );
                defaults.proctor_names
            }
            None => defaults.proctor_names,
        };

        Self {
            game_id: value
                .game_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or(defaults.game_id),
            proctor_names,
            scoring_close_policy: value
                .scoring_close_policy
                .unwrap_or(defaults.scoring_close_policy),
            snapshot_path: value.snapshot_path.unwrap_or(defaults.snapshot_path),
            save_debounce: value
                .save_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.save_debounce),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn default_proctor_names() -> Vec<String> {
    DEFAULT_PROCTOR_NAMES.iter().map(|name| name.to_string()).collect()
}
