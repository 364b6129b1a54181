use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

/// Snapshot cadence of an active mock test
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct RawClientConfig {
    #[serde(default = "default_backend_url")]
    backend_url: String,
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default = "default_autosave_secs")]
    autosave_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".prep")
}

fn default_autosave_secs() -> u64 {
    DEFAULT_AUTOSAVE_INTERVAL.as_secs()
}

/// Device-side settings, read from `PREP_`-prefixed environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without the `/api` suffix
    pub backend_url: String,
    /// Root of the file-backed local store
    pub data_dir: PathBuf,
    pub autosave_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            data_dir: default_data_dir(),
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("PREP_").from_env::<RawClientConfig>().map(Self::from)
    }

    pub fn from_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed("PREP_")
            .from_iter::<_, RawClientConfig>(vars)
            .map(Self::from)
    }
}

impl From<RawClientConfig> for ClientConfig {
    fn from(raw: RawClientConfig) -> Self {
        Self {
            backend_url: raw.backend_url.trim_end_matches('/').to_string(),
            data_dir: raw.data_dir,
            // Zero would spin the autosave task
            autosave_interval: Duration::from_secs(raw.autosave_secs.max(1)),
        }
    }
}
