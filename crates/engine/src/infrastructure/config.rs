//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};

pub const STORE_ENV: &str = "DNDHELPER_STORE";
pub const DATA_PATH_ENV: &str = "DNDHELPER_DATA_PATH";
pub const DEFAULT_DATA_PATH: &str = "./data/characters.json";

/// Which character repository to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    Memory,
    #[default]
    Json,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "json" | "file" => Ok(Self::Json),
            other => bail!("expected 'memory' or 'json', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreKind,
    /// Only used by the JSON store
    pub data_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(store) = lookup(STORE_ENV).filter(|s| !s.trim().is_empty()) {
            config.store = store
                .parse()
                .with_context(|| format!("invalid {}", STORE_ENV))?;
        }
        if let Some(path) = lookup(DATA_PATH_ENV).filter(|s| !s.trim().is_empty()) {
            config.data_path = PathBuf::from(path.trim());
        }

        Ok(config)
    }
}
