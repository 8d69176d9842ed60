//! Application configuration from the environment.

use career_core::{CareerCatalog, EngineConfig};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "career_agent.db";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// YAML catalog; the built-in tracks when unset
    pub catalog_path: Option<PathBuf>,
    /// YAML engine config; defaults when unset
    pub engine_config_path: Option<PathBuf>,
    /// Fixed rng seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            catalog_path: None,
            engine_config_path: None,
            seed: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = lookup("CAREER_SEED").and_then(|raw| match raw.trim().parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                log::warn!("Ignoring invalid CAREER_SEED '{}'", raw);
                None
            }
        });

        Self {
            db_path: lookup("CAREER_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            catalog_path: lookup("CAREER_CATALOG").map(PathBuf::from),
            engine_config_path: lookup("CAREER_ENGINE_CONFIG").map(PathBuf::from),
            seed,
        }
    }

    pub fn load_catalog(&self) -> career_core::Result<CareerCatalog> {
        match &self.catalog_path {
            Some(path) => CareerCatalog::load(path),
            None => Ok(CareerCatalog::builtin()),
        }
    }

    pub fn load_engine_config(&self) -> career_core::Result<EngineConfig> {
        match &self.engine_config_path {
            Some(path) => EngineConfig::load(path),
            None => Ok(EngineConfig::default()),
        }
    }
}
