use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tarifa_diff::DiffConfig;
use tarifa_transform::TransformConfig;
use tarifa_worker::WorkerConfig;

/// Settings for one CLI invocation, optionally read from a TOML file.
///
/// ```toml
/// store_dir = ".tarifa"
///
/// [transform.legacy_zero_policy]
/// kind = "fixed_positions"
/// positions = [1, 3]
///
/// [diff]
/// compared_columns = 5
///
/// [worker]
/// timeout_ms = 30000
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store_dir: PathBuf,
    pub transform: TransformConfig,
    pub diff: DiffConfig,
    pub worker: WorkerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".tarifa"),
            transform: TransformConfig::default(),
            diff: DiffConfig::default(),
            worker: WorkerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read `path` if given, otherwise use defaults. `store` overrides
    /// the configured store directory.
    pub fn load(path: Option<&Path>, store: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Self::default(),
        };
        if let Some(store) = store {
            config.store_dir = store.to_path_buf();
        }
        Ok(config)
    }
}
