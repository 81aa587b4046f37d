//! Engine configuration.
//!
//! The only things that vary between deployments are the tariff table
//! and the pricing policy.  Both can be named in a small JSON file:
//!
//! ```json
//! { "policy": "markup-with-exemptions", "tariffPath": "tariffs/2024.json" }
//! ```

use crate::tax::PolicyKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub policy: PolicyKind,
    /// Tariff table to load instead of the compiled-in one.  Relative
    /// paths are resolved against the directory of the config file.
    pub tariff_path: Option<PathBuf>,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<EngineConfig> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading engine config {}", path.display()))?;
        let mut config = serde_json::from_str::<EngineConfig>(&data)
            .with_context(|| format!("parsing engine config {}", path.display()))?;
        if let (Some(tariff), Some(dir)) = (&config.tariff_path, path.parent()) {
            if tariff.is_relative() {
                config.tariff_path = Some(dir.join(tariff));
            }
        }
        Ok(config)
    }
}
