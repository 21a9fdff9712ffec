//! Loading service configuration from TOML plus environment overrides.
//!
//! Schema:
//!
//! ```toml
//! [source]
//! endpoint = "http://localhost:3333"   # optional remote problem source
//! timeout_secs = 30
//! site = "leetcode.com"                # used to build URLs from slugs
//! dataset_path = "data/problems.json"  # optional override of the bundled set
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::normalize::DEFAULT_SITE;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct AtlasConfig {
  #[serde(default)]
  pub source: SourceConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
  pub endpoint: Option<String>,
  pub timeout_secs: u64,
  pub site: String,
  pub dataset_path: Option<PathBuf>,
}

impl Default for SourceConfig {
  fn default() -> Self {
    Self {
      endpoint: None,
      timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
      site: DEFAULT_SITE.into(),
      dataset_path: None,
    }
  }
}

impl AtlasConfig {
  /// Parses TOML. A zero `timeout_secs` would fail every fetch, so it is
  /// replaced by the default.
  pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
    let mut cfg: Self = toml::from_str(s)?;
    if cfg.source.timeout_secs == 0 {
      warn!(target: "pattern_atlas", "Ignoring timeout_secs = 0; using default");
      cfg.source.timeout_secs = DEFAULT_FETCH_TIMEOUT_SECS;
    }
    Ok(cfg)
  }

  /// Applies `LEETCODE_MCP_SERVER` and `FETCH_TIMEOUT_SECS` from `lookup`.
  pub fn apply_env<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(endpoint) = lookup("LEETCODE_MCP_SERVER").filter(|s| !s.trim().is_empty()) {
      self.source.endpoint = Some(endpoint.trim().to_string());
    }
    if let Some(raw) = lookup("FETCH_TIMEOUT_SECS") {
      match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => self.source.timeout_secs = secs,
        _ => warn!(target: "pattern_atlas", value = %raw, "Ignoring invalid FETCH_TIMEOUT_SECS"),
      }
    }
  }
}

/// Reads the TOML file named by ATLAS_CONFIG_PATH (if any), then applies env
/// overrides. IO or parse errors are logged and defaults are used instead.
pub fn load_config_from_env() -> AtlasConfig {
  let mut cfg = match std::env::var("ATLAS_CONFIG_PATH") {
    Ok(path) => load_config_file(&path).unwrap_or_default(),
    Err(_) => AtlasConfig::default(),
  };
  cfg.apply_env(|k| std::env::var(k).ok());
  cfg
}

fn load_config_file(path: &str) -> Option<AtlasConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match AtlasConfig::from_toml(&s) {
      Ok(cfg) => {
        info!(target: "pattern_atlas", %path, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "pattern_atlas", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "pattern_atlas", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
