//! Pattern Atlas · practice-problem aggregator
//!
//! - Normalizes problem records from a remote source or the bundled dataset
//! - Summarizes topics and patterns, composes a study outline
//! - Answers keyword questions over a JSON-lines session on stdin/stdout
//!
//! Important env variables:
//!   ATLAS_CONFIG_PATH   : path to TOML config (see `config`)
//!   LEETCODE_MCP_SERVER : remote problem source base URL
//!   FETCH_TIMEOUT_SECS  : remote fetch timeout (default 30)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod aggregate;
mod catalog;
mod config;
mod dataset;
mod domain;
mod error;
mod loader;
mod normalize;
mod protocol;
mod query;
mod session;
mod telemetry;
mod tutorial;

use tokio::io::BufReader;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::load_config_from_env;
use crate::loader::Loader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = load_config_from_env();
  info!(
    target: "pattern_atlas",
    endpoint = cfg.source.endpoint.as_deref().unwrap_or("-"),
    timeout_secs = cfg.source.timeout_secs,
    site = %cfg.source.site,
    "Configuration resolved"
  );

  let catalog = Catalog::load(Loader::from_config(&cfg.source)).await?;

  let stdin = BufReader::new(tokio::io::stdin());
  let stdout = tokio::io::stdout();
  tokio::select! {
    res = session::run_session(stdin, stdout, &catalog) => res?,
    _ = tokio::signal::ctrl_c() => {
      warn!(target: "pattern_atlas", "Interrupted; shutting down");
    }
  }
  Ok(())
}
