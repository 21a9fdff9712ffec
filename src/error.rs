//! Error types for the loading pipeline.

use thiserror::Error;

/// Failures of the remote problem source. Always recovered by falling back
/// to local data.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("remote returned HTTP {status}: {body}")]
  Status { status: reqwest::StatusCode, body: String },
  #[error("unexpected response format from problem source")]
  UnexpectedShape,
  #[error("no valid problems returned by problem source")]
  NoValidProblems,
}

/// Failures that abort a load or refresh.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("no valid problems in {source_name}")]
  Empty { source_name: String },
}
