//! Problem loading: optional remote source first, then local data.
//!
//! A remote failure of any kind is logged and answered with local data. The
//! bundled dataset is the last resort and is trusted to parse; only an empty
//! result after normalizing local data aborts the load.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::config::SourceConfig;
use crate::dataset::{bundled_records, records_from_payload, BUNDLED_DATASET_NAME};
use crate::domain::Problem;
use crate::error::{FetchError, LoadError};
use crate::normalize::Normalizer;

/// Problems plus a human-readable description of where they came from.
#[derive(Clone, Debug)]
pub struct Loaded {
  pub problems: Vec<Problem>,
  pub source: String,
}

/// HTTP client for a remote problem source serving `GET <endpoint>/problems`.
#[derive(Clone)]
pub struct RemoteSource {
  client: reqwest::Client,
  pub endpoint: String,
}

impl RemoteSource {
  pub fn new(endpoint: &str, timeout: Duration) -> Option<Self> {
    let client = match reqwest::Client::builder().timeout(timeout).build() {
      Ok(c) => c,
      Err(e) => {
        error!(target: "pattern_atlas", error = %e, "Failed to build HTTP client; remote source disabled");
        return None;
      }
    };
    Some(Self { client, endpoint: endpoint.trim_end_matches('/').to_string() })
  }

  pub fn describe(&self) -> String {
    format!("remote endpoint ({})", self.endpoint)
  }

  #[instrument(level = "info", skip(self, normalizer), fields(endpoint = %self.endpoint))]
  pub async fn fetch(&self, normalizer: &Normalizer) -> Result<Vec<Problem>, FetchError> {
    let url = format!("{}/problems", self.endpoint);
    info!(target: "pattern_atlas", %url, "Fetching problems from remote source");

    let res = self
      .client
      .get(&url)
      .header(ACCEPT, "application/json")
      .header(USER_AGENT, "pattern-atlas/0.1")
      .send()
      .await?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      return Err(FetchError::Status { status, body: truncate(&body, 200) });
    }

    let payload: Value = res.json().await?;
    let records = records_from_payload(payload).ok_or(FetchError::UnexpectedShape)?;
    let problems = normalizer.normalize_all(&records);
    if problems.is_empty() {
      return Err(FetchError::NoValidProblems);
    }
    info!(target: "pattern_atlas", count = problems.len(), "Loaded problems from remote source");
    Ok(problems)
  }
}

#[derive(Clone)]
pub struct Loader {
  normalizer: Normalizer,
  remote: Option<RemoteSource>,
  dataset_path: Option<PathBuf>,
}

impl Loader {
  pub fn from_config(cfg: &SourceConfig) -> Self {
    let remote = cfg
      .endpoint
      .as_deref()
      .and_then(|e| RemoteSource::new(e, Duration::from_secs(cfg.timeout_secs)));
    Self {
      normalizer: Normalizer::new(cfg.site.clone()),
      remote,
      dataset_path: cfg.dataset_path.clone(),
    }
  }

  #[instrument(level = "info", skip_all)]
  pub async fn load(&self) -> Result<Loaded, LoadError> {
    if let Some(remote) = &self.remote {
      match remote.fetch(&self.normalizer).await {
        Ok(problems) => return Ok(Loaded { problems, source: remote.describe() }),
        Err(e) => {
          warn!(target: "pattern_atlas", endpoint = %remote.endpoint, error = %e, "Falling back to local dataset because remote fetch failed");
        }
      }
    }

    let (records, source) = self.local_records().await;
    let problems = self.normalizer.normalize_all(&records);
    if problems.is_empty() {
      return Err(LoadError::Empty { source_name: source });
    }
    info!(target: "catalog", count = problems.len(), %source, "Loaded problems from local data");
    Ok(Loaded { problems, source })
  }

  async fn local_records(&self) -> (Vec<Value>, String) {
    if let Some(path) = &self.dataset_path {
      match read_dataset_file(path).await {
        Ok(records) => return (records, format!("local dataset ({})", path.display())),
        Err(e) => {
          error!(target: "catalog", path = %path.display(), error = %e, "Dataset file unusable; using bundled dataset");
        }
      }
    }
    (bundled_records(), format!("local dataset ({})", BUNDLED_DATASET_NAME))
  }
}

async fn read_dataset_file(path: &Path) -> Result<Vec<Value>, String> {
  let text = tokio::fs::read_to_string(path).await.map_err(|e| e.to_string())?;
  let payload: Value = serde_json::from_str(&text).map_err(|e| e.to_string())?;
  records_from_payload(payload).ok_or_else(|| "expected an array or an object with `problems`".to_string())
}

fn truncate(s: &str, max: usize) -> String {
  match s.char_indices().nth(max) {
    Some((idx, _)) => format!("{}…", &s[..idx]),
    None => s.to_string(),
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use std::io::Write;
  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::TcpListener;

  /// Serves exactly one canned HTTP response and returns the base URL.
  pub(crate) async fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      if let Ok((mut sock, _)) = listener.accept().await {
        let mut buf = [0u8; 4096];
        let _ = sock.read(&mut buf).await;
        let response = format!(
          "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
          status_line,
          body.len(),
          body
        );
        let _ = sock.write_all(response.as_bytes()).await;
        let _ = sock.shutdown().await;
      }
    });
    format!("http://{}", addr)
  }

  fn config(endpoint: Option<String>, dataset_path: Option<PathBuf>) -> SourceConfig {
    SourceConfig { endpoint, timeout_secs: 5, dataset_path, ..SourceConfig::default() }
  }

  #[tokio::test]
  async fn local_dataset_without_endpoint() {
    let loaded = Loader::from_config(&config(None, None)).load().await.unwrap();
    assert_eq!(loaded.source, "local dataset (data/problems.json)");
    assert!(!loaded.problems.is_empty());
  }

  #[tokio::test]
  async fn remote_problems_wrapped_in_object() {
    let body = r#"{"problems": [{"title": "Two Sum", "titleSlug": "two-sum", "difficulty": "Easy"}, {"bogus": true}]}"#;
    let endpoint = serve_once("200 OK", body.to_string()).await;
    let loaded = Loader::from_config(&config(Some(format!("{}/", endpoint)), None)).load().await.unwrap();
    assert_eq!(loaded.source, format!("remote endpoint ({})", endpoint));
    assert_eq!(loaded.problems.len(), 1);
    assert_eq!(loaded.problems[0].url, "https://leetcode.com/problems/two-sum/");
  }

  #[tokio::test]
  async fn remote_error_status_falls_back() {
    let endpoint = serve_once("503 Service Unavailable", "{}".to_string()).await;
    let loaded = Loader::from_config(&config(Some(endpoint), None)).load().await.unwrap();
    assert!(loaded.source.starts_with("local dataset"));
  }

  #[tokio::test]
  async fn remote_without_valid_records_falls_back() {
    let endpoint = serve_once("200 OK", r#"[{"slug": "no-title"}]"#.to_string()).await;
    let loaded = Loader::from_config(&config(Some(endpoint), None)).load().await.unwrap();
    assert!(loaded.source.starts_with("local dataset"));
  }

  #[tokio::test]
  async fn unreachable_remote_falls_back() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let loaded = Loader::from_config(&config(Some(format!("http://{}", addr)), None)).load().await.unwrap();
    assert_eq!(loaded.source, "local dataset (data/problems.json)");
  }

  #[tokio::test]
  async fn dataset_file_override() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, r#"[{{"title": "Only One", "slug": "only-one", "topic": "Math"}}]"#).unwrap();
    let path = f.path().to_path_buf();
    let loaded = Loader::from_config(&config(None, Some(path.clone()))).load().await.unwrap();
    assert_eq!(loaded.source, format!("local dataset ({})", path.display()));
    assert_eq!(loaded.problems.len(), 1);
    assert_eq!(loaded.problems[0].topic, "Math");
  }

  #[tokio::test]
  async fn broken_dataset_file_uses_bundled() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, "not json").unwrap();
    let loaded = Loader::from_config(&config(None, Some(f.path().to_path_buf()))).load().await.unwrap();
    assert_eq!(loaded.source, "local dataset (data/problems.json)");
  }

  #[tokio::test]
  async fn empty_local_data_is_a_load_error() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, r#"[{{"difficulty": "Easy"}}]"#).unwrap();
    let err = Loader::from_config(&config(None, Some(f.path().to_path_buf()))).load().await.unwrap_err();
    assert!(matches!(err, LoadError::Empty { .. }));
  }

  #[test]
  fn truncate_respects_char_boundaries() {
    assert_eq!(truncate("héllo", 2), "hé…");
    assert_eq!(truncate("short", 10), "short");
  }
}
