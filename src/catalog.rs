//! Shared aggregate state: the current snapshot and the refresh path.
//!
//! A snapshot is immutable once built. Readers clone the `Arc` under a short
//! read lock; `refresh` builds a complete replacement outside that lock and
//! swaps it in under the write lock, so nobody observes a half-built
//! aggregate. Refreshes are serialized by their own mutex.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::aggregate::{build_category_summary, build_pattern_summary, CategorySummary, PatternSummary};
use crate::domain::Problem;
use crate::error::LoadError;
use crate::loader::{Loaded, Loader};
use crate::query::{answer_question, Answer};
use crate::tutorial::{compose_tutorial, Tutorial};

/// One complete pipeline run.
#[derive(Clone, Debug)]
pub struct Snapshot {
  pub problems: Vec<Problem>,
  pub categories: CategorySummary,
  pub patterns: PatternSummary,
  pub tutorial: Tutorial,
  pub source: String,
  pub refreshed_at: DateTime<Utc>,
  pub generation: Uuid,
}

/// Refresh metadata reported to callers.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RefreshInfo {
  pub source: String,
  pub last_refreshed: DateTime<Utc>,
  pub generation: Uuid,
  pub problem_count: usize,
}

impl Snapshot {
  /// Runs aggregation and tutorial composition over loaded problems.
  pub fn build(loaded: Loaded, refreshed_at: DateTime<Utc>) -> Self {
    let categories = build_category_summary(&loaded.problems);
    let patterns = build_pattern_summary(&loaded.problems);
    let tutorial = compose_tutorial(&categories, &patterns);
    Self {
      problems: loaded.problems,
      categories,
      patterns,
      tutorial,
      source: loaded.source,
      refreshed_at,
      generation: Uuid::new_v4(),
    }
  }

  pub fn info(&self) -> RefreshInfo {
    RefreshInfo {
      source: self.source.clone(),
      last_refreshed: self.refreshed_at,
      generation: self.generation,
      problem_count: self.problems.len(),
    }
  }

  pub fn answer(&self, question: &str) -> Answer {
    answer_question(question, &self.categories, &self.patterns, &self.problems)
  }
}

pub struct Catalog {
  loader: Loader,
  current: RwLock<Arc<Snapshot>>,
  refresh_lock: Mutex<()>,
}

impl Catalog {
  /// Performs the initial load. An empty local dataset is a hard failure.
  #[instrument(level = "info", skip_all)]
  pub async fn load(loader: Loader) -> Result<Self, LoadError> {
    let loaded = loader.load().await?;
    let snapshot = Snapshot::build(loaded, now());
    log_inventory(&snapshot);
    Ok(Self {
      loader,
      current: RwLock::new(Arc::new(snapshot)),
      refresh_lock: Mutex::new(()),
    })
  }

  pub async fn snapshot(&self) -> Arc<Snapshot> {
    self.current.read().await.clone()
  }

  pub async fn answer(&self, question: &str) -> Answer {
    self.snapshot().await.answer(question)
  }

  /// Reloads and rebuilds everything. On failure the previous snapshot stays.
  #[instrument(level = "info", skip_all)]
  pub async fn refresh(&self) -> Result<RefreshInfo, LoadError> {
    let _guard = self.refresh_lock.lock().await;
    let loaded = self.loader.load().await?;

    // Keep timestamps monotonic even if the wall clock steps back.
    let previous = self.snapshot().await.refreshed_at;
    let snapshot = Arc::new(Snapshot::build(loaded, now().max(previous)));
    log_inventory(&snapshot);

    let info = snapshot.info();
    *self.current.write().await = snapshot;
    info!(target: "catalog", generation = %info.generation, source = %info.source, "Aggregate refreshed");
    Ok(info)
  }
}

fn now() -> DateTime<Utc> {
  Utc::now().trunc_subsecs(0)
}

fn log_inventory(s: &Snapshot) {
  info!(
    target: "catalog",
    generation = %s.generation,
    source = %s.source,
    problems = s.problems.len(),
    topics = s.categories.len(),
    patterns = s.patterns.len(),
    "Aggregate built"
  );
}
