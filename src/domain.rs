//! Domain models: canonical problem records, difficulty levels, and the
//! excerpts handed out by the aggregator and query engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Summary used when a raw record carries no description of its own.
pub const PLACEHOLDER_SUMMARY: &str = "Generated from leetcode-mcp-server data.";
pub const DEFAULT_TOPIC: &str = "General";
pub const DEFAULT_PATTERN: &str = "General Strategy";

/// Canonical difficulty. Serialized as its display name ("Easy", ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
  #[default]
  Unknown,
}

impl Difficulty {
  pub fn as_str(self) -> &'static str {
    match self {
      Difficulty::Easy => "Easy",
      Difficulty::Medium => "Medium",
      Difficulty::Hard => "Hard",
      Difficulty::Unknown => "Unknown",
    }
  }

  /// Case-insensitive name lookup; anything unrecognised is `Unknown`.
  pub fn from_name(name: &str) -> Self {
    match name.trim().to_ascii_lowercase().as_str() {
      "easy" => Difficulty::Easy,
      "medium" => Difficulty::Medium,
      "hard" => Difficulty::Hard,
      _ => Difficulty::Unknown,
    }
  }

  /// LeetCode numeric levels: 1 easy, 2 medium, 3 hard.
  pub fn from_level(level: i64) -> Self {
    match level {
      1 => Difficulty::Easy,
      2 => Difficulty::Medium,
      3 => Difficulty::Hard,
      _ => Difficulty::Unknown,
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Canonical problem record produced by the normalizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
  pub id: String,
  pub title: String,
  pub url: String,
  pub difficulty: Difficulty,
  pub topic: String,
  pub patterns: Vec<String>,
  pub summary: String,
  #[serde(default)]
  pub key_steps: Vec<String>,
}

/// Example entry kept per pattern for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProblemExcerpt {
  pub id: String,
  pub title: String,
  pub difficulty: Difficulty,
  pub topic: String,
  pub url: String,
  pub summary: String,
}

impl From<&Problem> for ProblemExcerpt {
  fn from(p: &Problem) -> Self {
    Self {
      id: p.id.clone(),
      title: p.title.clone(),
      difficulty: p.difficulty,
      topic: p.topic.clone(),
      url: p.url.clone(),
      summary: p.summary.clone(),
    }
  }
}

/// Short form returned alongside query answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RelatedProblem {
  pub id: String,
  pub title: String,
  pub difficulty: Difficulty,
  pub topic: String,
  pub url: String,
}

impl From<&Problem> for RelatedProblem {
  fn from(p: &Problem) -> Self {
    Self {
      id: p.id.clone(),
      title: p.title.clone(),
      difficulty: p.difficulty,
      topic: p.topic.clone(),
      url: p.url.clone(),
    }
  }
}
