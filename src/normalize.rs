//! Raw record normalization.
//!
//! Upstream sources disagree on key names, so every canonical field is read
//! through an ordered list of candidate keys. The first *present* value wins:
//! not null, not false, not zero, not blank, not an empty array or object.

use serde_json::{Map, Value};

use crate::domain::{Difficulty, Problem, DEFAULT_PATTERN, DEFAULT_TOPIC, PLACEHOLDER_SUMMARY};

pub const DEFAULT_SITE: &str = "leetcode.com";

const ID_KEYS: &[&str] = &["id", "questionId", "frontendQuestionId"];
const SLUG_KEYS: &[&str] = &["slug", "titleSlug"];
const TITLE_KEYS: &[&str] = &["title", "name", "question"];
const TOPIC_KEYS: &[&str] = &["topic", "topics", "category", "categoryTags", "tags", "topicTags"];
const PATTERN_KEYS: &[&str] = &["patterns", "patternTags", "techniques", "strategies"];
const SUMMARY_KEYS: &[&str] = &["summary", "synopsis", "description", "shortDescription"];
const STEP_KEYS: &[&str] = &["key_steps", "hints", "solutionOutline"];
const DIFFICULTY_KEYS: &[&str] = &["difficulty", "level", "difficultyLevel"];

/// Converts loosely-shaped records into [`Problem`]s. Holds the site used to
/// synthesize problem URLs from slugs.
#[derive(Clone, Debug)]
pub struct Normalizer {
  site: String,
}

impl Default for Normalizer {
  fn default() -> Self {
    Self::new(DEFAULT_SITE)
  }
}

impl Normalizer {
  pub fn new(site: impl Into<String>) -> Self {
    let site = site.into();
    let site = site
      .trim()
      .trim_start_matches("https://")
      .trim_start_matches("http://")
      .trim_end_matches('/')
      .to_string();
    Self { site }
  }

  /// Returns `None` for non-objects and for records lacking a title or any
  /// way to build a URL.
  pub fn normalize(&self, raw: &Value) -> Option<Problem> {
    let entry = raw.as_object()?;

    let slug = first_text(entry, SLUG_KEYS);
    let title = first_text(entry, TITLE_KEYS)?;
    let url = match first_text(entry, &["url"]) {
      Some(url) => url,
      None => format!("https://{}/problems/{}/", self.site, slug.as_deref()?),
    };

    let id = first_text(entry, ID_KEYS)
      .or_else(|| slug.clone())
      .unwrap_or_else(|| title.clone());

    let topics = to_list(first_present(entry, TOPIC_KEYS));
    let mut patterns = to_list(first_present(entry, PATTERN_KEYS));
    if patterns.is_empty() {
      patterns.push(DEFAULT_PATTERN.to_string());
    }

    let summary = first_text(entry, SUMMARY_KEYS)
      .unwrap_or_else(|| PLACEHOLDER_SUMMARY.to_string());

    Some(Problem {
      id,
      title,
      url,
      difficulty: first_present(entry, DIFFICULTY_KEYS)
        .map(difficulty_of)
        .unwrap_or_default(),
      topic: topics
        .into_iter()
        .next()
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
      patterns,
      summary,
      key_steps: to_list(first_present(entry, STEP_KEYS)),
    })
  }

  /// Normalizes a batch, silently dropping records that fail.
  pub fn normalize_all<'a, I>(&self, raw: I) -> Vec<Problem>
  where
    I: IntoIterator<Item = &'a Value>,
  {
    let mut dropped = 0usize;
    let problems: Vec<Problem> = raw
      .into_iter()
      .filter_map(|r| {
        let p = self.normalize(r);
        if p.is_none() {
          dropped += 1;
        }
        p
      })
      .collect();
    if dropped > 0 {
      tracing::debug!(target: "catalog", dropped, kept = problems.len(), "Dropped malformed raw records");
    }
    problems
  }
}

/// Normalizes with the default site.
#[allow(dead_code)]
pub fn normalize(raw: &Value) -> Option<Problem> {
  Normalizer::default().normalize(raw)
}

fn is_present(v: &Value) -> bool {
  match v {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
    Value::String(s) => !s.trim().is_empty(),
    Value::Array(a) => !a.is_empty(),
    Value::Object(o) => !o.is_empty(),
  }
}

fn first_present<'a>(entry: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
  keys.iter().filter_map(|k| entry.get(*k)).find(|v| is_present(v))
}

/// First present value under `keys` that reads as text. Arrays and objects
/// are skipped so later keys still get a chance.
fn first_text(entry: &Map<String, Value>, keys: &[&str]) -> Option<String> {
  keys
    .iter()
    .filter_map(|k| entry.get(*k))
    .filter(|v| is_present(v))
    .find_map(scalar_text)
}

/// Text for scalar values; arrays and objects have no scalar reading.
fn scalar_text(v: &Value) -> Option<String> {
  match v {
    Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

/// Text for a list item. Tag objects (`{"name": "Array", "slug": "array"}`)
/// read as their name.
fn item_text(v: &Value) -> Option<String> {
  if !is_present(v) {
    return None;
  }
  match v {
    Value::Object(o) => match o.get("name").and_then(scalar_text) {
      Some(name) => Some(name),
      None => Some(v.to_string()),
    },
    Value::Bool(b) => Some(b.to_string()),
    Value::Array(_) => Some(v.to_string()),
    _ => scalar_text(v),
  }
}

/// List coercion, in order: absent, string, object values, array items.
/// Other scalars give an empty list.
fn to_list(v: Option<&Value>) -> Vec<String> {
  match v {
    None => Vec::new(),
    Some(Value::String(s)) => vec![s.trim().to_string()],
    Some(Value::Object(o)) => o.values().filter_map(item_text).collect(),
    Some(Value::Array(items)) => items.iter().filter_map(item_text).collect(),
    Some(_) => Vec::new(),
  }
}

fn difficulty_of(v: &Value) -> Difficulty {
  match v {
    Value::String(s) => Difficulty::from_name(s),
    Value::Number(n) => n.as_i64().map(Difficulty::from_level).unwrap_or_default(),
    Value::Object(o) => o
      .get("level")
      .and_then(Value::as_i64)
      .map(Difficulty::from_level)
      .unwrap_or_default(),
    _ => Difficulty::Unknown,
  }
}
