//! Per-topic and per-pattern summaries over the canonical problem list.
//!
//! Every ordering here is a stable sort over first-seen order, so ties
//! always resolve to insertion order and a fixed input gives a fixed output.
//! The summaries serialize as JSON objects whose key order is that ordering.

use std::collections::HashMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::domain::{Problem, ProblemExcerpt};

/// Examples kept per pattern.
pub const MAX_PATTERN_EXAMPLES: usize = 5;

/// Ordered `name -> count` table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally(Vec<(String, usize)>);

impl Tally {
  fn bump(&mut self, key: &str) {
    match self.0.iter_mut().find(|(k, _)| k == key) {
      Some((_, n)) => *n += 1,
      None => self.0.push((key.to_string(), 1)),
    }
  }

  fn sort_by_count(&mut self) {
    self.0.sort_by(|a, b| b.1.cmp(&a.1));
  }

  fn sort_by_key(&mut self) {
    self.0.sort_by(|a, b| a.0.cmp(&b.0));
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(|(k, _)| k.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
    self.0.iter().map(|(k, n)| (k.as_str(), *n))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// First `n` keys, in table order.
  pub fn top(&self, n: usize) -> Vec<String> {
    self.keys().take(n).map(str::to_string).collect()
  }
}

impl Serialize for Tally {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (k, n) in self.iter() {
      map.serialize_entry(k, &n)?;
    }
    map.end()
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
  #[serde(skip)]
  pub topic: String,
  pub count: usize,
  pub difficulties: Tally,
  pub patterns: Tally,
}

/// Topic summaries, most common topic first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategorySummary {
  entries: Vec<CategoryEntry>,
}

impl CategorySummary {
  pub fn get(&self, topic: &str) -> Option<&CategoryEntry> {
    self.entries.iter().find(|e| e.topic == topic)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, CategoryEntry> {
    self.entries.iter()
  }

  pub fn topics(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|e| e.topic.as_str())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }
}

impl Serialize for CategorySummary {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for e in &self.entries {
      map.serialize_entry(&e.topic, e)?;
    }
    map.end()
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatternEntry {
  #[serde(skip)]
  pub name: String,
  pub count: usize,
  pub topics: Tally,
  pub examples: Vec<ProblemExcerpt>,
  pub why_it_matters: String,
}

/// Pattern summaries, most used pattern first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternSummary {
  entries: Vec<PatternEntry>,
}

impl PatternSummary {
  pub fn get(&self, pattern: &str) -> Option<&PatternEntry> {
    self.entries.iter().find(|e| e.name == pattern)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, PatternEntry> {
    self.entries.iter()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|e| e.name.as_str())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }
}

impl Serialize for PatternSummary {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for e in &self.entries {
      map.serialize_entry(&e.name, e)?;
    }
    map.end()
  }
}

pub fn why_it_matters(count: usize, topic_count: usize) -> String {
  format!("Appears in {} problems across {} topic(s).", count, topic_count)
}

pub fn build_category_summary(problems: &[Problem]) -> CategorySummary {
  let mut index: HashMap<&str, usize> = HashMap::new();
  let mut entries: Vec<CategoryEntry> = Vec::new();

  for p in problems {
    let slot = *index.entry(p.topic.as_str()).or_insert_with(|| {
      entries.push(CategoryEntry {
        topic: p.topic.clone(),
        count: 0,
        difficulties: Tally::default(),
        patterns: Tally::default(),
      });
      entries.len() - 1
    });
    let entry = &mut entries[slot];
    entry.count += 1;
    entry.difficulties.bump(p.difficulty.as_str());
    for pattern in &p.patterns {
      entry.patterns.bump(pattern);
    }
  }

  for e in &mut entries {
    e.difficulties.sort_by_key();
    e.patterns.sort_by_count();
  }
  entries.sort_by(|a, b| b.count.cmp(&a.count));
  CategorySummary { entries }
}

pub fn build_pattern_summary(problems: &[Problem]) -> PatternSummary {
  let mut index: HashMap<&str, usize> = HashMap::new();
  let mut entries: Vec<PatternEntry> = Vec::new();

  for p in problems {
    for pattern in &p.patterns {
      let slot = *index.entry(pattern.as_str()).or_insert_with(|| {
        entries.push(PatternEntry {
          name: pattern.clone(),
          count: 0,
          topics: Tally::default(),
          examples: Vec::new(),
          why_it_matters: String::new(),
        });
        entries.len() - 1
      });
      let entry = &mut entries[slot];
      entry.count += 1;
      entry.topics.bump(&p.topic);
      if entry.examples.len() < MAX_PATTERN_EXAMPLES {
        entry.examples.push(ProblemExcerpt::from(p));
      }
    }
  }

  for e in &mut entries {
    e.topics.sort_by_count();
    e.why_it_matters = why_it_matters(e.count, e.topics.len());
  }
  entries.sort_by(|a, b| b.count.cmp(&a.count));
  PatternSummary { entries }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::domain::Difficulty;
  use proptest::prelude::*;

  pub(crate) fn problem(id: &str, topic: &str, difficulty: Difficulty, patterns: &[&str]) -> Problem {
    Problem {
      id: id.into(),
      title: format!("Problem {}", id),
      url: format!("https://leetcode.com/problems/{}/", id),
      difficulty,
      topic: topic.into(),
      patterns: patterns.iter().map(|s| s.to_string()).collect(),
      summary: format!("Summary of {}", id),
      key_steps: vec![],
    }
  }

  #[test]
  fn two_array_problems_count_two() {
    let problems = vec![
      problem("a", "Array", Difficulty::Easy, &["Hash Map"]),
      problem("b", "Array", Difficulty::Medium, &["Two Pointers"]),
    ];
    let cats = build_category_summary(&problems);
    assert_eq!(cats.len(), 1);
    assert_eq!(cats.get("Array").unwrap().count, 2);
  }

  #[test]
  fn category_orderings() {
    let problems = vec![
      problem("1", "String", Difficulty::Medium, &["Sliding Window"]),
      problem("2", "Array", Difficulty::Hard, &["Two Pointers", "Sorting"]),
      problem("3", "Array", Difficulty::Easy, &["Sorting"]),
      problem("4", "Graph", Difficulty::Medium, &["BFS"]),
      problem("5", "Array", Difficulty::Easy, &["Hash Map"]),
    ];
    let cats = build_category_summary(&problems);
    let topics: Vec<&str> = cats.topics().collect();
    // String and Graph tie at one; String was seen first.
    assert_eq!(topics, vec!["Array", "String", "Graph"]);

    let array = cats.get("Array").unwrap();
    let diffs: Vec<(&str, usize)> = array.difficulties.iter().collect();
    assert_eq!(diffs, vec![("Easy", 2), ("Hard", 1)]);
    let pats: Vec<&str> = array.patterns.keys().collect();
    assert_eq!(pats, vec!["Sorting", "Two Pointers", "Hash Map"]);
  }

  #[test]
  fn pattern_examples_are_capped_in_first_seen_order() {
    let problems: Vec<Problem> = (0..9)
      .map(|i| problem(&format!("p{}", i), if i % 2 == 0 { "Array" } else { "Tree" }, Difficulty::Easy, &["DFS"]))
      .collect();
    let pats = build_pattern_summary(&problems);
    let dfs = pats.get("DFS").unwrap();
    assert_eq!(dfs.count, 9);
    assert_eq!(dfs.examples.len(), MAX_PATTERN_EXAMPLES);
    let ids: Vec<&str> = dfs.examples.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["p0", "p1", "p2", "p3", "p4"]);
    assert_eq!(dfs.examples[0].summary, "Summary of p0");
    let topics: Vec<(&str, usize)> = dfs.topics.iter().collect();
    assert_eq!(topics, vec![("Array", 5), ("Tree", 4)]);
    assert_eq!(dfs.why_it_matters, "Appears in 9 problems across 2 topic(s).");
  }

  #[test]
  fn empty_input_gives_empty_summaries() {
    assert_eq!(build_category_summary(&[]).len(), 0);
    assert_eq!(build_pattern_summary(&[]).len(), 0);
  }

  #[test]
  fn summaries_serialize_as_ordered_objects() {
    let problems = vec![
      problem("1", "Tree", Difficulty::Easy, &["DFS"]),
      problem("2", "Array", Difficulty::Medium, &["Binary Search"]),
      problem("3", "Array", Difficulty::Easy, &["Binary Search"]),
    ];
    let json = serde_json::to_string(&build_category_summary(&problems)).unwrap();
    assert!(json.starts_with(r#"{"Array":{"count":2,"difficulties":{"Easy":1,"Medium":1},"patterns":{"Binary Search":2}}"#));
    assert!(json.find("\"Tree\"").unwrap() > json.find("\"Array\"").unwrap());

    let json = serde_json::to_value(&build_pattern_summary(&problems)).unwrap();
    assert_eq!(json["Binary Search"]["count"], 2);
    assert_eq!(json["Binary Search"]["examples"][0]["difficulty"], "Medium");
    assert!(json["DFS"]["why_it_matters"].as_str().unwrap().contains("1 problems"));
  }

  fn arb_problems() -> impl Strategy<Value = Vec<Problem>> {
    let topics = prop::sample::select(vec!["Array", "Graph", "Tree", "String"]);
    let patterns = prop::collection::vec(
      prop::sample::select(vec!["DFS", "BFS", "Two Pointers", "Dynamic Programming", "Greedy"]),
      1..4,
    );
    let diffs = prop::sample::select(vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Unknown]);
    prop::collection::vec((topics, patterns, diffs), 0..60).prop_map(|rows| {
      rows
        .into_iter()
        .enumerate()
        .map(|(i, (t, ps, d))| problem(&i.to_string(), t, d, &ps))
        .collect()
    })
  }

  proptest! {
    #[test]
    fn category_counts_sum_to_problem_count(problems in arb_problems()) {
      let cats = build_category_summary(&problems);
      let total: usize = cats.iter().map(|e| e.count).sum();
      prop_assert_eq!(total, problems.len());
      for e in cats.iter() {
        prop_assert!(e.count >= 1);
      }
    }

    #[test]
    fn pattern_counts_sum_to_fan_out(problems in arb_problems()) {
      let pats = build_pattern_summary(&problems);
      let total: usize = pats.iter().map(|e| e.count).sum();
      let fan_out: usize = problems.iter().map(|p| p.patterns.len()).sum();
      prop_assert_eq!(total, fan_out);
      for e in pats.iter() {
        prop_assert!(e.examples.len() <= MAX_PATTERN_EXAMPLES);
      }
    }

    #[test]
    fn summaries_are_deterministic(problems in arb_problems()) {
      prop_assert_eq!(build_category_summary(&problems), build_category_summary(&problems));
      prop_assert_eq!(build_pattern_summary(&problems), build_pattern_summary(&problems));
    }
  }
}
