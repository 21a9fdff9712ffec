//! Keyword question answering over the current aggregate.
//!
//! Matching is plain substring containment of each lowercased topic or
//! pattern name inside the lowercased question. The reverse direction
//! (question inside name) is never tested.

use std::collections::HashSet;

use serde::Serialize;

use crate::aggregate::{CategorySummary, PatternSummary};
use crate::domain::{Difficulty, Problem, RelatedProblem};

pub const MAX_RELATED: usize = 8;

pub const GUIDANCE_ANSWER: &str =
  "Try asking about a topic (e.g. dynamic programming) or a specific pattern (e.g. sliding window).";
pub const NO_MATCH_ANSWER: &str =
  "I could not find an exact match. Try referencing a topic (array, graph) or a pattern (two pointers, dynamic programming).";
const DIFFICULTY_ONLY_ANSWER: &str =
  "Here are problems matching your query. Consider refining the question with a topic or pattern keyword for deeper insights.";

const DIFFICULTY_WORDS: &[(&str, Difficulty)] = &[
  ("easy", Difficulty::Easy),
  ("medium", Difficulty::Medium),
  ("hard", Difficulty::Hard),
];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Answer {
  pub answer: String,
  pub related_problems: Vec<RelatedProblem>,
  pub topic_hits: Vec<String>,
  pub pattern_hits: Vec<String>,
}

impl Answer {
  fn fixed(text: &str, topic_hits: Vec<String>, pattern_hits: Vec<String>) -> Self {
    Self { answer: text.to_string(), related_problems: Vec::new(), topic_hits, pattern_hits }
  }
}

pub fn answer_question(
  question: &str,
  categories: &CategorySummary,
  patterns: &PatternSummary,
  problems: &[Problem],
) -> Answer {
  let normalized = question.trim().to_lowercase();
  if normalized.is_empty() {
    return Answer::fixed(GUIDANCE_ANSWER, Vec::new(), Vec::new());
  }

  let topic_hits: Vec<String> = categories
    .topics()
    .filter(|t| normalized.contains(&t.to_lowercase()))
    .map(str::to_string)
    .collect();
  let pattern_hits: Vec<String> = patterns
    .names()
    .filter(|p| normalized.contains(&p.to_lowercase()))
    .map(str::to_string)
    .collect();

  let related: Vec<&Problem> = if !topic_hits.is_empty() || !pattern_hits.is_empty() {
    problems
      .iter()
      .filter(|p| topic_hits.contains(&p.topic) || p.patterns.iter().any(|x| pattern_hits.contains(x)))
      .collect()
  } else {
    let wanted: HashSet<Difficulty> = DIFFICULTY_WORDS
      .iter()
      .filter(|(word, _)| normalized.contains(word))
      .map(|(_, d)| *d)
      .collect();
    problems.iter().filter(|p| wanted.contains(&p.difficulty)).collect()
  };

  if related.is_empty() {
    return Answer::fixed(NO_MATCH_ANSWER, topic_hits, pattern_hits);
  }

  let mut parts: Vec<String> = Vec::new();
  for topic in &topic_hits {
    if let Some(c) = categories.get(topic) {
      let common = c.patterns.top(3);
      parts.push(format!(
        "For {} problems, focus on {}. Common patterns: {}.",
        topic,
        c.difficulties.keys().collect::<Vec<_>>().join(", "),
        if common.is_empty() { "varied techniques".to_string() } else { common.join(", ") },
      ));
    }
  }
  for pattern in &pattern_hits {
    if let Some(p) = patterns.get(pattern) {
      parts.push(format!(
        "{} appears in {} problems across {} topic(s). Practice with examples like {}.",
        pattern,
        p.count,
        p.topics.len(),
        p.examples.iter().take(2).map(|e| e.title.as_str()).collect::<Vec<_>>().join(", "),
      ));
    }
  }
  if parts.is_empty() {
    parts.push(DIFFICULTY_ONLY_ANSWER.to_string());
  }

  Answer {
    answer: parts.join(" "),
    related_problems: related.into_iter().take(MAX_RELATED).map(RelatedProblem::from).collect(),
    topic_hits,
    pattern_hits,
  }
}
