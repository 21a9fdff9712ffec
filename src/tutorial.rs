//! Static study outline projected from the two summaries.

use serde::Serialize;

use crate::aggregate::{why_it_matters, CategorySummary, PatternSummary};
use crate::domain::ProblemExcerpt;

const SPOTLIGHT_PATTERNS: usize = 5;
const TOP_N: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryHighlight {
  pub topic: String,
  pub count: usize,
  pub key_patterns: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatternSpotlight {
  pub pattern: String,
  pub why_it_matters: String,
  pub top_topics: Vec<String>,
  pub examples: Vec<ProblemExcerpt>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StudyStage {
  pub title: String,
  pub steps: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tutorial {
  pub category_highlights: Vec<CategoryHighlight>,
  pub pattern_spotlight: Vec<PatternSpotlight>,
  pub study_plan: Vec<StudyStage>,
}

pub fn compose_tutorial(categories: &CategorySummary, patterns: &PatternSummary) -> Tutorial {
  let category_highlights = categories
    .iter()
    .map(|c| CategoryHighlight {
      topic: c.topic.clone(),
      count: c.count,
      key_patterns: c.patterns.top(TOP_N),
    })
    .collect();

  let pattern_spotlight: Vec<PatternSpotlight> = patterns
    .iter()
    .take(SPOTLIGHT_PATTERNS)
    .map(|p| PatternSpotlight {
      pattern: p.name.clone(),
      why_it_matters: why_it_matters(p.count, p.topics.len()),
      top_topics: p.topics.top(TOP_N),
      examples: p.examples.clone(),
    })
    .collect();

  let top_topics: Vec<&str> = categories.topics().take(TOP_N).collect();
  let lead_pattern = pattern_spotlight
    .first()
    .map(|p| p.pattern.as_str())
    .unwrap_or("a shared technique");

  let study_plan = vec![
    stage(
      "Build core intuition",
      [
        format!(
          "Start with easy problems in the most common categories: {}.",
          top_topics.join(", ")
        ),
        format!(
          "Focus on one pattern at a time—try solving multiple problems that require {}.",
          lead_pattern
        ),
        "Document the decision points you make for each solution to internalize the pattern.".into(),
      ],
    ),
    stage(
      "Layer on complexity",
      [
        "Move to medium problems and look for variations of familiar patterns.".into(),
        "Identify how constraints change the data structure or traversal strategy.".into(),
        "Compare multiple patterns that solve the same problem to understand trade-offs.".into(),
      ],
    ),
    stage(
      "Synthesize across patterns",
      [
        "Pick hard problems that blend categories, such as combining graph searches with dynamic programming.".into(),
        "Create quick-reference cards highlighting when to choose each pattern.".into(),
        "Teach the concept to someone else or write your own summary as a final checkpoint.".into(),
      ],
    ),
  ];

  Tutorial { category_highlights, pattern_spotlight, study_plan }
}

fn stage(title: &str, steps: [String; 3]) -> StudyStage {
  StudyStage { title: title.into(), steps: steps.into() }
}
