//! Session protocol: one JSON object per line in each direction, tagged by
//! `type`. Keep this small and stable so callers can evolve independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::aggregate::{CategorySummary, PatternSummary};
use crate::domain::{Problem, RelatedProblem};
use crate::tutorial::Tutorial;

/// Messages a caller can send.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
    Meta,
    Problems,
    Categories,
    Patterns,
    Tutorial,
    Ask {
        #[serde(default, deserialize_with = "lenient_text")]
        question: String,
    },
    Refresh,
}

/// Messages sent back, one per request.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Pong,
    Meta {
        source: String,
        last_refreshed: DateTime<Utc>,
        generation: Uuid,
        problem_count: usize,
    },
    Problems {
        problems: Vec<Problem>,
    },
    Categories {
        categories: CategorySummary,
    },
    Patterns {
        patterns: PatternSummary,
    },
    Tutorial {
        tutorial: Tutorial,
    },
    Answer {
        answer: String,
        related_problems: Vec<RelatedProblem>,
        topic_hits: Vec<String>,
        pattern_hits: Vec<String>,
    },
    Refreshed {
        status: &'static str,
        source: String,
        last_refreshed: DateTime<Utc>,
        generation: Uuid,
    },
    Error {
        message: String,
    },
}

/// Question text is untrusted; anything that is not a string reads as empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}
