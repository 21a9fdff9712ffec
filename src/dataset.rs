//! Bundled problem data that guarantees the service is useful without any
//! remote source.

use serde_json::Value;
use tracing::error;

pub const BUNDLED_DATASET_NAME: &str = "data/problems.json";

const BUNDLED_DATASET: &str = include_str!("../data/problems.json");

/// Raw records of the bundled dataset.
pub fn bundled_records() -> Vec<Value> {
  serde_json::from_str(BUNDLED_DATASET).unwrap_or_else(|e| {
    error!(target: "catalog", error = %e, "Bundled dataset failed to parse");
    Vec::new()
  })
}

/// Extracts the record list from a payload that is either a bare array or an
/// object carrying a `problems` array.
pub fn records_from_payload(payload: Value) -> Option<Vec<Value>> {
  match payload {
    Value::Array(items) => Some(items),
    Value::Object(mut obj) => match obj.remove("problems") {
      Some(Value::Array(items)) => Some(items),
      _ => None,
    },
    _ => None,
  }
}
