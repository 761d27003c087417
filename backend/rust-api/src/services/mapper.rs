use serde_json::{Map, Value};

use crate::models::QuizRecord;

pub type FieldMap = Map<String, Value>;

/// Result of mapping a sanitized model reply. `degraded` is set when the reply
/// did not parse as a JSON object and `record` is therefore empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappedRecord {
    pub record: QuizRecord,
    pub degraded: bool,
}

/// Parses `content` as a JSON object. Anything else is logged and yields `None`;
/// callers fall back to an empty map.
pub fn get_map(content: &str) -> Option<FieldMap> {
    match serde_json::from_str::<FieldMap>(content) {
        Ok(map) => Some(map),
        Err(e) => {
            tracing::warn!("Model reply is not a JSON object: {}", e);
            None
        }
    }
}

/// Projects the recognised fields of `map` into a [`QuizRecord`]. Absent or
/// mistyped fields keep their empty default.
pub fn project(map: &FieldMap) -> QuizRecord {
    QuizRecord {
        question: string_field(map, "question"),
        options: option_lines(map),
        answer: string_field(map, "answer"),
        explanation: string_field(map, "explanation"),
    }
}

pub fn map_record(content: &str) -> MappedRecord {
    let map = get_map(content);
    MappedRecord {
        degraded: map.is_none(),
        record: project(&map.unwrap_or_default()),
    }
}

fn string_field(map: &FieldMap, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}

// Labels are single letters, so sorting the formatted lines orders them A, B, C, D.
fn option_lines(map: &FieldMap) -> Vec<String> {
    let Some(options) = map.get("options").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut lines: Vec<String> = options
        .iter()
        .filter_map(|(label, text)| text.as_str().map(|text| format!("{label}: {text}")))
        .collect();
    lines.sort();
    lines
}
