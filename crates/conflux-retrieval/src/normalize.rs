use serde::Serialize;
use serde_json::Value;

/// Wrapper fields tried, in priority order, when the result is not already
/// an array.
const WRAPPER_FIELDS: [&str; 3] = ["results", "hits", "items"];

/// Resolve the candidate hit array out of a raw retrieval result.
///
/// Accepts a plain array as-is; otherwise the first wrapper field holding an
/// array wins. Anything else normalizes to "no hits".
pub fn unwrap_hits(raw: &Value) -> &[Value] {
    if let Some(hits) = raw.as_array() {
        return hits;
    }
    for field in WRAPPER_FIELDS {
        if let Some(hits) = raw.get(field).and_then(Value::as_array) {
            return hits;
        }
    }
    &[]
}

/// One normalized retrieval result record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalHit {
    pub id: String,
    pub score: Option<f64>,
    pub text: String,
}

impl RetrievalHit {
    /// Normalize one loosely-typed record.
    ///
    /// Field priority: id from `id` then `document_id`, else the position
    /// index; score from `score` then `similarity`, else absent; text from
    /// `text`, `content`, `metadata.text`, `document`, else the JSON
    /// serialization of the whole record. The excerpt is truncated to
    /// `max_chars` characters.
    pub fn from_value(value: &Value, index: usize, max_chars: usize) -> Self {
        let id = present(value.get("id"))
            .or_else(|| present(value.get("document_id")))
            .map(display_value)
            .unwrap_or_else(|| index.to_string());

        let score = present(value.get("score"))
            .or_else(|| present(value.get("similarity")))
            .and_then(Value::as_f64);

        let text = present(value.get("text"))
            .or_else(|| present(value.get("content")))
            .or_else(|| present(value.get("metadata").and_then(|m| m.get("text"))))
            .or_else(|| present(value.get("document")))
            .map(display_value)
            .unwrap_or_else(|| value.to_string());

        Self {
            id,
            score,
            text: text.chars().take(max_chars).collect(),
        }
    }

    /// Format as a context snippet: `Source({id}) score={score}: {text}`.
    /// An absent score renders empty.
    pub fn snippet(&self) -> String {
        let score = self.score.map(|s| s.to_string()).unwrap_or_default();
        format!("Source({}) score={}: {}", self.id, score, self.text)
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Render a field without the quotes `Value::to_string` puts around strings.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
