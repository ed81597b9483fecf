//! Question-answering and health response types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Request body of the question-answering endpoint.
#[derive(Debug, Serialize)]
pub struct QuestionRequest<'a> {
    pub question: &'a str,
}

/// Answer to a follow-up question, with the regulation excerpts it drew on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    #[serde(default, deserialize_with = "sources")]
    pub sources: Vec<AnswerSource>,
}

/// One retrieved regulation excerpt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSource {
    /// Chunk identifier; numeric ids are rendered as text. Empty when absent.
    #[serde(default, deserialize_with = "id_text")]
    pub id: String,
    #[serde(default)]
    pub preview: String,
}

fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn sources<'de, D>(deserializer: D) -> Result<Vec<AnswerSource>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<AnswerSource>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Service health probe response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Backend-specific details (index size, key presence, ...).
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ServiceHealth {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answer_accepts_numeric_ids_and_missing_sources() {
        let answer: Answer = serde_json::from_value(json!({
            "answer": "A fire permit is required.",
            "sources": [{"id": 12, "preview": "Section 4..."}, {"id": "chunk_3"}]
        }))
        .unwrap();
        assert_eq!(answer.sources[0].id, "12");
        assert_eq!(answer.sources[1].id, "chunk_3");
        assert_eq!(answer.sources[1].preview, "");

        let partial: Answer = serde_json::from_value(json!({
            "answer": "x",
            "sources": [{"preview": "no id"}, {"id": null, "preview": "null id"}]
        }))
        .unwrap();
        assert_eq!(partial.sources.len(), 2);
        assert_eq!(partial.sources[0].id, "");
        assert_eq!(partial.sources[1].id, "");

        let bare: Answer = serde_json::from_value(json!({"answer": "x", "sources": null})).unwrap();
        assert!(bare.sources.is_empty());
        let bare: Answer = serde_json::from_value(json!({"answer": "x"})).unwrap();
        assert!(bare.sources.is_empty());
    }

    #[test]
    fn health_keeps_backend_details() {
        let health: ServiceHealth = serde_json::from_value(json!({
            "status": "ok",
            "message": "Licensing API is running!",
            "chroma_chunks": 412
        }))
        .unwrap();
        assert!(health.is_ok());
        assert_eq!(health.details.get("chroma_chunks"), Some(&json!(412)));
    }
}
