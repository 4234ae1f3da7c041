use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ===== Corpus =====

/// On-disk corpus entry: `{ "title": ..., "content": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
}

/// A corpus entry with its positional id (`doc_<index>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn from_entry(index: usize, entry: CorpusEntry) -> Self {
        Self {
            id: format!("doc_{}", index),
            content: entry.content,
            metadata: DocumentMetadata { title: entry.title },
        }
    }

    /// Stable vector-store point id. Same document id, same point.
    pub fn point_id(&self) -> Uuid {
        point_id_for(&self.id)
    }
}

pub fn point_id_for(doc_id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, doc_id.as_bytes())
}

// ===== Business records =====

/// Per-business context used for keyed retrieval.
///
/// Records are free-form: the stored JSON is kept as-is, key order and number
/// formatting included, so it can be placed in the prompt unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessRecord(Value);

impl BusinessRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Display name, when the record carries a string `name`.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Business type, when the record carries a string `type`.
    pub fn business_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Pretty-printed stored JSON.
    pub fn to_pretty_json(&self) -> String {
        // Value trees always serialize
        serde_json::to_string_pretty(&self.0).unwrap_or_default()
    }
}

impl From<Value> for BusinessRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Business id -> record, as stored in the business-record file.
pub type BusinessDirectory = BTreeMap<String, BusinessRecord>;

// ===== Request pipeline =====

fn default_industry() -> String {
    "general".to_string()
}

fn default_stage() -> String {
    "early".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[serde(default = "default_industry")]
    #[schema(default = "general", example = "retail")]
    pub industry: String,
    #[serde(default = "default_stage")]
    #[schema(default = "early", example = "growth")]
    pub stage: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            industry: default_industry(),
            stage: default_stage(),
        }
    }
}

/// Context handed to the prompt assembler.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievedContext {
    Empty,
    /// Similarity matches, best first
    Snippets(Vec<String>),
    /// Stored record for the requested business
    Record(BusinessRecord),
}

impl RetrievedContext {
    pub fn is_empty(&self) -> bool {
        match self {
            RetrievedContext::Empty => true,
            RetrievedContext::Snippets(snippets) => snippets.is_empty(),
            RetrievedContext::Record(_) => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RetrievedContext::Empty => "empty",
            RetrievedContext::Snippets(_) => "snippets",
            RetrievedContext::Record(_) => "record",
        }
    }

    /// Text placed in the prompt's context block.
    pub fn render(&self) -> String {
        match self {
            RetrievedContext::Empty => String::new(),
            RetrievedContext::Snippets(snippets) => snippets.join("\n"),
            RetrievedContext::Record(record) => record.to_pretty_json(),
        }
    }
}

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChatRequest {
    #[validate(
        required(message = "query is required"),
        length(min = 1, message = "query must not be empty")
    )]
    #[schema(example = "How do I improve margins?")]
    pub query: Option<String>,
    /// Business key for keyed retrieval
    #[serde(default)]
    #[schema(example = "sarah")]
    pub business: Option<String>,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Answer {
    pub text: String,
}

/// `{"answer": {"text": ...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub answer: Answer,
}

impl ChatResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            answer: Answer { text: text.into() },
        }
    }
}

// ===== Embeddings and vectors =====

/// Vertex AI embedding task type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTask {
    RetrievalDocument,
    RetrievalQuery,
}

impl EmbeddingTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingTask::RetrievalDocument => "RETRIEVAL_DOCUMENT",
            EmbeddingTask::RetrievalQuery => "RETRIEVAL_QUERY",
        }
    }
}

impl fmt::Display for EmbeddingTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored point: embedding plus the document it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPoint {
    pub id: Uuid,
    pub doc_id: String,
    pub title: String,
    pub content: String,
    pub values: Vec<f32>,
}

impl VectorPoint {
    pub fn from_document(document: &Document, values: Vec<f32>) -> Self {
        Self {
            id: document.point_id(),
            doc_id: document.id.clone(),
            title: document.metadata.title.clone(),
            content: document.content.clone(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: String,
    pub title: String,
    pub content: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_ids_are_positional() {
        let doc = Document::from_entry(
            4,
            CorpusEntry {
                title: "Festive demand".into(),
                content: "Stock up before Diwali.".into(),
            },
        );
        assert_eq!(doc.id, "doc_4");
        assert_eq!(doc.metadata.title, "Festive demand");
    }

    #[test]
    fn test_point_id_is_deterministic() {
        assert_eq!(point_id_for("doc_0"), point_id_for("doc_0"));
        assert_ne!(point_id_for("doc_0"), point_id_for("doc_1"));
    }

    #[test]
    fn test_profile_fields_default_independently() {
        let profile: UserProfile = serde_json::from_value(json!({ "industry": "retail" })).unwrap();
        assert_eq!(profile.industry, "retail");
        assert_eq!(profile.stage, "early");
        assert_eq!(UserProfile::default().industry, "general");
    }

    #[test]
    fn test_business_record_renders_stored_json_unchanged() {
        let raw = r#"{"name":"Sarah's Restaurant","type":"Restaurant","employees":12,"monthlyData":{"2025":{"07":{"revenue":32000,"expenses":28000.5,"profit":"n/a"}}}}"#;
        let record: BusinessRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(record.name(), Some("Sarah's Restaurant"));
        assert_eq!(record.business_type(), Some("Restaurant"));

        let rendered = record.to_pretty_json();
        assert!(rendered.contains("\"revenue\": 32000,"));
        assert!(rendered.contains("\"expenses\": 28000.5,"));
        assert!(rendered.contains("\"profit\": \"n/a\""));
        // Stored key order, not alphabetical
        let name_at = rendered.find("\"name\"").unwrap();
        let employees_at = rendered.find("\"employees\"").unwrap();
        assert!(name_at < employees_at);
        assert!(rendered.find("\"type\"").unwrap() < employees_at);
    }

    #[test]
    fn test_business_record_accessors_tolerate_missing_fields() {
        let record = BusinessRecord::new(json!({ "region": "Pune" }));
        assert_eq!(record.name(), None);
        assert_eq!(record.business_type(), None);
        assert_eq!(record.as_value()["region"], "Pune");
    }

    #[test]
    fn test_chat_response_shape() {
        let value = serde_json::to_value(ChatResponse::new("Raise prices")).unwrap();
        assert_eq!(value, json!({ "answer": { "text": "Raise prices" } }));
    }

    #[test]
    fn test_chat_request_requires_query() {
        let missing: ChatRequest = serde_json::from_value(json!({ "business": "sarah" })).unwrap();
        assert!(missing.validate().is_err());

        let empty: ChatRequest = serde_json::from_value(json!({ "query": "" })).unwrap();
        assert!(empty.validate().is_err());

        let ok: ChatRequest = serde_json::from_value(json!({ "query": "hi" })).unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_snippets_render_newline_joined() {
        let ctx = RetrievedContext::Snippets(vec!["a".into(), "b".into()]);
        assert_eq!(ctx.render(), "a\nb");
        assert_eq!(RetrievedContext::Empty.render(), "");
    }
}
