//! Core domain types for paperfeed: raw search records, candidates, and labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one ingest run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RawRecord
// ---------------------------------------------------------------------------

/// A paper as supplied by the search feed. Read-only input to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Paper title as published (may contain line breaks).
    pub title: String,
    /// Abstract text.
    pub summary: String,
    /// Author display names.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Category codes such as `cs.CL`.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Publication timestamp.
    pub published: DateTime<Utc>,
    /// Canonical abstract page URL.
    pub source_url: String,
}

impl RawRecord {
    /// Author names joined the way the organization detector expects them.
    pub fn authors_text(&self) -> String {
        self.authors.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Organization
// ---------------------------------------------------------------------------

/// Research organizations recognised by the detector, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Organization {
    DeepMind,
    DeepSeek,
    OpenAI,
    Anthropic,
    Meta,
    Alibaba,
    Google,
    Microsoft,
    Stanford,
    #[serde(rename = "MIT")]
    Mit,
    Berkeley,
    #[serde(rename = "CMU")]
    Cmu,
    Princeton,
    Tsinghua,
    Peking,
}

impl Organization {
    /// Label as written to the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeepMind => "DeepMind",
            Self::DeepSeek => "DeepSeek",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Meta => "Meta",
            Self::Alibaba => "Alibaba",
            Self::Google => "Google",
            Self::Microsoft => "Microsoft",
            Self::Stanford => "Stanford",
            Self::Mit => "MIT",
            Self::Berkeley => "Berkeley",
            Self::Cmu => "CMU",
            Self::Princeton => "Princeton",
            Self::Tsinghua => "Tsinghua",
            Self::Peking => "Peking",
        }
    }
}

impl std::fmt::Display for Organization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// Topical domain labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "LLM")]
    Llm,
    Reasoning,
    Vision,
    Multimodal,
    Robotics,
    Agent,
    #[serde(rename = "RAG")]
    Rag,
    Science,
    Healthcare,
    Efficiency,
}

impl Domain {
    /// Label used when nothing else matches.
    pub const DEFAULT: Domain = Domain::Llm;

    /// Label as written to the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "LLM",
            Self::Reasoning => "Reasoning",
            Self::Vision => "Vision",
            Self::Multimodal => "Multimodal",
            Self::Robotics => "Robotics",
            Self::Agent => "Agent",
            Self::Rag => "RAG",
            Self::Science => "Science",
            Self::Healthcare => "Healthcare",
            Self::Efficiency => "Efficiency",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Candidate
// ---------------------------------------------------------------------------

/// A record that passed admission and was enriched for the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Slug derived from the title.
    pub id: String,
    /// Cleaned English title.
    pub title: String,
    /// Title in the target language (source text if untranslated).
    pub translated_title: String,
    /// Truncated English abstract.
    pub summary: String,
    /// Summary in the target language (source text if untranslated).
    pub translated_summary: String,
    pub organization: Organization,
    /// `YYYY-MM`.
    pub publication_period: String,
    pub source_url: String,
    /// One to three labels.
    pub domains: Vec<Domain>,
    /// Up to five hyphenated keywords.
    pub tags: Vec<String>,
    /// Ranking score; never persisted.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub score: u32,
    /// Truncated author list, diagnostics only.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub authors_summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_labels() {
        assert_eq!(Organization::Mit.to_string(), "MIT");
        assert_eq!(Organization::Cmu.as_str(), "CMU");
        let json = serde_json::to_string(&Organization::DeepSeek).expect("serialize");
        assert_eq!(json, r#""DeepSeek""#);
    }

    #[test]
    fn domain_serializes_as_label() {
        let json = serde_json::to_string(&vec![Domain::Llm, Domain::Rag]).expect("serialize");
        assert_eq!(json, r#"["LLM","RAG"]"#);
    }

    #[test]
    fn raw_record_from_json() {
        let json = r#"{
            "title": "A Paper",
            "summary": "Abstract.",
            "authors": ["Ada Lovelace", "Alan Turing"],
            "categories": ["cs.AI"],
            "published": "2026-10-18T09:00:00Z",
            "source_url": "http://arxiv.org/abs/2610.00001v1"
        }"#;
        let record: RawRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(record.authors_text(), "Ada Lovelace, Alan Turing");
        assert_eq!(record.categories, vec!["cs.AI"]);
    }
}
