//! The `papers.ts` entry grammar: locating fields, escaping values, and
//! serializing new entries.
//!
//! Entries are object literals inside one exported array:
//!
//! ```text
//! export const papers: Paper[] = [
//!   {
//!     id: 'deepseek-proposes-a-new',
//!     title: 'DeepSeek Proposes a New Reasoning Framework',
//!     ...
//!   },
//! ];
//! ```

use std::sync::LazyLock;

use paperfeed_shared::Candidate;
use regex::Regex;

/// Closes every entry record that has a successor.
pub(crate) const RECORD_TERMINATOR: &str = "},";

/// Closes the entries array; only recognised at the start of a line.
static COLLECTION_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\];").expect("collection close regex"));

/// A single- or double-quoted string literal; group 1 or 2 holds the raw body.
macro_rules! string_field {
    ($name:literal) => {
        concat!(
            r"\b",
            $name,
            r#":\s*(?:'((?:[^'\\\n]|\\.)*)'|"((?:[^"\\\n]|\\.)*)")"#
        )
    };
}

static ID_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(string_field!("id")).expect("id field regex"));

static TITLE_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(string_field!("title")).expect("title field regex"));

static ORG_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(string_field!("organization")).expect("organization field regex")
});

static URL_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(string_field!("arxivUrl")).expect("arxivUrl field regex"));

static VERSION_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v\d+$").expect("version suffix regex"));

static DOMAINS_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bdomains:\s*\[([^\]]*)\]").expect("domains field regex")
});

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)""#).expect("list item regex")
});

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// An entry already present in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub id: String,
    /// `None` when the entry's title field could not be read.
    pub title: Option<String>,
    pub organization: Option<String>,
    /// The `arxivUrl` value as stored.
    pub source_url: Option<String>,
    pub domains: Vec<String>,
}

/// Scan `content` for entries, in file order.
pub(crate) fn scan_entries(content: &str) -> Vec<StoredEntry> {
    let ids: Vec<_> = ID_FIELD_RE.captures_iter(content).collect();
    let mut entries = Vec::with_capacity(ids.len());

    for (i, caps) in ids.iter().enumerate() {
        let start = caps.get(0).map_or(0, |m| m.end());
        let end = ids
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(content.len(), |m| m.start());
        let segment = &content[start..end];

        entries.push(StoredEntry {
            id: literal_body(caps),
            title: TITLE_FIELD_RE.captures(segment).map(|c| literal_body(&c)),
            organization: ORG_FIELD_RE.captures(segment).map(|c| literal_body(&c)),
            source_url: URL_FIELD_RE.captures(segment).map(|c| literal_body(&c)),
            domains: DOMAINS_FIELD_RE
                .captures(segment)
                .map(|c| {
                    LIST_ITEM_RE
                        .captures_iter(&c[1])
                        .map(|item| literal_body(&item))
                        .collect()
                })
                .unwrap_or_default(),
        });
    }

    entries
}

/// Unescaped body of whichever quote alternative matched.
fn literal_body(caps: &regex::Captures<'_>) -> String {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| unescape(m.as_str()))
        .unwrap_or_default()
}

/// Byte offset just past the last record terminator before the collection close.
///
/// The close marker is the first line-leading `];` after the first `id` field,
/// or the last one in the file when the store has no entries yet.
pub(crate) fn insertion_point(content: &str) -> Option<usize> {
    let close = match ID_FIELD_RE.find(content) {
        Some(first) => COLLECTION_CLOSE_RE.find_at(content, first.end())?.start(),
        None => COLLECTION_CLOSE_RE.find_iter(content).last()?.start(),
    };
    content[..close]
        .rfind(RECORD_TERMINATOR)
        .map(|idx| idx + RECORD_TERMINATOR.len())
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Identity of a paper URL: scheme, surrounding whitespace and the trailing
/// `vN` version are ignored, so `http://arxiv.org/abs/2610.00009v1` and
/// `https://arxiv.org/abs/2610.00009v2` compare equal.
pub(crate) fn url_key(url: &str) -> String {
    let url = url.trim();
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    VERSION_SUFFIX_RE.replace(url, "").to_lowercase()
}

/// Escape a value for a single-quoted string literal. Line breaks become spaces.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\r' => {}
            '\n' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse of [`escape`] for values read back from the store.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// JSON-style list literal: `["LLM", "Agent"]`.
pub(crate) fn list_literal<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = items
        .into_iter()
        .map(|s| serde_json::Value::String(s.as_ref().to_string()).to_string())
        .collect();
    format!("[{}]", parts.join(", "))
}

/// Serialize a candidate as an entry record (without the trailing comma).
pub(crate) fn serialize_entry(candidate: &Candidate, id: &str) -> String {
    let domains = list_literal(candidate.domains.iter().map(|d| d.as_str()));
    let tags = list_literal(&candidate.tags);

    format!(
        "  {{\n    id: '{id}',\n    title: '{title}',\n    titleKo: '{title_ko}',\n    organization: '{org}',\n    date: '{date}',\n    arxivUrl: '{url}',\n    summary: '{summary}',\n    keyInnovation: '',\n    practicalInsight: '',\n    domains: {domains},\n    tags: {tags},\n  }}",
        id = escape(id),
        title = escape(&candidate.title),
        title_ko = escape(&candidate.translated_title),
        org = escape(candidate.organization.as_str()),
        date = escape(&candidate.publication_period),
        url = escape(&candidate.source_url),
        summary = escape(&candidate.translated_summary),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperfeed_shared::{Domain, Organization};

    const STORE: &str = r#"import { Paper } from '@/types/paper';

export const papers: Paper[] = [
  {
    id: 'first-paper',
    title: 'It\'s the First',
    organization: 'DeepMind',
    domains: ['LLM', 'Reasoning'],
    tags: [],
  },
  {
    id: "second-paper",
    title: "Second",
    organization: 'OpenAI',
    domains: ["Vision"],
    tags: ["x"],
  },
];

export const related = [
  { from: 'a', to: 'b' },
];
"#;

    #[test]
    fn scans_entries_with_both_quote_styles() {
        let entries = scan_entries(STORE);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "first-paper");
        assert_eq!(entries[0].title.as_deref(), Some("It's the First"));
        assert_eq!(entries[0].organization.as_deref(), Some("DeepMind"));
        assert_eq!(entries[0].domains, vec!["LLM", "Reasoning"]);
        assert_eq!(entries[1].id, "second-paper");
        assert_eq!(entries[1].title.as_deref(), Some("Second"));
        assert_eq!(entries[1].domains, vec!["Vision"]);
    }

    #[test]
    fn insertion_point_is_inside_papers_array() {
        let at = insertion_point(STORE).expect("insertion point");
        let before = &STORE[..at];
        assert!(before.ends_with("tags: [\"x\"],\n  },"));
        assert!(!before.contains("related"));
    }

    #[test]
    fn close_marker_inside_a_value_is_ignored() {
        let content = "export const papers: Paper[] = [
  {
    id: 'first-paper',
    summary: 'Indexing uses a[i];',
  },
];
";
        let at = insertion_point(content).expect("insertion point");
        assert_eq!(&content[at..], "\n];\n");
    }

    #[test]
    fn reads_arxiv_url() {
        let content = "  {\n    id: 'p',\n    arxivUrl: 'http://arxiv.org/abs/2610.00009v1',\n  },\n";
        let entries = scan_entries(content);
        assert_eq!(
            entries[0].source_url.as_deref(),
            Some("http://arxiv.org/abs/2610.00009v1")
        );
    }

    #[test]
    fn url_key_ignores_version_and_scheme() {
        assert_eq!(
            url_key("http://arxiv.org/abs/2610.00009v1"),
            url_key("https://arxiv.org/abs/2610.00009v3 ")
        );
        assert_ne!(
            url_key("http://arxiv.org/abs/2610.00009v1"),
            url_key("http://arxiv.org/abs/2610.00019v1")
        );
    }

    #[test]
    fn empty_store_has_no_insertion_point() {
        assert_eq!(insertion_point("export const papers = [\n];\n"), None);
        assert_eq!(insertion_point("no arrays here"), None);
    }

    #[test]
    fn escape_roundtrip() {
        let raw = r"O'Neil \ path";
        let escaped = escape(raw);
        assert_eq!(escaped, r"O\'Neil \\ path");
        assert_eq!(unescape(&escaped), raw);
        assert_eq!(escape("two\nlines"), "two lines");
    }

    #[test]
    fn list_literal_matches_store_style() {
        assert_eq!(list_literal(["LLM", "Agent"]), r#"["LLM", "Agent"]"#);
        assert_eq!(list_literal(Vec::<String>::new()), "[]");
    }

    #[test]
    fn serialized_entry_shape() {
        let candidate = Candidate {
            id: "deepseek-proposes-a-new".into(),
            title: "DeepSeek's Framework".into(),
            translated_title: "딥시크 프레임워크".into(),
            summary: "English".into(),
            translated_summary: "요약".into(),
            organization: Organization::DeepSeek,
            publication_period: "2026-10".into(),
            source_url: "http://arxiv.org/abs/2610.11111v1".into(),
            domains: vec![Domain::Llm, Domain::Reasoning],
            tags: vec!["reasoning".into()],
            score: 21,
            authors_summary: String::new(),
        };
        let entry = serialize_entry(&candidate, &candidate.id);
        let expected = "  {
    id: 'deepseek-proposes-a-new',
    title: 'DeepSeek\\'s Framework',
    titleKo: '딥시크 프레임워크',
    organization: 'DeepSeek',
    date: '2026-10',
    arxivUrl: 'http://arxiv.org/abs/2610.11111v1',
    summary: '요약',
    keyInnovation: '',
    practicalInsight: '',
    domains: [\"LLM\", \"Reasoning\"],
    tags: [\"reasoning\"],
  }";
        assert_eq!(entry, expected);

        let scanned = scan_entries(&entry);
        assert_eq!(scanned[0].title.as_deref(), Some("DeepSeek's Framework"));
    }
}
