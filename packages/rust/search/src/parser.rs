//! arXiv Atom feed parser.
//!
//! The API answers with an Atom document whose `<entry>` elements carry:
//! - `<id>`: abstract page URL
//! - `<published>`: RFC 3339 timestamp
//! - `<title>`, `<summary>`: escaped text, often wrapped across lines
//! - `<author><name>`: one element per author
//! - `<category term="cs.CL" .../>`: one element per category

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use paperfeed_shared::{PaperfeedError, RawRecord, Result};
use regex::Regex;
use tracing::warn;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

static FEED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<feed\b").expect("feed regex"));

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<entry\b[^>]*>(.*?)</entry>").expect("entry regex")
});

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<title\b[^>]*>(.*?)</title>").expect("title regex")
});

static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<summary\b[^>]*>(.*?)</summary>").expect("summary regex")
});

static PUBLISHED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<published>(.*?)</published>").expect("published regex")
});

static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<id>(.*?)</id>").expect("id regex"));

static AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<author\b[^>]*>.*?<name>(.*?)</name>.*?</author>").expect("author regex")
});

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<category\b[^>]*?\bterm="([^"]*)""#).expect("category regex")
});

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").expect("entity regex")
});

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse an Atom response into records. Entries missing a title, id or
/// timestamp are skipped with a warning.
pub(crate) fn parse_atom_feed(xml: &str) -> Result<Vec<RawRecord>> {
    if !FEED_RE.is_match(xml) {
        return Err(PaperfeedError::parse("response is not an Atom feed"));
    }

    let mut records = Vec::new();
    for caps in ENTRY_RE.captures_iter(xml) {
        match parse_entry(&caps[1]) {
            Ok(record) => records.push(record),
            Err(e) => warn!(error = %e, "skipping malformed feed entry"),
        }
    }

    Ok(records)
}

fn parse_entry(body: &str) -> Result<RawRecord> {
    let title = capture_text(&TITLE_RE, body)
        .ok_or_else(|| PaperfeedError::parse("entry has no <title>"))?;
    let source_url = capture_text(&ID_RE, body)
        .ok_or_else(|| PaperfeedError::parse("entry has no <id>"))?;
    let published_raw = capture_text(&PUBLISHED_RE, body)
        .ok_or_else(|| PaperfeedError::parse(format!("{source_url}: entry has no <published>")))?;
    let published = DateTime::parse_from_rfc3339(&published_raw)
        .map_err(|e| {
            PaperfeedError::parse(format!("{source_url}: bad timestamp '{published_raw}': {e}"))
        })?
        .with_timezone(&Utc);

    let summary = capture_text(&SUMMARY_RE, body).unwrap_or_default();

    let authors = AUTHOR_RE
        .captures_iter(body)
        .map(|c| collapse_whitespace(&unescape(&c[1])))
        .filter(|name| !name.is_empty())
        .collect();

    let categories = CATEGORY_RE
        .captures_iter(body)
        .map(|c| unescape(&c[1]))
        .collect();

    Ok(RawRecord {
        title,
        summary,
        authors,
        categories,
        published,
        source_url,
    })
}

/// First capture of `re` in `body`, unescaped with whitespace runs collapsed.
fn capture_text(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .map(|c| collapse_whitespace(&unescape(&c[1])))
        .filter(|s| !s.is_empty())
}

/// Join whitespace-separated words with single spaces.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the predefined XML entities and numeric character references.
fn unescape(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            match entity {
                "amp" => "&".to_string(),
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                _ => {
                    let code = match entity.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                        .map(String::from)
                        .unwrap_or_else(|| caps[0].to_string())
                }
            }
        })
        .into_owned()
}
