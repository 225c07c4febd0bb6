//! Translation backfill for entries already in the store.
//!
//! Two passes over the store text:
//! 1. `summary: '...'` values with English text and no Hangul are translated in place.
//! 2. Entries whose `title:` line is directly followed by `organization:` (no
//!    `titleKo`) get a `titleKo:` line inserted after the title.
//!
//! A value whose translation comes back unchanged is left as is, so a later
//! backfill retries it.

use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument};

use paperfeed_shared::Result;
use paperfeed_shared::text::contains_hangul;
use paperfeed_store::{PaperStore, escape, unescape};
use paperfeed_translate::{Translator, translate_or_fallback};

/// Body of a single-quoted `summary:` value in group 1.
static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bsummary:\s*'((?:[^'\\\n]|\\.)*)'").expect("summary regex")
});

/// A `title:` line directly followed by `organization:`.
/// Groups: 1 indent, 2 title body.
static UNTRANSLATED_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*)title:\s*'((?:[^'\\\n]|\\.)*)',[ \t]*\n[ \t]*organization:")
        .expect("title regex")
});

/// Result of a backfill pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillOutcome {
    /// Rewritten store text.
    pub content: String,
    pub summaries_translated: usize,
    pub titles_added: usize,
}

impl BackfillOutcome {
    pub fn changed(&self) -> bool {
        self.summaries_translated + self.titles_added > 0
    }
}

/// Translate untranslated summaries and add missing `titleKo` fields.
#[instrument(skip_all, fields(bytes = content.len()))]
pub async fn backfill_translations<T: Translator>(content: &str, translator: &T) -> BackfillOutcome {
    let (content, summaries_translated) = translate_summaries(content, translator).await;
    let (content, titles_added) = add_missing_titles(&content, translator).await;

    info!(summaries_translated, titles_added, "backfill complete");
    BackfillOutcome {
        content,
        summaries_translated,
        titles_added,
    }
}

/// Backfill the store at `path`, writing it back when anything changed.
pub async fn backfill_store<T: Translator>(
    path: &Path,
    translator: &T,
    dry_run: bool,
) -> Result<BackfillOutcome> {
    let mut store = PaperStore::open(path)?;
    let outcome = backfill_translations(store.content(), translator).await;

    if outcome.changed() && !dry_run {
        store.set_content(outcome.content.clone());
        store.save()?;
    }
    Ok(outcome)
}

async fn translate_summaries<T: Translator>(content: &str, translator: &T) -> (String, usize) {
    let targets: Vec<(Range<usize>, String)> = SUMMARY_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let body = caps.get(1)?;
            let text = unescape(body.as_str());
            needs_translation(&text).then(|| (body.range(), text))
        })
        .collect();

    let mut edits = Vec::with_capacity(targets.len());
    for (range, text) in targets {
        let translated = translate_or_fallback(translator, &text).await;
        if translated == text {
            debug!(chars = text.chars().count(), "summary left untranslated");
            continue;
        }
        edits.push((range, escape(&translated)));
    }

    let count = edits.len();
    (splice(content, edits), count)
}

async fn add_missing_titles<T: Translator>(content: &str, translator: &T) -> (String, usize) {
    let targets: Vec<(usize, String, String)> = UNTRANSLATED_TITLE_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let indent = caps.get(1)?.as_str().to_string();
            let title = unescape(caps.get(2)?.as_str());
            if contains_hangul(&title) {
                return None;
            }
            // Insert right after the title line's newline.
            let line_end = caps.get(2)?.end() + content[caps.get(2)?.end()..].find('\n')? + 1;
            Some((line_end, indent, title))
        })
        .collect();

    let mut edits = Vec::with_capacity(targets.len());
    for (at, indent, title) in targets {
        let translated = translate_or_fallback(translator, &title).await;
        if translated == title {
            debug!(%title, "title left untranslated");
            continue;
        }
        edits.push((at..at, format!("{indent}titleKo: '{}',\n", escape(&translated))));
    }

    let count = edits.len();
    (splice(content, edits), count)
}

/// Apply non-overlapping edits given in ascending order.
fn splice(content: &str, edits: Vec<(Range<usize>, String)>) -> String {
    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    for (range, replacement) in edits {
        out.push_str(&content[cursor..range.start]);
        out.push_str(&replacement);
        cursor = range.end;
    }
    out.push_str(&content[cursor..]);
    out
}

/// English text worth sending to the translator.
fn needs_translation(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic()) && !contains_hangul(text)
}
