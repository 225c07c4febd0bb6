//! Candidate pipeline: raw records → admitted, labelled, translated candidates.
//!
//! Per record: recency cutoff, exclusion filter, relevance score against the
//! admission threshold, organization detection, then labelling. Admitted
//! candidates are ranked by descending score (ties keep feed order) and
//! repeated papers inside one batch are collapsed.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument};

use paperfeed_classify::{
    ClassifierRules, classify_domains, detect_organization, extract_tags, generate_id,
    is_excluded, score,
};
use paperfeed_shared::text::{single_line, truncate_chars};
use paperfeed_shared::{AppConfig, Candidate, RawRecord};
use paperfeed_translate::{Translator, translate_or_fallback};

use crate::run::RunReport;

/// Characters of abstract kept in a candidate summary.
pub const SUMMARY_CHARS: usize = 300;

/// Characters of author list kept for diagnostics.
pub const AUTHORS_CHARS: usize = 200;

/// Admission settings for one run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Minimum relevance score for admission.
    pub score_threshold: u32,
    /// Records published more than this many days before `now` are dropped.
    pub lookback_days: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            score_threshold: 10,
            lookback_days: 2,
        }
    }
}

impl From<&AppConfig> for PipelineOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            score_threshold: config.pipeline.score_threshold,
            lookback_days: config.search.lookback_days,
        }
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a candidate's title and summary are translated.
    fn candidate_translated(&self, title: &str, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn candidate_translated(&self, _title: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &RunReport) {}
}

/// Admit, label and rank `records` without translating.
///
/// Translated fields carry the source text. The result is sorted by descending
/// score and holds no two candidates with the same id and the same title.
#[instrument(skip_all, fields(records = records.len(), threshold = options.score_threshold))]
pub fn select_candidates(
    records: &[RawRecord],
    rules: &ClassifierRules,
    options: &PipelineOptions,
    now: DateTime<Utc>,
) -> Vec<Candidate> {
    let cutoff = now - Duration::days(i64::from(options.lookback_days));
    let mut candidates = Vec::new();
    let mut too_old = 0usize;

    for record in records {
        if record.published < cutoff {
            too_old += 1;
            continue;
        }
        if let Some(candidate) = admit(record, rules, options) {
            candidates.push(candidate);
        }
    }

    // Stable: equal scores keep feed order.
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    let admitted = candidates.len();
    let candidates = dedup_batch(candidates);

    info!(
        admitted,
        kept = candidates.len(),
        too_old,
        "candidate selection complete"
    );
    candidates
}

/// Select candidates, then translate each title and summary in rank order.
///
/// Translation failures keep the source text; this never fails.
#[instrument(skip_all, fields(records = records.len()))]
pub async fn build_batch<T: Translator>(
    records: &[RawRecord],
    rules: &ClassifierRules,
    options: &PipelineOptions,
    translator: &T,
    progress: &dyn ProgressReporter,
    now: DateTime<Utc>,
) -> Vec<Candidate> {
    let mut batch = select_candidates(records, rules, options, now);
    let total = batch.len();

    progress.phase("Translating");
    for (i, candidate) in batch.iter_mut().enumerate() {
        candidate.translated_title = translate_or_fallback(translator, &candidate.title).await;
        candidate.translated_summary =
            translate_or_fallback(translator, &candidate.summary).await;
        progress.candidate_translated(&candidate.title, i + 1, total);
    }

    batch
}

/// Gate one record and, if admitted, build its candidate.
fn admit(
    record: &RawRecord,
    rules: &ClassifierRules,
    options: &PipelineOptions,
) -> Option<Candidate> {
    if is_excluded(rules, &record.title, &record.summary) {
        debug!(title = %record.title, "excluded: off-domain");
        return None;
    }

    let authors_text = record.authors_text();
    let relevance = score(rules, &record.title, &record.summary, &authors_text);
    if relevance < options.score_threshold {
        debug!(title = %record.title, score = relevance, "below threshold");
        return None;
    }

    let Some(organization) = detect_organization(rules, &authors_text, &record.summary) else {
        debug!(title = %record.title, score = relevance, "no recognised organization");
        return None;
    };

    let id = generate_id(&record.title);
    if id.is_empty() {
        debug!(title = %record.title, "title yields an empty id");
        return None;
    }

    let title = single_line(&record.title);
    let summary = single_line(truncate_chars(&record.summary, SUMMARY_CHARS));

    Some(Candidate {
        id,
        translated_title: title.clone(),
        translated_summary: summary.clone(),
        title,
        summary,
        organization,
        publication_period: record.published.format("%Y-%m").to_string(),
        source_url: record.source_url.clone(),
        domains: classify_domains(rules, &record.title, &record.summary, &record.categories),
        tags: extract_tags(rules, &record.title, &record.summary),
        score: relevance,
        authors_summary: truncate_chars(&authors_text, AUTHORS_CHARS).to_string(),
    })
}

/// Drop later candidates repeating an earlier one's id and title.
fn dedup_batch(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: Vec<(String, String)> = Vec::with_capacity(candidates.len());
    let mut kept = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = (candidate.id.clone(), candidate.title.trim().to_lowercase());
        if seen.contains(&key) {
            debug!(id = %candidate.id, "duplicate within batch");
            continue;
        }
        seen.push(key);
        kept.push(candidate);
    }
    kept
}
