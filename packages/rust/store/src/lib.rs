//! The persisted paper store and the idempotent merge into it.
//!
//! The store is a TypeScript module holding one array of paper entries. It is
//! treated as text: existing entries are found by scanning the field grammar,
//! and new entries are spliced in after the last record terminator of the
//! array. Existing entries are never rewritten.

mod grammar;
mod stats;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use paperfeed_shared::{AppConfig, Candidate, PaperfeedError, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

pub use grammar::{StoredEntry, escape, unescape};
pub use stats::StoreStats;

// ---------------------------------------------------------------------------
// Merge options & outcome
// ---------------------------------------------------------------------------

/// Limits applied to one merge.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Maximum entries inserted per merge.
    pub max_new_entries: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_new_entries: 10,
        }
    }
}

impl From<&AppConfig> for MergeOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_new_entries: config.pipeline.max_new_entries,
        }
    }
}

/// Result of a merge.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Ids written, in insertion order.
    pub added: Vec<String>,
    /// Candidate ids skipped because the paper is already stored.
    pub duplicates: Vec<String>,
    /// `(original id, assigned id)` for candidates whose id was taken by a
    /// different title.
    pub renamed: Vec<(String, String)>,
    /// New candidates left out by the per-merge cap.
    pub capped: usize,
    /// SHA-256 of the store text before the merge.
    pub digest_before: String,
    /// SHA-256 of the store text after the merge.
    pub digest_after: String,
}

impl MergeOutcome {
    /// Whether the store text changed.
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PaperStore
// ---------------------------------------------------------------------------

/// In-memory view of the store file.
#[derive(Debug, Clone)]
pub struct PaperStore {
    path: PathBuf,
    content: String,
}

impl PaperStore {
    /// Read the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(PaperfeedError::StoreNotFound { path });
        }
        let content = std::fs::read_to_string(&path).map_err(|e| PaperfeedError::io(&path, e))?;
        debug!(path = %path.display(), bytes = content.len(), "store loaded");
        Ok(Self { path, content })
    }

    /// Wrap store text that is already in memory.
    pub fn from_content(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the in-memory text (used by rewrites such as translation backfill).
    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// Entries currently in the store, in file order.
    pub fn entries(&self) -> Vec<StoredEntry> {
        grammar::scan_entries(&self.content)
    }

    /// Identifiers currently in the store.
    pub fn existing_ids(&self) -> std::collections::HashSet<String> {
        self.entries().into_iter().map(|e| e.id).collect()
    }

    /// Per-organization and per-domain counts.
    pub fn stats(&self) -> StoreStats {
        StoreStats::from_entries(&self.entries())
    }

    /// Merge a ranked batch into the in-memory text.
    ///
    /// Candidates already stored (same paper URL, or same id and title) are
    /// skipped, id collisions with a different title get a numeric suffix, and at most `max_new_entries` are inserted
    /// under one dated header. When nothing is new the text is left untouched.
    #[instrument(skip_all, fields(path = %self.path.display(), batch = batch.len()))]
    pub fn merge(
        &mut self,
        batch: &[Candidate],
        options: &MergeOptions,
        today: NaiveDate,
    ) -> Result<MergeOutcome> {
        let digest_before = sha256_hex(&self.content);
        let mut outcome = MergeOutcome {
            digest_before: digest_before.clone(),
            digest_after: digest_before,
            ..MergeOutcome::default()
        };

        let entries = self.entries();
        let mut known_urls: HashSet<String> = entries
            .iter()
            .filter_map(|e| e.source_url.as_deref())
            .map(grammar::url_key)
            .collect();
        let mut known: HashMap<String, Option<String>> = entries
            .into_iter()
            .map(|e| (e.id, e.title.as_deref().map(title_key)))
            .collect();

        let mut accepted: Vec<(&Candidate, String)> = Vec::new();
        for candidate in batch {
            let url = grammar::url_key(&candidate.source_url);
            if !url.is_empty() && known_urls.contains(&url) {
                outcome.duplicates.push(candidate.id.clone());
                continue;
            }
            match resolve_id(&known, candidate) {
                Resolution::Duplicate => outcome.duplicates.push(candidate.id.clone()),
                Resolution::Assign(id) => {
                    if id != candidate.id {
                        outcome.renamed.push((candidate.id.clone(), id.clone()));
                    }
                    known.insert(id.clone(), Some(title_key(&candidate.title)));
                    known_urls.insert(url);
                    accepted.push((candidate, id));
                }
            }
        }

        if accepted.is_empty() {
            info!(
                duplicates = outcome.duplicates.len(),
                "no new papers to add"
            );
            return Ok(outcome);
        }

        if accepted.len() > options.max_new_entries {
            outcome.capped = accepted.len() - options.max_new_entries;
            accepted.truncate(options.max_new_entries);
        }
        // Renames for entries that were capped out never happened.
        outcome
            .renamed
            .retain(|(_, new_id)| accepted.iter().any(|(_, id)| id == new_id));

        let at = grammar::insertion_point(&self.content).ok_or_else(|| {
            PaperfeedError::InsertionPointNotFound {
                path: self.path.clone(),
            }
        })?;

        let mut block = format!("\n\n  // Auto-added: {}\n", today.format("%Y-%m-%d"));
        for (candidate, id) in &accepted {
            block.push_str(&grammar::serialize_entry(candidate, id));
            block.push_str(",\n");
        }

        self.content.insert_str(at, &block);
        outcome.added = accepted.into_iter().map(|(_, id)| id).collect();
        outcome.digest_after = sha256_hex(&self.content);

        info!(
            added = outcome.added.len(),
            duplicates = outcome.duplicates.len(),
            renamed = outcome.renamed.len(),
            capped = outcome.capped,
            "merged papers into store"
        );

        Ok(outcome)
    }

    /// Write the in-memory text back atomically (temp file, then rename).
    pub fn save(&self) -> Result<()> {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                PaperfeedError::validation(format!("store path has no file name: {:?}", self.path))
            })?;
        let temp = self.path.with_file_name(format!(".{file_name}.tmp"));

        std::fs::write(&temp, &self.content).map_err(|e| PaperfeedError::io(&temp, e))?;
        std::fs::rename(&temp, &self.path).map_err(|e| PaperfeedError::io(&self.path, e))?;

        info!(path = %self.path.display(), bytes = self.content.len(), "store written");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Id resolution
// ---------------------------------------------------------------------------

enum Resolution {
    Duplicate,
    Assign(String),
}

/// Comparison key for titles: whitespace runs collapsed, lowercased.
fn title_key(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Decide whether `candidate` is already stored, or which id it should get.
///
/// An id held by the same title (or by an entry whose title is unreadable) is a
/// duplicate. An id held by a different title moves on to `<id>-2`, `<id>-3`, ...
fn resolve_id(known: &HashMap<String, Option<String>>, candidate: &Candidate) -> Resolution {
    let key = title_key(&candidate.title);
    let mut id = candidate.id.clone();
    let mut suffix = 1;

    loop {
        match known.get(&id) {
            None => return Resolution::Assign(id),
            Some(None) => return Resolution::Duplicate,
            Some(Some(stored)) if *stored == key => return Resolution::Duplicate,
            Some(Some(_)) => {
                suffix += 1;
                id = format!("{}-{suffix}", candidate.id);
            }
        }
    }
}

fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
