//! Candidate record sources: the arXiv search API and JSON record files.
//!
//! The arXiv query is a disjunction over category codes, sorted by submission
//! date (newest first) and capped at a maximum result count. Records outside the
//! lookback window are left in place here; the candidate pipeline drops them.

mod parser;

use std::path::Path;
use std::time::Duration;

use paperfeed_shared::{AppConfig, PaperfeedError, RawRecord, Result};
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

/// User-Agent string for search requests.
const USER_AGENT: &str = concat!("paperfeed/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 3;

// ---------------------------------------------------------------------------
// Search options
// ---------------------------------------------------------------------------

/// Configuration for one search request.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// API endpoint.
    pub base_url: Url,
    /// Category codes OR-ed together.
    pub categories: Vec<String>,
    /// Maximum results requested.
    pub max_results: u32,
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl TryFrom<&AppConfig> for SearchOptions {
    type Error = PaperfeedError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        let base_url = Url::parse(&config.search.base_url).map_err(|e| {
            PaperfeedError::config(format!("invalid search.base_url: {e}"))
        })?;
        Ok(Self {
            base_url,
            categories: config.search.categories.clone(),
            max_results: config.search.max_results,
            timeout_secs: config.search.timeout_secs,
        })
    }
}

/// Build the `search_query` value: `cat:A OR cat:B ...`.
pub fn build_query(categories: &[String]) -> String {
    categories
        .iter()
        .map(|cat| format!("cat:{cat}"))
        .collect::<Vec<_>>()
        .join(" OR ")
}

// ---------------------------------------------------------------------------
// ArxivClient
// ---------------------------------------------------------------------------

/// Thin client over the arXiv Atom API.
pub struct ArxivClient {
    client: Client,
    options: SearchOptions,
}

impl ArxivClient {
    /// Create a client with the given options.
    pub fn new(options: SearchOptions) -> Result<Self> {
        if options.categories.is_empty() {
            return Err(PaperfeedError::validation(
                "search needs at least one category",
            ));
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| {
                PaperfeedError::Network(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { client, options })
    }

    /// Fetch the newest records for the configured categories.
    #[instrument(skip_all, fields(url = %self.options.base_url, max = self.options.max_results))]
    pub async fn search(&self) -> Result<Vec<RawRecord>> {
        let query = build_query(&self.options.categories);
        info!(%query, "querying arXiv");

        let max_results = self.options.max_results.to_string();
        let response = self
            .client
            .get(self.options.base_url.as_str())
            .query(&[
                ("search_query", query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await
            .map_err(|e| PaperfeedError::Network(format!("{}: {e}", self.options.base_url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaperfeedError::Network(format!(
                "{}: HTTP {status}",
                self.options.base_url
            )));
        }

        let body = response.text().await.map_err(|e| {
            PaperfeedError::Network(format!("{}: failed to read body: {e}", self.options.base_url))
        })?;

        let mut records = parser::parse_atom_feed(&body)?;
        records.truncate(self.options.max_results as usize);

        info!(records = records.len(), "search complete");
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Record files
// ---------------------------------------------------------------------------

/// Load records from a JSON array on disk (offline ingest).
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| PaperfeedError::io(path, e))?;
    let records: Vec<RawRecord> = serde_json::from_str(&content).map_err(|e| {
        PaperfeedError::parse(format!("invalid record file {}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), records = records.len(), "loaded record file");
    Ok(records)
}
