//! End-to-end ingest run: source → candidate batch → store merge → write.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use paperfeed_classify::ClassifierRules;
use paperfeed_search::{ArxivClient, SearchOptions, load_records};
use paperfeed_shared::{AppConfig, Candidate, RawRecord, Result, RunId};
use paperfeed_store::{MergeOptions, MergeOutcome, PaperStore};
use paperfeed_translate::Translator;

use crate::pipeline::{PipelineOptions, ProgressReporter, build_batch};

/// Where the raw records come from.
#[derive(Debug, Clone)]
pub enum RecordSource {
    /// Live arXiv search.
    Arxiv(SearchOptions),
    /// JSON array of records on disk.
    File(PathBuf),
}

impl RecordSource {
    /// Fetch or read the records.
    pub async fn load(&self) -> Result<Vec<RawRecord>> {
        match self {
            Self::Arxiv(options) => ArxivClient::new(options.clone())?.search().await,
            Self::File(path) => load_records(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Arxiv(options) => options.base_url.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub store_path: PathBuf,
    pub pipeline: PipelineOptions,
    pub merge: MergeOptions,
    /// Merge in memory only; leave the store file alone.
    pub dry_run: bool,
}

impl RunOptions {
    /// Options from configuration, with the store path taken from `[store]`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            store_path: PathBuf::from(&config.store.path),
            pipeline: PipelineOptions::from(config),
            merge: MergeOptions::from(config),
            dry_run: false,
        }
    }
}

/// Summary of one run.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: RunId,
    /// Records received from the source.
    pub fetched: usize,
    /// Ranked candidates offered to the store.
    pub batch: Vec<Candidate>,
    pub outcome: MergeOutcome,
    /// Whether the store file was rewritten.
    pub written: bool,
    pub elapsed: Duration,
}

/// Run the full ingest pipeline.
///
/// 1. Load records from `source`
/// 2. Select, rank and translate candidates
/// 3. Merge into the store
/// 4. Write the store back (unless dry run or nothing changed)
#[instrument(skip_all, fields(source = %source.describe(), store = %options.store_path.display()))]
pub async fn run_ingest<T: Translator>(
    source: &RecordSource,
    options: &RunOptions,
    translator: &T,
    progress: &dyn ProgressReporter,
    now: DateTime<Utc>,
) -> Result<RunReport> {
    let start = Instant::now();
    let run_id = RunId::new();
    info!(%run_id, dry_run = options.dry_run, "starting ingest run");

    // Fail before any network work if the store is missing.
    progress.phase("Opening store");
    let mut store = PaperStore::open(&options.store_path)?;

    progress.phase("Fetching records");
    let records = source.load().await?;

    progress.phase("Selecting candidates");
    let rules = ClassifierRules::default();
    let batch = build_batch(&records, &rules, &options.pipeline, translator, progress, now).await;

    progress.phase("Merging");
    let outcome = store.merge(&batch, &options.merge, now.date_naive())?;

    let written = if outcome.changed() && !options.dry_run {
        progress.phase("Writing store");
        store.save()?;
        true
    } else {
        if options.dry_run && outcome.changed() {
            warn!(added = outcome.added.len(), "dry run: store not written");
        }
        false
    };

    let report = RunReport {
        run_id,
        fetched: records.len(),
        batch,
        outcome,
        written,
        elapsed: start.elapsed(),
    };

    info!(
        run_id = %report.run_id,
        fetched = report.fetched,
        candidates = report.batch.len(),
        added = report.outcome.added.len(),
        written = report.written,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "ingest run complete"
    );
    progress.done(&report);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use paperfeed_shared::PaperfeedError;
    use paperfeed_translate::PassthroughTranslator;
    use url::Url;

    use crate::pipeline::SilentProgress;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn setup() -> (tempfile::TempDir, RunOptions) {
        let dir = tempfile::TempDir::new().unwrap();
        let store_path = dir.path().join("papers.ts");
        std::fs::copy("../../../fixtures/store/papers.ts", &store_path).unwrap();
        let options = RunOptions {
            store_path,
            pipeline: PipelineOptions::default(),
            merge: MergeOptions::default(),
            dry_run: false,
        };
        (dir, options)
    }

    fn fixture_source() -> RecordSource {
        RecordSource::File(PathBuf::from("../../../fixtures/json/records.json"))
    }

    #[tokio::test]
    async fn ingest_from_file_is_idempotent() {
        let (_dir, options) = setup();
        let source = fixture_source();

        let first = run_ingest(&source, &options, &PassthroughTranslator, &SilentProgress, now())
            .await
            .unwrap();
        assert_eq!(first.fetched, 3);
        assert_eq!(first.outcome.added.len(), 2);
        assert!(first.written);

        let after_first = std::fs::read_to_string(&options.store_path).unwrap();
        assert!(after_first.contains("// Auto-added: 2026-10-19"));
        assert!(after_first.contains("id: 'deepseek-proposes-a-new',"));

        let second = run_ingest(&source, &options, &PassthroughTranslator, &SilentProgress, now())
            .await
            .unwrap();
        assert!(second.outcome.added.is_empty());
        assert!(!second.written);
        assert_eq!(std::fs::read_to_string(&options.store_path).unwrap(), after_first);
    }

    #[tokio::test]
    async fn dry_run_leaves_store_alone() {
        let (_dir, mut options) = setup();
        options.dry_run = true;
        let before = std::fs::read_to_string(&options.store_path).unwrap();

        let report = run_ingest(&fixture_source(), &options, &PassthroughTranslator, &SilentProgress, now())
            .await
            .unwrap();
        assert_eq!(report.outcome.added.len(), 2);
        assert!(!report.written);
        assert_eq!(std::fs::read_to_string(&options.store_path).unwrap(), before);
    }

    #[tokio::test]
    async fn missing_store_fails_before_fetching() {
        let options = RunOptions {
            store_path: PathBuf::from("/nonexistent/papers.ts"),
            ..RunOptions::from_config(&AppConfig::default())
        };
        let err = run_ingest(&fixture_source(), &options, &PassthroughTranslator, &SilentProgress, now())
            .await
            .unwrap_err();
        assert!(matches!(err, PaperfeedError::StoreNotFound { .. }));
    }

    #[tokio::test]
    async fn ingest_from_arxiv_mock() {
        let (_dir, options) = setup();
        let server = wiremock::MockServer::start().await;
        let feed = std::fs::read_to_string("../../../fixtures/atom/arxiv-feed.xml").unwrap();

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::query_param("sortBy", "submittedDate"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(feed))
            .expect(1)
            .mount(&server)
            .await;

        let source = RecordSource::Arxiv(SearchOptions {
            base_url: Url::parse(&format!("{}/api/query", server.uri())).unwrap(),
            categories: vec!["cs.CL".into(), "cs.AI".into()],
            max_results: 50,
            timeout_secs: 5,
        });

        let report = run_ingest(&source, &options, &PassthroughTranslator, &SilentProgress, now())
            .await
            .unwrap();
        assert_eq!(report.fetched, 3);
        assert!(report.outcome.added.contains(&"deepseek-proposes-a-new".to_string()));
        assert!(report.written);
    }
}
