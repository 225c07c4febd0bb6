//! Application configuration for paperfeed.
//!
//! User config lives at `~/.paperfeed/paperfeed.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PaperfeedError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "paperfeed.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".paperfeed";

// ---------------------------------------------------------------------------
// Config structs (matching paperfeed.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// arXiv search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Admission and merge limits.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Translation backend settings.
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Persisted store location.
    #[serde(default)]
    pub store: StoreConfig,
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// arXiv Atom API endpoint.
    #[serde(default = "default_search_url")]
    pub base_url: String,

    /// Category codes OR-ed into the query.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Maximum number of results requested.
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Records published earlier than this many days ago are dropped.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
            categories: default_categories(),
            max_results: default_max_results(),
            lookback_days: default_lookback_days(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_search_url() -> String {
    "http://export.arxiv.org/api/query".into()
}
fn default_categories() -> Vec<String> {
    ["cs.LG", "cs.CL", "cs.AI", "cs.CV", "cs.MA"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_max_results() -> u32 {
    200
}
fn default_lookback_days() -> u32 {
    2
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum score for admission.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: u32,

    /// Maximum entries spliced into the store per merge.
    #[serde(default = "default_max_new_entries")]
    pub max_new_entries: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            score_threshold: default_score_threshold(),
            max_new_entries: default_max_new_entries(),
        }
    }
}

fn default_score_threshold() -> u32 {
    10
}
fn default_max_new_entries() -> usize {
    10
}

/// `[translation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Disable to store source text in the translated fields.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Translation web endpoint origin.
    #[serde(default = "default_translate_url")]
    pub base_url: String,

    #[serde(default = "default_source_lang")]
    pub source_lang: String,

    #[serde(default = "default_target_lang")]
    pub target_lang: String,

    /// Input longer than this many characters is truncated before sending.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Delay after each call, in ms.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_translate_url(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            max_chars: default_max_chars(),
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_translate_url() -> String {
    "https://translate.googleapis.com".into()
}
fn default_source_lang() -> String {
    "en".into()
}
fn default_target_lang() -> String {
    "ko".into()
}
fn default_max_chars() -> usize {
    4500
}
fn default_delay_ms() -> u64 {
    500
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the TypeScript papers module.
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> String {
    "src/data/papers.ts".into()
}

impl AppConfig {
    /// Check values that serde cannot validate on its own.
    pub fn validate(&self) -> Result<()> {
        for (name, raw) in [
            ("search.base_url", &self.search.base_url),
            ("translation.base_url", &self.translation.base_url),
        ] {
            Url::parse(raw)
                .map_err(|e| PaperfeedError::config(format!("invalid {name} '{raw}': {e}")))?;
        }
        if self.search.categories.is_empty() {
            return Err(PaperfeedError::config(
                "search.categories must name at least one category",
            ));
        }
        if self.translation.max_chars == 0 {
            return Err(PaperfeedError::config("translation.max_chars must be positive"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.paperfeed/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PaperfeedError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.paperfeed/paperfeed.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PaperfeedError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        PaperfeedError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PaperfeedError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PaperfeedError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PaperfeedError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("score_threshold"));
        assert!(toml_str.contains("export.arxiv.org"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.search.lookback_days, 2);
        assert_eq!(parsed.pipeline.max_new_entries, 10);
        assert_eq!(parsed.translation.target_lang, "ko");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[pipeline]
score_threshold = 20

[store]
path = "/tmp/papers.ts"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.pipeline.score_threshold, 20);
        assert_eq!(config.pipeline.max_new_entries, 10);
        assert_eq!(config.store.path, "/tmp/papers.ts");
        assert_eq!(config.search.categories.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_url() {
        let mut config = AppConfig::default();
        config.search.base_url = "not a url".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("search.base_url"));
    }

    #[test]
    fn validation_rejects_empty_categories() {
        let mut config = AppConfig::default();
        config.search.categories.clear();
        assert!(config.validate().is_err());
    }
}
