//! Shared types, error model, and configuration for paperfeed.
//!
//! This crate is the foundation depended on by all other paperfeed crates.
//! It provides:
//! - [`PaperfeedError`]: the unified error type
//! - Domain types ([`RawRecord`], [`Candidate`], [`Organization`], [`Domain`], [`RunId`])
//! - Configuration ([`AppConfig`], config loading)
//! - Text helpers ([`text`])

pub mod config;
pub mod error;
pub mod text;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, PipelineConfig, SearchConfig, StoreConfig, TranslationConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{PaperfeedError, Result};
pub use types::{Candidate, Domain, Organization, RawRecord, RunId};
