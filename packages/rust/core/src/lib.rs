//! Core orchestration for paperfeed.
//!
//! Ties the classifier, translator and store together into the candidate
//! pipeline ([`pipeline`]), the end-to-end ingest run ([`run`]) and the
//! translation backfill over an existing store ([`backfill`]).

pub mod backfill;
pub mod pipeline;
pub mod run;
