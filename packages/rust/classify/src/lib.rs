//! Relevance gating and labelling of research-paper records.
//!
//! Every function here is pure and takes the lookup tables as a
//! [`ClassifierRules`] parameter:
//! - [`is_excluded`]: off-domain denylist gate
//! - [`score`] and [`detect_organization`]: admission inputs
//! - [`classify_domains`] and [`extract_tags`]: topical labels
//! - [`generate_id`]: title slug

mod detect;
mod labels;
mod rules;
mod slug;

pub use detect::{detect_organization, is_excluded, score};
pub use labels::{MAX_DOMAINS, MAX_TAGS, classify_domains, extract_tags};
pub use rules::{ClassifierRules, KEYWORD_BONUS, ORG_BONUS};
pub use slug::generate_id;
