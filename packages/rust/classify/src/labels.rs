//! Topical labels: domain classification and keyword tags.

use indexmap::IndexSet;
use paperfeed_shared::Domain;

use crate::detect::{haystack, matched_keywords};
use crate::rules::ClassifierRules;

/// Maximum number of domains attached to a candidate.
pub const MAX_DOMAINS: usize = 3;

/// Maximum number of tags attached to a candidate.
pub const MAX_TAGS: usize = 5;

/// Map category codes and keyword hits to at most [`MAX_DOMAINS`] labels.
///
/// Labels keep first-insertion order: category mappings (in the record's
/// category order) come before keyword mappings. Never returns an empty list.
pub fn classify_domains(
    rules: &ClassifierRules,
    title: &str,
    abstract_text: &str,
    categories: &[String],
) -> Vec<Domain> {
    let mut domains: IndexSet<Domain> = IndexSet::new();

    for category in categories {
        if let Some((_, mapped)) = rules
            .category_domains
            .iter()
            .find(|(code, _)| code == category)
        {
            domains.extend(mapped.iter().copied());
        }
    }

    let text = haystack(title, abstract_text);
    for (keyword, domain) in &rules.keyword_domains {
        if text.contains(keyword.as_str()) {
            domains.insert(*domain);
        }
    }

    if domains.is_empty() {
        domains.insert(Domain::DEFAULT);
    }

    domains.into_iter().take(MAX_DOMAINS).collect()
}

/// Hyphen-normalized hot keywords present in the text, first [`MAX_TAGS`] in
/// keyword declaration order.
pub fn extract_tags(rules: &ClassifierRules, title: &str, abstract_text: &str) -> Vec<String> {
    let text = haystack(title, abstract_text);
    matched_keywords(rules, &text)
        .map(|kw| kw.replace([' ', '_'], "-"))
        .take(MAX_TAGS)
        .collect()
}
