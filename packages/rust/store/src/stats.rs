//! Store summary counts.

use std::collections::BTreeMap;

use crate::grammar::StoredEntry;

/// Entry counts for the `stats` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total: usize,
    /// Entries per organization; entries without one count under `"Unknown"`.
    pub by_organization: BTreeMap<String, usize>,
    /// Entries per domain label. An entry counts once for each of its domains.
    pub by_domain: BTreeMap<String, usize>,
}

impl StoreStats {
    pub(crate) fn from_entries(entries: &[StoredEntry]) -> Self {
        let mut stats = Self {
            total: entries.len(),
            ..Self::default()
        };
        for entry in entries {
            let org = entry.organization.as_deref().unwrap_or("Unknown");
            *stats.by_organization.entry(org.to_string()).or_default() += 1;
            for domain in &entry.domains {
                *stats.by_domain.entry(domain.clone()).or_default() += 1;
            }
        }
        stats
    }

    /// Organizations sorted by descending count, ties by name.
    pub fn top_organizations(&self) -> Vec<(&str, usize)> {
        let mut orgs: Vec<(&str, usize)> = self
            .by_organization
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        orgs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        orgs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, org: Option<&str>, domains: &[&str]) -> StoredEntry {
        StoredEntry {
            id: id.into(),
            title: None,
            organization: org.map(str::to_string),
            domains: domains.iter().map(|d| d.to_string()).collect(),
            source_url: None,
        }
    }

    #[test]
    fn counts_by_org_and_domain() {
        let stats = StoreStats::from_entries(&[
            entry("a", Some("OpenAI"), &["LLM", "Agent"]),
            entry("b", Some("DeepMind"), &["LLM"]),
            entry("c", Some("OpenAI"), &[]),
            entry("d", None, &["Vision"]),
        ]);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_organization["OpenAI"], 2);
        assert_eq!(stats.by_organization["Unknown"], 1);
        assert_eq!(stats.by_domain["LLM"], 2);
        assert_eq!(stats.top_organizations()[0], ("OpenAI", 2));
        assert_eq!(stats.top_organizations()[1], ("DeepMind", 1));
    }
}
