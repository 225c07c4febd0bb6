//! Gates and scoring: exclusion denylist, organization detection, relevance score.

use paperfeed_shared::Organization;

use crate::rules::ClassifierRules;

/// Join two text fields with a space and lowercase the result.
pub(crate) fn haystack(first: &str, second: &str) -> String {
    let mut text = String::with_capacity(first.len() + second.len() + 1);
    text.push_str(first);
    text.push(' ');
    text.push_str(second);
    text.to_lowercase()
}

/// Hot keywords present in `text` (already lowercased), in declared order.
pub(crate) fn matched_keywords<'r>(
    rules: &'r ClassifierRules,
    text: &'r str,
) -> impl Iterator<Item = &'r str> + 'r {
    rules
        .hot_keywords
        .iter()
        .map(String::as_str)
        .filter(move |kw| text.contains(kw))
}

/// Whether the record matches an off-domain topic and must be dropped.
pub fn is_excluded(rules: &ClassifierRules, title: &str, abstract_text: &str) -> bool {
    let text = haystack(title, abstract_text);
    rules.exclusions.iter().any(|phrase| text.contains(phrase.as_str()))
}

/// First organization (in rule order) with a signature present in the
/// author list or abstract.
pub fn detect_organization(
    rules: &ClassifierRules,
    authors_text: &str,
    abstract_text: &str,
) -> Option<Organization> {
    let text = haystack(authors_text, abstract_text);
    rules
        .organizations
        .iter()
        .find(|(_, signatures)| signatures.iter().any(|sig| text.contains(sig.as_str())))
        .map(|(org, _)| *org)
}

/// Importance score: organization bonus plus a bonus per hot keyword present.
pub fn score(rules: &ClassifierRules, title: &str, abstract_text: &str, authors_text: &str) -> u32 {
    let mut total = 0;

    if detect_organization(rules, authors_text, abstract_text).is_some() {
        total += rules.org_bonus;
    }

    let text = haystack(title, abstract_text);
    let hits = matched_keywords(rules, &text).count() as u32;
    total + hits * rules.keyword_bonus
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ClassifierRules {
        ClassifierRules::default()
    }

    #[test]
    fn excludes_physics_case_insensitively() {
        let rules = rules();
        assert!(is_excluded(
            &rules,
            "Imaging a Black Hole",
            "We study accretion."
        ));
        assert!(is_excluded(&rules, "Plain title", "Thermodynamic limits of engines"));
        assert!(!is_excluded(
            &rules,
            "Agents that plan",
            "A reasoning benchmark."
        ));
    }

    #[test]
    fn organization_first_hit_wins_by_rule_order() {
        let rules = rules();
        // Both Microsoft and DeepSeek appear; DeepSeek is declared first.
        let org = detect_organization(&rules, "Jane Doe (Microsoft), John Roe (DeepSeek)", "");
        assert_eq!(org, Some(Organization::DeepSeek));
    }

    #[test]
    fn organization_found_in_abstract() {
        let rules = rules();
        let org = detect_organization(&rules, "Jane Doe", "Work done at Tsinghua University.");
        assert_eq!(org, Some(Organization::Tsinghua));
    }

    #[test]
    fn no_organization() {
        let rules = rules();
        assert_eq!(detect_organization(&rules, "Jane Doe", "A study of graphs."), None);
    }

    #[test]
    fn score_counts_org_and_keywords() {
        let rules = rules();
        // "reasoning" and "benchmark" are hot keywords.
        let s = score(&rules, "A reasoning benchmark", "We evaluate.", "OpenAI team");
        assert_eq!(s, ORG + 2 * KW);
    }

    #[test]
    fn overlapping_keywords_double_count() {
        let rules = rules();
        // "visual reasoning" also contains "reasoning".
        let s = score(&rules, "Visual reasoning", "", "Jane Doe");
        assert_eq!(s, 2 * KW);
    }

    #[test]
    fn score_without_matches_is_zero() {
        let rules = rules();
        assert_eq!(score(&rules, "On graphs", "Lemmas.", "Jane Doe"), 0);
    }

    const ORG: u32 = crate::rules::ORG_BONUS;
    const KW: u32 = crate::rules::KEYWORD_BONUS;
}
