//! Lookup tables driving classification.
//!
//! Every table is an ordered list rather than a map: first-hit-wins organization
//! matching and domain truncation both depend on declaration order.

use paperfeed_shared::{Domain, Organization};

/// Organization signatures in priority order.
const ORGANIZATIONS: &[(Organization, &[&str])] = &[
    (Organization::DeepMind, &["deepmind", "google deepmind"]),
    (Organization::DeepSeek, &["deepseek"]),
    (Organization::OpenAI, &["openai"]),
    (Organization::Anthropic, &["anthropic"]),
    (Organization::Meta, &["meta ai", "fair", "facebook ai"]),
    (Organization::Alibaba, &["alibaba", "damo academy", "qwen"]),
    (Organization::Google, &["google research", "google brain"]),
    (Organization::Microsoft, &["microsoft research", "microsoft"]),
    // Universities
    (Organization::Stanford, &["stanford"]),
    (Organization::Mit, &["mit ", "massachusetts institute"]),
    (Organization::Berkeley, &["berkeley", "uc berkeley"]),
    (Organization::Cmu, &["carnegie mellon", "cmu"]),
    (Organization::Princeton, &["princeton"]),
    (Organization::Tsinghua, &["tsinghua"]),
    (Organization::Peking, &["peking university"]),
];

const HOT_KEYWORDS: &[&str] = &[
    "reasoning",
    "agent",
    "rlhf",
    "grpo",
    "moe",
    "mixture of experts",
    "long-context",
    "rag",
    "retrieval",
    "chain-of-thought",
    "cot",
    "instruction tuning",
    "alignment",
    "safety",
    "multimodal",
    "vision-language",
    "code generation",
    "math",
    "benchmark",
    "scaling law",
    "efficient",
    "sparse attention",
    "distillation",
    "world model",
    "embodied",
    "robotics",
    "video generation",
    // Vision-language models
    "vlm",
    "vision language",
    "visual instruction",
    "image understanding",
    "visual reasoning",
    "visual question",
    "image-text",
    "text-to-image",
    "llava",
    "qwen-vl",
    "internvl",
    "cogvlm",
    "visual encoder",
    "image generation",
    "diffusion model",
    "stable diffusion",
];

const CATEGORY_DOMAINS: &[(&str, &[Domain])] = &[
    ("cs.CL", &[Domain::Llm]),
    ("cs.LG", &[Domain::Llm, Domain::Efficiency]),
    ("cs.CV", &[Domain::Vision]),
    ("cs.AI", &[Domain::Agent, Domain::Reasoning]),
    ("cs.MA", &[Domain::Agent]),
    ("cs.RO", &[Domain::Robotics]),
];

const KEYWORD_DOMAINS: &[(&str, Domain)] = &[
    ("reasoning", Domain::Reasoning),
    ("agent", Domain::Agent),
    ("rag", Domain::Rag),
    ("retrieval", Domain::Rag),
    ("multimodal", Domain::Multimodal),
    ("vision", Domain::Vision),
    ("video", Domain::Vision),
    ("robotics", Domain::Robotics),
    ("embodied", Domain::Robotics),
    ("medical", Domain::Healthcare),
    ("health", Domain::Healthcare),
    ("protein", Domain::Science),
    ("molecule", Domain::Science),
    ("efficient", Domain::Efficiency),
    ("sparse", Domain::Efficiency),
    ("vlm", Domain::Multimodal),
    ("vision language", Domain::Multimodal),
    ("visual instruction", Domain::Multimodal),
    ("image-text", Domain::Multimodal),
    ("image generation", Domain::Vision),
    ("diffusion", Domain::Vision),
];

/// Off-domain topics (physics and friends).
const EXCLUSIONS: &[&str] = &[
    "dark matter",
    "particle physics",
    "quantum field",
    "cosmology",
    "astrophysics",
    "condensed matter",
    "superconductor",
    "gravitational",
    "black hole",
    "neutrino",
    "hadron",
    "quark",
    "thermodynamic",
];

/// Bonus for a recognised organization.
pub const ORG_BONUS: u32 = 15;

/// Bonus per hot keyword present.
pub const KEYWORD_BONUS: u32 = 3;

/// Immutable classification tables, built once per process and passed by reference.
///
/// Patterns are matched as substrings of lowercased text, so they must be lowercase.
/// Category codes are matched exactly.
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    pub organizations: Vec<(Organization, Vec<String>)>,
    pub hot_keywords: Vec<String>,
    pub category_domains: Vec<(String, Vec<Domain>)>,
    pub keyword_domains: Vec<(String, Domain)>,
    pub exclusions: Vec<String>,
    pub org_bonus: u32,
    pub keyword_bonus: u32,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            organizations: ORGANIZATIONS
                .iter()
                .map(|(org, sigs)| (*org, strings(sigs)))
                .collect(),
            hot_keywords: strings(HOT_KEYWORDS),
            category_domains: CATEGORY_DOMAINS
                .iter()
                .map(|(cat, domains)| ((*cat).to_string(), domains.to_vec()))
                .collect(),
            keyword_domains: KEYWORD_DOMAINS
                .iter()
                .map(|(kw, domain)| ((*kw).to_string(), *domain))
                .collect(),
            exclusions: strings(EXCLUSIONS),
            org_bonus: ORG_BONUS,
            keyword_bonus: KEYWORD_BONUS,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patterns_are_lowercase() {
        let rules = ClassifierRules::default();
        let all = rules
            .organizations
            .iter()
            .flat_map(|(_, sigs)| sigs.iter())
            .chain(rules.hot_keywords.iter())
            .chain(rules.keyword_domains.iter().map(|(kw, _)| kw))
            .chain(rules.exclusions.iter());
        for pattern in all {
            assert_eq!(pattern, &pattern.to_lowercase(), "pattern {pattern:?}");
        }
    }

    #[test]
    fn every_organization_has_signatures() {
        let rules = ClassifierRules::default();
        assert_eq!(rules.organizations.len(), 15);
        for (org, sigs) in &rules.organizations {
            assert!(!sigs.is_empty(), "{org} has no signatures");
        }
        assert_eq!(rules.organizations[0].0, Organization::DeepMind);
    }
}
