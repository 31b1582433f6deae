//! On-demand node synthesis for concepts nobody seeded.

use crate::concept::{title_case, ConceptKey, ConceptNode, ConceptSource, Difficulty};
use std::collections::BTreeSet;

/// Coarse domain buckets that condition synthesized prerequisites and steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainCategory {
    Programming,
    Data,
    Design,
    Other,
}

impl DomainCategory {
    pub fn of(domain: &str) -> Self {
        let domain = domain.trim().to_lowercase();
        match domain.as_str() {
            "programming"
            | "software_engineering"
            | "python_development"
            | "web_development"
            | "mobile_development"
            | "game_development"
            | "web3_development"
            | "devops"
            | "cloud_computing" => Self::Programming,
            "data_science" | "ai_engineering" | "database" | "data_engineering" => Self::Data,
            "design" | "ui_ux" | "ui_ux_design" => Self::Design,
            _ => Self::Other,
        }
    }

    fn prerequisites(self) -> &'static [&'static str] {
        match self {
            Self::Programming | Self::Data => &["problem_solving", "logical_thinking"],
            Self::Design => &["creativity", "visual_thinking"],
            Self::Other => &[],
        }
    }

    fn extra_step(self, title: &str) -> Option<String> {
        match self {
            Self::Programming => Some(format!("Setting up a development environment for {}", title)),
            Self::Data => Some(format!("Data collection and preparation for {}", title)),
            Self::Design => Some(format!("Design principles for {}", title)),
            Self::Other => None,
        }
    }
}

/// Build a generic node for `key` under `domain`.
pub fn synthesize(key: &ConceptKey, domain: &str) -> ConceptNode {
    let title = key.display_name();
    let domain_title = if domain.trim().is_empty() {
        "General".to_string()
    } else {
        title_case(domain)
    };
    let category = DomainCategory::of(domain);
    let words = key.word_count().max(1);

    let difficulty = if words > 1 {
        Difficulty::Intermediate
    } else {
        Difficulty::Beginner
    };

    let mut learning_path = vec![
        format!("Introduction to {}", title),
        format!("Core concepts of {}", title),
        format!("Practical applications of {}", title),
        format!("Advanced topics in {}", title),
        format!("Real-world projects with {}", title),
    ];
    if let Some(step) = category.extra_step(&title) {
        learning_path.insert(1, step);
    }

    let prerequisites: BTreeSet<ConceptKey> = category
        .prerequisites()
        .iter()
        .map(|p| ConceptKey::new(p))
        .collect();

    let related: BTreeSet<ConceptKey> = [
        ConceptKey::new(&format!("advanced_{}", key)),
        ConceptKey::new(&format!("{}_applications", key)),
    ]
    .into_iter()
    .collect();

    let mut node = ConceptNode {
        key: key.clone(),
        domain: domain.to_string(),
        definition: format!(
            "{} is a learning topic in {}. This entry was outlined automatically and has no curated detail yet.",
            title, domain_title
        ),
        prerequisites,
        related,
        learning_path,
        difficulty,
        estimated_time: format!("{}-{} weeks", words * 2, words * 4),
        source: ConceptSource::Synthesized,
    };
    node.strip_self_loops();
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_word_is_beginner() {
        let node = synthesize(&ConceptKey::new("rust"), "programming");
        assert_eq!(node.difficulty, Difficulty::Beginner);
        assert_eq!(node.estimated_time, "2-4 weeks");
    }

    #[test]
    fn compound_is_intermediate_and_scaled() {
        let node = synthesize(&ConceptKey::new("graph neural networks"), "ai_engineering");
        assert_eq!(node.difficulty, Difficulty::Intermediate);
        assert_eq!(node.estimated_time, "6-12 weeks");
    }

    #[test]
    fn recognized_domain_gets_one_extra_step() {
        let plain = synthesize(&ConceptKey::new("poetry"), "literature");
        let data = synthesize(&ConceptKey::new("pandas"), "data_science");
        assert_eq!(plain.learning_path.len(), 5);
        assert_eq!(data.learning_path.len(), 6);
        assert!(data.learning_path[1].starts_with("Data collection"));
    }

    #[test]
    fn design_domain_prerequisites() {
        let node = synthesize(&ConceptKey::new("typography"), "ui_ux_design");
        assert!(node.prerequisites.contains(&ConceptKey::new("creativity")));
        assert!(node.prerequisites.contains(&ConceptKey::new("visual_thinking")));
    }

    #[test]
    fn never_references_itself() {
        let node = synthesize(&ConceptKey::new("problem_solving"), "programming");
        assert!(!node.prerequisites.contains(&node.key));
        assert!(!node.related.contains(&node.key));
    }
}
