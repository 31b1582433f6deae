//! Curated concepts installed at startup.
//!
//! Prerequisite and related names are normalized into concept keys, so
//! "Python Programming" and `python_programming` refer to the same node.

use crate::concept::{ConceptKey, ConceptNode, ConceptSource, Difficulty};

struct Seed {
    key: &'static str,
    domain: &'static str,
    definition: &'static str,
    prerequisites: &'static [&'static str],
    related: &'static [&'static str],
    path: &'static [&'static str],
    difficulty: Difficulty,
    time: &'static str,
}

impl Seed {
    fn into_node(self) -> ConceptNode {
        let mut node = ConceptNode {
            key: ConceptKey::new(self.key),
            domain: self.domain.to_string(),
            definition: self.definition.to_string(),
            prerequisites: self.prerequisites.iter().map(|p| ConceptKey::new(p)).collect(),
            related: self.related.iter().map(|r| ConceptKey::new(r)).collect(),
            learning_path: self.path.iter().map(|s| s.to_string()).collect(),
            difficulty: self.difficulty,
            estimated_time: self.time.to_string(),
            source: ConceptSource::Seeded,
        };
        node.strip_self_loops();
        node
    }
}

/// The curated seed set.
pub fn default_seeds() -> Vec<ConceptNode> {
    let seeds = vec![
        // ─── AI engineering ───
        Seed {
            key: "machine_learning",
            domain: "ai_engineering",
            definition: "A subset of artificial intelligence that enables computers to learn and make decisions from data",
            prerequisites: &["linear_algebra", "statistics", "python_programming"],
            related: &["supervised_learning", "unsupervised_learning", "deep_learning"],
            path: &[
                "Mathematical Foundations",
                "Programming Skills",
                "ML Algorithms",
                "Model Evaluation",
                "Production Deployment",
            ],
            difficulty: Difficulty::Intermediate,
            time: "3-6 months",
        },
        Seed {
            key: "deep_learning",
            domain: "ai_engineering",
            definition: "A subset of machine learning using neural networks with multiple layers",
            prerequisites: &["machine_learning", "linear_algebra", "calculus"],
            related: &["neural_networks", "cnn", "rnn", "transformers"],
            path: &[
                "Neural Network Basics",
                "Backpropagation",
                "Convolutional Networks",
                "Recurrent Networks",
                "Advanced Architectures",
            ],
            difficulty: Difficulty::Advanced,
            time: "4-8 months",
        },
        Seed {
            key: "neural_networks",
            domain: "ai_engineering",
            definition: "Computing systems inspired by biological neural networks",
            prerequisites: &["linear_algebra", "calculus", "python_programming"],
            related: &["deep_learning", "backpropagation", "activation_functions"],
            path: &[
                "Perceptron",
                "Multi-layer Perceptron",
                "Backpropagation Algorithm",
                "Activation Functions",
                "Network Architectures",
            ],
            difficulty: Difficulty::Intermediate,
            time: "2-4 months",
        },
        // ─── Web3 ───
        Seed {
            key: "blockchain",
            domain: "web3_development",
            definition: "A distributed ledger technology that maintains a continuously growing list of records",
            prerequisites: &["cryptography", "distributed_systems", "javascript"],
            related: &["consensus_mechanisms", "smart_contracts", "cryptocurrency"],
            path: &[
                "Cryptography Basics",
                "Distributed Systems",
                "Blockchain Architecture",
                "Consensus Algorithms",
                "Smart Contract Development",
            ],
            difficulty: Difficulty::Intermediate,
            time: "2-4 months",
        },
        Seed {
            key: "smart_contracts",
            domain: "web3_development",
            definition: "Self-executing contracts with terms directly written into code",
            prerequisites: &["blockchain", "solidity", "ethereum"],
            related: &["defi", "nfts", "daos", "gas_optimization"],
            path: &[
                "Solidity Language",
                "Ethereum Platform",
                "Contract Development",
                "Testing and Deployment",
                "Security Best Practices",
            ],
            difficulty: Difficulty::Intermediate,
            time: "3-5 months",
        },
        Seed {
            key: "cryptocurrency",
            domain: "web3_development",
            definition: "Digital or virtual currency secured by cryptography",
            prerequisites: &["cryptography", "economics", "computer_science"],
            related: &["bitcoin", "ethereum", "mining", "wallets"],
            path: &[
                "Cryptographic Principles",
                "Consensus Mechanisms",
                "Mining and Validation",
                "Wallet Technology",
                "Market Dynamics",
            ],
            difficulty: Difficulty::Beginner,
            time: "1-3 months",
        },
        // ─── Data science ───
        Seed {
            key: "data_analysis",
            domain: "data_science",
            definition: "The process of inspecting, cleaning, and modeling data to discover useful information",
            prerequisites: &["statistics", "python", "sql"],
            related: &["data_visualization", "statistical_analysis", "data_cleaning"],
            path: &[
                "Statistical Foundations",
                "Data Manipulation",
                "Exploratory Data Analysis",
                "Data Visualization",
                "Statistical Modeling",
            ],
            difficulty: Difficulty::Beginner,
            time: "2-4 months",
        },
        Seed {
            key: "statistics",
            domain: "data_science",
            definition: "The science of collecting, analyzing, and interpreting data",
            prerequisites: &["mathematics", "probability"],
            related: &["probability", "hypothesis_testing", "regression_analysis"],
            path: &[
                "Descriptive Statistics",
                "Probability Theory",
                "Inferential Statistics",
                "Hypothesis Testing",
                "Regression Analysis",
            ],
            difficulty: Difficulty::Beginner,
            time: "2-3 months",
        },
    ];

    let mut nodes: Vec<ConceptNode> = seeds.into_iter().map(Seed::into_node).collect();
    nodes.extend(foundational());
    nodes
}

// ─── General foundations: definition only ───
fn foundational() -> Vec<ConceptNode> {
    [
        ("learning", "The process of acquiring knowledge and skills"),
        ("education", "The systematic process of learning and teaching"),
        ("skill", "The ability to do something well"),
        ("knowledge", "Information and understanding gained through experience"),
        ("practice", "Repeated exercise to improve performance"),
        ("theory", "A system of ideas intended to explain something"),
        ("application", "The practical use of knowledge or skills"),
    ]
    .into_iter()
    .map(|(key, definition)| {
        let key = ConceptKey::new(key);
        let title = key.display_name();
        ConceptNode {
            key,
            domain: "general".to_string(),
            definition: definition.to_string(),
            prerequisites: Default::default(),
            related: Default::default(),
            learning_path: vec![
                format!("What {} means", title),
                format!("{} in everyday study", title),
                format!("Building a habit around {}", title),
            ],
            difficulty: Difficulty::Beginner,
            estimated_time: "1-2 weeks".to_string(),
            source: ConceptSource::Seeded,
        }
    })
    .collect()
}
