//! Intent classification: turns free text into `(kind, topic, domain)`.
//!
//! Every table in this module is an ordered cascade evaluated top to bottom;
//! the first hit wins. Classification is pure: no I/O, no state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    CreatePlan,
    FindResources,
    Explain,
    Greeting,
    Help,
    Fallback,
}

impl IntentKind {
    /// Short tag used in request ids and logs.
    pub fn slug(self) -> &'static str {
        match self {
            IntentKind::CreatePlan => "plan",
            IntentKind::FindResources => "materials",
            IntentKind::Explain => "insights",
            IntentKind::Greeting => "greeting",
            IntentKind::Help => "help",
            IntentKind::Fallback => "fallback",
        }
    }

    /// Whether this kind is dispatched to a worker rather than answered locally.
    pub fn is_dispatched(self) -> bool {
        matches!(
            self,
            IntentKind::CreatePlan | IntentKind::FindResources | IntentKind::Explain
        )
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Result of classifying one user utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedIntent {
    pub kind: IntentKind,
    pub topic: String,
    pub domain: String,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Known topic phrases, most specific first.
pub const TOPIC_PHRASES: &[&str] = &[
    "python development",
    "python programming",
    "python",
    "django",
    "flask",
    "fastapi",
    "machine learning ops",
    "machine learning",
    "deep learning",
    "neural networks",
    "artificial intelligence",
    "blockchain",
    "smart contracts",
    "solidity",
    "ethereum",
    "web3",
    "data science",
    "data analysis",
    "statistics",
    "pandas",
    "numpy",
    "javascript",
    "typescript",
    "react",
    "nodejs",
    "vue",
    "angular",
    "java",
    "c++",
    "c#",
    "golang",
    "rust",
    "swift",
    "kotlin",
    "frontend",
    "backend",
    "full stack",
    "mobile development",
    "ios",
    "android",
    "devops",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "cybersecurity",
    "ethical hacking",
    "penetration testing",
    "game development",
    "unity",
    "unreal engine",
    "ui/ux design",
    "figma",
    "adobe",
    "design systems",
    "database",
    "sql",
    "mongodb",
    "postgresql",
    "redis",
    "microservices",
    "api development",
    "rest api",
    "graphql",
    "cloud computing",
    "serverless",
    "lambda",
    "terraform",
    "mlops",
    "data engineering",
    "quantum computing",
    "robotics",
    "iot",
    "embedded systems",
];

/// Domain keyword table. `web_development` sits ahead of `data_science`.
pub const DOMAIN_TABLE: &[(&str, &[&str])] = &[
    (
        "python_development",
        &[
            "python development",
            "python programming",
            "python",
            "django",
            "flask",
            "fastapi",
            "python web",
            "python backend",
        ],
    ),
    (
        "ai_engineering",
        &[
            "ai",
            "artificial intelligence",
            "machine learning",
            "deep learning",
            "neural networks",
            "ml",
            "dl",
        ],
    ),
    (
        "web3_development",
        &[
            "web3",
            "blockchain",
            "smart contracts",
            "solidity",
            "ethereum",
            "crypto",
            "defi",
            "nft",
        ],
    ),
    (
        "web_development",
        &[
            "web development",
            "frontend",
            "backend",
            "full stack",
            "react",
            "vue",
            "angular",
            "nodejs",
            "javascript",
        ],
    ),
    (
        "data_science",
        &[
            "data science",
            "data analysis",
            "statistics",
            "pandas",
            "numpy",
            "analytics",
            "big data",
        ],
    ),
    (
        "mobile_development",
        &[
            "mobile development",
            "ios",
            "android",
            "swift",
            "kotlin",
            "react native",
            "flutter",
        ],
    ),
    (
        "devops",
        &[
            "devops",
            "docker",
            "kubernetes",
            "aws",
            "azure",
            "gcp",
            "ci/cd",
            "infrastructure",
        ],
    ),
    (
        "cybersecurity",
        &[
            "cybersecurity",
            "security",
            "ethical hacking",
            "penetration testing",
            "network security",
        ],
    ),
    (
        "game_development",
        &[
            "game development",
            "unity",
            "unreal engine",
            "gaming",
            "game design",
        ],
    ),
    (
        "ui_ux_design",
        &[
            "ui",
            "ux",
            "design",
            "figma",
            "adobe",
            "user interface",
            "user experience",
        ],
    ),
    (
        "cloud_computing",
        &[
            "cloud",
            "aws",
            "azure",
            "gcp",
            "serverless",
            "lambda",
            "terraform",
        ],
    ),
    (
        "database",
        &[
            "database",
            "sql",
            "mongodb",
            "postgresql",
            "redis",
            "data storage",
        ],
    ),
    (
        "software_engineering",
        &[
            "software engineering",
            "programming",
            "coding",
            "algorithms",
            "data structures",
        ],
    ),
];

/// Coarse buckets consulted when no domain keyword matched.
const SECONDARY_BUCKETS: &[(&str, &[&str])] = &[
    (
        "software_engineering",
        &["programming", "coding", "development", "software"],
    ),
    (
        "web_development",
        &["web", "html", "css", "javascript", "react", "vue"],
    ),
    ("mobile_development", &["mobile", "app", "ios", "android"]),
];

pub const FALLBACK_DOMAIN: &str = "general";
pub const EMPTY_TOPIC: &str = "general_learning";

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "that", "this", "will", "learn", "teach", "help", "want",
    "need",
];

const GREETING_WORDS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "greetings",
];

const PLAN_PHRASES: &[&str] = &[
    "teach me",
    "learn",
    "educational plan",
    "learning plan",
    "study plan",
    "curriculum",
    "learning path",
    "create a",
    "help me learn",
];

const RESOURCE_PHRASES: &[&str] = &[
    "resources",
    "find",
    "get me",
    "show me",
    "videos",
    "courses",
    "books",
    "tutorials",
    "materials",
];

const EXPLAIN_PHRASES: &[&str] = &[
    "explain",
    "how does",
    "what is",
    "concept",
    "relationship",
    "prerequisite",
    "deep insights",
];

const HELP_PHRASES: &[&str] = &["help", "what can you do"];

/// Keywords at or below this length without inner spaces match whole words only.
const WHOLE_WORD_MAX: usize = 4;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Lowercased text plus its word tokens, computed once per classification.
struct Utterance {
    lower: String,
    words: Vec<String>,
}

impl Utterance {
    fn new(text: &str) -> Self {
        let lower = text.to_lowercase();
        let words = lower
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
                    .to_string()
            })
            .filter(|w| !w.is_empty())
            .collect();
        Self { lower, words }
    }

    fn matches(&self, keyword: &str) -> bool {
        if keyword.len() <= WHOLE_WORD_MAX && !keyword.contains(' ') {
            self.words.iter().any(|w| w == keyword)
        } else {
            self.lower.contains(keyword)
        }
    }

    fn matches_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.matches(k))
    }
}

/// Classify a user utterance. Total: every input yields an intent.
pub fn classify(text: &str) -> ClassifiedIntent {
    let utterance = Utterance::new(text);
    ClassifiedIntent {
        kind: kind_of(&utterance),
        topic: topic_of(&utterance),
        domain: domain_of(&utterance),
    }
}

/// Extract only the topic slug.
pub fn extract_topic(text: &str) -> String {
    topic_of(&Utterance::new(text))
}

/// Extract only the domain slug.
pub fn extract_domain(text: &str) -> String {
    domain_of(&Utterance::new(text))
}

/// Whether the user asked for video results alongside materials.
pub fn wants_videos(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("youtube") || lower.contains("videos")
}

fn kind_of(u: &Utterance) -> IntentKind {
    if u.matches_any(GREETING_WORDS) {
        IntentKind::Greeting
    } else if u.matches_any(PLAN_PHRASES) {
        IntentKind::CreatePlan
    } else if u.matches_any(RESOURCE_PHRASES) {
        IntentKind::FindResources
    } else if u.matches_any(EXPLAIN_PHRASES) {
        IntentKind::Explain
    } else if u.matches_any(HELP_PHRASES) {
        IntentKind::Help
    } else {
        IntentKind::Fallback
    }
}

fn topic_of(u: &Utterance) -> String {
    if let Some(phrase) = TOPIC_PHRASES.iter().find(|p| u.matches(p)) {
        return phrase.replace(' ', "_");
    }

    if let Some(bigram) = u
        .words
        .windows(2)
        .map(|pair| format!("{}_{}", pair[0], pair[1]))
        .find(|joined| joined.len() > 6)
    {
        return bigram;
    }

    if let Some(word) = u
        .words
        .iter()
        .find(|w| w.len() > 3 && !STOPWORDS.contains(&w.as_str()))
    {
        return word.clone();
    }

    if u.words.is_empty() {
        EMPTY_TOPIC.to_string()
    } else {
        u.words.join("_")
    }
}

fn domain_of(u: &Utterance) -> String {
    DOMAIN_TABLE
        .iter()
        .chain(SECONDARY_BUCKETS.iter())
        .find(|(_, keywords)| u.matches_any(keywords))
        .map(|(domain, _)| domain.to_string())
        .unwrap_or_else(|| FALLBACK_DOMAIN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_keywords_need_whole_words() {
        let u = Utterance::new("Explain machine-learning, please");
        assert!(!u.matches("hi"));
        assert!(!u.matches("ai"));
        assert!(u.matches("explain"));
    }

    #[test]
    fn punctuation_is_trimmed_from_words() {
        let u = Utterance::new("Hi, there!");
        assert!(u.matches("hi"));
        assert_eq!(u.words, vec!["hi", "there"]);
    }

    #[test]
    fn defi_does_not_match_definition() {
        assert_eq!(extract_domain("give me a definition"), "general");
    }

    #[test]
    fn symbol_topics_survive_tokenizing() {
        assert_eq!(extract_topic("learn c++ today"), "c++");
        assert_eq!(extract_topic("c# for games"), "c#");
    }

    #[test]
    fn slugs_are_distinct() {
        let kinds = [
            IntentKind::CreatePlan,
            IntentKind::FindResources,
            IntentKind::Explain,
            IntentKind::Greeting,
            IntentKind::Help,
            IntentKind::Fallback,
        ];
        let mut slugs: Vec<_> = kinds.iter().map(|k| k.slug()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), kinds.len());
    }
}
