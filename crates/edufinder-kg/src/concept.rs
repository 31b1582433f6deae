//! Concept keys, nodes, and the external query view.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Key used when a concept name normalizes to nothing.
pub const EMPTY_CONCEPT_KEY: &str = "general_learning";

/// Normalized concept identifier: lowercase words joined by `_`.
///
/// Whitespace, `-` and `_` all separate words, so `"Machine Learning"`,
/// `"machine-learning"` and `"machine_learning"` are the same key.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptKey(String);

impl ConceptKey {
    pub fn new(raw: &str) -> Self {
        let key = raw
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join("_");
        if key.is_empty() {
            Self(EMPTY_CONCEPT_KEY.to_string())
        } else {
            Self(key)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of word components in the key.
    pub fn word_count(&self) -> usize {
        self.0.split('_').filter(|w| !w.is_empty()).count()
    }

    /// Title-cased, space-separated form (`machine_learning` → `Machine Learning`).
    pub fn display_name(&self) -> String {
        title_case(&self.0)
    }
}

impl fmt::Display for ConceptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConceptKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ConceptKey {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

/// `web_development` → `Web Development`.
pub fn title_case(raw: &str) -> String {
    raw.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "Beginner"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::Advanced => write!(f, "Advanced"),
        }
    }
}

/// Where a node came from. Synthesized nodes are lower-confidence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptSource {
    Seeded,
    Synthesized,
}

impl fmt::Display for ConceptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeded => write!(f, "seeded"),
            Self::Synthesized => write!(f, "synthesized"),
        }
    }
}

/// A node of the concept graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConceptNode {
    pub key: ConceptKey,
    /// Domain the node was created under.
    pub domain: String,
    pub definition: String,
    pub prerequisites: BTreeSet<ConceptKey>,
    pub related: BTreeSet<ConceptKey>,
    /// Human-readable step names, in study order.
    pub learning_path: Vec<String>,
    pub difficulty: Difficulty,
    pub estimated_time: String,
    pub source: ConceptSource,
}

impl ConceptNode {
    /// Remove any reference to the node's own key.
    pub fn strip_self_loops(&mut self) {
        self.prerequisites.remove(&self.key);
        self.related.remove(&self.key);
    }

    /// Apply a patch: lists appended, sets unioned, scalars overwritten if
    /// provided. A curated definition promotes the node to `Seeded`.
    pub fn merge(&mut self, patch: ConceptPatch) {
        if let Some(definition) = patch.definition {
            self.definition = definition;
            self.source = ConceptSource::Seeded;
        }
        self.prerequisites
            .extend(patch.prerequisites.iter().map(|p| ConceptKey::new(p)));
        self.related
            .extend(patch.related.iter().map(|r| ConceptKey::new(r)));
        self.learning_path.extend(patch.learning_path);
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(time) = patch.estimated_time {
            self.estimated_time = time;
        }
        self.strip_self_loops();
    }

    pub fn is_synthesized(&self) -> bool {
        self.source == ConceptSource::Synthesized
    }

    pub fn view(&self) -> ConceptView {
        ConceptView {
            concept: self.key.as_str().to_string(),
            definition: self.definition.clone(),
            prerequisites: self.prerequisites.iter().map(|k| k.as_str().to_string()).collect(),
            related: self.related.iter().map(|k| k.as_str().to_string()).collect(),
            learning_path: self.learning_path.clone(),
            difficulty: self.difficulty,
            estimated_time: self.estimated_time.clone(),
            source: self.source,
        }
    }
}

/// Partial update for `ConceptStore::add_or_merge`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptPatch {
    pub definition: Option<String>,
    pub prerequisites: Vec<String>,
    pub related: Vec<String>,
    pub learning_path: Vec<String>,
    pub difficulty: Option<Difficulty>,
    pub estimated_time: Option<String>,
}

impl ConceptPatch {
    pub fn definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    pub fn prerequisite(mut self, key: impl Into<String>) -> Self {
        self.prerequisites.push(key.into());
        self
    }

    pub fn related(mut self, key: impl Into<String>) -> Self {
        self.related.push(key.into());
        self
    }

    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.learning_path.push(step.into());
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn estimated_time(mut self, time: impl Into<String>) -> Self {
        self.estimated_time = Some(time.into());
        self
    }
}

/// Query result shape handed to callers outside the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptView {
    pub concept: String,
    pub definition: String,
    pub prerequisites: Vec<String>,
    pub related: Vec<String>,
    pub learning_path: Vec<String>,
    pub difficulty: Difficulty,
    pub estimated_time: String,
    pub source: ConceptSource,
}
