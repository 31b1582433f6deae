//! Study-order resolution: greedy topological sort that always terminates.
//!
//! Prerequisites outside the requested set are treated as already satisfied.
//! When no remaining concept is eligible (a cycle inside the set), the first
//! remaining concept is placed anyway and recorded in `forced`.

use crate::concept::ConceptKey;
use crate::store::ConceptStore;
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LearningOrder {
    /// Permutation of the requested concepts.
    pub order: Vec<ConceptKey>,
    /// Concepts placed by the cycle fallback, in placement order.
    pub forced: Vec<ConceptKey>,
}

impl LearningOrder {
    pub fn was_forced(&self, key: &ConceptKey) -> bool {
        self.forced.contains(key)
    }

    pub fn has_cycle(&self) -> bool {
        !self.forced.is_empty()
    }

    pub fn position(&self, key: &ConceptKey) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }

    pub fn into_keys(self) -> Vec<ConceptKey> {
        self.order
    }
}

/// Order `concepts` so each one follows its in-set prerequisites.
pub fn suggest_order<S: AsRef<str>>(
    store: &ConceptStore,
    domain: &str,
    concepts: &[S],
) -> LearningOrder {
    let requested: Vec<ConceptKey> = concepts.iter().map(|c| ConceptKey::new(c.as_ref())).collect();
    let in_scope: HashSet<ConceptKey> = requested.iter().cloned().collect();

    let mut result = LearningOrder::default();
    let mut placed: HashSet<ConceptKey> = HashSet::new();
    let mut remaining = requested;

    while !remaining.is_empty() {
        let eligible = remaining.iter().position(|candidate| {
            store
                .prerequisites_of(domain, candidate)
                .iter()
                .all(|p| !in_scope.contains(p) || placed.contains(p))
        });

        match eligible {
            Some(idx) => {
                let key = remaining.remove(idx);
                debug!("Order: placed {} at {}", key, result.order.len());
                placed.insert(key.clone());
                result.order.push(key);
            }
            None => {
                let key = remaining.remove(0);
                warn!(
                    "Order: prerequisite cycle among {} remaining concepts, forcing {}",
                    remaining.len() + 1,
                    key
                );
                placed.insert(key.clone());
                result.forced.push(key.clone());
                result.order.push(key);
            }
        }
    }

    result
}
