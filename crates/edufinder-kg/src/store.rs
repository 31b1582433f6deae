//! Concept store: keyed mapping of concept key → node.
//!
//! Shared between agents behind an `Arc`; the map is concurrent so workers
//! can synthesize nodes without coordinating.

use crate::concept::{ConceptKey, ConceptNode, ConceptPatch, ConceptView};
use crate::seed::default_seeds;
use crate::synthesis::synthesize;
use dashmap::DashMap;
use std::collections::BTreeSet;
use tracing::{debug, info};

pub struct ConceptStore {
    nodes: DashMap<ConceptKey, ConceptNode>,
}

impl Default for ConceptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptStore {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            nodes: DashMap::new(),
        }
    }

    /// A store holding the curated seed set.
    pub fn seeded() -> Self {
        let store = Self::new();
        for node in default_seeds() {
            store.insert(node);
        }
        info!("Concept store seeded with {} concepts", store.len());
        store
    }

    /// Insert or replace a whole node.
    pub fn insert(&self, mut node: ConceptNode) {
        node.strip_self_loops();
        self.nodes.insert(node.key.clone(), node);
    }

    /// Look up a concept, synthesizing and persisting a node if it is unknown.
    pub fn get(&self, domain: &str, concept: &str) -> ConceptNode {
        let key = ConceptKey::new(concept);
        self.get_key(domain, &key)
    }

    /// [`get`](Self::get) for an already-normalized key.
    pub fn get_key(&self, domain: &str, key: &ConceptKey) -> ConceptNode {
        if let Some(node) = self.nodes.get(key) {
            return node.value().clone();
        }
        self.nodes
            .entry(key.clone())
            .or_insert_with(|| {
                info!("Synthesized concept {} in {}", key, domain);
                synthesize(key, domain)
            })
            .value()
            .clone()
    }

    /// Raw lookup without synthesis.
    pub fn lookup(&self, concept: &str) -> Option<ConceptNode> {
        self.nodes
            .get(&ConceptKey::new(concept))
            .map(|n| n.value().clone())
    }

    /// Upsert knowledge for a concept. Unknown concepts start from a
    /// synthesized node, then the patch is merged over it.
    pub fn add_or_merge(&self, domain: &str, concept: &str, patch: ConceptPatch) -> ConceptNode {
        let key = ConceptKey::new(concept);
        let mut entry = self
            .nodes
            .entry(key.clone())
            .or_insert_with(|| synthesize(&key, domain));
        entry.merge(patch);
        debug!("Merged knowledge into {}", key);
        entry.value().clone()
    }

    /// Prerequisites of a concept (synthesizing it if needed).
    pub fn prerequisites_of(&self, domain: &str, key: &ConceptKey) -> BTreeSet<ConceptKey> {
        self.get_key(domain, key).prerequisites
    }

    /// External query shape for a concept.
    pub fn view(&self, domain: &str, concept: &str) -> ConceptView {
        self.get(domain, concept).view()
    }

    pub fn contains(&self, concept: &str) -> bool {
        self.nodes.contains_key(&ConceptKey::new(concept))
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<ConceptKey> {
        let mut keys: Vec<ConceptKey> = self.nodes.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
