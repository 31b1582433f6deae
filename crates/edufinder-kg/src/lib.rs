//! edufinder-kg: concept graph store and study-order resolver
//!
//! A keyed store of concept nodes (definition, prerequisites, related
//! concepts, difficulty, time estimate). Unknown concepts are synthesized on
//! first query so lookups always answer; synthesized nodes are tagged so
//! callers can weigh them below curated ones.

pub mod concept;
pub mod order;
pub mod seed;
pub mod store;
pub mod synthesis;

pub use concept::{
    title_case, ConceptKey, ConceptNode, ConceptPatch, ConceptSource, ConceptView, Difficulty,
};
pub use order::{suggest_order, LearningOrder};
pub use seed::default_seeds;
pub use store::ConceptStore;
pub use synthesis::{synthesize, DomainCategory};
