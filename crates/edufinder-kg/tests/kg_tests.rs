//! Tests for edufinder-kg: keys, seeding, synthesis, merging, and study order

use edufinder_kg::*;

fn chain_store() -> ConceptStore {
    // A requires nothing, B requires A, C requires B
    let store = ConceptStore::new();
    store.add_or_merge("test", "a", ConceptPatch::default().definition("A"));
    store.add_or_merge("test", "b", ConceptPatch::default().definition("B").prerequisite("a"));
    store.add_or_merge("test", "c", ConceptPatch::default().definition("C").prerequisite("b"));
    store
}

fn assert_respects_prerequisites(store: &ConceptStore, result: &LearningOrder) {
    for (i, key) in result.order.iter().enumerate() {
        if result.was_forced(key) {
            continue;
        }
        for prereq in store.prerequisites_of("test", key) {
            if let Some(pos) = result.position(&prereq) {
                assert!(pos < i, "{} placed before its prerequisite {}", key, prereq);
            }
        }
    }
}

// ===========================================================================
// ConceptKey
// ===========================================================================

#[test]
fn concept_key_normalizes_case_and_separators() {
    assert_eq!(ConceptKey::new("Machine Learning").as_str(), "machine_learning");
    assert_eq!(ConceptKey::new("machine-learning").as_str(), "machine_learning");
    assert_eq!(ConceptKey::new("  Machine   learning ").as_str(), "machine_learning");
    assert_eq!(ConceptKey::new("machine__learning"), ConceptKey::new("machine learning"));
}

#[test]
fn concept_key_empty_falls_back() {
    assert_eq!(ConceptKey::new("   ").as_str(), "general_learning");
}

#[test]
fn concept_key_word_count_and_display() {
    let key = ConceptKey::new("graph neural networks");
    assert_eq!(key.word_count(), 3);
    assert_eq!(key.display_name(), "Graph Neural Networks");
}

// ===========================================================================
// Seeding
// ===========================================================================

#[test]
fn seeded_store_has_curated_concepts() {
    let store = ConceptStore::seeded();
    let ml = store.lookup("machine learning").expect("seeded");
    assert_eq!(ml.source, ConceptSource::Seeded);
    assert_eq!(ml.difficulty, Difficulty::Intermediate);
    assert!(ml.prerequisites.contains(&ConceptKey::new("linear_algebra")));
    assert_eq!(ml.learning_path.len(), 5);
    assert!(store.contains("learning"));
}

#[test]
fn seeds_never_contain_self_loops() {
    for node in default_seeds() {
        assert!(!node.prerequisites.contains(&node.key), "{} lists itself", node.key);
        assert!(!node.related.contains(&node.key), "{} relates to itself", node.key);
    }
}

// ===========================================================================
// Synthesis
// ===========================================================================

#[test]
fn unknown_concept_is_synthesized_and_persisted() {
    let store = ConceptStore::seeded();
    let before = store.len();
    let node = store.get("software_engineering", "totally_novel_concept_xyz");
    assert_eq!(node.source, ConceptSource::Synthesized);
    assert!(!node.definition.is_empty());
    assert!(node.learning_path.len() >= 3);
    assert!(matches!(
        node.difficulty,
        Difficulty::Beginner | Difficulty::Intermediate | Difficulty::Advanced
    ));
    assert_eq!(store.len(), before + 1);

    let again = store.get("other_domain", "Totally Novel Concept XYZ");
    assert_eq!(again, node);
}

#[test]
fn synthesized_view_reports_source() {
    let store = ConceptStore::new();
    let view = store.view("data_science", "feature stores");
    assert_eq!(view.concept, "feature_stores");
    assert_eq!(view.estimated_time, "4-8 weeks");
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["source"], "synthesized");
    assert_eq!(json["difficulty"], "Intermediate");
}

#[test]
fn lookup_does_not_synthesize() {
    let store = ConceptStore::new();
    assert!(store.lookup("nothing here").is_none());
    assert!(store.is_empty());
}

// ===========================================================================
// add_or_merge
// ===========================================================================

#[test]
fn merge_unions_sets_appends_lists_overwrites_scalars() {
    let store = ConceptStore::seeded();
    let merged = store.add_or_merge(
        "ai_engineering",
        "machine_learning",
        ConceptPatch::default()
            .prerequisite("Statistics")
            .prerequisite("Probability")
            .step("Capstone Project")
            .difficulty(Difficulty::Advanced)
            .estimated_time("6 months"),
    );
    assert!(merged.prerequisites.contains(&ConceptKey::new("probability")));
    assert_eq!(
        merged.prerequisites.iter().filter(|p| p.as_str() == "statistics").count(),
        1
    );
    assert_eq!(merged.learning_path.last().map(String::as_str), Some("Capstone Project"));
    assert_eq!(merged.learning_path.len(), 6);
    assert_eq!(merged.difficulty, Difficulty::Advanced);
    assert_eq!(merged.estimated_time, "6 months");
    assert_eq!(merged.source, ConceptSource::Seeded);
}

#[test]
fn merge_drops_self_references() {
    let store = ConceptStore::new();
    let node = store.add_or_merge(
        "general",
        "recursion",
        ConceptPatch::default().prerequisite("recursion").related("Recursion"),
    );
    assert!(!node.prerequisites.contains(&node.key));
    assert!(!node.related.contains(&node.key));
}

#[test]
fn merge_definition_promotes_synthesized_node() {
    let store = ConceptStore::new();
    let synthesized = store.get("programming", "ownership");
    assert!(synthesized.is_synthesized());
    let curated = store.add_or_merge(
        "programming",
        "ownership",
        ConceptPatch::default().definition("Rust's resource management model"),
    );
    assert_eq!(curated.source, ConceptSource::Seeded);
    assert_eq!(curated.definition, "Rust's resource management model");
}

// ===========================================================================
// suggest_order
// ===========================================================================

#[test]
fn order_resolves_simple_chain() {
    let store = chain_store();
    let result = suggest_order(&store, "test", &["c", "b", "a"]);
    let keys: Vec<&str> = result.order.iter().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert!(!result.has_cycle());
    assert_respects_prerequisites(&store, &result);
}

#[test]
fn order_terminates_on_two_cycle() {
    let store = ConceptStore::new();
    store.add_or_merge("test", "a", ConceptPatch::default().definition("A").prerequisite("b"));
    store.add_or_merge("test", "b", ConceptPatch::default().definition("B").prerequisite("a"));

    let result = suggest_order(&store, "test", &["a", "b"]);
    assert_eq!(result.order.len(), 2);
    assert!(result.order.contains(&ConceptKey::new("a")));
    assert!(result.order.contains(&ConceptKey::new("b")));
    assert!(result.has_cycle());
    assert!(result.was_forced(&ConceptKey::new("a")));
    assert_respects_prerequisites(&store, &result);
}

#[test]
fn order_ignores_out_of_scope_prerequisites() {
    let store = ConceptStore::seeded();
    // deep_learning needs machine_learning; calculus/linear_algebra are outside the set
    let result = suggest_order(&store, "ai_engineering", &["deep learning", "machine learning"]);
    let keys: Vec<&str> = result.order.iter().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["machine_learning", "deep_learning"]);
    assert!(!result.has_cycle());
}

#[test]
fn order_keeps_input_order_for_independent_concepts() {
    let store = ConceptStore::new();
    let result = suggest_order(&store, "literature", &["poetry", "drama", "prose"]);
    let keys: Vec<&str> = result.order.iter().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["poetry", "drama", "prose"]);
}

#[test]
fn order_cycle_with_dependent_tail() {
    // a <-> b cycle, c depends on a
    let store = ConceptStore::new();
    store.add_or_merge("test", "a", ConceptPatch::default().definition("A").prerequisite("b"));
    store.add_or_merge("test", "b", ConceptPatch::default().definition("B").prerequisite("a"));
    store.add_or_merge("test", "c", ConceptPatch::default().definition("C").prerequisite("a"));

    // nothing is eligible at first, so c is forced, then b breaks the cycle
    let result = suggest_order(&store, "test", &["c", "b", "a"]);
    let keys: Vec<&str> = result.order.iter().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["c", "b", "a"]);
    assert_eq!(result.forced.len(), 2);
    assert_respects_prerequisites(&store, &result);
}

#[test]
fn order_of_empty_input_is_empty() {
    let store = ConceptStore::new();
    let empty: [&str; 0] = [];
    assert!(suggest_order(&store, "x", &empty).order.is_empty());
}
