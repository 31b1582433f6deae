use super::*;
use clap::CommandFactory;
use edufinder_kg::ConceptPatch;

fn cycle_store() -> ConceptStore {
    let store = ConceptStore::new();
    store.add_or_merge("test", "a", ConceptPatch::default().definition("A").prerequisite("b"));
    store.add_or_merge("test", "b", ConceptPatch::default().definition("B").prerequisite("a"));
    store
}

#[test]
fn order_lines_mark_forced_entries() {
    let store = cycle_store();
    let result = suggest_order(&store, "test", &["a", "b"]);
    let lines = order_lines(&result);

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1. "));
    assert!(lines[1].starts_with("2. "));
    let marked = lines.iter().filter(|l| l.ends_with(" (cycle)")).count();
    assert_eq!(marked, result.forced.len());
    assert!(marked >= 1);
}

#[test]
fn order_lines_for_seeded_chain_are_unmarked() {
    let store = ConceptStore::seeded();
    let result = suggest_order(&store, "ai_engineering", &["deep_learning", "machine_learning"]);
    assert_eq!(
        order_lines(&result),
        vec!["1. Machine Learning", "2. Deep Learning"]
    );
}

#[test]
fn classify_output_is_json() {
    let intent = classify("teach me rust");
    let json: serde_json::Value =
        serde_json::from_str(&serde_json::to_string_pretty(&intent).unwrap()).unwrap();
    assert_eq!(json["kind"], "create_plan");
    assert_eq!(json["topic"], "rust");
}

#[test]
fn cli_parses_order_with_domain() {
    let cli = Cli::try_parse_from(["edufinder", "order", "-d", "ai_engineering", "a", "b"]).unwrap();
    match cli.command {
        Commands::Order { domain, concepts } => {
            assert_eq!(domain, "ai_engineering");
            assert_eq!(concepts, vec!["a", "b"]);
        }
        _ => panic!("expected order subcommand"),
    }
}

#[test]
fn cli_definition_is_valid() {
    Cli::command().debug_assert();
}
