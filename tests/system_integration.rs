//! End-to-end: user sessions talking to the full in-process agent system.

use edufinder_agent::{EduFinderConfig, LearningSystem, SystemHandle, UserSession};
use edufinder_core::{ChatMessage, Envelope, VideoInfo};
use edufinder_kg::{ConceptSource, ConceptStore};
use edufinder_llm::{GenerationError, GenerationResult, NoVideoSearch, TextGenerator, VideoSearch};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

/// Answers with a tag naming which kind of prompt it saw.
struct TaggingGenerator;

#[async_trait::async_trait]
impl TextGenerator for TaggingGenerator {
    fn name(&self) -> &str {
        "tagging"
    }

    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        let tag = if prompt.contains("learning curriculum") {
            "CURRICULUM"
        } else if prompt.contains("learning materials") {
            "MATERIALS"
        } else if prompt.contains("Knowledge graph") {
            "INSIGHTS"
        } else {
            "UNKNOWN"
        };
        Ok(format!("{}\n{}", tag, prompt))
    }
}

struct DownGenerator;

#[async_trait::async_trait]
impl TextGenerator for DownGenerator {
    fn name(&self) -> &str {
        "down"
    }

    async fn generate(&self, _prompt: &str) -> GenerationResult<String> {
        Err(GenerationError::RateLimited)
    }
}

struct OneVideo;

#[async_trait::async_trait]
impl VideoSearch for OneVideo {
    async fn search(&self, query: &str, _limit: usize) -> Vec<VideoInfo> {
        vec![VideoInfo {
            title: format!("Intro to {}", query),
            channel: "Learn".into(),
            url: "https://video.example/intro".into(),
            ..Default::default()
        }]
    }
}

fn spawn(generator: Arc<dyn TextGenerator>, videos: Arc<dyn VideoSearch>) -> SystemHandle {
    LearningSystem::spawn(
        &EduFinderConfig::default(),
        generator,
        videos,
        Arc::new(ConceptStore::seeded()),
    )
}

async fn next(session: &mut UserSession) -> String {
    session
        .next_text_within(WAIT)
        .await
        .expect("reply within timeout")
}

// ===========================================================================
// Conversations
// ===========================================================================

#[tokio::test]
async fn full_session_routes_each_intent_to_its_worker() {
    let handle = spawn(Arc::new(TaggingGenerator), Arc::new(OneVideo));
    let mut session = handle.connect_user("learner");

    session.start_session().unwrap();
    assert!(next(&mut session).await.contains("Welcome"));

    session.send_text("teach me deep learning").unwrap();
    assert!(next(&mut session).await.contains("Deep Learning"));
    assert!(next(&mut session).await.starts_with("CURRICULUM"));

    session.send_text("find blockchain videos").unwrap();
    assert!(next(&mut session).await.contains("Finding resources"));
    let materials = next(&mut session).await;
    assert!(materials.starts_with("MATERIALS"));
    assert!(materials.contains("Intro to Blockchain tutorial"));

    session.send_text("explain smart contracts").unwrap();
    assert!(next(&mut session).await.contains("Analyzing"));
    let insights = next(&mut session).await;
    assert!(insights.starts_with("INSIGHTS"));
    assert!(insights.contains("Self-executing contracts"));

    session.end_session().unwrap();
    assert!(next(&mut session).await.contains("Thanks"));

    handle.shutdown().await;
}

#[tokio::test]
async fn every_chat_message_is_acknowledged() {
    let handle = spawn(Arc::new(TaggingGenerator), Arc::new(NoVideoSearch));
    let mut session = handle.connect_user("learner");

    let msg = ChatMessage::text("hello");
    let id = session.send(msg).unwrap();

    let first = tokio::time::timeout(WAIT, session.recv())
        .await
        .unwrap()
        .unwrap();
    match first.envelope {
        Envelope::Ack(ack) => assert_eq!(ack.acknowledged_msg_id, id),
        other => panic!("expected ack first, got {:?}", other),
    }
    assert_eq!(first.from, *handle.orchestrator_address());

    handle.shutdown().await;
}

#[tokio::test]
async fn generator_outage_reaches_the_user_as_an_apology() {
    let handle = spawn(Arc::new(DownGenerator), Arc::new(NoVideoSearch));
    let mut session = handle.connect_user("learner");

    session.send_text("teach me kubernetes").unwrap();
    next(&mut session).await;
    let reply = next(&mut session).await;
    assert!(reply.starts_with("Sorry"));
    assert!(reply.contains("rate limited"));

    handle.shutdown().await;
}

#[tokio::test]
async fn concurrent_users_get_their_own_replies() {
    let handle = spawn(Arc::new(TaggingGenerator), Arc::new(NoVideoSearch));
    let mut alice = handle.connect_user("alice");
    let mut bob = handle.connect_user("bob");

    alice.send_text("teach me rust").unwrap();
    bob.send_text("explain statistics").unwrap();

    next(&mut alice).await;
    let alice_answer = next(&mut alice).await;
    next(&mut bob).await;
    let bob_answer = next(&mut bob).await;

    assert!(alice_answer.starts_with("CURRICULUM"));
    assert!(alice_answer.contains("teach me rust"));
    assert!(bob_answer.starts_with("INSIGHTS"));
    assert!(bob_answer.contains("explain statistics"));

    handle.shutdown().await;
}

#[tokio::test]
async fn explaining_a_new_concept_grows_the_store() {
    let handle = spawn(Arc::new(TaggingGenerator), Arc::new(NoVideoSearch));
    let mut session = handle.connect_user("learner");
    assert!(handle.store().lookup("graphql").is_none());

    session.send_text("explain graphql").unwrap();
    next(&mut session).await;
    next(&mut session).await;

    let node = handle.store().lookup("graphql").expect("synthesized node");
    assert_eq!(node.source, ConceptSource::Synthesized);

    handle.shutdown().await;
}

// ===========================================================================
// Config file wiring
// ===========================================================================

#[tokio::test]
async fn custom_addresses_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edufinder.toml");
    std::fs::write(
        &path,
        "[orchestrator]\naddress = \"agent://hub\"\n\n[workers]\ncurriculum = \"agent://plans\"\n",
    )
    .unwrap();

    let config = EduFinderConfig::load(&path);
    let handle = LearningSystem::spawn(
        &config,
        Arc::new(TaggingGenerator),
        Arc::new(NoVideoSearch),
        Arc::new(ConceptStore::seeded()),
    );
    assert_eq!(handle.orchestrator_address().as_str(), "agent://hub");
    assert!(handle
        .router()
        .is_registered(&edufinder_core::Address::new("agent://plans")));

    let mut session = handle.connect_user("learner");
    session.send_text("teach me golang").unwrap();
    next(&mut session).await;
    assert!(next(&mut session).await.starts_with("CURRICULUM"));

    handle.shutdown().await;
}
