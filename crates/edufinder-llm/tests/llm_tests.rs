//! Tests for edufinder-llm: Gemini wire types, video search fallbacks, view formatting

use edufinder_llm::gemini::{GenerateRequest, GenerateResponse};
use edufinder_llm::*;
use std::time::Duration;

// ===========================================================================
// Gemini wire format
// ===========================================================================

#[test]
fn generate_request_wraps_prompt_as_user_part() {
    let req = GenerateRequest::from_prompt("Explain recursion");
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["contents"][0]["role"], "user");
    assert_eq!(json["contents"][0]["parts"][0]["text"], "Explain recursion");
}

#[test]
fn generate_response_concatenates_parts() {
    let json = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"world"}]}}]}"#;
    let resp: GenerateResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.into_text().unwrap(), "Hello world");
}

#[test]
fn generate_response_without_candidates_is_empty_error() {
    let resp: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
    assert!(matches!(resp.into_text(), Err(GenerationError::Empty)));
}

#[test]
fn gemini_endpoint_uses_model() {
    let g = GeminiGenerator::new("key")
        .with_model("gemini-test")
        .with_base_url("http://localhost:9999/v1beta/");
    assert_eq!(
        g.endpoint(),
        "http://localhost:9999/v1beta/models/gemini-test:generateContent"
    );
    assert_eq!(g.name(), "gemini");
}

// ===========================================================================
// Transport failures
// ===========================================================================

#[tokio::test]
async fn gemini_network_error_keeps_key_out_of_message() {
    let g = GeminiGenerator::new("SECRET-KEY-123").with_base_url("http://127.0.0.1:1/v1beta");
    let err = g.generate("hi").await.unwrap_err();

    assert!(matches!(err, GenerationError::NetworkError(_)));
    let text = err.to_string();
    assert!(!text.contains("SECRET-KEY-123"), "key leaked: {}", text);
    assert!(!text.contains("127.0.0.1"), "url leaked: {}", text);
}

#[tokio::test]
async fn gemini_gives_up_on_a_silent_server() {
    // Accepts connections at the TCP level but never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let g = GeminiGenerator::new("key")
        .with_base_url(format!("http://{}/v1beta", addr))
        .with_timeout(Duration::from_millis(200));
    let err = tokio::time::timeout(Duration::from_secs(5), g.generate("hi"))
        .await
        .expect("client timeout fires first")
        .unwrap_err();

    match err {
        GenerationError::NetworkError(e) => assert!(e.is_timeout()),
        other => panic!("expected a network timeout, got {:?}", other),
    }
    drop(listener);
}

#[tokio::test]
async fn youtube_silent_server_returns_empty() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let yt = YouTubeSearch::new(Some("key".into()))
        .with_base_url(format!("http://{}", addr))
        .with_timeout(Duration::from_millis(200));
    let found = tokio::time::timeout(Duration::from_secs(5), yt.search("rust", 3))
        .await
        .expect("client timeout fires first");
    assert!(found.is_empty());
    drop(listener);
}

// ===========================================================================
// Unavailable providers
// ===========================================================================

#[tokio::test]
async fn unavailable_generator_always_fails() {
    let g = UnavailableGenerator::new("GEMINI_API_KEY not set");
    let err = g.generate("anything").await.unwrap_err();
    assert!(matches!(err, GenerationError::NotConfigured(_)));
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn youtube_without_key_returns_empty() {
    let yt = YouTubeSearch::new(None);
    assert!(!yt.is_available());
    assert!(yt.search("rust tutorial", 5).await.is_empty());
}

#[tokio::test]
async fn youtube_blank_key_counts_as_missing() {
    let yt = YouTubeSearch::new(Some("   ".into()));
    assert!(!yt.is_available());
}

#[tokio::test]
async fn youtube_unreachable_host_returns_empty() {
    let yt = YouTubeSearch::new(Some("key".into())).with_base_url("http://127.0.0.1:1");
    assert!(yt.search("rust", 3).await.is_empty());
}

#[tokio::test]
async fn no_video_search_is_empty() {
    assert!(NoVideoSearch.search("x", 10).await.is_empty());
}

// ===========================================================================
// View counts
// ===========================================================================

#[test]
fn format_views_groups_thousands() {
    assert_eq!(format_views("0"), "0 views");
    assert_eq!(format_views("999"), "999 views");
    assert_eq!(format_views("1000"), "1,000 views");
    assert_eq!(format_views("1234567"), "1,234,567 views");
    assert_eq!(format_views(""), "0 views");
}
