//! Tests for edufinder-core: addresses, chat envelopes, worker contract, errors

use edufinder_core::*;

fn sample_materials_request() -> WorkerRequest {
    WorkerRequest::Materials(MaterialsRequest {
        topic: "react".into(),
        domain: "web_development".into(),
        user_query: "find react videos".into(),
        include_videos: true,
        originating_address: Address::new("user-1"),
        request_id: RequestId::new("materials-abc-1"),
    })
}

// ===========================================================================
// Address / RequestId
// ===========================================================================

#[test]
fn address_new_and_display() {
    let addr = Address::new("orchestrator");
    assert_eq!(addr.as_str(), "orchestrator");
    assert_eq!(format!("{}", addr), "orchestrator");
}

#[test]
fn address_from_str_and_string() {
    let a: Address = "user".into();
    let b: Address = String::from("user").into();
    assert_eq!(a, b);
}

#[test]
fn request_id_serializes_transparently() {
    let id = RequestId::new("plan-1a2b-7");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, r#""plan-1a2b-7""#);
}

// ===========================================================================
// ChatMessage
// ===========================================================================

#[test]
fn chat_message_text_content_joins_text_items() {
    let msg = ChatMessage::new(vec![
        ChatContent::StartSession,
        ChatContent::Text { text: "hello".into() },
        ChatContent::Text { text: "world".into() },
    ]);
    assert_eq!(msg.text_content(), "hello\nworld");
}

#[test]
fn chat_messages_get_distinct_ids() {
    let a = ChatMessage::text("a");
    let b = ChatMessage::text("a");
    assert_ne!(a.msg_id, b.msg_id);
}

#[test]
fn chat_content_serde_tags() {
    let json = serde_json::to_string(&ChatContent::Text { text: "hi".into() }).unwrap();
    assert!(json.contains(r#""type":"text""#));
    let json = serde_json::to_string(&ChatContent::EndSession).unwrap();
    assert_eq!(json, r#"{"type":"end_session"}"#);
}

#[test]
fn acknowledgement_references_message() {
    let msg = ChatMessage::text("teach me rust");
    let ack = ChatAcknowledgement::for_message(&msg);
    assert_eq!(ack.acknowledged_msg_id, msg.msg_id);
}

// ===========================================================================
// Worker contract
// ===========================================================================

#[test]
fn worker_request_accessors() {
    let req = sample_materials_request();
    assert_eq!(req.request_id().as_str(), "materials-abc-1");
    assert_eq!(req.originating_address().as_str(), "user-1");
    assert_eq!(req.kind(), "materials");
}

#[test]
fn worker_request_json_is_kind_tagged() {
    let json = serde_json::to_value(sample_materials_request()).unwrap();
    assert_eq!(json["kind"], "materials");
    assert_eq!(json["include_videos"], true);
    let back: WorkerRequest = serde_json::from_value(json).unwrap();
    assert_eq!(back, sample_materials_request());
}

#[test]
fn materials_payload_appends_videos() {
    let reply = WorkerReply::Materials(MaterialsReply {
        materials_text: "Docs\n".into(),
        videos_text: "Videos".into(),
        success: true,
        error_text: String::new(),
        request_id: "m-1".into(),
    });
    assert_eq!(reply.payload_text(), "Docs\nVideos");
    assert!(reply.success());
}

#[test]
fn failure_reply_matches_request_kind() {
    let req = sample_materials_request();
    let reply = WorkerReply::failure(&req, "quota exceeded");
    assert_eq!(reply.kind(), "materials");
    assert!(!reply.success());
    assert_eq!(reply.error_text(), "quota exceeded");
    assert_eq!(reply.request_id(), req.request_id());
}

#[test]
fn reply_error_text_defaults_when_missing() {
    let json = r#"{"kind":"insights","insights_text":"ok","success":true,"request_id":"i-1"}"#;
    let reply: WorkerReply = serde_json::from_str(json).unwrap();
    assert_eq!(reply.error_text(), "");
    assert_eq!(reply.payload_text(), "ok");
}

// ===========================================================================
// Envelope
// ===========================================================================

#[test]
fn envelope_chat_text() {
    let env = Envelope::Chat(ChatMessage::text("hi there"));
    assert_eq!(env.chat_text().as_deref(), Some("hi there"));
    let env = Envelope::Request(sample_materials_request());
    assert!(env.chat_text().is_none());
}

#[test]
fn envelope_json_is_adjacently_tagged() {
    let env = Envelope::Request(sample_materials_request());
    let json = serde_json::to_value(&env).unwrap();
    assert_eq!(json["type"], "request");
    assert_eq!(json["body"]["kind"], "materials");
}

// ===========================================================================
// Error
// ===========================================================================

#[test]
fn error_display() {
    assert_eq!(
        Error::unknown_address("worker-x").to_string(),
        "no mailbox registered for worker-x"
    );
    assert_eq!(
        Error::duplicate_request("plan-1").to_string(),
        "duplicate request id: plan-1"
    );
}

#[test]
fn error_from_io() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: Error = io.into();
    assert!(matches!(err, Error::IoError(_)));
}
