//! Agent wire protocol: chat envelopes and the worker request/reply contract
//!
//! Every message between agents travels as an [`Envelope`], delivered together
//! with the sender's address:
//!
//!   user → orchestrator:     Chat(ChatMessage { content: [Text { text }] })
//!   orchestrator → user:     Ack(ChatAcknowledgement), Chat(...)
//!   orchestrator → worker:   Request(WorkerRequest::Curriculum { .. })
//!   worker → orchestrator:   Reply(WorkerReply::Curriculum { .. })
//!
//! JSON form (tagged):
//!   { "type": "request", "body": { "kind": "materials", "topic": "react", ... } }

use crate::types::{Address, RequestId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Chat envelopes
// ---------------------------------------------------------------------------

/// One item of chat content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatContent {
    Text { text: String },
    StartSession,
    EndSession,
}

/// A chat message between a user and an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub msg_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub content: Vec<ChatContent>,
}

impl ChatMessage {
    pub fn new(content: Vec<ChatContent>) -> Self {
        Self {
            msg_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            content,
        }
    }

    /// A message carrying a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![ChatContent::Text { text: text.into() }])
    }

    pub fn start_session() -> Self {
        Self::new(vec![ChatContent::StartSession])
    }

    pub fn end_session() -> Self {
        Self::new(vec![ChatContent::EndSession])
    }

    /// Concatenated text of all text items.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                ChatContent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Transport-level receipt for a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAcknowledgement {
    pub acknowledged_msg_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl ChatAcknowledgement {
    pub fn for_message(msg: &ChatMessage) -> Self {
        Self {
            acknowledged_msg_id: msg.msg_id,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Worker requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumRequest {
    pub domain: String,
    pub user_query: String,
    pub originating_address: Address,
    pub request_id: RequestId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialsRequest {
    pub topic: String,
    pub domain: String,
    pub user_query: String,
    pub include_videos: bool,
    pub originating_address: Address,
    pub request_id: RequestId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsRequest {
    pub concept: String,
    pub domain: String,
    pub query_kind: String,
    pub user_query: String,
    pub originating_address: Address,
    pub request_id: RequestId,
}

/// A typed request dispatched by the orchestrator to a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkerRequest {
    Curriculum(CurriculumRequest),
    Materials(MaterialsRequest),
    Insights(InsightsRequest),
}

impl WorkerRequest {
    pub fn request_id(&self) -> &RequestId {
        match self {
            Self::Curriculum(r) => &r.request_id,
            Self::Materials(r) => &r.request_id,
            Self::Insights(r) => &r.request_id,
        }
    }

    pub fn originating_address(&self) -> &Address {
        match self {
            Self::Curriculum(r) => &r.originating_address,
            Self::Materials(r) => &r.originating_address,
            Self::Insights(r) => &r.originating_address,
        }
    }

    /// Short name of the request kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Curriculum(_) => "curriculum",
            Self::Materials(_) => "materials",
            Self::Insights(_) => "insights",
        }
    }
}

// ---------------------------------------------------------------------------
// Worker replies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumReply {
    pub curriculum_text: String,
    pub success: bool,
    #[serde(default)]
    pub error_text: String,
    pub request_id: RequestId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialsReply {
    pub materials_text: String,
    #[serde(default)]
    pub videos_text: String,
    pub success: bool,
    #[serde(default)]
    pub error_text: String,
    pub request_id: RequestId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsReply {
    pub insights_text: String,
    pub success: bool,
    #[serde(default)]
    pub error_text: String,
    pub request_id: RequestId,
}

/// A worker's reply, correlated by `request_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkerReply {
    Curriculum(CurriculumReply),
    Materials(MaterialsReply),
    Insights(InsightsReply),
}

impl WorkerReply {
    pub fn request_id(&self) -> &RequestId {
        match self {
            Self::Curriculum(r) => &r.request_id,
            Self::Materials(r) => &r.request_id,
            Self::Insights(r) => &r.request_id,
        }
    }

    pub fn success(&self) -> bool {
        match self {
            Self::Curriculum(r) => r.success,
            Self::Materials(r) => r.success,
            Self::Insights(r) => r.success,
        }
    }

    pub fn error_text(&self) -> &str {
        match self {
            Self::Curriculum(r) => &r.error_text,
            Self::Materials(r) => &r.error_text,
            Self::Insights(r) => &r.error_text,
        }
    }

    /// User-facing text of a successful reply. Materials replies carry the
    /// video list after the materials text.
    pub fn payload_text(&self) -> String {
        match self {
            Self::Curriculum(r) => r.curriculum_text.clone(),
            Self::Materials(r) => format!("{}{}", r.materials_text, r.videos_text),
            Self::Insights(r) => r.insights_text.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Curriculum(_) => "curriculum",
            Self::Materials(_) => "materials",
            Self::Insights(_) => "insights",
        }
    }

    /// Failure reply of the same kind as `request`.
    pub fn failure(request: &WorkerRequest, error: impl Into<String>) -> Self {
        let request_id = request.request_id().clone();
        let error_text = error.into();
        match request {
            WorkerRequest::Curriculum(_) => Self::Curriculum(CurriculumReply {
                curriculum_text: String::new(),
                success: false,
                error_text,
                request_id,
            }),
            WorkerRequest::Materials(_) => Self::Materials(MaterialsReply {
                materials_text: String::new(),
                videos_text: String::new(),
                success: false,
                error_text,
                request_id,
            }),
            WorkerRequest::Insights(_) => Self::Insights(InsightsReply {
                insights_text: String::new(),
                success: false,
                error_text,
                request_id,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope: the unit of delivery between agents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "snake_case")]
pub enum Envelope {
    Chat(ChatMessage),
    Ack(ChatAcknowledgement),
    Request(WorkerRequest),
    Reply(WorkerReply),
}

impl Envelope {
    /// Text of a chat envelope, if any.
    pub fn chat_text(&self) -> Option<String> {
        match self {
            Self::Chat(msg) => Some(msg.text_content()),
            _ => None,
        }
    }
}
