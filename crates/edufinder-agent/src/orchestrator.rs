//! The orchestrator: classifies user text, dispatches typed requests to
//! workers, and routes replies back to whoever asked.
//!
//! Every handler is synchronous and fire-and-forget. The pending table is a
//! plain field; the loop in `runtime.rs` is its only mutator.

use crate::classifier::{classify, wants_videos, ClassifiedIntent, IntentKind};
use crate::pending::{PendingRequest, PendingTable, RequestIdGenerator};
use crate::replies;
use crate::transport::{Delivery, Transport};
use chrono::{DateTime, Duration, Utc};
use edufinder_core::{
    Address, ChatAcknowledgement, ChatContent, ChatMessage, CurriculumRequest, Envelope,
    InsightsRequest, MaterialsRequest, RequestId, WorkerReply, WorkerRequest,
};
use edufinder_kg::{suggest_order, ConceptSource, ConceptStore};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const DEFAULT_PENDING_TTL_SECS: i64 = 120;
/// Longest accepted pending TTL (one day). Larger values are clamped.
pub const MAX_PENDING_TTL_SECS: i64 = 86_400;

/// Worker address bound to each dispatched intent kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRoutes {
    pub curriculum: Address,
    pub materials: Address,
    pub insights: Address,
}

impl WorkerRoutes {
    pub fn for_kind(&self, kind: IntentKind) -> Option<&Address> {
        match kind {
            IntentKind::CreatePlan => Some(&self.curriculum),
            IntentKind::FindResources => Some(&self.materials),
            IntentKind::Explain => Some(&self.insights),
            _ => None,
        }
    }
}

pub struct Orchestrator {
    address: Address,
    routes: WorkerRoutes,
    transport: Arc<dyn Transport>,
    store: Arc<ConceptStore>,
    pending: PendingTable,
    ids: RequestIdGenerator,
    ttl: Duration,
}

impl Orchestrator {
    pub fn new(
        address: impl Into<Address>,
        routes: WorkerRoutes,
        transport: Arc<dyn Transport>,
        store: Arc<ConceptStore>,
    ) -> Self {
        Self {
            address: address.into(),
            routes,
            transport,
            store,
            pending: PendingTable::new(),
            ids: RequestIdGenerator::new(),
            ttl: Duration::seconds(DEFAULT_PENDING_TTL_SECS),
        }
    }

    pub fn with_ttl(mut self, ttl: std::time::Duration) -> Self {
        let max = Duration::seconds(MAX_PENDING_TTL_SECS);
        self.ttl = match Duration::from_std(ttl) {
            Ok(ttl) if ttl <= max => ttl,
            _ => {
                warn!(
                    requested_secs = ttl.as_secs(),
                    "pending TTL too large, clamping to {}s", MAX_PENDING_TTL_SECS
                );
                max
            }
        };
        self
    }

    pub fn with_id_generator(mut self, ids: RequestIdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn pending(&self) -> &PendingTable {
        &self.pending
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Entry point for anything arriving in the orchestrator's mailbox.
    pub fn handle_delivery(&mut self, delivery: Delivery) {
        match delivery.envelope {
            Envelope::Chat(msg) => self.handle_user_message(&delivery.from, &msg),
            Envelope::Reply(reply) => {
                self.handle_worker_reply(reply);
            }
            Envelope::Ack(ack) => {
                debug!(from = %delivery.from, msg_id = %ack.acknowledged_msg_id, "ack received");
            }
            Envelope::Request(request) => {
                warn!(
                    from = %delivery.from,
                    request_id = %request.request_id(),
                    "orchestrator does not accept worker requests, dropping"
                );
            }
        }
    }

    /// Acknowledge a chat message, then handle each content item in order.
    pub fn handle_user_message(&mut self, sender: &Address, msg: &ChatMessage) {
        self.send(sender, Envelope::Ack(ChatAcknowledgement::for_message(msg)));

        for item in &msg.content {
            match item {
                ChatContent::StartSession => {
                    info!(%sender, "session started");
                    self.send_text(sender, replies::welcome());
                }
                ChatContent::Text { text } => {
                    self.handle_user_text(sender, text);
                }
                ChatContent::EndSession => {
                    info!(%sender, "session ended");
                    self.send_text(sender, replies::goodbye());
                }
            }
        }
    }

    /// Classify `text` and either answer locally or dispatch to a worker.
    ///
    /// Returns the minted request id when a worker request is outstanding.
    pub fn handle_user_text(&mut self, sender: &Address, text: &str) -> Option<RequestId> {
        let intent = classify(text);
        debug!(
            %sender,
            kind = %intent.kind,
            topic = %intent.topic,
            domain = %intent.domain,
            "classified"
        );

        let worker = match self.routes.for_kind(intent.kind) {
            Some(worker) => worker.clone(),
            None => {
                let reply = self.local_reply(&intent);
                self.send_text(sender, reply);
                return None;
            }
        };

        let request_id = self.ids.mint(intent.kind);
        let entry = PendingRequest::new(
            request_id.clone(),
            sender.clone(),
            intent.kind,
            intent.topic.clone(),
        );
        if let Err(e) = self.pending.insert(entry) {
            error!(%request_id, "cannot track request: {}", e);
            self.send_text(sender, replies::dispatch_failure(intent.kind));
            return None;
        }

        let request = build_request(&intent, text, sender, &request_id);
        if let Err(e) = self
            .transport
            .deliver(&self.address, &worker, Envelope::Request(request))
        {
            error!(%request_id, %worker, "dispatch failed: {}", e);
            self.pending.take(&request_id);
            self.send_text(sender, replies::dispatch_failure(intent.kind));
            return None;
        }

        info!(%request_id, %worker, kind = %intent.kind, "dispatched");
        self.send_text(sender, replies::interim(intent.kind, &intent.topic));
        Some(request_id)
    }

    /// Route a worker reply to the recorded sender. Returns whether it matched.
    pub fn handle_worker_reply(&mut self, reply: WorkerReply) -> bool {
        let request_id = reply.request_id().clone();
        let Some(entry) = self.pending.take(&request_id) else {
            warn!(%request_id, kind = reply.kind(), "reply for unknown request, dropping");
            return false;
        };

        let text = if reply.success() {
            reply.payload_text()
        } else {
            warn!(%request_id, error = reply.error_text(), "worker reported failure");
            replies::worker_failure(reply.error_text())
        };

        info!(
            %request_id,
            success = reply.success(),
            elapsed_ms = entry.age(Utc::now()).num_milliseconds(),
            "request completed"
        );
        self.send_text(&entry.originating_address, text);
        true
    }

    /// Expire entries older than the TTL, apologizing to each sender.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> usize {
        let expired = self.pending.expire(now, self.ttl);
        for entry in &expired {
            warn!(
                request_id = %entry.request_id,
                sender = %entry.originating_address,
                "request expired"
            );
            self.send_text(
                &entry.originating_address,
                replies::timeout(entry.kind, &entry.topic),
            );
        }
        expired.len()
    }

    fn local_reply(&self, intent: &ClassifiedIntent) -> String {
        match intent.kind {
            IntentKind::Greeting => replies::greeting(),
            IntentKind::Help => replies::help(),
            _ => {
                let node = self
                    .store
                    .lookup(&intent.topic)
                    .filter(|n| n.source == ConceptSource::Seeded);
                let order = node.as_ref().map(|n| {
                    let prerequisites: Vec<&str> =
                        n.prerequisites.iter().map(|k| k.as_str()).collect();
                    suggest_order(&self.store, &n.domain, &prerequisites)
                });
                replies::fallback(intent, node.as_ref(), order.as_ref())
            }
        }
    }

    fn send_text(&self, to: &Address, text: String) {
        self.send(to, Envelope::Chat(ChatMessage::text(text)));
    }

    fn send(&self, to: &Address, envelope: Envelope) {
        if let Err(e) = self.transport.deliver(&self.address, to, envelope) {
            error!(%to, "delivery failed: {}", e);
        }
    }
}

fn build_request(
    intent: &ClassifiedIntent,
    text: &str,
    sender: &Address,
    request_id: &RequestId,
) -> WorkerRequest {
    match intent.kind {
        IntentKind::FindResources => WorkerRequest::Materials(MaterialsRequest {
            topic: intent.topic.clone(),
            domain: intent.domain.clone(),
            user_query: text.to_string(),
            include_videos: wants_videos(text),
            originating_address: sender.clone(),
            request_id: request_id.clone(),
        }),
        IntentKind::Explain => WorkerRequest::Insights(InsightsRequest {
            concept: intent.topic.clone(),
            domain: intent.domain.clone(),
            query_kind: "explain".to_string(),
            user_query: text.to_string(),
            originating_address: sender.clone(),
            request_id: request_id.clone(),
        }),
        _ => WorkerRequest::Curriculum(CurriculumRequest {
            domain: intent.domain.clone(),
            user_query: text.to_string(),
            originating_address: sender.clone(),
            request_id: request_id.clone(),
        }),
    }
}
