//! Pending-request table: correlates worker replies with the user who asked.

use crate::classifier::IntentKind;
use chrono::{DateTime, Duration, Utc};
use edufinder_core::{Address, Error, RequestId, Result};
use std::collections::HashMap;

/// One outstanding request awaiting a worker reply.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub request_id: RequestId,
    pub originating_address: Address,
    pub issued_at: DateTime<Utc>,
    pub kind: IntentKind,
    pub topic: String,
}

impl PendingRequest {
    pub fn new(
        request_id: RequestId,
        originating_address: Address,
        kind: IntentKind,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            request_id,
            originating_address,
            issued_at: Utc::now(),
            kind,
            topic: topic.into(),
        }
    }

    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.issued_at = at;
        self
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.issued_at
    }
}

/// Table of in-flight requests keyed by request id.
///
/// Owned by the orchestrator and mutated only from its loop, so no locking.
#[derive(Debug, Default)]
pub struct PendingTable {
    entries: HashMap<RequestId, PendingRequest>,
}

impl PendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry. Reusing a live id is an error.
    pub fn insert(&mut self, entry: PendingRequest) -> Result<()> {
        if self.entries.contains_key(&entry.request_id) {
            return Err(Error::duplicate_request(&entry.request_id));
        }
        self.entries.insert(entry.request_id.clone(), entry);
        Ok(())
    }

    /// Remove and return the entry, if present.
    pub fn take(&mut self, id: &RequestId) -> Option<PendingRequest> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &RequestId) -> Option<&PendingRequest> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &RequestId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry at least `ttl` old, oldest first.
    pub fn expire(&mut self, now: DateTime<Utc>, ttl: Duration) -> Vec<PendingRequest> {
        let stale: Vec<RequestId> = self
            .entries
            .values()
            .filter(|e| e.age(now) >= ttl)
            .map(|e| e.request_id.clone())
            .collect();

        let mut expired: Vec<PendingRequest> = stale
            .iter()
            .filter_map(|id| self.entries.remove(id))
            .collect();
        expired.sort_by_key(|e| e.issued_at);
        expired
    }
}

/// Mints request ids unique within and across process runs.
///
/// Format: `{kind}-{epoch}-{counter}` where the epoch is random per generator.
#[derive(Debug)]
pub struct RequestIdGenerator {
    epoch: String,
    next: u64,
}

impl RequestIdGenerator {
    pub fn new() -> Self {
        let epoch = uuid::Uuid::new_v4().simple().to_string();
        Self::with_epoch(&epoch[..8])
    }

    pub fn with_epoch(epoch: impl Into<String>) -> Self {
        Self {
            epoch: epoch.into(),
            next: 1,
        }
    }

    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    pub fn mint(&mut self, kind: IntentKind) -> RequestId {
        let id = RequestId::new(format!("{}-{}-{}", kind.slug(), self.epoch, self.next));
        self.next += 1;
        id
    }
}

impl Default for RequestIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
