//! Addressed message delivery between agents.

use dashmap::DashMap;
use edufinder_core::{Address, Envelope, Error, Result};
use tokio::sync::mpsc;
use tracing::debug;

/// An envelope together with the address that sent it.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub from: Address,
    pub envelope: Envelope,
}

/// Receiving end of an agent's mailbox.
pub type Mailbox = mpsc::UnboundedReceiver<Delivery>;

/// Fire-and-forget delivery. Never waits on the recipient.
pub trait Transport: Send + Sync {
    fn deliver(&self, from: &Address, to: &Address, envelope: Envelope) -> Result<()>;
}

/// In-process transport: one unbounded mailbox per registered address.
#[derive(Default)]
pub struct Router {
    mailboxes: DashMap<Address, mpsc::UnboundedSender<Delivery>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `address` and return its mailbox. Re-registering replaces the old one.
    pub fn register(&self, address: impl Into<Address>) -> Mailbox {
        let address = address.into();
        let (tx, rx) = mpsc::unbounded_channel();
        if self.mailboxes.insert(address.clone(), tx).is_some() {
            debug!(%address, "mailbox replaced");
        }
        rx
    }

    pub fn unregister(&self, address: &Address) -> bool {
        self.mailboxes.remove(address).is_some()
    }

    pub fn is_registered(&self, address: &Address) -> bool {
        self.mailboxes.contains_key(address)
    }

    pub fn addresses(&self) -> Vec<Address> {
        let mut all: Vec<Address> = self.mailboxes.iter().map(|e| e.key().clone()).collect();
        all.sort();
        all
    }
}

impl Transport for Router {
    fn deliver(&self, from: &Address, to: &Address, envelope: Envelope) -> Result<()> {
        let sender = self
            .mailboxes
            .get(to)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::unknown_address(to))?;

        sender
            .send(Delivery {
                from: from.clone(),
                envelope,
            })
            .map_err(|_| Error::mailbox_closed(to))
    }
}
