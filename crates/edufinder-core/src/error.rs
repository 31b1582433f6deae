//! Error types for EduFinder

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no mailbox registered for {0}")]
    UnknownAddress(String),

    #[error("mailbox closed: {0}")]
    MailboxClosed(String),

    #[error("duplicate request id: {0}")]
    DuplicateRequest(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn unknown_address(address: impl std::fmt::Display) -> Self {
        Self::UnknownAddress(address.to_string())
    }

    pub fn mailbox_closed(address: impl std::fmt::Display) -> Self {
        Self::MailboxClosed(address.to_string())
    }

    pub fn duplicate_request(id: impl std::fmt::Display) -> Self {
        Self::DuplicateRequest(id.to_string())
    }
}
