//! Transport port: delivery of result emails.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// A file attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub path: PathBuf,
}

impl Attachment {
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        Self {
            file_name: crate::domain::file_name(path),
            path: PathBuf::from(path),
        }
    }
}

/// Acknowledgement returned by a transport after accepting a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub message_id: String,
    pub recipient: String,
    pub accepted_at: DateTime<Utc>,
}

/// Errors that can occur while sending.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Trait for sending messages.
pub trait Transport: Send + Sync {
    /// Send one message.
    ///
    /// # Errors
    /// Returns `SendError` if the message was not accepted.
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachments: &[Attachment],
    ) -> Result<Ack, SendError>;
}
