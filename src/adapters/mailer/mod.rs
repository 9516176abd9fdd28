//! Simulated mail adapter: Implementation of Transport.
//!
//! Waits for a fixed delay and acknowledges. Nothing leaves the machine.

use std::thread;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::ports::{Ack, Attachment, SendError, Transport};

/// Transport that only pretends to send.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    delay: Duration,
}

impl SimulatedTransport {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Transport for SimulatedTransport {
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachments: &[Attachment],
    ) -> Result<Ack, SendError> {
        let to = to.trim();
        tracing::info!(
            subject_len = subject.len(),
            body_len = body.len(),
            attachments = attachments.len(),
            "Simulating email delivery to {}",
            to
        );
        thread::sleep(self.delay);

        Ok(Ack {
            message_id: Uuid::new_v4().to_string(),
            recipient: to.to_string(),
            accepted_at: Utc::now(),
        })
    }
}
