//! Notification service: composes and sends result emails to patients.
//!
//! Sending is only possible once the session holds at least one patient
//! record; the recipient is always one of those records.

use std::sync::Arc;

use crate::domain::{EmailDraft, PatientRecord};
use crate::ports::{Ack, Attachment, SessionId, SessionStore, Transport};
use crate::{BonescopeError, Result};

/// Service for emailing results through a `Transport`.
pub struct NotificationService<S, T>
where
    S: SessionStore,
    T: Transport,
{
    store: Arc<S>,
    transport: Arc<T>,
    session: SessionId,
}

impl<S, T> NotificationService<S, T>
where
    S: SessionStore,
    T: Transport,
{
    /// Create a new notification service.
    pub fn new(store: Arc<S>, transport: Arc<T>, session: SessionId) -> Self {
        Self {
            store,
            transport,
            session,
        }
    }

    /// Records that can be selected as recipients.
    ///
    /// # Errors
    /// Returns `NoPatientRecords` when the session holds none.
    pub fn recipients(&self) -> Result<Vec<PatientRecord>> {
        let records = self.store.patients(self.session)?;
        if records.is_empty() {
            return Err(BonescopeError::NoPatientRecords);
        }
        Ok(records)
    }

    /// Start a draft for the record at `index` with the default subject and body.
    ///
    /// # Errors
    /// Returns `NoPatientRecords` when the session is empty, or a validation
    /// error for an out-of-range index.
    pub fn compose(&self, index: usize) -> Result<EmailDraft> {
        let records = self.recipients()?;
        records
            .get(index)
            .map(EmailDraft::for_record)
            .ok_or_else(|| BonescopeError::Validation(format!("No patient record at position {}", index + 1)))
    }

    /// Hand a draft to the transport.
    ///
    /// Blocks until the transport answers.
    ///
    /// # Errors
    /// Returns `NoPatientRecords` when the session is empty, or the
    /// transport's error.
    pub fn send(&self, draft: &EmailDraft) -> Result<Ack> {
        self.recipients()?;

        let attachments: Vec<Attachment> = draft
            .attachment
            .as_deref()
            .map(Attachment::from_path)
            .into_iter()
            .collect();

        let ack = self
            .transport
            .send(&draft.to, &draft.subject, &draft.body, &attachments)?;

        tracing::info!(message_id = %ack.message_id, "Results email accepted for {}", ack.recipient);
        Ok(ack)
    }
}

/// Confirmation shown after a successful send.
#[must_use]
pub fn sent_message(ack: &Ack) -> String {
    format!("Results have been sent to {}!", ack.recipient)
}
