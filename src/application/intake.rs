//! Intake service: validates patient forms and appends records.

use std::sync::Arc;

use crate::domain::{PatientIntake, PatientRecord};
use crate::ports::{SessionId, SessionStore};
use crate::{BonescopeError, Result};

/// Service for saving patient records into the current session.
pub struct IntakeService<S>
where
    S: SessionStore,
{
    store: Arc<S>,
    session: SessionId,
}

impl<S> IntakeService<S>
where
    S: SessionStore,
{
    /// Create a new intake service bound to `session`.
    pub fn new(store: Arc<S>, session: SessionId) -> Self {
        Self { store, session }
    }

    /// Validate and save a form submission.
    ///
    /// Nothing is stored when validation fails.
    ///
    /// # Errors
    /// `BonescopeError::Validation` carries the message to show inline.
    pub fn submit(&self, intake: &PatientIntake) -> Result<PatientRecord> {
        let record = intake.to_record().map_err(BonescopeError::Validation)?;
        self.store.append_patient(self.session, record.clone())?;

        tracing::info!(
            attachments = record.attached_file_names.len(),
            "Saved patient record patient_id={}",
            record.id
        );
        Ok(record)
    }

    /// All records saved in this session, oldest first.
    ///
    /// # Errors
    /// Returns error if the session is gone.
    pub fn records(&self) -> Result<Vec<PatientRecord>> {
        Ok(self.store.patients(self.session)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemorySessionStore;

    fn service() -> IntakeService<MemorySessionStore> {
        let store = Arc::new(MemorySessionStore::new());
        let session = store.create_session().expect("Should create session");
        IntakeService::new(store, session)
    }

    fn intake() -> PatientIntake {
        PatientIntake {
            name: "Maria Lopez".to_string(),
            id: "P-204".to_string(),
            visit_date: "2025-11-02".to_string(),
            email: "maria@example.com".to_string(),
            symptoms: "Swelling, limited range of motion".to_string(),
            attachments: String::new(),
        }
    }

    #[test]
    fn test_submit_appends_exactly_one_record() {
        let svc = service();
        let saved = svc.submit(&intake()).expect("Should save");

        let records = svc.records().expect("Should list");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], saved);
        assert_eq!(records[0].name, "Maria Lopez");
        assert_eq!(records[0].symptoms, "Swelling, limited range of motion");
    }

    #[test]
    fn test_missing_email_stores_nothing() {
        let svc = service();
        let mut bad = intake();
        bad.email.clear();

        match svc.submit(&bad) {
            Err(BonescopeError::Validation(msg)) => {
                assert_eq!(msg, "Name, Patient ID, and Email are required.")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(svc.records().expect("Should list").is_empty());
    }

    #[test]
    fn test_duplicates_are_allowed() {
        let svc = service();
        svc.submit(&intake()).expect("Should save");
        svc.submit(&intake()).expect("Should save");
        assert_eq!(svc.records().expect("Should list").len(), 2);
    }
}
