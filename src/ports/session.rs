//! Session store port: Trait for volatile per-session state.
//!
//! A session holds the patient records and prediction results created during
//! one user's interaction with the dashboard. Nothing outlives the process.

use std::fmt;

use uuid::Uuid;

use crate::domain::{PatientRecord, PredictionResult, SyntheticEvaluation};

/// Identifier of one dashboard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),

    #[error("Session state lock poisoned")]
    LockPoisoned,
}

/// Trait for in-memory session state.
///
/// Every operation is scoped to one session; a session never observes
/// another session's records.
pub trait SessionStore: Send + Sync {
    /// Open a new, empty session.
    fn create_session(&self) -> Result<SessionId, SessionError>;

    /// Drop a session and everything it holds.
    ///
    /// # Errors
    /// Returns `UnknownSession` if the session does not exist.
    fn close_session(&self, session: SessionId) -> Result<(), SessionError>;

    /// Patient records in insertion order.
    ///
    /// # Errors
    /// Returns `UnknownSession` if the session does not exist.
    fn patients(&self, session: SessionId) -> Result<Vec<PatientRecord>, SessionError>;

    /// Append a patient record.
    ///
    /// # Errors
    /// Returns `UnknownSession` if the session does not exist.
    fn append_patient(&self, session: SessionId, record: PatientRecord) -> Result<(), SessionError>;

    /// Prediction results in insertion order.
    ///
    /// # Errors
    /// Returns `UnknownSession` if the session does not exist.
    fn predictions(&self, session: SessionId) -> Result<Vec<PredictionResult>, SessionError>;

    /// Append a prediction result.
    ///
    /// # Errors
    /// Returns `UnknownSession` if the session does not exist.
    fn append_prediction(
        &self,
        session: SessionId,
        result: PredictionResult,
    ) -> Result<(), SessionError>;

    /// The synthetic evaluation currently backing the reporting view.
    ///
    /// # Errors
    /// Returns `UnknownSession` if the session does not exist.
    fn evaluation(&self, session: SessionId) -> Result<Option<SyntheticEvaluation>, SessionError>;

    /// Replace the synthetic evaluation.
    ///
    /// # Errors
    /// Returns `UnknownSession` if the session does not exist.
    fn set_evaluation(
        &self,
        session: SessionId,
        evaluation: SyntheticEvaluation,
    ) -> Result<(), SessionError>;
}
