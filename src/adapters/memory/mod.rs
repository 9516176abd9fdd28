//! In-memory adapter: Implementation of SessionStore.
//!
//! State lives in a `HashMap` keyed by session id and disappears with the
//! process. A poisoned mutex fails closed with `SessionError::LockPoisoned`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{PatientRecord, PredictionResult, SyntheticEvaluation};
use crate::ports::{SessionError, SessionId, SessionStore};

/// Everything one session holds.
#[derive(Debug, Default)]
struct SessionData {
    patients: Vec<PatientRecord>,
    predictions: Vec<PredictionResult>,
    evaluation: Option<SyntheticEvaluation>,
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<SessionId, SessionData>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionData>>, SessionError> {
        self.sessions.lock().map_err(|_| SessionError::LockPoisoned)
    }

    fn with_session<T>(
        &self,
        session: SessionId,
        f: impl FnOnce(&mut SessionData) -> T,
    ) -> Result<T, SessionError> {
        let mut sessions = self.lock()?;
        sessions
            .get_mut(&session)
            .map(f)
            .ok_or(SessionError::UnknownSession(session))
    }
}

impl SessionStore for MemorySessionStore {
    fn create_session(&self) -> Result<SessionId, SessionError> {
        let id = SessionId::new_v4();
        self.lock()?.insert(id, SessionData::default());
        tracing::debug!(session = %id, "Session created");
        Ok(id)
    }

    fn close_session(&self, session: SessionId) -> Result<(), SessionError> {
        self.lock()?
            .remove(&session)
            .map(|_| tracing::debug!(session = %session, "Session closed"))
            .ok_or(SessionError::UnknownSession(session))
    }

    fn patients(&self, session: SessionId) -> Result<Vec<PatientRecord>, SessionError> {
        self.with_session(session, |s| s.patients.clone())
    }

    fn append_patient(&self, session: SessionId, record: PatientRecord) -> Result<(), SessionError> {
        self.with_session(session, |s| s.patients.push(record))
    }

    fn predictions(&self, session: SessionId) -> Result<Vec<PredictionResult>, SessionError> {
        self.with_session(session, |s| s.predictions.clone())
    }

    fn append_prediction(
        &self,
        session: SessionId,
        result: PredictionResult,
    ) -> Result<(), SessionError> {
        self.with_session(session, |s| s.predictions.push(result))
    }

    fn evaluation(&self, session: SessionId) -> Result<Option<SyntheticEvaluation>, SessionError> {
        self.with_session(session, |s| s.evaluation.clone())
    }

    fn set_evaluation(
        &self,
        session: SessionId,
        evaluation: SyntheticEvaluation,
    ) -> Result<(), SessionError> {
        self.with_session(session, |s| s.evaluation = Some(evaluation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(name: &str) -> PatientRecord {
        PatientRecord {
            name: name.to_string(),
            id: "7".to_string(),
            visit_date: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
            email: format!("{name}@example.com"),
            symptoms: String::new(),
            attached_file_names: Vec::new(),
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let store = MemorySessionStore::new();
        let s = store.create_session().expect("Should create");
        assert!(store.patients(s).expect("known").is_empty());
        assert!(store.predictions(s).expect("known").is_empty());
        assert!(store.evaluation(s).expect("known").is_none());
    }

    #[test]
    fn test_append_preserves_order_and_duplicates() {
        let store = MemorySessionStore::new();
        let s = store.create_session().expect("Should create");
        store.append_patient(s, record("a")).expect("append");
        store.append_patient(s, record("b")).expect("append");
        store.append_patient(s, record("a")).expect("append");

        let names: Vec<_> = store
            .patients(s)
            .expect("known")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = MemorySessionStore::new();
        let first = store.create_session().expect("Should create");
        let second = store.create_session().expect("Should create");

        store.append_patient(first, record("a")).expect("append");
        store
            .append_prediction(first, PredictionResult::new(1, 0.9))
            .expect("append");

        assert_eq!(store.patients(first).expect("known").len(), 1);
        assert!(store.patients(second).expect("known").is_empty());
        assert!(store.predictions(second).expect("known").is_empty());
    }

    #[test]
    fn test_unknown_and_closed_sessions() {
        let store = MemorySessionStore::new();
        let stray = SessionId::new_v4();
        assert_eq!(
            store.patients(stray).unwrap_err(),
            SessionError::UnknownSession(stray)
        );

        let s = store.create_session().expect("Should create");
        assert_eq!(store.session_count(), 1);
        store.close_session(s).expect("close");
        assert_eq!(store.session_count(), 0);
        assert!(store.append_patient(s, record("a")).is_err());
        assert!(store.close_session(s).is_err());
    }
}
