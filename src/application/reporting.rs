//! Reporting service: headline metrics, synthetic evaluation charts and CSV
//! export.
//!
//! The headline figures are fixed display constants. The histogram, ROC curve
//! and confusion matrix come from a random 100-sample evaluation held in the
//! session, so the exported AUC always matches the charts on screen.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use crate::adapters::random::seeded_rng;
use crate::domain::{
    HeadlineMetric, SyntheticEvaluation, ACCURACY, HEADLINE_METRICS, PRECISION, RECALL,
    SYNTHETIC_SAMPLE_COUNT,
};
use crate::ports::{SessionError, SessionId, SessionStore};
use crate::Result;

/// File name of the metrics export.
pub const METRICS_FILE_NAME: &str = "model_metrics.csv";

#[derive(Debug, Serialize)]
struct MetricRow {
    #[serde(rename = "Metric")]
    metric: &'static str,
    #[serde(rename = "Value")]
    value: f64,
}

/// Write the `Metric,Value` table for the given AUC.
///
/// # Errors
/// Propagates CSV and I/O failures.
pub fn write_metrics_csv<W: Write>(writer: W, auc: f64) -> Result<()> {
    let rows = [
        MetricRow { metric: "Accuracy", value: ACCURACY },
        MetricRow { metric: "Precision", value: PRECISION },
        MetricRow { metric: "Recall", value: RECALL },
        MetricRow { metric: "AUC", value: auc },
    ];

    let mut csv = csv::Writer::from_writer(writer);
    for row in &rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Service backing the performance reporting view.
pub struct ReportingService<S>
where
    S: SessionStore,
{
    store: Arc<S>,
    session: SessionId,
    rng: Mutex<ChaCha20Rng>,
    export_dir: PathBuf,
}

impl<S> ReportingService<S>
where
    S: SessionStore,
{
    /// Create a new reporting service.
    pub fn new(store: Arc<S>, session: SessionId, export_dir: PathBuf, seed: Option<u64>) -> Self {
        Self {
            store,
            session,
            rng: Mutex::new(seeded_rng(seed, 3)),
            export_dir,
        }
    }

    /// Fixed headline metric cards.
    #[must_use]
    pub fn headline(&self) -> &'static [HeadlineMetric] {
        &HEADLINE_METRICS
    }

    /// The session's evaluation, generating one on first use.
    ///
    /// # Errors
    /// Returns error if the session is gone.
    pub fn evaluation(&self) -> Result<SyntheticEvaluation> {
        match self.store.evaluation(self.session)? {
            Some(evaluation) => Ok(evaluation),
            None => self.regenerate(),
        }
    }

    /// Draw a fresh evaluation and make it the session's current one.
    ///
    /// # Errors
    /// Returns error if the session is gone.
    pub fn regenerate(&self) -> Result<SyntheticEvaluation> {
        let evaluation = {
            let mut rng = self.rng.lock().map_err(|_| SessionError::LockPoisoned)?;
            SyntheticEvaluation::sample(&mut *rng, SYNTHETIC_SAMPLE_COUNT)?
        };
        self.store.set_evaluation(self.session, evaluation.clone())?;

        tracing::info!(
            samples = evaluation.y_true.len(),
            "Generated synthetic evaluation, AUC={:.2}",
            evaluation.auc
        );
        Ok(evaluation)
    }

    /// The CSV export as a string.
    ///
    /// # Errors
    /// Returns error if the session is gone.
    pub fn metrics_csv(&self) -> Result<String> {
        let auc = self.evaluation()?.auc;
        let mut buf = Vec::new();
        write_metrics_csv(&mut buf, auc)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write `model_metrics.csv` into the export directory.
    ///
    /// # Errors
    /// Propagates I/O failures.
    pub fn export_csv(&self) -> Result<PathBuf> {
        let auc = self.evaluation()?.auc;
        let path = self.export_path();
        write_metrics_csv(File::create(&path)?, auc)?;

        tracing::info!("Exported metrics to {}", path.display());
        Ok(path)
    }

    /// Where `export_csv` writes.
    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(METRICS_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::adapters::MemorySessionStore;

    fn service(dir: &Path) -> ReportingService<MemorySessionStore> {
        let store = Arc::new(MemorySessionStore::new());
        let session = store.create_session().expect("Should create session");
        ReportingService::new(store, session, dir.to_path_buf(), Some(42))
    }

    #[test]
    fn test_headline_values() {
        let svc = service(Path::new("."));
        let names: Vec<_> = svc.headline().iter().map(|m| m.name).collect();
        assert_eq!(names, ["Accuracy", "Precision", "Recall", "Inference Time"]);
        assert_eq!(svc.headline()[3].display, "~120 ms");
    }

    #[test]
    fn test_evaluation_is_stable_until_regenerated() {
        let svc = service(Path::new("."));
        let first = svc.evaluation().expect("Should generate");
        assert_eq!(first.y_true.len(), SYNTHETIC_SAMPLE_COUNT);
        assert!(first.y_true.contains(&0) && first.y_true.contains(&1));
        assert_eq!(svc.evaluation().expect("Should reuse"), first);

        let second = svc.regenerate().expect("Should regenerate");
        assert_ne!(second.y_scores, first.y_scores);
        assert_eq!(svc.evaluation().expect("Should reuse"), second);
    }

    #[test]
    fn test_csv_has_four_rows_and_session_auc() {
        let svc = service(Path::new("."));
        let auc = svc.evaluation().expect("Should generate").auc;
        let csv = svc.metrics_csv().expect("Should render");

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Metric,Value");
        assert_eq!(lines[1], "Accuracy,0.925");
        assert_eq!(lines[2], "Precision,0.902");
        assert_eq!(lines[3], "Recall,0.887");
        assert_eq!(lines[4], format!("AUC,{auc}"));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let svc = service(dir.path());
        assert_eq!(svc.export_path(), dir.path().join(METRICS_FILE_NAME));
        let path = svc.export_csv().expect("Should export");

        assert_eq!(path, svc.export_path());
        let written = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(written, svc.metrics_csv().expect("Should render"));
    }
}
