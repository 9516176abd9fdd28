//! Background workers for the simulated delays.
//!
//! Image analysis and email sending both block for a fixed delay. They run on
//! their own threads and report over `mpsc` channels so the TUI main loop
//! keeps redrawing.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use image::RgbImage;

use crate::application::{AnalysisPipeline, NotificationService};
use crate::domain::{EmailDraft, PredictionResult};
use crate::ports::{Ack, Scorer, SessionStore, Transport};

/// Progress updates from the analysis worker.
#[derive(Debug, Clone)]
pub enum AnalysisProgress {
    /// Image with this 1-based index is being scored
    Analyzing(usize),
    /// Scoring finished
    Complete(PredictionResult),
    /// Scoring failed for the image with this index
    Error(usize, String),
}

/// Progress updates from the send worker.
#[derive(Debug, Clone)]
pub enum SendProgress {
    Sending,
    Sent(Ack),
    Error(String),
}

/// Handle to a running worker.
pub struct WorkerHandle<P> {
    /// Receiver for progress updates
    pub progress_rx: Receiver<P>,
    /// Thread handle (for joining)
    _handle: JoinHandle<()>,
}

impl<P> WorkerHandle<P> {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<P> {
        self.progress_rx.try_recv().ok()
    }
}

/// Worker scoring a batch of uploaded images one after another.
pub struct AnalysisWorker;

impl AnalysisWorker {
    /// Spawn a background analysis task.
    ///
    /// `images` pairs each image with its 1-based upload index.
    pub fn spawn<C, S>(
        pipeline: Arc<AnalysisPipeline<C, S>>,
        images: Vec<(usize, Arc<RgbImage>)>,
    ) -> WorkerHandle<AnalysisProgress>
    where
        C: Scorer + 'static,
        S: SessionStore + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(&pipeline, images, &tx);
        });

        WorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress<C, S>(
        pipeline: &AnalysisPipeline<C, S>,
        images: Vec<(usize, Arc<RgbImage>)>,
        tx: &Sender<AnalysisProgress>,
    ) where
        C: Scorer,
        S: SessionStore,
    {
        for (index, image) in images {
            let _ = tx.send(AnalysisProgress::Analyzing(index));

            match pipeline.analyze(index, &image) {
                Ok(result) => {
                    let _ = tx.send(AnalysisProgress::Complete(result));
                }
                Err(e) => {
                    tracing::error!("Analysis of image {} failed: {}", index, e);
                    let _ = tx.send(AnalysisProgress::Error(index, e.to_string()));
                }
            }
        }
    }
}

/// Worker handing one email draft to the transport.
pub struct SendWorker;

impl SendWorker {
    /// Spawn a background send task.
    pub fn spawn<S, T>(
        service: Arc<NotificationService<S, T>>,
        draft: EmailDraft,
    ) -> WorkerHandle<SendProgress>
    where
        S: SessionStore + 'static,
        T: Transport + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let _ = tx.send(SendProgress::Sending);
            let progress = match service.send(&draft) {
                Ok(ack) => SendProgress::Sent(ack),
                Err(e) => SendProgress::Error(e.to_string()),
            };
            let _ = tx.send(progress);
        });

        WorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use chrono::NaiveDate;

    use crate::adapters::{MemorySessionStore, RandomScorer, SimulatedTransport};
    use crate::domain::PatientRecord;

    fn drain<P>(handle: &WorkerHandle<P>, expected: usize) -> Vec<P> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut out = Vec::new();
        while out.len() < expected && Instant::now() < deadline {
            match handle.try_recv() {
                Some(p) => out.push(p),
                None => thread::sleep(Duration::from_millis(5)),
            }
        }
        out
    }

    #[test]
    fn test_analysis_worker_reports_each_image() {
        let store = Arc::new(MemorySessionStore::new());
        let session = store.create_session().expect("session");
        let pipeline = Arc::new(AnalysisPipeline::new(
            Arc::new(RandomScorer::with_seed(Some(3))),
            Arc::clone(&store),
            session,
            Duration::ZERO,
            Some(3),
        ));
        let img = Arc::new(RgbImage::new(4, 4));

        let handle = AnalysisWorker::spawn(pipeline, vec![(1, Arc::clone(&img)), (2, img)]);
        let progress = drain(&handle, 4);

        assert_eq!(progress.len(), 4);
        assert!(matches!(progress[0], AnalysisProgress::Analyzing(1)));
        assert!(matches!(progress[1], AnalysisProgress::Complete(r) if r.image_index == 1));
        assert!(matches!(progress[3], AnalysisProgress::Complete(r) if r.image_index == 2));
        assert_eq!(store.predictions(session).expect("list").len(), 2);
    }

    #[test]
    fn test_send_worker_acknowledges() {
        let store = Arc::new(MemorySessionStore::new());
        let session = store.create_session().expect("session");
        store
            .append_patient(
                session,
                PatientRecord {
                    name: "Lee".to_string(),
                    id: "9".to_string(),
                    visit_date: NaiveDate::from_ymd_opt(2025, 1, 2).expect("date"),
                    email: "lee@example.com".to_string(),
                    symptoms: String::new(),
                    attached_file_names: Vec::new(),
                },
            )
            .expect("append");
        let service = Arc::new(NotificationService::new(
            Arc::clone(&store),
            Arc::new(SimulatedTransport::new(Duration::ZERO)),
            session,
        ));
        let draft = service.compose(0).expect("compose");

        let progress = drain(&SendWorker::spawn(service, draft), 2);
        assert!(matches!(progress[0], SendProgress::Sending));
        assert!(matches!(&progress[1], SendProgress::Sent(ack) if ack.recipient == "lee@example.com"));
    }
}
