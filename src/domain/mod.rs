//! Domain layer: Core types and logic.
//!
//! Pure types with no I/O. Randomness enters only through an injected `Rng`.

mod email;
mod evaluation;
mod patient;
mod prediction;
pub mod settings;

pub use email::{EmailDraft, EmailPreview, DEFAULT_BODY, DEFAULT_SUBJECT};
pub use evaluation::{
    roc_auc, ConfusionMatrix, HeadlineMetric, Histogram, MetricsError, RocCurve,
    SyntheticEvaluation, ACCURACY, HEADLINE_METRICS, PRECISION, RECALL, SYNTHETIC_SAMPLE_COUNT,
};
pub use patient::{
    attachment_file_names, file_name, has_extension, PatientIntake, PatientRecord,
    REQUIRED_FIELDS_MESSAGE, VISIT_DATE_FORMAT,
};
pub use prediction::{FractureLabel, PredictionResult, FRACTURE_THRESHOLD};
pub use settings::{DetectionMode, Settings, Theme};
