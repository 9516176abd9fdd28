//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

pub mod analysis;
mod intake;
mod notification;
mod reporting;

pub use analysis::{AnalysisPipeline, Heatmap, ViewOptions};
pub use intake::IntakeService;
pub use notification::{sent_message, NotificationService};
pub use reporting::{write_metrics_csv, ReportingService, METRICS_FILE_NAME};
