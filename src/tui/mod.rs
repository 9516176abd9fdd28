//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides five tabs:
//! - Patient intake and existing records
//! - X-ray upload, zoom/heatmap view and prediction
//! - Model performance and synthetic evaluation
//! - Emailing results
//! - Settings

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::MedicalTheme;
pub use worker::{AnalysisProgress, AnalysisWorker, SendProgress, SendWorker, WorkerHandle};
