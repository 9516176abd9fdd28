//! # Bonescope
//!
//! Terminal dashboard for a bone fracture detection demo.
//!
//! This crate provides:
//! - Patient intake with required-field validation
//! - An image analysis pipeline (zoom, synthetic heatmap overlay, stub scoring)
//! - Synthetic performance reporting (histogram, ROC/AUC, confusion matrix, CSV)
//! - An email preview and simulated send workflow
//! - Terminal UI for local-only use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (PatientRecord, PredictionResult, SyntheticEvaluation)
//! - `ports`: Trait definitions for the session store, scorer and transport
//! - `adapters`: Concrete implementations (in-memory store, random scorer,
//!   simulated transport, log sanitizer)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface
//!
//! Nothing here performs real inference: scores come from a random number
//! generator and carry no diagnostic information.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{FractureLabel, PatientRecord, PredictionResult};

/// Result type for Bonescope operations
pub type Result<T> = std::result::Result<T, BonescopeError>;

/// Main error type for Bonescope
#[derive(Debug, thiserror::Error)]
pub enum BonescopeError {
    #[error("Session error: {0}")]
    Session(#[from] ports::SessionError),

    #[error("Send failed: {0}")]
    Send(#[from] ports::SendError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] domain::MetricsError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Please add a patient record in the Patient Info tab first!")]
    NoPatientRecords,
}
