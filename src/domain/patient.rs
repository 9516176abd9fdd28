//! Patient intake types.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Message shown when a required intake field is missing.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Name, Patient ID, and Email are required.";

/// File extensions accepted as patient attachments.
pub const ATTACHMENT_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "pdf"];

/// Date format used for visit dates.
pub const VISIT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Shown when the visit date is not a zero-padded `YYYY-MM-DD` date.
pub const VISIT_DATE_MESSAGE: &str = "Visit date must be YYYY-MM-DD.";

/// A saved patient record.
///
/// Records are append-only: once created they are never edited or removed
/// for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    pub id: String,
    pub visit_date: NaiveDate,
    pub email: String,
    pub symptoms: String,
    pub attached_file_names: Vec<String>,
}

impl PatientRecord {
    /// Heading used in record listings, e.g. `Jane Doe (12345)`.
    #[must_use]
    pub fn heading(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }

    /// Label used by the email recipient selector, e.g. `Jane Doe (jane@x.org)`.
    #[must_use]
    pub fn recipient_label(&self) -> String {
        format!("{} ({})", self.name, self.email)
    }
}

/// Raw intake form input, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct PatientIntake {
    pub name: String,
    pub id: String,
    pub visit_date: String,
    pub email: String,
    pub symptoms: String,
    /// Comma-separated attachment paths
    pub attachments: String,
}

impl PatientIntake {
    /// Validate the input and build a record.
    ///
    /// Text fields are copied verbatim. Only emptiness is checked for the
    /// required fields; duplicates of earlier records are allowed.
    ///
    /// # Errors
    /// Returns the user-facing validation message.
    pub fn to_record(&self) -> Result<PatientRecord, String> {
        if self.name.is_empty() || self.id.is_empty() || self.email.is_empty() {
            return Err(REQUIRED_FIELDS_MESSAGE.to_string());
        }

        // Only canonical dates, so the stored value reads back as typed.
        let visit_date = NaiveDate::parse_from_str(&self.visit_date, VISIT_DATE_FORMAT)
            .ok()
            .filter(|d| d.format(VISIT_DATE_FORMAT).to_string() == self.visit_date)
            .ok_or_else(|| VISIT_DATE_MESSAGE.to_string())?;

        let attached_file_names = attachment_file_names(&self.attachments)?;

        Ok(PatientRecord {
            name: self.name.clone(),
            id: self.id.clone(),
            visit_date,
            email: self.email.clone(),
            symptoms: self.symptoms.clone(),
            attached_file_names,
        })
    }
}

/// Split a comma-separated list of paths and keep only the file names.
///
/// # Errors
/// Returns a message naming the first path whose extension is not accepted.
pub fn attachment_file_names(paths: &str) -> Result<Vec<String>, String> {
    paths
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            if !has_extension(p, &ATTACHMENT_EXTENSIONS) {
                return Err(format!(
                    "{p}: unsupported file type (allowed: {})",
                    ATTACHMENT_EXTENSIONS.join(", ")
                ));
            }
            Ok(file_name(p))
        })
        .collect()
}

/// Final path component, falling back to the input itself.
#[must_use]
pub fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Case-insensitive extension check.
#[must_use]
pub fn has_extension(path: &str, allowed: &[&str]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| allowed.iter().any(|a| a.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}
