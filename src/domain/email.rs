//! Email draft and preview for sending results to a patient.

use super::patient::{file_name, has_extension, PatientRecord};

pub const DEFAULT_SUBJECT: &str = "Your Bone Fracture Detection Results";

pub const DEFAULT_BODY: &str = "Dear Patient,\n\nPlease find attached your bone fracture detection results.\n\nRegards,\nMedical Team";

/// File extensions accepted for the additional email attachment.
pub const EMAIL_ATTACHMENT_EXTENSIONS: [&str; 3] = ["pdf", "png", "jpg"];

/// An editable email addressed to one patient record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Optional extra attachment path
    pub attachment: Option<String>,
}

impl EmailDraft {
    /// Start a draft for `record` with the default subject and body.
    #[must_use]
    pub fn for_record(record: &PatientRecord) -> Self {
        Self {
            to: record.email.clone(),
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
            attachment: None,
        }
    }

    /// Set or clear the extra attachment from a typed path.
    ///
    /// # Errors
    /// Rejects paths whose extension is not pdf, png or jpg.
    pub fn set_attachment(&mut self, path: &str) -> Result<(), String> {
        let path = path.trim();
        if path.is_empty() {
            self.attachment = None;
            return Ok(());
        }
        if !has_extension(path, &EMAIL_ATTACHMENT_EXTENSIONS) {
            return Err(format!(
                "{path}: unsupported file type (allowed: {})",
                EMAIL_ATTACHMENT_EXTENSIONS.join(", ")
            ));
        }
        self.attachment = Some(path.to_string());
        Ok(())
    }

    /// Render the preview shown before sending.
    #[must_use]
    pub fn preview(&self) -> EmailPreview {
        EmailPreview {
            to: self.to.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            attachment_name: self.attachment.as_deref().map(file_name),
        }
    }
}

/// Read-only view of a composed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPreview {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> PatientRecord {
        PatientRecord {
            name: "Ada".to_string(),
            id: "A-1".to_string(),
            visit_date: NaiveDate::from_ymd_opt(2025, 1, 2).expect("valid date"),
            email: "ada@example.org".to_string(),
            symptoms: String::new(),
            attached_file_names: Vec::new(),
        }
    }

    #[test]
    fn test_defaults() {
        let draft = EmailDraft::for_record(&record());
        assert_eq!(draft.to, "ada@example.org");
        assert_eq!(draft.subject, DEFAULT_SUBJECT);
        assert!(draft.body.starts_with("Dear Patient,"));
        assert!(draft.attachment.is_none());
    }

    #[test]
    fn test_preview_shows_attachment_name_only() {
        let mut draft = EmailDraft::for_record(&record());
        draft.set_attachment("/home/doc/report.pdf").expect("pdf is allowed");
        let preview = draft.preview();
        assert_eq!(preview.attachment_name.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn test_attachment_type_filter() {
        let mut draft = EmailDraft::for_record(&record());
        assert!(draft.set_attachment("scan.jpeg").is_err());
        assert!(draft.set_attachment("scan.JPG").is_ok());
        draft.set_attachment("  ").expect("empty clears");
        assert!(draft.attachment.is_none());
    }
}
