//! Patient intake form and existing records.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{PatientIntake, PatientRecord, VISIT_DATE_FORMAT};
use crate::tui::styles::MedicalTheme;

use super::{render_input, render_key_hints};

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub value: String,
}

/// Outcome of the last submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    Saved(String),
    Error(String),
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub message: Option<FormMessage>,
}

const NAME: usize = 0;
const ID: usize = 1;
const VISIT_DATE: usize = 2;
const EMAIL: usize = 3;
const SYMPTOMS: usize = 4;
const ATTACHMENTS: usize = 5;

fn today() -> String {
    Local::now().date_naive().format(VISIT_DATE_FORMAT).to_string()
}

fn field(label: &'static str, hint: &'static str) -> FormField {
    FormField {
        label,
        hint,
        value: String::new(),
    }
}

impl Default for PatientFormState {
    fn default() -> Self {
        let mut fields = vec![
            field("Patient Name", "e.g. Jane Doe"),
            field("Patient ID", "e.g. P-1024"),
            field("Date of Visit", "YYYY-MM-DD"),
            field("Email Address", "patient@example.com"),
            field("Symptoms / Notes", "free text"),
            field("Attach Medical Records", "comma-separated paths (png, jpg, jpeg, pdf)"),
        ];
        fields[VISIT_DATE].value = today();
        Self {
            fields,
            selected_field: 0,
            message: None,
        }
    }
}

impl PatientFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        if !c.is_control() {
            self.fields[self.selected_field].value.push(c);
            self.message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.zeroize();
    }

    /// Wipe every input buffer and reset the visit date to today.
    pub fn clear_all(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.fields[VISIT_DATE].value = today();
        self.selected_field = 0;
        self.message = None;
    }

    /// Snapshot of the typed values
    #[must_use]
    pub fn to_intake(&self) -> PatientIntake {
        let value = |i: usize| self.fields[i].value.clone();
        PatientIntake {
            name: value(NAME),
            id: value(ID),
            visit_date: value(VISIT_DATE),
            email: value(EMAIL),
            symptoms: value(SYMPTOMS),
            attachments: value(ATTACHMENTS),
        }
    }

    /// Load sample data for demos
    pub fn load_sample_data(&mut self) {
        let sample = [
            "Jane Doe",
            "P-1024",
            "2025-03-14",
            "jane.doe@example.com",
            "Pain and swelling in the left wrist after a fall",
            "scans/wrist_ap.png, reports/referral.pdf",
        ];
        for (field, val) in self.fields.iter_mut().zip(sample) {
            field.value = val.to_string();
        }
        self.message = None;
    }
}

/// Render the intake form and the records panel
pub fn render_patient_info(f: &mut Frame, area: Rect, state: &PatientFormState, records: &[PatientRecord]) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Form
            Constraint::Length(2), // Message
            Constraint::Length(2), // Keys
        ])
        .split(columns[0]);

    render_form_fields(f, left[0], state);
    render_form_message(f, left[1], state);
    render_key_hints(
        f,
        left[2],
        &[
            ("↑↓", "Navigate"),
            ("Enter", "Save Patient Info"),
            ("Ctrl+L", "Clear Fields"),
            ("Ctrl+S", "Sample"),
        ],
    );
    render_records(f, columns[1], records);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let block = Block::default()
        .title(Span::styled(" Patient Information ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints: Vec<Constraint> = state
        .fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in state.fields.iter().enumerate() {
        let required = matches!(i, NAME | ID | EMAIL);
        let label = if required {
            format!("{} *", field.label)
        } else {
            field.label.to_string()
        };
        render_input(f, chunks[i], &label, &field.value, field.hint, i == state.selected_field);
    }
}

fn render_form_message(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let line = match &state.message {
        Some(FormMessage::Saved(msg)) => Line::from(Span::styled(format!(" {msg}"), MedicalTheme::success())),
        Some(FormMessage::Error(msg)) => Line::from(vec![
            Span::styled(" ! ", MedicalTheme::danger()),
            Span::styled(msg.clone(), MedicalTheme::danger()),
        ]),
        None => Line::from(Span::styled(" * required", MedicalTheme::text_muted())),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_records(f: &mut Frame, area: Rect, records: &[PatientRecord]) {
    let block = Block::default()
        .title(Span::styled(" Existing Patient Records ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    if records.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No records saved in this session.",
            MedicalTheme::text_muted(),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("Record {}: {}", i + 1, r.heading()),
                    MedicalTheme::focused(),
                )),
                Line::from(vec![
                    Span::styled("  Visit Date: ", MedicalTheme::text_secondary()),
                    Span::styled(r.visit_date.format(VISIT_DATE_FORMAT).to_string(), MedicalTheme::text()),
                ]),
                Line::from(vec![
                    Span::styled("  Email: ", MedicalTheme::text_secondary()),
                    Span::styled(r.email.clone(), MedicalTheme::text()),
                ]),
                Line::from(vec![
                    Span::styled("  Symptoms: ", MedicalTheme::text_secondary()),
                    Span::styled(r.symptoms.clone(), MedicalTheme::text()),
                ]),
            ];
            if !r.attached_file_names.is_empty() {
                lines.push(Line::from(Span::styled("  Attached Files:", MedicalTheme::text_secondary())));
                lines.extend(
                    r.attached_file_names
                        .iter()
                        .map(|name| Line::from(Span::styled(format!("   - {name}"), MedicalTheme::text()))),
                );
            }
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_today() {
        let state = PatientFormState::default();
        assert_eq!(state.to_intake().visit_date, today());
    }

    #[test]
    fn test_clear_all_resets_inputs() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        state.selected_field = 3;
        state.clear_all();

        let intake = state.to_intake();
        assert!(intake.name.is_empty() && intake.email.is_empty() && intake.attachments.is_empty());
        assert_eq!(intake.visit_date, today());
        assert_eq!(state.selected_field, 0);
    }

    #[test]
    fn test_sample_data_is_valid() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        let record = state.to_intake().to_record().expect("sample should validate");
        assert_eq!(record.attached_file_names, ["wrist_ap.png", "referral.pdf"]);
    }
}
