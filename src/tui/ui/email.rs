//! Email composer: recipient, subject, message, attachment and preview.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::{EmailPreview, PatientRecord, DEFAULT_BODY, DEFAULT_SUBJECT};
use crate::tui::styles::MedicalTheme;

use super::{render_input, render_key_hints};

/// Focusable controls on the email tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailField {
    Recipient,
    Subject,
    Body,
    Attachment,
}

impl EmailField {
    const ORDER: [Self; 4] = [Self::Recipient, Self::Subject, Self::Body, Self::Attachment];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Send status shown under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStatus {
    Idle,
    Sending,
    Sent(String),
    Failed(String),
}

/// Email tab state
pub struct EmailState {
    pub selected_record: usize,
    pub subject: String,
    pub body: String,
    pub attachment: String,
    pub focus: EmailField,
    pub status: SendStatus,
    pub tick: usize,
}

impl Default for EmailState {
    fn default() -> Self {
        Self {
            selected_record: 0,
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
            attachment: String::new(),
            focus: EmailField::Recipient,
            status: SendStatus::Idle,
            tick: 0,
        }
    }
}

impl EmailState {
    /// Text buffer behind the focused control, if it is a text input
    pub fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            EmailField::Recipient => None,
            EmailField::Subject => Some(&mut self.subject),
            EmailField::Body => Some(&mut self.body),
            EmailField::Attachment => Some(&mut self.attachment),
        }
    }

    pub fn step_recipient(&mut self, count: usize, forward: bool) {
        self.selected_record = crate::domain::settings::cycle(self.selected_record, count, forward);
    }
}

/// Render the email tab
pub fn render_email(
    f: &mut Frame,
    area: Rect,
    state: &EmailState,
    records: &[PatientRecord],
    preview: Option<(&EmailPreview, Option<&str>)>,
) {
    if records.is_empty() {
        let p = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Please add a patient record in the Patient Info tab first!",
                MedicalTheme::warning(),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(Span::styled(" Email Results ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::warning()),
        );
        f.render_widget(p, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(2)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_form(f, columns[0], state, records);
    render_preview(f, columns[1], preview);
    render_status(f, rows[1], state);
    render_key_hints(
        f,
        rows[2],
        &[("Tab", "Next field"), ("←→", "Recipient"), ("Ctrl+S", "Send Results")],
    );
}

fn render_form(f: &mut Frame, area: Rect, state: &EmailState, records: &[PatientRecord]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let recipient = records
        .get(state.selected_record)
        .map(PatientRecord::recipient_label)
        .unwrap_or_default();
    render_input(
        f,
        chunks[0],
        "Select Patient Record",
        &format!("◀ {recipient} ▶"),
        "",
        state.focus == EmailField::Recipient,
    );
    render_input(
        f,
        chunks[1],
        "Email Subject",
        &state.subject,
        "subject",
        state.focus == EmailField::Subject,
    );

    let body_focused = state.focus == EmailField::Body;
    let (border, title) = if body_focused {
        (MedicalTheme::border_focused(), MedicalTheme::focused())
    } else {
        (MedicalTheme::border(), MedicalTheme::text_secondary())
    };
    let mut body: Vec<Line> = state
        .body
        .split('\n')
        .map(|l| Line::from(Span::styled(l.to_string(), MedicalTheme::text())))
        .collect();
    if body_focused {
        if let Some(last) = body.last_mut() {
            last.push_span(Span::styled("▌", MedicalTheme::cursor()));
        }
    }
    f.render_widget(
        Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(Span::styled(" Email Message ", title))
                .borders(Borders::ALL)
                .border_style(border),
        ),
        chunks[2],
    );

    render_input(
        f,
        chunks[3],
        "Attach Additional File (Optional)",
        &state.attachment,
        "path to pdf/png/jpg",
        state.focus == EmailField::Attachment,
    );
}

fn render_preview(f: &mut Frame, area: Rect, preview: Option<(&EmailPreview, Option<&str>)>) {
    let block = Block::default()
        .title(Span::styled(" Email Preview ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let Some((preview, attachment_error)) = preview else {
        f.render_widget(block, area);
        return;
    };

    let field = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name}: "), MedicalTheme::text_secondary()),
            Span::styled(value, MedicalTheme::text()),
        ])
    };
    let mut lines = vec![
        field("To", preview.to.clone()),
        field("Subject", preview.subject.clone()),
        Line::from(Span::styled("Message:", MedicalTheme::text_secondary())),
    ];
    lines.extend(
        preview
            .body
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), MedicalTheme::text()))),
    );
    if let Some(name) = &preview.attachment_name {
        lines.push(Line::from(""));
        lines.push(field("Attachment", name.clone()));
    }
    if let Some(error) = attachment_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("! {error}"), MedicalTheme::danger())));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

fn render_status(f: &mut Frame, area: Rect, state: &EmailState) {
    const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
    let line = match &state.status {
        SendStatus::Idle => Line::from(""),
        SendStatus::Sending => Line::from(vec![
            Span::styled(format!(" {} ", SPINNER[state.tick % SPINNER.len()]), MedicalTheme::info()),
            Span::styled("Sending email...", MedicalTheme::text_secondary()),
        ]),
        SendStatus::Sent(msg) => Line::from(Span::styled(format!(" {msg}"), MedicalTheme::success())),
        SendStatus::Failed(msg) => Line::from(Span::styled(format!(" ! {msg}"), MedicalTheme::danger())),
    };
    f.render_widget(Paragraph::new(line), area);
}
