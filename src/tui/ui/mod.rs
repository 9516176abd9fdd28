//! UI module: View components for the TUI.

pub mod email;
pub mod patient;
pub mod pixels;
pub mod prediction;
pub mod reporting;
pub mod settings;

use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::domain::{Settings, VISIT_DATE_FORMAT};
use crate::tui::styles::MedicalTheme;

/// Tab titles, in F-key order.
pub const TAB_TITLES: [&str; 5] = [
    "Patient Info",
    "Prediction",
    "Analysis & Stats",
    "Email Results",
    "Settings",
];

/// Banner plus tab bar.
pub fn render_header(f: &mut Frame, area: Rect, settings: &Settings, selected: usize) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let banner_area = Rect { height: inner.height.min(1), ..inner };
    let tabs_area = Rect {
        y: inner.y + banner_area.height,
        height: inner.height.saturating_sub(banner_area.height),
        ..inner
    };

    let banner = Paragraph::new(Line::from(vec![
        Span::raw(" Bone Fracture Detection System "),
        Span::raw("│ Advanced Dashboard for Diagnosis & Reporting "),
    ]))
    .style(MedicalTheme::header(settings.theme));
    f.render_widget(banner, banner_area);

    let titles: Vec<Line> = TAB_TITLES
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Line::from(vec![
                Span::styled(format!("F{} ", i + 1), MedicalTheme::key_hint()),
                Span::raw(*t),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(MedicalTheme::text_secondary())
        .highlight_style(MedicalTheme::selected())
        .divider(Span::styled("│", MedicalTheme::border()));
    f.render_widget(tabs, tabs_area);
}

/// Sidebar summary of the current theme, mode and date.
pub fn render_sidebar(f: &mut Frame, area: Rect, settings: &Settings) {
    let today = Local::now().date_naive().format(VISIT_DATE_FORMAT).to_string();
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Theme: ", MedicalTheme::text_secondary()),
            Span::styled(settings.theme.to_string(), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("Mode:  ", MedicalTheme::text_secondary()),
            Span::styled(settings.mode.to_string(), MedicalTheme::text()),
        ]),
        Line::from(Span::styled(
            format!("       {}", settings.mode.description()),
            MedicalTheme::text_muted(),
        )),
        Line::from(vec![
            Span::styled("Date:  ", MedicalTheme::text_secondary()),
            Span::styled(today, MedicalTheme::text()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("[F5] ", MedicalTheme::key_hint()),
            Span::styled("Change", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Ctrl+Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ];

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Current Settings ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(p, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "DISCLAIMER: Scores and heatmaps are simulated and carry no diagnostic meaning.",
            MedicalTheme::text_muted(),
        )),
        Line::from(Span::styled(
            "© 2025 Bone Fracture Detection Advanced Dashboard",
            MedicalTheme::text_muted(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// One-line key hint footer: pairs of `(key, description)`.
pub fn render_key_hints(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!("[{key}] "), MedicalTheme::key_hint()),
                Span::styled(format!("{desc} "), MedicalTheme::key_desc()),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(footer, area);
}

/// Bordered single-line text input.
pub fn render_input(f: &mut Frame, area: Rect, label: &str, value: &str, hint: &str, focused: bool) {
    let (border_style, title_style) = if focused {
        (MedicalTheme::border_focused(), MedicalTheme::focused())
    } else {
        (MedicalTheme::border(), MedicalTheme::text_secondary())
    };

    let block = Block::default()
        .title(Span::styled(format!(" {label} "), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let value_display = if value.is_empty() {
        Span::styled(hint.to_string(), MedicalTheme::text_muted())
    } else {
        Span::styled(value.to_string(), MedicalTheme::text())
    };

    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        value_display,
        if focused {
            Span::styled("▌", MedicalTheme::cursor())
        } else {
            Span::raw("")
        },
    ]))
    .block(block);

    f.render_widget(content, area);
}
