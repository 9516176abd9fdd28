//! Model performance view: headline cards and the synthetic evaluation.

use std::path::Path;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph,
        Row, Table,
    },
    Frame,
};

use crate::domain::{DetectionMode, HeadlineMetric, SyntheticEvaluation};
use crate::tui::styles::MedicalTheme;

use super::render_key_hints;

/// Reporting tab state
#[derive(Default)]
pub struct ReportState {
    pub evaluation: Option<SyntheticEvaluation>,
    pub message: Option<Result<String, String>>,
}

/// Render the reporting tab
pub fn render_reporting(
    f: &mut Frame,
    area: Rect,
    state: &ReportState,
    headline: &[HeadlineMetric],
    mode: DetectionMode,
    export_path: &Path,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Headline cards
            Constraint::Min(0),    // Advanced analysis
            Constraint::Length(1), // Message
            Constraint::Length(2), // Keys
        ])
        .split(area);

    render_headline(f, chunks[0], headline);

    match (mode, &state.evaluation) {
        (DetectionMode::Advanced, Some(evaluation)) => render_advanced(f, chunks[1], evaluation),
        (DetectionMode::Advanced, None) => {
            f.render_widget(
                Paragraph::new(Span::styled("Generating evaluation...", MedicalTheme::text_muted()))
                    .alignment(Alignment::Center),
                chunks[1],
            );
        }
        (DetectionMode::Basic, _) => {
            let p = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Advanced analysis is available in Advanced detection mode.",
                    MedicalTheme::text_secondary(),
                )),
                Line::from(Span::styled("Switch modes in Settings [F5].", MedicalTheme::text_muted())),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(MedicalTheme::border()),
            );
            f.render_widget(p, chunks[1]);
        }
    }

    if let Some(message) = &state.message {
        let line = match message {
            Ok(msg) => Span::styled(format!(" {msg}"), MedicalTheme::success()),
            Err(msg) => Span::styled(format!(" ! {msg}"), MedicalTheme::danger()),
        };
        f.render_widget(Paragraph::new(line), chunks[2]);
    }

    if mode == DetectionMode::Advanced {
        let export = format!("Download as CSV ({})", export_path.display());
        render_key_hints(f, chunks[3], &[("E", export.as_str()), ("R", "Regenerate")]);
    }
}

fn render_headline(f: &mut Frame, area: Rect, headline: &[HeadlineMetric]) {
    let constraints: Vec<Constraint> = headline
        .iter()
        .map(|_| Constraint::Ratio(1, headline.len() as u32))
        .collect();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (metric, card) in headline.iter().zip(cards.iter()) {
        let p = Paragraph::new(vec![
            Line::from(Span::styled(metric.name, MedicalTheme::text_secondary())),
            Line::from(Span::styled(metric.display, MedicalTheme::title())),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );
        f.render_widget(p, *card);
    }
}

fn render_advanced(f: &mut Frame, area: Rect, evaluation: &SyntheticEvaluation) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_histogram(f, top[0], evaluation);
    render_roc(f, top[1], evaluation);
    render_confusion(f, rows[1], evaluation);
}

fn render_histogram(f: &mut Frame, area: Rect, evaluation: &SyntheticEvaluation) {
    let histogram = &evaluation.histogram;
    let bars: Vec<Bar> = histogram
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            Bar::default()
                .value(count as u64)
                .label(Line::from(format!("{:.1}", histogram.edges[i])))
                .style(Style::default().fg(MedicalTheme::PRIMARY))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let bins = histogram.counts.len().max(1) as u16;
    let bar_width = (inner_width / bins).saturating_sub(1).max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Distribution of Fracture Probability ",
                    MedicalTheme::subtitle(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .value_style(MedicalTheme::selected());
    f.render_widget(chart, area);
}

fn render_roc(f: &mut Frame, area: Rect, evaluation: &SyntheticEvaluation) {
    let curve = evaluation.roc.points();
    let diagonal = [(0.0, 0.0), (1.0, 1.0)];

    let datasets = vec![
        Dataset::default()
            .name("ROC Curve")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(MedicalTheme::PRIMARY_LIGHT))
            .data(&curve),
        Dataset::default()
            .name("Random Classifier")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(MedicalTheme::TEXT_MUTED))
            .data(&diagonal),
    ];

    let axis_labels = || vec![Span::raw("0"), Span::raw("0.5"), Span::raw("1")];
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" ROC Curve (AUC = {:.2}) ", evaluation.auc),
                    MedicalTheme::subtitle(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled("False Positive Rate", MedicalTheme::text_muted()))
                .style(MedicalTheme::text_secondary())
                .bounds([0.0, 1.0])
                .labels(axis_labels()),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("True Positive Rate", MedicalTheme::text_muted()))
                .style(MedicalTheme::text_secondary())
                .bounds([0.0, 1.0])
                .labels(axis_labels()),
        );
    f.render_widget(chart, area);
}

fn render_confusion(f: &mut Frame, area: Rect, evaluation: &SyntheticEvaluation) {
    let matrix = evaluation.confusion.rows();
    let max = matrix.iter().flatten().copied().max().unwrap_or(1).max(1);

    // Darker blue for larger counts.
    let shade = |count: usize| {
        let t = count as f64 / max as f64;
        let level = (230.0 - 170.0 * t) as u8;
        Style::default()
            .bg(Color::Rgb(level / 3, level / 2, 200))
            .fg(MedicalTheme::TEXT_PRIMARY)
    };

    let labels = ["No Fracture", "Fracture"];
    let rows: Vec<Row> = matrix
        .iter()
        .zip(labels)
        .map(|(counts, actual)| {
            Row::new(vec![
                Cell::from(Span::styled(actual, MedicalTheme::text_secondary())),
                Cell::from(format!("{:^9}", counts[0])).style(shade(counts[0])),
                Cell::from(format!("{:^9}", counts[1])).style(shade(counts[1])),
            ])
            .height(2)
        })
        .collect();

    let header = Row::new(vec![
        Cell::from(Span::styled("Actual \\ Predicted", MedicalTheme::text_muted())),
        Cell::from(Span::styled(labels[0], MedicalTheme::text_secondary())),
        Cell::from(Span::styled(labels[1], MedicalTheme::text_secondary())),
    ]);

    let table = Table::new(
        rows,
        [Constraint::Length(20), Constraint::Length(13), Constraint::Length(13)],
    )
    .header(header)
    .column_spacing(1)
    .block(
        Block::default()
            .title(Span::styled(" Confusion Matrix ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(table, area);
}
