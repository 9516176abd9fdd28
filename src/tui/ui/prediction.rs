//! X-ray upload, per-image view controls and prediction results.

use std::sync::Arc;

use image::RgbImage;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::application::analysis::{DEFAULT_OPACITY, DEFAULT_ZOOM};
use crate::application::{Heatmap, ViewOptions};
use crate::domain::PredictionResult;
use crate::tui::styles::MedicalTheme;

use super::pixels::PixelView;
use super::{render_input, render_key_hints};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Where keyboard input goes on the prediction tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionFocus {
    Paths,
    GlobalZoom,
    GlobalOpacity,
    Image,
}

impl PredictionFocus {
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Paths => Self::GlobalZoom,
            Self::GlobalZoom => Self::GlobalOpacity,
            Self::GlobalOpacity => Self::Image,
            Self::Image => Self::Paths,
        }
    }
}

/// Scoring status of one uploaded image
#[derive(Debug, Clone, PartialEq)]
pub enum CardStatus {
    Queued,
    Analyzing,
    Done(PredictionResult),
    Failed(String),
}

/// One uploaded image with its own view settings.
pub struct ImageCard {
    /// 1-based upload index
    pub index: usize,
    pub name: String,
    pub original: Arc<RgbImage>,
    /// Drawn once at upload
    pub heatmap: Heatmap,
    /// `None` follows the global zoom
    pub zoom: Option<f64>,
    /// `None` follows the global default opacity
    pub opacity: Option<f64>,
    pub show_heatmap: bool,
    /// Cached render for the current view options
    pub display: RgbImage,
    pub status: CardStatus,
}

impl ImageCard {
    #[must_use]
    pub fn view(&self, global_zoom: f64, global_opacity: f64) -> ViewOptions {
        ViewOptions {
            zoom: self.zoom.unwrap_or(global_zoom),
            show_heatmap: self.show_heatmap,
            opacity: self.opacity.unwrap_or(global_opacity),
        }
    }
}

/// Prediction tab state
pub struct PredictionState {
    pub paths: String,
    pub focus: PredictionFocus,
    pub global_zoom: f64,
    pub global_opacity: f64,
    pub cards: Vec<ImageCard>,
    pub selected: usize,
    pub message: Option<String>,
    pub tick: usize,
}

impl Default for PredictionState {
    fn default() -> Self {
        Self {
            paths: String::new(),
            focus: PredictionFocus::Paths,
            global_zoom: DEFAULT_ZOOM,
            global_opacity: DEFAULT_OPACITY,
            cards: Vec::new(),
            selected: 0,
            message: None,
            tick: 0,
        }
    }
}

impl PredictionState {
    #[must_use]
    pub fn selected_card(&self) -> Option<&ImageCard> {
        self.cards.get(self.selected)
    }

    pub fn card_mut(&mut self, index: usize) -> Option<&mut ImageCard> {
        self.cards.iter_mut().find(|c| c.index == index)
    }

    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.cards
            .iter()
            .any(|c| matches!(c.status, CardStatus::Queued | CardStatus::Analyzing))
    }
}

/// Render the prediction tab
pub fn render_prediction(f: &mut Frame, area: Rect, state: &PredictionState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Upload paths
            Constraint::Length(3), // Global controls
            Constraint::Length(1), // Message
            Constraint::Min(0),    // Images
            Constraint::Length(2), // Keys
        ])
        .split(area);

    render_input(
        f,
        chunks[0],
        "Upload Image(s)",
        &state.paths,
        "comma-separated paths to png/jpg/jpeg X-rays, then Enter",
        state.focus == PredictionFocus::Paths,
    );
    render_global_controls(f, chunks[1], state);

    if let Some(msg) = &state.message {
        f.render_widget(
            Paragraph::new(Span::styled(format!(" {msg}"), MedicalTheme::warning())),
            chunks[2],
        );
    }

    if state.cards.is_empty() {
        let idle = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Upload X-ray images for prediction",
                MedicalTheme::text_secondary(),
            )),
            Line::from(Span::styled(
                "Each image can be zoomed and overlaid with a heatmap.",
                MedicalTheme::text_muted(),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );
        f.render_widget(idle, chunks[3]);
    } else {
        render_cards(f, chunks[3], state);
    }

    render_key_hints(
        f,
        chunks[4],
        &[
            ("Tab", "Focus"),
            ("←→", "Zoom"),
            ("H", "Heatmap"),
            ("[ ]", "Opacity"),
            ("↑↓", "Image"),
            ("Backspace", "Reset to global"),
        ],
    );
}

fn render_global_controls(f: &mut Frame, area: Rect, state: &PredictionState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_slider(
        f,
        columns[0],
        "Global Zoom Factor",
        format!("{:.1}x", state.global_zoom),
        state.focus == PredictionFocus::GlobalZoom,
    );
    render_slider(
        f,
        columns[1],
        "Default Heatmap Opacity",
        format!("{:.2}", state.global_opacity),
        state.focus == PredictionFocus::GlobalOpacity,
    );
}

fn render_slider(f: &mut Frame, area: Rect, label: &str, value: String, focused: bool) {
    let (border, title) = if focused {
        (MedicalTheme::border_focused(), MedicalTheme::focused())
    } else {
        (MedicalTheme::border(), MedicalTheme::text_secondary())
    };
    let p = Paragraph::new(Line::from(vec![
        Span::styled(" ◀ ", MedicalTheme::key_hint()),
        Span::styled(value, MedicalTheme::text()),
        Span::styled(" ▶", MedicalTheme::key_hint()),
    ]))
    .block(
        Block::default()
            .title(Span::styled(format!(" {label} "), title))
            .borders(Borders::ALL)
            .border_style(border),
    );
    f.render_widget(p, area);
}

fn render_cards(f: &mut Frame, area: Rect, state: &PredictionState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(0)])
        .split(area);

    let spinner = SPINNER[state.tick % SPINNER.len()];
    let items: Vec<ListItem> = state
        .cards
        .iter()
        .map(|card| {
            let status = match &card.status {
                CardStatus::Queued => Span::styled("queued", MedicalTheme::text_muted()),
                CardStatus::Analyzing => Span::styled(spinner, MedicalTheme::info()),
                CardStatus::Done(r) => Span::styled(r.delta(), MedicalTheme::label(r.label)),
                CardStatus::Failed(_) => Span::styled("error", MedicalTheme::danger()),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}. {} ", card.index, card.name), MedicalTheme::text()),
                status,
            ]))
        })
        .collect();

    let list_border = if state.focus == PredictionFocus::Image {
        MedicalTheme::border_focused()
    } else {
        MedicalTheme::border()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(" Images ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(list_border),
        )
        .highlight_style(MedicalTheme::selected());
    let mut list_state = ListState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(list, columns[0], &mut list_state);

    if let Some(card) = state.selected_card() {
        render_card(f, columns[1], card, state, spinner);
    }
}

fn render_card(f: &mut Frame, area: Rect, card: &ImageCard, state: &PredictionState, spinner: &str) {
    let view = card.view(state.global_zoom, state.global_opacity);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(5)])
        .split(area);

    let block = Block::default()
        .title(Span::styled(
            format!(" Img {}: {} ", card.index, card.name),
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(inner);

    let pixels = if view.show_heatmap {
        PixelView::new(&card.display)
    } else {
        PixelView::new(&card.display).reference(card.original.width(), card.original.height())
    };
    f.render_widget(pixels, split[0]);

    let follows = |custom: bool| if custom { "" } else { " (global)" };
    let mut controls = vec![
        Line::from(vec![
            Span::styled("Zoom: ", MedicalTheme::text_secondary()),
            Span::styled(format!("{:.1}x{}", view.zoom, follows(card.zoom.is_some())), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("Heatmap: ", MedicalTheme::text_secondary()),
            Span::styled(if view.show_heatmap { "on" } else { "off" }, MedicalTheme::text()),
        ]),
    ];
    if view.show_heatmap {
        controls.push(Line::from(vec![
            Span::styled("Opacity: ", MedicalTheme::text_secondary()),
            Span::styled(
                format!("{:.2}{}", view.opacity, follows(card.opacity.is_some())),
                MedicalTheme::text(),
            ),
        ]));
    }
    controls.push(Line::from(Span::styled(
        format!("{}x{} px", card.display.width(), card.display.height()),
        MedicalTheme::text_muted(),
    )));
    f.render_widget(
        Paragraph::new(controls)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::LEFT).border_style(MedicalTheme::border())),
        split[1],
    );

    render_result(f, chunks[1], &card.status, spinner);
}

fn render_result(f: &mut Frame, area: Rect, status: &CardStatus, spinner: &str) {
    let block = Block::default()
        .title(Span::styled(" Prediction ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    match status {
        CardStatus::Queued | CardStatus::Analyzing => {
            let p = Paragraph::new(Line::from(vec![
                Span::styled(format!("{spinner} "), MedicalTheme::info()),
                Span::styled("Analyzing image...", MedicalTheme::text_secondary()),
            ]))
            .alignment(Alignment::Center);
            f.render_widget(p, inner);
        }
        CardStatus::Failed(message) => {
            f.render_widget(
                Paragraph::new(Span::styled(format!("! {message}"), MedicalTheme::danger())),
                inner,
            );
        }
        CardStatus::Done(result) => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(35),
                    Constraint::Percentage(40),
                    Constraint::Percentage(25),
                ])
                .split(inner);

            let label = Paragraph::new(vec![
                Line::from(Span::styled(result.label.to_string(), MedicalTheme::label(result.label))),
                Line::from(Span::styled(format!("↑ {}", result.delta()), MedicalTheme::text_secondary())),
            ]);
            f.render_widget(label, columns[0]);

            let fraction = result.label_confidence();
            let gauge = Gauge::default()
                .gauge_style(MedicalTheme::gauge(fraction))
                .percent((fraction * 100.0) as u16)
                .label(result.delta());
            f.render_widget(gauge, Rect { height: inner.height.min(1), ..columns[1] });

            let raw = Paragraph::new(Span::styled(
                format!("Confidence Score: {:.4}", result.confidence_score),
                MedicalTheme::text_muted(),
            ))
            .wrap(Wrap { trim: true });
            f.render_widget(raw, columns[2]);
        }
    }
}
