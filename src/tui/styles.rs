//! Clinical color palette and styles.
//!
//! Dark terminal palette. The Light/Dark theme setting only changes the
//! header banner; the rest of the UI keeps these colors.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{FractureLabel, Theme};

/// Clinical theme color palette.
pub struct MedicalTheme;

impl MedicalTheme {
    // === Primary Colors ===

    /// Deep teal
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Darker teal for the dark banner
    pub const PRIMARY_DARK: Color = Color::Rgb(15, 118, 110); // #0F766E

    // === Secondary Colors ===

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    /// Emerald, no fracture
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    /// Amber
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24

    /// Rose, fracture detected
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    /// Blue
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    // === Background Colors ===

    /// Near-black with blue tint
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    /// Light banner background
    pub const BG_LIGHT: Color = Color::Rgb(226, 232, 240); // #E2E8F0

    // === Text Colors ===

    /// Primary text
    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Muted text
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Preset Styles ===

    /// Style for panel titles
    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for section headings
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for normal text
    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    /// Style for field labels and secondary text
    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for hints and disabled rows
    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    /// Style for confirmations
    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Style for warnings
    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    /// Style for errors
    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for informational notes
    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for selected items
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for borders
    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    /// Style for the focused input border
    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Header banner for the selected theme
    #[must_use]
    pub fn header(theme: Theme) -> Style {
        let style = match theme {
            Theme::Dark => Style::default().fg(Self::TEXT_PRIMARY).bg(Self::PRIMARY_DARK),
            Theme::Light => Style::default().fg(Self::BG_DARK).bg(Self::BG_LIGHT),
        };
        style.add_modifier(Modifier::BOLD)
    }

    /// Style for key hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key descriptions
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Text cursor at the end of an input
    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    /// Style for a prediction label
    #[must_use]
    pub fn label(label: FractureLabel) -> Style {
        match label {
            FractureLabel::FractureDetected => Self::danger(),
            FractureLabel::NoFracture => Self::success(),
        }
        .add_modifier(Modifier::BOLD)
    }

    /// Gauge style based on how confident the label is
    #[must_use]
    pub fn gauge(fraction: f64) -> Style {
        if fraction >= 0.8 {
            Self::info()
        } else if fraction >= 0.6 {
            Self::warning()
        } else {
            Self::text_muted()
        }
    }
}
