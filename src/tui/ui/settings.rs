//! Settings panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::domain::settings::{cycle, COLOR_PRESETS, EXPORT_FORMATS, LOG_LEVELS};
use crate::domain::Settings;
use crate::tui::styles::MedicalTheme;

use super::render_key_hints;

/// One row of the settings list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingItem {
    Theme,
    DetectionMode,
    DetailedLogging,
    LogLevel,
    EmailNotifications,
    NotifyInterval,
    BackgroundColor,
    TextColor,
    ExportFormat,
    DownloadLogs,
    OtpVerification,
}

impl SettingItem {
    pub const ALL: [Self; 11] = [
        Self::Theme,
        Self::DetectionMode,
        Self::DetailedLogging,
        Self::LogLevel,
        Self::EmailNotifications,
        Self::NotifyInterval,
        Self::BackgroundColor,
        Self::TextColor,
        Self::ExportFormat,
        Self::DownloadLogs,
        Self::OtpVerification,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Theme => "Theme",
            Self::DetectionMode => "Detection Mode",
            Self::DetailedLogging => "Enable Detailed Logging",
            Self::LogLevel => "Logging Level",
            Self::EmailNotifications => "Enable Email Notifications",
            Self::NotifyInterval => "Notification Frequency",
            Self::BackgroundColor => "Custom Background Color",
            Self::TextColor => "Custom Text Color",
            Self::ExportFormat => "Data Export Format",
            Self::DownloadLogs => "Download Logs",
            Self::OtpVerification => "OTP Verification for Sensitive Actions",
        }
    }

    fn value(self, s: &Settings) -> String {
        let check = |on: bool| (if on { "[x]" } else { "[ ]" }).to_string();
        match self {
            Self::Theme => s.theme.to_string(),
            Self::DetectionMode => s.mode.to_string(),
            Self::DetailedLogging => check(s.detailed_logging),
            Self::LogLevel => s.log_level_name().to_string(),
            Self::EmailNotifications => check(s.email_notifications),
            Self::NotifyInterval => format!("{} min", s.notify_interval_minutes),
            Self::BackgroundColor => s.background_hex().to_string(),
            Self::TextColor => s.text_hex().to_string(),
            Self::ExportFormat => s.export_format_name().to_string(),
            Self::DownloadLogs => "[Enter]".to_string(),
            Self::OtpVerification => check(s.otp_required),
        }
    }

    /// Whether the row applies given the current toggles
    fn enabled(self, s: &Settings) -> bool {
        match self {
            Self::LogLevel => s.detailed_logging,
            Self::NotifyInterval => s.email_notifications,
            _ => true,
        }
    }
}

/// Settings tab state
#[derive(Default)]
pub struct SettingsState {
    pub selected: usize,
    pub message: Option<String>,
}

impl SettingsState {
    #[must_use]
    pub fn item(&self) -> SettingItem {
        SettingItem::ALL[self.selected % SettingItem::ALL.len()]
    }

    pub fn move_selection(&mut self, forward: bool) {
        self.selected = cycle(self.selected, SettingItem::ALL.len(), forward);
    }

    /// Apply Enter/Space/←/→ to the selected row.
    pub fn adjust(&mut self, settings: &mut Settings, forward: bool) {
        self.message = None;
        match self.item() {
            SettingItem::Theme => settings.theme = settings.theme.toggled(),
            SettingItem::DetectionMode => settings.mode = settings.mode.toggled(),
            SettingItem::DetailedLogging => settings.detailed_logging = !settings.detailed_logging,
            SettingItem::LogLevel => {
                settings.log_level = cycle(settings.log_level, LOG_LEVELS.len(), forward);
            }
            SettingItem::EmailNotifications => {
                settings.email_notifications = !settings.email_notifications;
            }
            SettingItem::NotifyInterval => settings.step_notify_interval(forward),
            SettingItem::BackgroundColor => {
                settings.background_color = cycle(settings.background_color, COLOR_PRESETS.len(), forward);
            }
            SettingItem::TextColor => {
                settings.text_color = cycle(settings.text_color, COLOR_PRESETS.len(), forward);
            }
            SettingItem::ExportFormat => {
                settings.export_format = cycle(settings.export_format, EXPORT_FORMATS.len(), forward);
            }
            SettingItem::DownloadLogs => {
                tracing::info!(format = settings.export_format_name(), "Log download requested");
                self.message = Some(settings.download_logs_message());
            }
            SettingItem::OtpVerification => settings.otp_required = !settings.otp_required,
        }
    }
}

fn swatch(hex: &str) -> Color {
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2).unwrap_or("00"), 16).unwrap_or(0);
    Color::Rgb(channel(1), channel(3), channel(5))
}

/// Render the settings tab
pub fn render_settings(f: &mut Frame, area: Rect, state: &SettingsState, settings: &Settings) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    let items: Vec<ListItem> = SettingItem::ALL
        .iter()
        .map(|item| {
            let style = if item.enabled(settings) {
                MedicalTheme::text()
            } else {
                MedicalTheme::text_muted()
            };
            let mut spans = vec![
                Span::styled(format!("{:<40}", item.label()), style),
                Span::styled(item.value(settings), MedicalTheme::focused()),
            ];
            if matches!(item, SettingItem::BackgroundColor | SettingItem::TextColor) {
                let hex = item.value(settings);
                spans.push(Span::raw(" "));
                spans.push(Span::styled("  ", ratatui::style::Style::default().bg(swatch(&hex))));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(
                    " Advanced Settings & Configurations ",
                    MedicalTheme::subtitle(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .highlight_style(MedicalTheme::selected())
        .highlight_symbol("› ");
    let mut list_state = ListState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(list, columns[0], &mut list_state);

    let section = |title: &'static str| Line::from(Span::styled(title, MedicalTheme::subtitle()));
    let info = |text: String| Line::from(Span::styled(text, MedicalTheme::info()));
    let mut lines = vec![
        section("Logging & Alerts"),
        info(settings.logging_info()),
        Line::from(""),
        section("Notifications"),
        info(settings.notification_info()),
        Line::from(""),
        section("Dashboard Customization"),
        Line::from(Span::styled(
            "Note: these colors will be applied after restarting the app.",
            MedicalTheme::text_muted(),
        )),
        Line::from(""),
        section("Security"),
        info(settings.security_info().to_string()),
    ];
    if let Some(msg) = &state.message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(msg.clone(), MedicalTheme::success())));
    }

    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        ),
        columns[1],
    );

    render_key_hints(f, rows[1], &[("↑↓", "Select"), ("←→/Enter", "Change")]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DetectionMode, Theme};

    #[test]
    fn test_adjust_toggles_and_cycles() {
        let mut state = SettingsState::default();
        let mut settings = Settings::default();

        state.adjust(&mut settings, true);
        assert_eq!(settings.theme, Theme::Dark);

        state.move_selection(true);
        state.adjust(&mut settings, true);
        assert_eq!(settings.mode, DetectionMode::Basic);

        state.selected = 5;
        for _ in 0..20 {
            state.adjust(&mut settings, true);
        }
        assert_eq!(settings.notify_interval_minutes, 60);
    }

    #[test]
    fn test_download_logs_is_simulated() {
        let mut state = SettingsState {
            selected: 9,
            message: None,
        };
        let mut settings = Settings::default();
        state.adjust(&mut settings, true);
        assert_eq!(
            state.message.as_deref(),
            Some("Logs are being downloaded in CSV format (simulated).")
        );
    }

    #[test]
    fn test_swatch_parses_hex() {
        assert_eq!(swatch("#0d9488"), Color::Rgb(13, 148, 136));
    }
}
