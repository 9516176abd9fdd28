//! Dashboard preferences.
//!
//! Apart from the detection mode (which gates the advanced reporting view),
//! every setting here only changes informational text.

/// Colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "Light"),
            Self::Dark => write!(f, "Dark"),
        }
    }
}

/// Detection mode. Advanced unlocks the synthetic evaluation charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    Basic,
    #[default]
    Advanced,
}

impl DetectionMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Basic => Self::Advanced,
            Self::Advanced => Self::Basic,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Basic => "Simple scan",
            Self::Advanced => "Deep analysis",
        }
    }
}

impl std::fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "Basic"),
            Self::Advanced => write!(f, "Advanced"),
        }
    }
}

pub const LOG_LEVELS: [&str; 4] = ["DEBUG", "INFO", "WARNING", "ERROR"];

pub const EXPORT_FORMATS: [&str; 3] = ["CSV", "JSON", "Excel"];

/// Palette offered by the colour selectors.
pub const COLOR_PRESETS: [&str; 8] = [
    "#ffffff", "#000000", "#f8fafc", "#1e1e1e", "#0d9488", "#3b82f6", "#fbbf24", "#f43f5e",
];

pub const MIN_NOTIFY_MINUTES: u32 = 5;
pub const MAX_NOTIFY_MINUTES: u32 = 60;
pub const NOTIFY_STEP_MINUTES: u32 = 5;

/// All dashboard preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub theme: Theme,
    pub mode: DetectionMode,
    pub detailed_logging: bool,
    /// Index into `LOG_LEVELS`
    pub log_level: usize,
    pub email_notifications: bool,
    pub notify_interval_minutes: u32,
    /// Index into `COLOR_PRESETS`
    pub background_color: usize,
    /// Index into `COLOR_PRESETS`
    pub text_color: usize,
    /// Index into `EXPORT_FORMATS`
    pub export_format: usize,
    pub otp_required: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            mode: DetectionMode::Advanced,
            detailed_logging: false,
            log_level: 1,
            email_notifications: false,
            notify_interval_minutes: 15,
            background_color: 0,
            text_color: 1,
            export_format: 0,
            otp_required: false,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn log_level_name(&self) -> &'static str {
        LOG_LEVELS[self.log_level % LOG_LEVELS.len()]
    }

    #[must_use]
    pub fn export_format_name(&self) -> &'static str {
        EXPORT_FORMATS[self.export_format % EXPORT_FORMATS.len()]
    }

    #[must_use]
    pub fn background_hex(&self) -> &'static str {
        COLOR_PRESETS[self.background_color % COLOR_PRESETS.len()]
    }

    #[must_use]
    pub fn text_hex(&self) -> &'static str {
        COLOR_PRESETS[self.text_color % COLOR_PRESETS.len()]
    }

    /// Step the notification interval, staying within 5..=60 minutes.
    pub fn step_notify_interval(&mut self, up: bool) {
        self.notify_interval_minutes = if up {
            (self.notify_interval_minutes + NOTIFY_STEP_MINUTES).min(MAX_NOTIFY_MINUTES)
        } else {
            self.notify_interval_minutes
                .saturating_sub(NOTIFY_STEP_MINUTES)
                .max(MIN_NOTIFY_MINUTES)
        };
    }

    #[must_use]
    pub fn logging_info(&self) -> String {
        if self.detailed_logging {
            format!("Detailed logging is enabled at the {} level.", self.log_level_name())
        } else {
            "Detailed logging is disabled.".to_string()
        }
    }

    #[must_use]
    pub fn notification_info(&self) -> String {
        if self.email_notifications {
            format!(
                "Email notifications will be sent every {} minutes.",
                self.notify_interval_minutes
            )
        } else {
            "Email notifications are disabled.".to_string()
        }
    }

    #[must_use]
    pub fn security_info(&self) -> &'static str {
        if self.otp_required {
            "OTP verification will be required for sending emails, exporting data, and clearing logs."
        } else {
            "OTP verification is disabled. Proceed with caution when performing sensitive actions."
        }
    }

    #[must_use]
    pub fn download_logs_message(&self) -> String {
        format!(
            "Logs are being downloaded in {} format (simulated).",
            self.export_format_name()
        )
    }
}

/// Step an index through a list of `len` options, wrapping around.
#[must_use]
pub fn cycle(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard() {
        let s = Settings::default();
        assert_eq!(s.theme, Theme::Light);
        assert_eq!(s.mode, DetectionMode::Advanced);
        assert_eq!(s.log_level_name(), "INFO");
        assert_eq!(s.notify_interval_minutes, 15);
        assert_eq!(s.background_hex(), "#ffffff");
        assert_eq!(s.text_hex(), "#000000");
        assert_eq!(s.export_format_name(), "CSV");
    }

    #[test]
    fn test_interval_bounds() {
        let mut s = Settings::default();
        for _ in 0..20 {
            s.step_notify_interval(true);
        }
        assert_eq!(s.notify_interval_minutes, 60);
        for _ in 0..20 {
            s.step_notify_interval(false);
        }
        assert_eq!(s.notify_interval_minutes, 5);
    }

    #[test]
    fn test_info_text() {
        let mut s = Settings::default();
        assert_eq!(s.logging_info(), "Detailed logging is disabled.");
        s.detailed_logging = true;
        s.log_level = 3;
        assert_eq!(s.logging_info(), "Detailed logging is enabled at the ERROR level.");
        s.email_notifications = true;
        assert_eq!(
            s.notification_info(),
            "Email notifications will be sent every 15 minutes."
        );
        s.export_format = 2;
        assert_eq!(
            s.download_logs_message(),
            "Logs are being downloaded in Excel format (simulated)."
        );
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(cycle(3, 4, true), 0);
        assert_eq!(cycle(0, 4, false), 3);
        assert_eq!(cycle(0, 0, true), 0);
    }
}
