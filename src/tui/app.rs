//! Main TUI application state machine.
//!
//! Handles:
//! - Tab navigation (F1-F5)
//! - Per-control input dispatch
//! - Service integration
//! - Simulated delays via background workers

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{MemorySessionStore, RandomScorer, SimulatedTransport};
use crate::application::analysis::{load_image, step_opacity, step_zoom};
use crate::application::{
    sent_message, AnalysisPipeline, IntakeService, NotificationService, ReportingService,
    ViewOptions,
};
use crate::config::AppConfig;
use crate::domain::{
    file_name, DetectionMode, EmailDraft, EmailPreview, PatientRecord, Settings,
};
use crate::ports::{SessionId, SessionStore};
use crate::BonescopeError;

use super::ui::{
    email::{render_email, EmailField, EmailState, SendStatus},
    patient::{render_patient_info, FormMessage, PatientFormState},
    prediction::{render_prediction, CardStatus, ImageCard, PredictionFocus, PredictionState},
    render_disclaimer, render_header,
    reporting::{render_reporting, ReportState},
    render_sidebar,
    settings::{render_settings, SettingsState},
};
use super::worker::{AnalysisProgress, AnalysisWorker, SendProgress, SendWorker, WorkerHandle};

type Pipeline = AnalysisPipeline<RandomScorer, MemorySessionStore>;
type Notifier = NotificationService<MemorySessionStore, SimulatedTransport>;

const SAVED_MESSAGE: &str = "Patient info saved successfully!";

/// Current tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    PatientInfo,
    Prediction,
    Reporting,
    Email,
    Settings,
}

impl Screen {
    const ALL: [Self; 5] = [
        Self::PatientInfo,
        Self::Prediction,
        Self::Reporting,
        Self::Email,
        Self::Settings,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    fn from_function_key(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }
}

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,

    store: Arc<MemorySessionStore>,
    session: SessionId,

    intake: IntakeService<MemorySessionStore>,
    pipeline: Arc<Pipeline>,
    reporting: ReportingService<MemorySessionStore>,
    notifier: Arc<Notifier>,

    settings: Settings,

    /// Records of this session, refreshed after each save
    records: Vec<PatientRecord>,

    patient_state: PatientFormState,
    prediction_state: PredictionState,
    report_state: ReportState,
    email_state: EmailState,
    settings_state: SettingsState,

    analysis_worker: Option<WorkerHandle<AnalysisProgress>>,
    send_worker: Option<WorkerHandle<SendProgress>>,

    tick: usize,
}

impl App {
    /// Create a new application with in-memory adapters and a fresh session.
    ///
    /// For more control, use `with_dependencies()`.
    ///
    /// # Errors
    /// Returns error if the session cannot be created.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = Arc::new(MemorySessionStore::new());
        let session = store.create_session()?;

        let intake = IntakeService::new(Arc::clone(&store), session);
        let pipeline = Arc::new(AnalysisPipeline::new(
            Arc::new(RandomScorer::with_seed(config.seed)),
            Arc::clone(&store),
            session,
            config.analysis_delay,
            config.seed,
        ));
        let reporting = ReportingService::new(
            Arc::clone(&store),
            session,
            config.export_dir.clone(),
            config.seed,
        );
        let notifier = Arc::new(NotificationService::new(
            Arc::clone(&store),
            Arc::new(SimulatedTransport::new(config.send_delay)),
            session,
        ));

        Self::with_dependencies(store, session, intake, pipeline, reporting, notifier)
    }

    /// Create application with injected dependencies (Composition Root pattern).
    ///
    /// All services must be bound to `session` in `store`.
    ///
    /// # Errors
    /// Returns error if the session is unknown to the store.
    pub fn with_dependencies(
        store: Arc<MemorySessionStore>,
        session: SessionId,
        intake: IntakeService<MemorySessionStore>,
        pipeline: Arc<Pipeline>,
        reporting: ReportingService<MemorySessionStore>,
        notifier: Arc<Notifier>,
    ) -> Result<Self> {
        let records = store.patients(session)?;
        Ok(Self {
            screen: Screen::PatientInfo,
            should_quit: false,
            store,
            session,
            intake,
            pipeline,
            reporting,
            notifier,
            settings: Settings::default(),
            records,
            patient_state: PatientFormState::default(),
            prediction_state: PredictionState::default(),
            report_state: ReportState::default(),
            email_state: EmailState::default(),
            settings_state: SettingsState::default(),
            analysis_worker: None,
            send_worker: None,
            tick: 0,
        })
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_workers();
            self.tick = self.tick.wrapping_add(1);
            self.prediction_state.tick = self.tick / 2;
            self.email_state.tick = self.tick / 2;

            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(0),
                        Constraint::Length(3),
                    ])
                    .split(area);

                render_header(f, chunks[0], &self.settings, self.screen.index());

                let body = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(26), Constraint::Min(0)])
                    .split(chunks[1]);
                render_sidebar(f, body[0], &self.settings);

                let content = body[1];
                match self.screen {
                    Screen::PatientInfo => {
                        render_patient_info(f, content, &self.patient_state, &self.records);
                    }
                    Screen::Prediction => render_prediction(f, content, &self.prediction_state),
                    Screen::Reporting => render_reporting(
                        f,
                        content,
                        &self.report_state,
                        self.reporting.headline(),
                        self.settings.mode,
                        &self.reporting.export_path(),
                    ),
                    Screen::Email => {
                        let preview = self.email_preview();
                        render_email(
                            f,
                            content,
                            &self.email_state,
                            &self.records,
                            preview.as_ref().map(|(p, err)| (p, err.as_deref())),
                        );
                    }
                    Screen::Settings => {
                        render_settings(f, content, &self.settings_state, &self.settings);
                    }
                }

                render_disclaimer(f, chunks[2]);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain progress from the background workers.
    fn poll_workers(&mut self) {
        // Process all available progress messages without holding a borrow
        // of the handle while mutating `self`.
        loop {
            let Some(progress) = self.analysis_worker.as_ref().and_then(|w| w.try_recv()) else {
                break;
            };
            let (index, status) = match progress {
                AnalysisProgress::Analyzing(index) => (index, CardStatus::Analyzing),
                AnalysisProgress::Complete(result) => (result.image_index, CardStatus::Done(result)),
                AnalysisProgress::Error(index, message) => (index, CardStatus::Failed(message)),
            };
            if let Some(card) = self.prediction_state.card_mut(index) {
                card.status = status;
            }
        }
        if self.analysis_worker.is_some() && !self.prediction_state.is_analyzing() {
            self.analysis_worker = None;
        }

        loop {
            let Some(progress) = self.send_worker.as_ref().and_then(|w| w.try_recv()) else {
                break;
            };
            match progress {
                SendProgress::Sending => self.email_state.status = SendStatus::Sending,
                SendProgress::Sent(ack) => {
                    self.email_state.status = SendStatus::Sent(sent_message(&ack));
                    self.send_worker = None;
                }
                SendProgress::Error(message) => {
                    self.email_state.status = SendStatus::Failed(message);
                    self.send_worker = None;
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if let KeyCode::F(n) = key {
            if let Some(screen) = Screen::from_function_key(n) {
                self.switch_screen(screen);
            }
            return;
        }

        match self.screen {
            Screen::PatientInfo => self.handle_patient_key(key, modifiers),
            Screen::Prediction => self.handle_prediction_key(key),
            Screen::Reporting => self.handle_reporting_key(key),
            Screen::Email => self.handle_email_key(key, modifiers),
            Screen::Settings => self.handle_settings_key(key),
        }
    }

    fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        match screen {
            Screen::Reporting => {
                if self.settings.mode == DetectionMode::Advanced {
                    self.load_evaluation();
                }
            }
            Screen::Email => {
                if self.email_state.selected_record >= self.records.len() {
                    self.email_state.selected_record = 0;
                }
            }
            _ => {}
        }
    }

    fn handle_patient_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let state = &mut self.patient_state;
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('l') => state.clear_all(),
                KeyCode::Char('s') => state.load_sample_data(),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Up | KeyCode::BackTab => state.prev_field(),
            KeyCode::Down | KeyCode::Tab => state.next_field(),
            KeyCode::Char(c) => state.input_char(c),
            KeyCode::Backspace => state.delete_char(),
            KeyCode::Delete => state.clear_field(),
            KeyCode::Enter => self.submit_patient_form(),
            _ => {}
        }
    }

    fn submit_patient_form(&mut self) {
        match self.intake.submit(&self.patient_state.to_intake()) {
            Ok(_) => {
                self.patient_state.message = Some(FormMessage::Saved(SAVED_MESSAGE.to_string()));
                self.refresh_records();
            }
            Err(BonescopeError::Validation(message)) => {
                self.patient_state.message = Some(FormMessage::Error(message));
            }
            Err(e) => {
                tracing::error!("Failed to save patient record: {}", e);
                self.patient_state.message = Some(FormMessage::Error(e.to_string()));
            }
        }
    }

    fn refresh_records(&mut self) {
        match self.intake.records() {
            Ok(records) => self.records = records,
            Err(e) => tracing::error!("Failed to list patient records: {}", e),
        }
    }

    fn handle_prediction_key(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Tab | KeyCode::BackTab) {
            let state = &mut self.prediction_state;
            state.focus = state.focus.next();
            return;
        }

        match self.prediction_state.focus {
            PredictionFocus::Paths => match key {
                KeyCode::Char(c) => self.prediction_state.paths.push(c),
                KeyCode::Backspace => {
                    self.prediction_state.paths.pop();
                }
                KeyCode::Enter => self.upload_images(),
                _ => {}
            },
            PredictionFocus::GlobalZoom => {
                if let Some(up) = arrow_direction(key) {
                    let state = &mut self.prediction_state;
                    state.global_zoom = step_zoom(state.global_zoom, up);
                    self.refresh_cards(|card| card.zoom.is_none());
                }
            }
            PredictionFocus::GlobalOpacity => {
                if let Some(up) = arrow_direction(key) {
                    let state = &mut self.prediction_state;
                    state.global_opacity = step_opacity(state.global_opacity, up);
                    self.refresh_cards(|card| card.show_heatmap && card.opacity.is_none());
                }
            }
            PredictionFocus::Image => self.handle_image_key(key),
        }
    }

    fn handle_image_key(&mut self, key: KeyCode) {
        let state = &mut self.prediction_state;
        if state.cards.is_empty() {
            return;
        }
        let (global_zoom, global_opacity) = (state.global_zoom, state.global_opacity);
        let selected = state.selected;
        let count = state.cards.len();

        let card = &mut state.cards[selected];
        let view = card.view(global_zoom, global_opacity);
        match key {
            KeyCode::Up => {
                state.selected = selected.saturating_sub(1);
                return;
            }
            KeyCode::Down => {
                state.selected = (selected + 1).min(count - 1);
                return;
            }
            KeyCode::Left | KeyCode::Right => {
                card.zoom = Some(step_zoom(view.zoom, key == KeyCode::Right));
            }
            KeyCode::Char('h') | KeyCode::Char('H') => card.show_heatmap = !card.show_heatmap,
            KeyCode::Char('[') | KeyCode::Char(']') => {
                card.opacity = Some(step_opacity(view.opacity, key == KeyCode::Char(']')));
            }
            KeyCode::Backspace => {
                card.zoom = None;
                card.opacity = None;
            }
            _ => return,
        }
        self.refresh_card(selected);
    }

    /// Re-render one card's display image.
    fn refresh_card(&mut self, position: usize) {
        let state = &mut self.prediction_state;
        let (global_zoom, global_opacity) = (state.global_zoom, state.global_opacity);
        if let Some(card) = state.cards.get_mut(position) {
            let view = card.view(global_zoom, global_opacity);
            card.display = self.pipeline.render(&card.original, Some(&card.heatmap), &view);
        }
    }

    /// Re-render cards matching `affected`; others keep their cached image.
    fn refresh_cards(&mut self, affected: impl Fn(&ImageCard) -> bool) {
        let positions: Vec<usize> = self
            .prediction_state
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| affected(card))
            .map(|(i, _)| i)
            .collect();
        for position in positions {
            self.refresh_card(position);
        }
    }

    /// Load every typed path, then score the batch on a worker.
    fn upload_images(&mut self) {
        if self.analysis_worker.is_some() {
            self.prediction_state.message = Some("Analysis in progress, please wait.".to_string());
            return;
        }

        let paths: Vec<String> = self
            .prediction_state
            .paths
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        if paths.is_empty() {
            return;
        }

        let (global_zoom, global_opacity) =
            (self.prediction_state.global_zoom, self.prediction_state.global_opacity);
        let mut cards = Vec::new();
        let mut errors = Vec::new();

        for path in &paths {
            let loaded = load_image(Path::new(path)).and_then(|image| {
                let heatmap = self.pipeline.new_heatmap()?;
                Ok((image, heatmap))
            });
            match loaded {
                Ok((image, heatmap)) => {
                    let view = ViewOptions {
                        zoom: global_zoom,
                        show_heatmap: false,
                        opacity: global_opacity,
                    };
                    let display = self.pipeline.render(&image, None, &view);
                    cards.push(ImageCard {
                        index: cards.len() + 1,
                        name: file_name(path),
                        original: Arc::new(image),
                        heatmap,
                        zoom: None,
                        opacity: None,
                        show_heatmap: false,
                        display,
                        status: CardStatus::Queued,
                    });
                }
                Err(e) => {
                    tracing::warn!("Could not load upload: {}", e);
                    errors.push(e.to_string());
                }
            }
        }

        self.prediction_state.message = (!errors.is_empty()).then(|| errors.join("; "));
        if cards.is_empty() {
            return;
        }

        tracing::info!(images = cards.len(), "Starting analysis");
        let batch = cards.iter().map(|c| (c.index, Arc::clone(&c.original))).collect();
        self.prediction_state.cards = cards;
        self.prediction_state.selected = 0;
        self.prediction_state.focus = PredictionFocus::Image;
        self.analysis_worker = Some(AnalysisWorker::spawn(Arc::clone(&self.pipeline), batch));
    }

    fn handle_reporting_key(&mut self, key: KeyCode) {
        if self.settings.mode != DetectionMode::Advanced {
            return;
        }
        match key {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.report_state.message = None;
                match self.reporting.regenerate() {
                    Ok(evaluation) => self.report_state.evaluation = Some(evaluation),
                    Err(e) => self.report_state.message = Some(Err(e.to_string())),
                }
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                self.report_state.message = Some(
                    self.reporting
                        .export_csv()
                        .map(|path| format!("Saved {}", path.display()))
                        .map_err(|e| e.to_string()),
                );
            }
            _ => {}
        }
    }

    fn load_evaluation(&mut self) {
        match self.reporting.evaluation() {
            Ok(evaluation) => self.report_state.evaluation = Some(evaluation),
            Err(e) => {
                tracing::error!("Failed to load evaluation: {}", e);
                self.report_state.message = Some(Err(e.to_string()));
            }
        }
    }

    fn handle_email_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if self.records.is_empty() {
            return;
        }
        if modifiers.contains(KeyModifiers::CONTROL) {
            if key == KeyCode::Char('s') {
                self.send_email();
            }
            return;
        }

        let state = &mut self.email_state;
        match key {
            KeyCode::Tab | KeyCode::Down => state.focus = state.focus.next(),
            KeyCode::BackTab | KeyCode::Up => state.focus = state.focus.prev(),
            KeyCode::Left | KeyCode::Right if state.focus == EmailField::Recipient => {
                state.step_recipient(self.records.len(), key == KeyCode::Right);
            }
            KeyCode::Enter if state.focus == EmailField::Body => state.body.push('\n'),
            KeyCode::Enter => state.focus = state.focus.next(),
            KeyCode::Char(c) => {
                if let Some(text) = state.focused_text_mut() {
                    text.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(text) = state.focused_text_mut() {
                    text.pop();
                }
            }
            _ => {}
        }
    }

    /// Draft from the selected record with the edited subject and body.
    fn edited_draft(&self) -> std::result::Result<EmailDraft, String> {
        let state = &self.email_state;
        let mut draft = self
            .notifier
            .compose(state.selected_record)
            .map_err(|e| e.to_string())?;
        draft.subject = state.subject.clone();
        draft.body = state.body.clone();
        Ok(draft)
    }

    /// Draft ready to send, including the typed attachment.
    fn email_draft(&self) -> std::result::Result<EmailDraft, String> {
        let mut draft = self.edited_draft()?;
        draft.set_attachment(&self.email_state.attachment)?;
        Ok(draft)
    }

    /// Preview of the current draft and the attachment error, if any.
    fn email_preview(&self) -> Option<(EmailPreview, Option<String>)> {
        let mut draft = self.edited_draft().ok()?;
        let attachment_error = draft.set_attachment(&self.email_state.attachment).err();
        Some((draft.preview(), attachment_error))
    }

    fn send_email(&mut self) {
        if self.send_worker.is_some() {
            return;
        }
        match self.email_draft() {
            Ok(draft) => {
                self.email_state.status = SendStatus::Sending;
                self.send_worker = Some(SendWorker::spawn(Arc::clone(&self.notifier), draft));
            }
            Err(message) => self.email_state.status = SendStatus::Failed(message),
        }
    }

    fn handle_settings_key(&mut self, key: KeyCode) {
        let state = &mut self.settings_state;
        match key {
            KeyCode::Up => state.move_selection(false),
            KeyCode::Down | KeyCode::Tab => state.move_selection(true),
            KeyCode::Left => state.adjust(&mut self.settings, false),
            KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => {
                state.adjust(&mut self.settings, true);
            }
            _ => {}
        }
    }
}

fn arrow_direction(key: KeyCode) -> Option<bool> {
    match key {
        KeyCode::Right | KeyCode::Up => Some(true),
        KeyCode::Left | KeyCode::Down => Some(false),
        _ => None,
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if self.store.close_session(self.session).is_ok() {
            tracing::debug!(session = %self.session, "Session closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::domain::Theme;

    fn app() -> App {
        App::new(&AppConfig::instant(11)).expect("Should build app")
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyCode::Char(c), KeyModifiers::CONTROL);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn poll_until(app: &mut App, done: impl Fn(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(app) && Instant::now() < deadline {
            app.poll_workers();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(done(app), "worker did not finish in time");
    }

    fn save_sample_record(app: &mut App) {
        app.switch_screen(Screen::PatientInfo);
        ctrl(app, 's');
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_function_keys_switch_tabs() {
        let mut app = app();
        assert_eq!(app.screen, Screen::PatientInfo);
        press(&mut app, KeyCode::F(3));
        assert_eq!(app.screen, Screen::Reporting);
        press(&mut app, KeyCode::F(5));
        assert_eq!(app.screen, Screen::Settings);
        press(&mut app, KeyCode::F(9));
        assert_eq!(app.screen, Screen::Settings);

        ctrl(&mut app, 'q');
        assert!(app.should_quit);
    }

    #[test]
    fn test_empty_submit_shows_required_message() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.patient_state.message,
            Some(FormMessage::Error("Name, Patient ID, and Email are required.".to_string()))
        );
        assert!(app.records.is_empty());
    }

    #[test]
    fn test_submit_saves_and_keeps_form() {
        let mut app = app();
        save_sample_record(&mut app);

        assert_eq!(app.patient_state.message, Some(FormMessage::Saved(SAVED_MESSAGE.to_string())));
        assert_eq!(app.records.len(), 1);
        assert_eq!(app.patient_state.to_intake().name, "Jane Doe");

        ctrl(&mut app, 'l');
        assert!(app.patient_state.to_intake().name.is_empty());
        assert_eq!(app.records.len(), 1);
    }

    #[test]
    fn test_email_requires_a_record() {
        let mut app = app();
        press(&mut app, KeyCode::F(4));
        ctrl(&mut app, 's');
        assert_eq!(app.email_state.status, SendStatus::Idle);
        assert!(app.send_worker.is_none());
    }

    #[test]
    fn test_email_send_confirms() {
        let mut app = app();
        save_sample_record(&mut app);
        press(&mut app, KeyCode::F(4));

        let preview = app.email_draft().expect("draft").preview();
        assert_eq!(preview.to, "jane.doe@example.com");

        ctrl(&mut app, 's');
        poll_until(&mut app, |a| matches!(a.email_state.status, SendStatus::Sent(_)));
        assert_eq!(
            app.email_state.status,
            SendStatus::Sent("Results have been sent to jane.doe@example.com!".to_string())
        );
    }

    #[test]
    fn test_email_sends_to_any_saved_address() {
        let mut app = app();
        type_text(&mut app, "Bob");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "P-2");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "bob-at-clinic");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.records.len(), 1);

        press(&mut app, KeyCode::F(4));
        ctrl(&mut app, 's');
        poll_until(&mut app, |a| !matches!(a.email_state.status, SendStatus::Sending));
        assert_eq!(
            app.email_state.status,
            SendStatus::Sent("Results have been sent to bob-at-clinic!".to_string())
        );
    }

    #[test]
    fn test_bad_email_attachment_is_reported() {
        let mut app = app();
        save_sample_record(&mut app);
        press(&mut app, KeyCode::F(4));
        app.email_state.focus = EmailField::Attachment;
        type_text(&mut app, "notes.docx");

        ctrl(&mut app, 's');
        assert!(matches!(app.email_state.status, SendStatus::Failed(_)));
    }

    #[test]
    fn test_preview_keeps_message_when_attachment_is_rejected() {
        let mut app = app();
        save_sample_record(&mut app);
        press(&mut app, KeyCode::F(4));
        app.email_state.focus = EmailField::Attachment;
        type_text(&mut app, "notes.docx");

        let (preview, error) = app.email_preview().expect("preview with a record");
        assert_eq!(preview.to, "jane.doe@example.com");
        assert!(preview.attachment_name.is_none());
        assert!(error.expect("attachment error").starts_with("notes.docx"));

        for _ in 0..4 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "pdf");
        let (_, error) = app.email_preview().expect("preview");
        assert!(error.is_none());
    }

    #[test]
    fn test_mode_gates_reporting_keys() {
        let mut app = app();
        press(&mut app, KeyCode::F(3));
        let first = app.report_state.evaluation.clone().expect("evaluation loaded");

        press(&mut app, KeyCode::Char('r'));
        let second = app.report_state.evaluation.clone().expect("evaluation");
        assert_ne!(first.y_scores, second.y_scores);

        app.settings.mode = DetectionMode::Basic;
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.report_state.evaluation, Some(second));
    }

    #[test]
    fn test_settings_keys_adjust() {
        let mut app = app();
        press(&mut app, KeyCode::F(5));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.settings.theme, Theme::Dark);
    }

    #[test]
    fn test_upload_analyzes_and_zooms() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("wrist.png");
        image::RgbImage::from_pixel(40, 20, image::Rgb([120, 120, 120]))
            .save(&path)
            .expect("save");

        let mut app = app();
        press(&mut app, KeyCode::F(2));
        type_text(&mut app, &format!("{}, missing.png", path.display()));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.prediction_state.cards.len(), 1);
        assert!(app.prediction_state.message.is_some());
        poll_until(&mut app, |a| !a.prediction_state.is_analyzing());
        assert!(matches!(app.prediction_state.cards[0].status, CardStatus::Done(r) if r.image_index == 1));
        assert!(app.analysis_worker.is_none());

        press(&mut app, KeyCode::Right);
        let card = &app.prediction_state.cards[0];
        assert_eq!(card.zoom, Some(1.1));
        assert_eq!(card.display.dimensions(), (44, 22));

        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.prediction_state.cards[0].display.dimensions(), (224, 224));
    }

    #[test]
    fn test_global_zoom_skips_overridden_cards() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        for p in [&a, &b] {
            image::RgbImage::new(10, 10).save(p).expect("save");
        }

        let mut app = app();
        press(&mut app, KeyCode::F(2));
        type_text(&mut app, &format!("{},{}", a.display(), b.display()));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Left); // image 1 -> 0.9x

        app.prediction_state.focus = PredictionFocus::GlobalZoom;
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);

        let cards = &app.prediction_state.cards;
        assert_eq!(cards[0].display.dimensions(), (9, 9));
        assert_eq!(cards[1].display.dimensions(), (12, 12));
    }
}
