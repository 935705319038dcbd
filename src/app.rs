//! Terminal application state and key handling

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lead_form::{
    Category, Field, FormConfig, LeadForm, LeadSink, Navigator, StepOutcome, SubmissionResult,
    SubmitError, ValidationErrors,
};
use tracing::info;

/// Records the destination requested after a successful submission
#[derive(Debug, Default)]
pub struct ConfirmationNavigator {
    destination: Mutex<Option<String>>,
}

impl ConfirmationNavigator {
    /// Take the pending destination, if any
    pub fn take(&self) -> Option<String> {
        self.destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Navigator for ConfirmationNavigator {
    fn navigate(&self, destination: &str) {
        info!(%destination, "confirmation requested");
        *self
            .destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(destination.to_string());
    }
}

/// Which page is on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Form,
    /// Shown after the lead was accepted
    Confirmation { destination: String },
}

/// Main application struct
pub struct App {
    /// The form being filled in
    pub form: LeadForm,
    navigator: Arc<ConfirmationNavigator>,
    /// Index into the current step's fields
    pub active_field: usize,
    /// Highlighted option while the category picker is on screen
    pub category_choice: Option<usize>,
    pub screen: Screen,
    /// One-line feedback shown in the status bar
    pub status_message: Option<String>,
    submit_requested: bool,
    /// Keys queued while the request was in flight are still to be drained
    settling: bool,
    quit: bool,
}

impl App {
    /// Create an app posting leads as configured
    pub fn new(config: &FormConfig) -> Result<Self> {
        let navigator = Arc::new(ConfirmationNavigator::default());
        let form = LeadForm::from_config(config, navigator.clone())?;
        Ok(Self::with_form(form, navigator))
    }

    /// Create an app over an arbitrary sink
    pub fn with_sink(sink: Arc<dyn LeadSink>, confirmation_path: &str) -> Self {
        let navigator = Arc::new(ConfirmationNavigator::default());
        let form = LeadForm::new(sink, navigator.clone(), confirmation_path);
        Self::with_form(form, navigator)
    }

    fn with_form(form: LeadForm, navigator: Arc<ConfirmationNavigator>) -> Self {
        Self {
            form,
            navigator,
            active_field: 0,
            category_choice: None,
            screen: Screen::Form,
            status_message: None,
            submit_requested: false,
            settling: false,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Field with keyboard focus on the current step
    pub fn active(&self) -> Option<Field> {
        let fields = self.form.current_fields();
        fields.get(self.active_field.min(fields.len().saturating_sub(1))).copied()
    }

    /// Loading indicator: a submission was requested or is in flight
    pub fn is_submitting(&self) -> bool {
        self.submit_requested || self.form.is_loading()
    }

    /// The last key press asked for the draft to be sent
    pub fn has_submit_request(&self) -> bool {
        self.submit_requested
    }

    /// Accept input again once the keys typed during the request are drained
    pub fn finish_settling(&mut self) {
        self.settling = false;
    }

    /// Handle a key press
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Typed at the loading screen, not at what replaced it
        if self.settling {
            return Ok(());
        }

        if let Screen::Confirmation { .. } = self.screen {
            match key.code {
                KeyCode::Enter => self.start_over(),
                KeyCode::Esc | KeyCode::Char('q') => self.quit = true,
                _ => {}
            }
            return Ok(());
        }

        // Error banner is modal
        if self.form.submission_result().error_message().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.form.dismiss_error();
            }
            return Ok(());
        }

        // Ignore input while the request is in flight
        if self.is_submitting() {
            return Ok(());
        }

        self.status_message = None;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('q') if ctrl => self.quit = true,
            KeyCode::Char('r') if ctrl => {
                self.start_over();
                self.status_message = Some("Modulo svuotato".to_string());
            }
            KeyCode::Char('p') if ctrl => self.switch_category(),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Left => self.cycle_option(false),
            KeyCode::Right => self.cycle_option(true),
            KeyCode::Enter => self.confirm(),
            KeyCode::Esc => {
                self.form.retreat();
                self.focus_first();
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(c) => self.input_char(c),
            _ => {}
        }
        Ok(())
    }

    /// Send the draft; called by the main loop after the loading frame
    pub async fn submit(&mut self) -> Result<()> {
        self.submit_requested = false;
        self.settling = true;
        match self.form.submit().await {
            Ok(SubmissionResult::Success) => {
                if let Some(destination) = self.navigator.take() {
                    self.screen = Screen::Confirmation { destination };
                }
            }
            // Failures are shown by the banner
            Ok(_) => {}
            Err(SubmitError::Invalid(errors)) => self.report(&errors),
            Err(err) => self.status_message = Some(err.to_string()),
        }
        Ok(())
    }

    fn start_over(&mut self) {
        self.form.reset();
        self.screen = Screen::Form;
        self.focus_first();
    }

    fn focus_first(&mut self) {
        self.active_field = 0;
        self.category_choice = None;
    }

    fn next_field(&mut self) {
        let count = self.form.current_fields().len();
        if count > 0 {
            self.active_field = (self.active_field + 1) % count;
        }
    }

    fn prev_field(&mut self) {
        let count = self.form.current_fields().len();
        if count > 0 {
            self.active_field = (self.active_field + count - 1) % count;
        }
    }

    fn confirm(&mut self) {
        if self.active() == Some(Field::Category) {
            if let Some(index) = self.category_choice {
                let choice = Field::Category.options()[index];
                self.form.edit_field(Field::Category, choice);
                self.focus_first();
                return;
            }
        }

        match self.form.advance() {
            Ok(StepOutcome::Moved) => self.focus_first(),
            Ok(StepOutcome::ReadyToSubmit) => self.submit_requested = true,
            Ok(StepOutcome::Ignored) => {}
            Err(errors) => self.report(&errors),
        }
    }

    /// Focus the first invalid field on screen and summarize the rest
    fn report(&mut self, errors: &ValidationErrors) {
        let fields = self.form.current_fields();
        if let Some(index) = fields.iter().position(|f| errors.contains(*f)) {
            self.active_field = index;
        }
        self.status_message = Some(match errors.len() {
            1 => "Un campo da correggere".to_string(),
            n => format!("{n} campi da correggere"),
        });
    }

    fn cycle_option(&mut self, forward: bool) {
        let Some(field) = self.active() else {
            return;
        };
        let options = field.options();
        if options.is_empty() {
            return;
        }

        let current = if field == Field::Category {
            self.category_choice
        } else {
            self.form
                .draft()
                .value(field)
                .and_then(|v| options.iter().position(|o| *o == v))
        };
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };

        if field == Field::Category {
            self.category_choice = Some(next);
        } else {
            self.form.edit_field(field, options[next]);
        }
    }

    fn switch_category(&mut self) {
        let Some(current) = self.form.category() else {
            return;
        };
        let other = match current {
            Category::Retiree => Category::Employee,
            Category::Employee => Category::Retiree,
        };
        if self.form.choose_category(other) {
            self.status_message = Some(format!("Categoria: {other}"));
        } else {
            self.status_message =
                Some("Torna al primo passo per cambiare categoria".to_string());
        }
    }

    fn input_char(&mut self, c: char) {
        let Some(field) = self.active() else {
            return;
        };
        if !field.options().is_empty() {
            return;
        }
        let mut value = self.form.draft().value(field).unwrap_or_default().to_string();
        value.push(c);
        self.form.edit_field(field, value);
    }

    fn backspace(&mut self) {
        let Some(field) = self.active() else {
            return;
        };
        if !field.options().is_empty() {
            return;
        }
        let mut value = self.form.draft().value(field).unwrap_or_default().to_string();
        value.pop();
        self.form.edit_field(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lead_form::{Acknowledgement, LeadPayload, SinkError, Stage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sink answering every request with a fixed outcome
    struct FixedSink {
        accept: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LeadSink for FixedSink {
        async fn send(&self, _payload: &LeadPayload) -> Result<Acknowledgement, SinkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.accept {
                Ok(Acknowledgement {
                    status: 201,
                    body: None,
                })
            } else {
                Err(SinkError::Rejected {
                    status: 500,
                    reason: None,
                })
            }
        }
    }

    fn app(accept: bool) -> (App, Arc<FixedSink>) {
        let sink = Arc::new(FixedSink {
            accept,
            calls: AtomicUsize::new(0),
        });
        (App::with_sink(sink.clone(), "/grazie"), sink)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    async fn press(app: &mut App, code: KeyCode) {
        app.handle_key(key(code)).await.unwrap();
    }

    async fn fill_contact(app: &mut App) {
        type_text(app, "Anna Verdi").await;
        press(app, KeyCode::Tab).await;
        type_text(app, "anna@example.com").await;
        press(app, KeyCode::Tab).await;
        type_text(app, "3339876543").await;
        press(app, KeyCode::Enter).await;
    }

    /// Drive a retiree applicant to the final sub-step
    async fn retiree_at_final_step(app: &mut App) {
        fill_contact(app).await;
        press(app, KeyCode::Right).await;
        press(app, KeyCode::Enter).await;
        assert_eq!(app.form.category(), Some(Category::Retiree));

        for _ in 0..2 {
            // provider, then pension kind
            press(app, KeyCode::Right).await;
            press(app, KeyCode::Enter).await;
        }
        type_text(app, "1450").await;
        press(app, KeyCode::Enter).await;
        type_text(app, "1950").await;
        press(app, KeyCode::Enter).await;
        press(app, KeyCode::Right).await;
        press(app, KeyCode::Enter).await;

        type_text(app, "Torino").await;
        press(app, KeyCode::Tab).await;
        type_text(app, "TO").await;
        assert!(app.form.is_at_final_step());
    }

    mod editing {
        use super::*;

        #[tokio::test]
        async fn test_typing_fills_the_active_field() {
            let (mut app, _) = app(true);
            type_text(&mut app, "Anna").await;
            press(&mut app, KeyCode::Backspace).await;
            assert_eq!(app.form.draft().value(Field::FullName), Some("Ann"));
            assert_eq!(app.active(), Some(Field::FullName));
        }

        #[tokio::test]
        async fn test_tab_wraps_around_the_step() {
            let (mut app, _) = app(true);
            for _ in 0..3 {
                press(&mut app, KeyCode::Tab).await;
            }
            assert_eq!(app.active(), Some(Field::FullName));
            press(&mut app, KeyCode::BackTab).await;
            assert_eq!(app.active(), Some(Field::Phone));
        }

        #[tokio::test]
        async fn test_invalid_step_focuses_first_error() {
            let (mut app, _) = app(true);
            type_text(&mut app, "Anna Verdi").await;
            press(&mut app, KeyCode::Tab).await;
            press(&mut app, KeyCode::Tab).await;
            press(&mut app, KeyCode::Enter).await;

            assert_eq!(app.form.current_step(), 1);
            assert_eq!(app.active(), Some(Field::Email));
            assert_eq!(app.status_message.as_deref(), Some("2 campi da correggere"));
        }

        #[tokio::test]
        async fn test_category_is_committed_on_enter() {
            let (mut app, _) = app(true);
            fill_contact(&mut app).await;
            assert_eq!(app.active(), Some(Field::Category));

            press(&mut app, KeyCode::Left).await;
            assert_eq!(app.category_choice, Some(1));
            assert!(app.form.category().is_none());

            press(&mut app, KeyCode::Enter).await;
            assert_eq!(app.form.category(), Some(Category::Employee));
            assert_eq!(app.active(), Some(Field::EmployerSector));
            assert_eq!(app.form.total_steps(), 10);
        }

        #[tokio::test]
        async fn test_category_switch_only_from_first_step() {
            let (mut app, _) = app(true);
            fill_contact(&mut app).await;
            press(&mut app, KeyCode::Right).await;
            press(&mut app, KeyCode::Enter).await;

            app.handle_key(ctrl('p')).await.unwrap();
            assert_eq!(app.form.category(), Some(Category::Retiree));

            press(&mut app, KeyCode::Esc).await;
            assert_eq!(app.form.stage(), Stage::CollectingContact);
            app.handle_key(ctrl('p')).await.unwrap();
            assert_eq!(app.form.category(), Some(Category::Employee));
        }

        #[tokio::test]
        async fn test_ctrl_r_clears_the_draft() {
            let (mut app, _) = app(true);
            fill_contact(&mut app).await;
            app.handle_key(ctrl('r')).await.unwrap();
            assert_eq!(app.form.stage(), Stage::CollectingContact);
            assert_eq!(app.form.draft().value(Field::FullName), Some(""));
        }
    }

    mod submitting {
        use super::*;

        #[tokio::test]
        async fn test_success_shows_confirmation() {
            let (mut app, sink) = app(true);
            retiree_at_final_step(&mut app).await;

            press(&mut app, KeyCode::Enter).await;
            assert!(app.is_submitting());
            assert!(app.has_submit_request());
            app.submit().await.unwrap();
            app.finish_settling();
            assert!(!app.is_submitting());

            assert_eq!(
                app.screen,
                Screen::Confirmation {
                    destination: "/grazie".to_string()
                }
            );
            assert_eq!(sink.calls.load(Ordering::SeqCst), 1);

            press(&mut app, KeyCode::Enter).await;
            assert_eq!(app.screen, Screen::Form);
            assert_eq!(app.form.stage(), Stage::CollectingContact);
        }

        #[tokio::test]
        async fn test_failure_banner_is_modal() {
            let (mut app, sink) = app(false);
            retiree_at_final_step(&mut app).await;
            press(&mut app, KeyCode::Enter).await;
            app.submit().await.unwrap();
            app.finish_settling();

            assert_eq!(app.screen, Screen::Form);
            assert_eq!(app.form.stage(), Stage::SubmissionFailed);
            type_text(&mut app, "x").await;
            assert_eq!(app.form.draft().value(Field::Province), Some("TO"));

            press(&mut app, KeyCode::Esc).await;
            assert!(app.form.submission_result().error_message().is_none());
            assert!(app.form.is_at_final_step());
            assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_keys_ignored_while_submit_pending() {
            let (mut app, _) = app(true);
            retiree_at_final_step(&mut app).await;
            press(&mut app, KeyCode::Enter).await;
            type_text(&mut app, "zz").await;
            assert_eq!(app.form.draft().value(Field::Province), Some("TO"));
        }

        #[tokio::test]
        async fn test_enter_queued_during_failed_submit_keeps_banner() {
            let (mut app, _) = app(false);
            retiree_at_final_step(&mut app).await;
            press(&mut app, KeyCode::Enter).await;
            app.submit().await.unwrap();

            // Second Enter of a double press, read after the request returned
            press(&mut app, KeyCode::Enter).await;
            app.finish_settling();
            assert_eq!(
                app.form.submission_result().error_message(),
                Some(lead_form::submission::FALLBACK_ERROR_MESSAGE)
            );

            press(&mut app, KeyCode::Enter).await;
            assert!(app.form.submission_result().error_message().is_none());
        }

        #[tokio::test]
        async fn test_enter_queued_during_accepted_submit_keeps_confirmation() {
            let (mut app, sink) = app(true);
            retiree_at_final_step(&mut app).await;
            press(&mut app, KeyCode::Enter).await;
            app.submit().await.unwrap();

            press(&mut app, KeyCode::Enter).await;
            app.finish_settling();
            assert_eq!(
                app.screen,
                Screen::Confirmation {
                    destination: "/grazie".to_string()
                }
            );
            assert_eq!(app.form.stage(), Stage::Submitted);
            assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
        }
    }
}
