//! Form instance: the step flow plus its submission controller

use std::sync::Arc;

use chrono::Utc;
use tracing::{info_span, Instrument};

use crate::config::FormConfig;
use crate::state::forms::UnknownField;
use crate::state::{
    Category, Field, FormDraft, FormFlow, Stage, StepOutcome, ValidationErrors,
};
use crate::submission::{
    HttpLeadSink, LeadPayload, LeadSink, Navigator, SinkError, SubmissionController,
    SubmissionResult, SubmitError,
};

/// One lead form as mounted on the page.
///
/// Owns the draft exclusively. The shell calls the transition methods in
/// response to user events and renders from the accessors afterwards.
pub struct LeadForm {
    flow: FormFlow,
    controller: SubmissionController,
}

impl LeadForm {
    pub fn new(
        sink: Arc<dyn LeadSink>,
        navigator: Arc<dyn Navigator>,
        confirmation_path: impl Into<String>,
    ) -> Self {
        Self {
            flow: FormFlow::new(),
            controller: SubmissionController::new(sink, navigator, confirmation_path),
        }
    }

    /// Build a form posting over HTTP as configured
    pub fn from_config(config: &FormConfig, navigator: Arc<dyn Navigator>) -> Result<Self, SinkError> {
        let sink = HttpLeadSink::from_config(config)?;
        Ok(Self::new(Arc::new(sink), navigator, config.confirmation_path()))
    }

    // Read accessors

    pub fn stage(&self) -> Stage {
        self.flow.stage()
    }

    pub fn draft(&self) -> &FormDraft {
        self.flow.draft()
    }

    pub fn category(&self) -> Option<Category> {
        self.flow.category()
    }

    pub fn current_step(&self) -> u8 {
        self.flow.current_step()
    }

    pub fn total_steps(&self) -> u8 {
        self.flow.total_steps()
    }

    pub fn progress_percent(&self) -> u8 {
        self.flow.progress_percent()
    }

    pub fn current_fields(&self) -> &'static [Field] {
        self.flow.current_fields()
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        self.flow.errors()
    }

    pub fn submission_result(&self) -> SubmissionResult {
        self.controller.result()
    }

    /// Loading indicator for the submit button
    pub fn is_loading(&self) -> bool {
        self.controller.is_pending()
    }

    pub fn is_at_final_step(&self) -> bool {
        self.flow.is_at_final_step()
    }

    // Transitions

    pub fn edit_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        let accepted = self.flow.edit_field(field, value);
        if accepted {
            self.controller.dismiss_error();
        }
        accepted
    }

    /// Edit a field named by its payload key or snake_case alias
    pub fn edit_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<bool, UnknownField> {
        let field: Field = name.parse()?;
        Ok(self.edit_field(field, value))
    }

    pub fn advance(&mut self) -> Result<StepOutcome, ValidationErrors> {
        self.flow.advance()
    }

    pub fn retreat(&mut self) {
        self.controller.dismiss_error();
        self.flow.retreat();
    }

    pub fn choose_category(&mut self, category: Category) -> bool {
        self.flow.choose_category(category)
    }

    /// Close the error banner
    pub fn dismiss_error(&mut self) {
        if self.controller.dismiss_error() {
            self.flow.recover_from_failure();
        }
    }

    /// Start over with an empty draft
    pub fn reset(&mut self) {
        self.flow.reset();
        self.controller.reset();
    }

    /// Submit the draft.
    ///
    /// `Err` means the attempt was refused and nothing was sent. `Ok`
    /// carries the outcome of the one request that was sent, which may be
    /// a failure to show in the banner.
    pub async fn submit(&mut self) -> Result<SubmissionResult, SubmitError> {
        if self.controller.is_pending() {
            return Err(SubmitError::AlreadyPending);
        }
        if self.flow.stage() == Stage::Submitted {
            return Err(SubmitError::AlreadySubmitted);
        }
        if !self.flow.is_at_final_step() {
            return Err(SubmitError::NotAtFinalStep);
        }
        self.flow.validate_all().map_err(SubmitError::Invalid)?;

        let submitted_at = Utc::now();
        let payload = LeadPayload::from_draft(self.flow.draft(), submitted_at)
            .ok_or(SubmitError::NotAtFinalStep)?;
        self.flow.begin_submission(submitted_at);

        let span = info_span!("submit", draft_id = %self.flow.draft().id);
        match self.controller.submit(&payload).instrument(span).await {
            Ok(result) => {
                self.flow.finish_submission(result.is_success());
                Ok(result)
            }
            Err(err) => {
                self.flow.abort_submission();
                Err(err)
            }
        }
    }
}
