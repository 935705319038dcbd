//! Multi-step flow over a single [`FormDraft`]
//!
//! The flow owns the draft and the inline field errors. Every user event
//! from the shell lands here as one method call; the shell re-renders from
//! the accessors afterwards.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::draft::{Category, CategoryData, FormDraft, PROVISIONAL_TOTAL_STEPS};
use super::forms::{validate_field, validate_subset, Field, ValidationErrors};

/// Where the form currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// Step 1: name, email, phone
    #[default]
    CollectingContact,
    /// Steps 2..N, driven by the category sub-step
    CollectingCategoryDetails,
    Submitting,
    Submitted,
    /// Last attempt failed; behaves like the final details step
    SubmissionFailed,
}

impl Stage {
    fn is_details(&self) -> bool {
        matches!(self, Self::CollectingCategoryDetails | Self::SubmissionFailed)
    }

    fn is_locked(&self) -> bool {
        matches!(self, Self::Submitting | Self::Submitted)
    }
}

/// Result of a successful `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved to the next step
    Moved,
    /// Final sub-step validated; the draft can be submitted
    ReadyToSubmit,
    /// Nothing to do while a submission is in flight or done
    Ignored,
}

/// Step state machine for one form instance
#[derive(Debug, Clone, Default)]
pub struct FormFlow {
    stage: Stage,
    draft: FormDraft,
    errors: ValidationErrors,
}

impl FormFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn category(&self) -> Option<Category> {
        self.draft.category()
    }

    /// Overall step shown to the user, starting at 1
    pub fn current_step(&self) -> u8 {
        match self.stage {
            Stage::CollectingContact => 1,
            _ => 1 + self.draft.category_data.step(),
        }
    }

    pub fn total_steps(&self) -> u8 {
        self.category()
            .map(|c| c.total_steps())
            .unwrap_or(PROVISIONAL_TOTAL_STEPS)
    }

    pub fn progress_percent(&self) -> u8 {
        let current = f64::from(self.current_step());
        let total = f64::from(self.total_steps());
        (100.0 * current / total).round().clamp(0.0, 100.0) as u8
    }

    /// Fields the shell should render for the current step
    pub fn current_fields(&self) -> &'static [Field] {
        match self.stage {
            Stage::CollectingContact => &Field::CONTACT,
            _ => self.draft.category_data.step_fields(),
        }
    }

    /// True once the final sub-step of the chosen category is on screen
    pub fn is_at_final_step(&self) -> bool {
        self.stage.is_details() && self.draft.category_data.is_final_step()
    }

    /// Store a value typed by the user.
    ///
    /// Returns false when the edit was ignored: the draft is locked, the
    /// field does not belong to the live category, or the category value
    /// is not recognized.
    pub fn edit_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.stage.is_locked() {
            warn!(draft_id = %self.draft.id, %field, "edit ignored, draft is locked");
            return false;
        }
        let value = value.into();

        if field == Field::Category {
            return match Category::parse(&value) {
                Some(category) => self.choose_category(category),
                None => {
                    let message = validate_field(field, &value).err().unwrap_or_default();
                    self.errors.insert(field, message);
                    false
                }
            };
        }

        if !self.draft.set_value(field, value) {
            warn!(draft_id = %self.draft.id, %field, "field is not part of the current flow");
            return false;
        }
        self.recover_from_failure();
        if self.errors.contains(field) {
            self.revalidate(&[field]);
        }
        true
    }

    /// Move forward if the current step's fields validate
    pub fn advance(&mut self) -> Result<StepOutcome, ValidationErrors> {
        match self.stage {
            Stage::CollectingContact => {
                self.gate(&Field::CONTACT)?;
                self.stage = Stage::CollectingCategoryDetails;
                self.draft.category_data.set_step(1);
                debug!(draft_id = %self.draft.id, step = self.current_step(), "contact step completed");
                Ok(StepOutcome::Moved)
            }
            Stage::CollectingCategoryDetails | Stage::SubmissionFailed => {
                self.gate(self.draft.category_data.step_fields())?;
                if self.draft.category_data.is_final_step() {
                    return Ok(StepOutcome::ReadyToSubmit);
                }
                let next = self.draft.category_data.step() + 1;
                self.draft.category_data.set_step(next);
                self.stage = Stage::CollectingCategoryDetails;
                debug!(draft_id = %self.draft.id, step = self.current_step(), "advanced");
                Ok(StepOutcome::Moved)
            }
            Stage::Submitting | Stage::Submitted => Ok(StepOutcome::Ignored),
        }
    }

    /// Step back; never validated and never refused
    pub fn retreat(&mut self) {
        if !self.stage.is_details() {
            return;
        }
        let leaving = self.current_fields();
        self.errors.replace_for(leaving, ValidationErrors::new());

        let step = self.draft.category_data.step();
        if step <= 1 {
            self.draft.category_data.set_step(1);
            self.stage = Stage::CollectingContact;
        } else {
            self.draft.category_data.set_step(step - 1);
            self.stage = Stage::CollectingCategoryDetails;
        }
        debug!(draft_id = %self.draft.id, step = self.current_step(), "retreated");
    }

    /// Pick the applicant category.
    ///
    /// Allowed while no category is set or while on the contact step.
    /// Picking a different category starts its sub-flow from scratch;
    /// picking the live one keeps its answers.
    pub fn choose_category(&mut self, category: Category) -> bool {
        let allowed = !self.stage.is_locked()
            && (self.category().is_none() || self.stage == Stage::CollectingContact);
        if !allowed {
            warn!(draft_id = %self.draft.id, %category, "category change refused at this step");
            return false;
        }
        self.errors.remove(Field::Category);
        if self.category() == Some(category) {
            return true;
        }

        if let Some(previous) = self.category() {
            let stale: Vec<Field> = previous.detail_fields().collect();
            self.errors.replace_for(&stale, ValidationErrors::new());
        }
        self.draft.category_data = CategoryData::initial(category);
        debug!(draft_id = %self.draft.id, %category, "category chosen");
        true
    }

    /// Validate every required field, refreshing the inline errors
    pub fn validate_all(&mut self) -> Result<(), ValidationErrors> {
        let fields = match self.category() {
            Some(category) => category.required_fields(),
            None => {
                let mut fields = Field::CONTACT.to_vec();
                fields.push(Field::Category);
                fields
            }
        };
        self.gate(&fields)
    }

    /// Discard the draft and start over
    pub fn reset(&mut self) {
        debug!(draft_id = %self.draft.id, "form reset");
        *self = Self::new();
    }

    pub(crate) fn begin_submission(&mut self, at: DateTime<Utc>) {
        self.draft.submitted_at = Some(at);
        self.stage = Stage::Submitting;
    }

    pub(crate) fn finish_submission(&mut self, accepted: bool) {
        self.stage = if accepted {
            Stage::Submitted
        } else {
            Stage::SubmissionFailed
        };
    }

    /// Undo `begin_submission` when the attempt never left the client
    pub(crate) fn abort_submission(&mut self) {
        self.draft.submitted_at = None;
        self.stage = Stage::CollectingCategoryDetails;
    }

    /// Leave the failed state after the user acknowledged the banner
    pub(crate) fn recover_from_failure(&mut self) {
        if self.stage == Stage::SubmissionFailed {
            self.stage = Stage::CollectingCategoryDetails;
        }
    }

    fn gate(&mut self, fields: &[Field]) -> Result<(), ValidationErrors> {
        let result = validate_subset(fields, &self.draft.values());
        let reported = result.clone().err().unwrap_or_default();
        self.errors.replace_for(fields, reported);
        result
    }

    fn revalidate(&mut self, fields: &[Field]) {
        // The outcome is only recorded in the inline errors
        let _ = self.gate(fields);
    }
}
