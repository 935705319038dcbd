//! Multi-step lead capture form
//!
//! Collects an applicant's contact details, asks whether they are retired
//! or employed, walks them through the questions for that category and
//! posts the result as one JSON lead. The core is presentation-agnostic:
//! a shell feeds user events into [`LeadForm`] and renders from its
//! accessors.

pub mod config;
pub mod form;
pub mod state;
pub mod submission;

pub use config::FormConfig;
pub use form::LeadForm;
pub use state::forms::UnknownField;
pub use state::{Category, Field, FormDraft, Stage, StepOutcome, ValidationErrors};
pub use submission::{
    Acknowledgement, HttpLeadSink, LeadPayload, LeadSink, Navigator, SinkError, SubmissionResult,
    SubmitError,
};
