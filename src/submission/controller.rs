//! Submission controller: one outbound request per user attempt

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use super::error::SubmitError;
use super::payload::LeadPayload;
use super::traits::{LeadSink, Navigator};

/// Outcome of the latest submission attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionResult {
    /// No attempt yet, or the last error was dismissed
    #[default]
    Idle,
    Pending,
    Success,
    Failed { message: String },
}

impl SubmissionResult {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Sends leads through a [`LeadSink`] and tracks the in-flight state.
///
/// The `Pending` result is also the guard against double submission: it is
/// checked and set under one short lock that is never held across the
/// network call.
pub struct SubmissionController {
    sink: Arc<dyn LeadSink>,
    navigator: Arc<dyn Navigator>,
    confirmation_path: String,
    result: Mutex<SubmissionResult>,
    navigated: AtomicBool,
}

impl SubmissionController {
    pub fn new(
        sink: Arc<dyn LeadSink>,
        navigator: Arc<dyn Navigator>,
        confirmation_path: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            navigator,
            confirmation_path: confirmation_path.into(),
            result: Mutex::new(SubmissionResult::Idle),
            navigated: AtomicBool::new(false),
        }
    }

    pub fn result(&self) -> SubmissionResult {
        self.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().is_pending()
    }

    pub fn confirmation_path(&self) -> &str {
        &self.confirmation_path
    }

    /// Clear a failure banner; returns false if there was none
    pub fn dismiss_error(&self) -> bool {
        let mut result = self.lock();
        if matches!(*result, SubmissionResult::Failed { .. }) {
            *result = SubmissionResult::Idle;
            true
        } else {
            false
        }
    }

    /// Forget the previous draft's outcome
    pub fn reset(&self) {
        *self.lock() = SubmissionResult::Idle;
        self.navigated.store(false, Ordering::SeqCst);
    }

    /// Send `payload` once and record the outcome.
    ///
    /// Refused without a request while another attempt is pending or after
    /// a success. Server and transport failures are not errors here: they
    /// come back as [`SubmissionResult::Failed`].
    pub async fn submit(&self, payload: &LeadPayload) -> Result<SubmissionResult, SubmitError> {
        self.claim()?;
        info!(category = %payload.category, "submitting lead");

        let next = match self.sink.send(payload).await {
            Ok(ack) => {
                info!(status = ack.status, body = ?ack.body, "lead accepted");
                SubmissionResult::Success
            }
            Err(err) => {
                warn!(error = %err, "lead submission failed");
                SubmissionResult::Failed {
                    message: err.user_message(),
                }
            }
        };
        *self.lock() = next.clone();

        if next.is_success() && !self.navigated.swap(true, Ordering::SeqCst) {
            info!(destination = %self.confirmation_path, "navigating to confirmation");
            self.navigator.navigate(&self.confirmation_path);
        }
        Ok(next)
    }

    fn claim(&self) -> Result<(), SubmitError> {
        let mut result = self.lock();
        match *result {
            SubmissionResult::Pending => {
                warn!("submission already in progress");
                Err(SubmitError::AlreadyPending)
            }
            SubmissionResult::Success => Err(SubmitError::AlreadySubmitted),
            _ => {
                *result = SubmissionResult::Pending;
                Ok(())
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionResult> {
        self.result.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
