//! Submission error types

use thiserror::Error;

use crate::state::ValidationErrors;

/// Banner text used whenever the server gives no usable reason
pub const FALLBACK_ERROR_MESSAGE: &str =
    "Si è verificato un errore durante l'invio del form. Riprova più tardi.";

/// Failure reported by a [`LeadSink`](super::LeadSink)
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("server rejected the submission with status {status}")]
    Rejected { status: u16, reason: Option<String> },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl SinkError {
    /// Message for the error banner
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected {
                reason: Some(reason),
                ..
            } if !reason.trim().is_empty() => reason.clone(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Reasons a submit request is refused before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("the form has invalid fields: {0}")]
    Invalid(ValidationErrors),

    #[error("the form is not at its final step")]
    NotAtFinalStep,

    #[error("a submission is already in progress")]
    AlreadyPending,

    #[error("the form has already been submitted")]
    AlreadySubmitted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_reason_is_used_verbatim() {
        let err = SinkError::Rejected {
            status: 409,
            reason: Some("Email già registrata".to_string()),
        };
        assert_eq!(err.user_message(), "Email già registrata");
    }

    #[test]
    fn test_server_reason_keeps_surrounding_whitespace() {
        let err = SinkError::Rejected {
            status: 422,
            reason: Some(" Telefono non valido\n".to_string()),
        };
        assert_eq!(err.user_message(), " Telefono non valido\n");
    }

    #[test]
    fn test_missing_reason_falls_back() {
        let err = SinkError::Rejected {
            status: 500,
            reason: None,
        };
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn test_blank_reason_falls_back() {
        let err = SinkError::Rejected {
            status: 400,
            reason: Some("   ".to_string()),
        };
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn test_bad_endpoint_falls_back() {
        let err = SinkError::from(url::Url::parse("not a url").unwrap_err());
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
        assert!(err.to_string().starts_with("invalid endpoint"));
    }
}
