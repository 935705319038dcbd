//! Trait abstractions for the outbound collaborators, enabling mocking in tests

use async_trait::async_trait;
use serde_json::Value;

use super::error::SinkError;
use super::payload::LeadPayload;

/// Server acknowledgment of an accepted lead
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement {
    pub status: u16,
    /// JSON body if the server sent one; informational only
    pub body: Option<Value>,
}

/// Destination for submitted leads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadSink: Send + Sync {
    /// Send one lead; exactly one request per call
    async fn send(&self, payload: &LeadPayload) -> Result<Acknowledgement, SinkError>;
}

/// Client-side navigation performed after a successful submission
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &str);
}
