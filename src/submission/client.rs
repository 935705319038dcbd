//! HTTP client for the lead endpoint
//!
//! Posts the JSON payload once per call and interprets the response. Any
//! 2xx counts as acceptance; anything else is a rejection whose reason is
//! taken from an `{"error": "..."}` body when the server sends one.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::error::SinkError;
use super::payload::LeadPayload;
use super::traits::{Acknowledgement, LeadSink};
use crate::config::FormConfig;

/// Error body returned by the endpoint on rejection
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// [`LeadSink`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpLeadSink {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpLeadSink {
    /// Create a sink posting to `submit_path` resolved against `base_url`
    pub fn new(base_url: &str, submit_path: &str, timeout: Duration) -> Result<Self, SinkError> {
        let endpoint = Url::parse(base_url)?.join(submit_path)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    pub fn from_config(config: &FormConfig) -> Result<Self, SinkError> {
        Self::new(config.base_url(), config.submit_path(), config.timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LeadSink for HttpLeadSink {
    async fn send(&self, payload: &LeadPayload) -> Result<Acknowledgement, SinkError> {
        debug!(endpoint = %self.endpoint, "posting lead");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        // An unreadable body is treated like an empty one
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let reason = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                reason,
            });
        }

        Ok(Acknowledgement {
            status: status.as_u16(),
            body: serde_json::from_str(&body).ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let sink = HttpLeadSink::new(
            "https://lead.example.it",
            "/api/forms/immobiliare",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            sink.endpoint().as_str(),
            "https://lead.example.it/api/forms/immobiliare"
        );
    }

    #[test]
    fn test_absolute_path_replaces_base_path() {
        let sink =
            HttpLeadSink::new("http://localhost:3000/landing/", "/api/lead", Duration::from_secs(5))
                .unwrap();
        assert_eq!(sink.endpoint().as_str(), "http://localhost:3000/api/lead");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpLeadSink::new("no scheme here", "/api", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, SinkError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_default_config() {
        let sink = HttpLeadSink::from_config(&FormConfig::default()).unwrap();
        assert_eq!(
            sink.endpoint().as_str(),
            "http://127.0.0.1:3000/api/forms/immobiliare"
        );
    }
}
