//! Lead submission: payload, transport and the controller driving it

mod client;
mod controller;
mod error;
mod payload;
mod traits;

pub use client::HttpLeadSink;
pub use controller::{SubmissionController, SubmissionResult};
pub use error::{SinkError, SubmitError, FALLBACK_ERROR_MESSAGE};
pub use payload::LeadPayload;
pub use traits::{Acknowledgement, LeadSink, Navigator};

#[cfg(test)]
pub use traits::{MockLeadSink, MockNavigator};
