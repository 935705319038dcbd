//! JSON body sent to the lead endpoint

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::state::{Category, FormDraft};

/// One submission attempt's body; keys match what the endpoint expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadPayload {
    #[serde(rename = "nomeCognome")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "citta")]
    pub city: String,
    #[serde(rename = "provincia")]
    pub province: String,
    #[serde(rename = "categoria")]
    pub category: Category,
    /// Always present; empty when the user left no note
    #[serde(rename = "domande")]
    pub note: String,
    /// Category answers keyed by payload key
    #[serde(rename = "dettagli", default)]
    pub details: BTreeMap<String, String>,
    #[serde(rename = "submittedAt", serialize_with = "rfc3339_millis")]
    pub submitted_at: DateTime<Utc>,
}

impl LeadPayload {
    /// Build the body from a draft; `None` until a category is chosen
    pub fn from_draft(draft: &FormDraft, submitted_at: DateTime<Utc>) -> Option<Self> {
        let category = draft.category()?;
        Some(Self {
            full_name: draft.personal.full_name.trim().to_string(),
            email: draft.personal.email.trim().to_string(),
            phone: draft.personal.phone.trim().to_string(),
            city: draft.city.trim().to_string(),
            province: draft.province.trim().to_string(),
            category,
            note: draft.note.trim().to_string(),
            details: draft
                .detail_answers()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
            submitted_at,
        })
    }
}

fn rfc3339_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}
