use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-request provider credentials, taken from the client's Basic Auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub team_id: String,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("team_id", &self.team_id)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

/// A record as stored by the provider. `id` is provider-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Body of a create or patch call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordChange {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub value: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RecordChange {
    pub fn a_record(name: &str, value: &str, ttl: u32) -> Self {
        Self {
            record_type: "A".to_string(),
            name: name.to_string(),
            value: value.to_string(),
            ttl,
            comment: None,
        }
    }
}

/// One page of a record listing. `next` is the cursor for the following
/// page, if there is one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPage {
    pub records: Vec<DnsRecord>,
    pub next: Option<i64>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("DNS provider API error ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("request to DNS provider failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to decode DNS provider response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("invalid DNS provider URL: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List one page of records for `domain`, starting at cursor `until`.
    async fn list_records(
        &self,
        domain: &str,
        until: Option<i64>,
    ) -> Result<RecordPage, ProviderError>;

    /// Create a new record under `domain`.
    async fn create_record(&self, domain: &str, change: &RecordChange)
        -> Result<(), ProviderError>;

    /// Overwrite the record identified by `record_id`.
    async fn update_record(
        &self,
        record_id: &str,
        change: &RecordChange,
    ) -> Result<(), ProviderError>;
}
