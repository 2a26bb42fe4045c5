use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use tracing::debug;

use super::provider::{
    Credentials, DnsProvider, DnsRecord, ProviderError, RecordChange, RecordPage,
};

pub const VERCEL_API_BASE: &str = "https://api.vercel.com";

/// Vercel DNS API client bound to one team's credentials.
pub struct VercelProvider {
    client: Client,
    api_base: Url,
    credentials: Credentials,
    page_limit: u32,
}

#[derive(Debug, Deserialize)]
struct ListRecordsResponse {
    records: Vec<DnsRecord>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default)]
    next: Option<i64>,
}

impl VercelProvider {
    pub fn new(client: Client, api_base: Url, credentials: Credentials, page_limit: u32) -> Self {
        Self {
            client,
            api_base,
            credentials,
            page_limit,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.api_base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ProviderError::InvalidUrl(self.api_base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .append_pair("teamId", &self.credentials.team_id);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ProviderError> {
        let response = request
            .bearer_auth(&self.credentials.token)
            .send()
            .await
            .map_err(ProviderError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl DnsProvider for VercelProvider {
    async fn list_records(
        &self,
        domain: &str,
        until: Option<i64>,
    ) -> Result<RecordPage, ProviderError> {
        let mut url = self.endpoint(&["v4", "domains", domain, "records"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &self.page_limit.to_string());
            if let Some(until) = until {
                query.append_pair("until", &until.to_string());
            }
        }
        debug!("Listing records: {}", url);

        let response = self.send(self.client.get(url)).await?;
        let data: ListRecordsResponse = response.json().await.map_err(ProviderError::Decode)?;

        Ok(RecordPage {
            records: data.records,
            next: data.pagination.and_then(|p| p.next),
        })
    }

    async fn create_record(
        &self,
        domain: &str,
        change: &RecordChange,
    ) -> Result<(), ProviderError> {
        let url = self.endpoint(&["v2", "domains", domain, "records"])?;
        debug!("Creating record: {}", url);

        self.send(self.client.post(url).json(change)).await?;
        Ok(())
    }

    async fn update_record(
        &self,
        record_id: &str,
        change: &RecordChange,
    ) -> Result<(), ProviderError> {
        let url = self.endpoint(&["v1", "domains", "records", record_id])?;
        debug!("Patching record: {}", url);

        self.send(self.client.patch(url).json(change)).await?;
        Ok(())
    }
}
