use tracing::{error, info, warn};

use super::hostname::ParsedHostname;
use super::response::UpdateError;
use crate::dns::{DnsProvider, DnsRecord, ProviderError, RecordChange};

/// What reconciliation did to a single hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Created,
    Updated,
    Unchanged,
}

/// Makes a provider's A record for one hostname match a reported IP.
pub struct Reconciler<'a> {
    provider: &'a dyn DnsProvider,
    default_ttl: u32,
    max_pages: u32,
}

impl<'a> Reconciler<'a> {
    pub fn new(provider: &'a dyn DnsProvider, default_ttl: u32, max_pages: u32) -> Self {
        Self {
            provider,
            default_ttl,
            max_pages: max_pages.max(1),
        }
    }

    pub async fn reconcile(
        &self,
        target: &ParsedHostname,
        ip: &str,
    ) -> Result<Change, UpdateError> {
        let existing = self.find_record(target).await?;

        match existing {
            Some(record) if record.value == ip => {
                info!("No change to existing record for {}: {}", target, ip);
                Ok(Change::Unchanged)
            }
            Some(record) => {
                info!(
                    "Updating existing record for {} from {} to {}",
                    target, record.value, ip
                );
                let mut change = RecordChange::a_record(
                    &target.subdomain,
                    ip,
                    record.ttl.filter(|ttl| *ttl > 0).unwrap_or(self.default_ttl),
                );
                change.comment = record.comment;

                self.provider
                    .update_record(&record.id, &change)
                    .await
                    .map_err(|e| write_failed(target, ip, e))?;
                Ok(Change::Updated)
            }
            None => {
                info!("Creating new record for {}: {}", target, ip);
                let change = RecordChange::a_record(&target.subdomain, ip, self.default_ttl);

                self.provider
                    .create_record(&target.domain, &change)
                    .await
                    .map_err(|e| write_failed(target, ip, e))?;
                Ok(Change::Created)
            }
        }
    }

    /// Walks the record listing page by page until the A record for
    /// `target` turns up or the listing ends.
    async fn find_record(
        &self,
        target: &ParsedHostname,
    ) -> Result<Option<DnsRecord>, UpdateError> {
        let mut until = None;

        for _ in 0..self.max_pages {
            let page = self
                .provider
                .list_records(&target.domain, until)
                .await
                .map_err(|e| list_failed(target, e))?;

            let found = page
                .records
                .into_iter()
                .find(|r| r.name == target.subdomain && r.record_type == "A");
            if found.is_some() {
                return Ok(found);
            }

            match page.next {
                Some(next) => until = Some(next),
                None => return Ok(None),
            }
        }

        // Creating here could duplicate a record on a page never read.
        warn!(
            "Record listing for {} exceeded {} pages, refusing to create",
            target.domain, self.max_pages
        );
        Err(UpdateError::DnsErr)
    }
}

fn list_failed(target: &ParsedHostname, err: ProviderError) -> UpdateError {
    warn!("Failed to list records for {}: {}", target.domain, err);
    match err {
        ProviderError::Status { .. } => UpdateError::BadAuth,
        _ => UpdateError::DnsErr,
    }
}

fn write_failed(target: &ParsedHostname, ip: &str, err: ProviderError) -> UpdateError {
    error!("Failed to update record for {}: {}: {}", target, ip, err);
    UpdateError::DnsErr
}
