//! DynDNS2 update handling: validate, parse, reconcile, answer.

mod hostname;
mod reconcile;
mod request;
mod response;

pub use hostname::{parse_hostname, parse_hostnames, HostnameError, ParsedHostname};
pub use reconcile::{Change, Reconciler};
pub use request::{parse_basic_auth, AuthError, BasicAuth, UpdateParams, UpdateRequest};
pub use response::{UpdateError, UpdateOutcome, UpdateResult};

use tracing::warn;

/// Reconciles every hostname of `request` in order. The first hostname
/// that fails to parse or reconcile ends the request with its token;
/// hostnames after it are never touched.
pub async fn apply(request: &UpdateRequest, reconciler: &Reconciler<'_>) -> UpdateResult {
    let mut changed = false;

    for parsed in parse_hostnames(&request.hostname) {
        let target = parsed.map_err(|e| {
            warn!("Invalid hostname in {:?}: {}", request.hostname, e);
            UpdateError::NotFqdn
        })?;

        match reconciler.reconcile(&target, &request.ip).await? {
            Change::Created | Change::Updated => changed = true,
            Change::Unchanged => {}
        }
    }

    if changed {
        Ok(UpdateOutcome::Good(request.ip.clone()))
    } else {
        Ok(UpdateOutcome::NoChange(request.ip.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::reconcile::tests::{record, MemoryProvider};
    use super::*;
    use reqwest::StatusCode;

    fn request(hostname: &str, ip: &str) -> UpdateRequest {
        UpdateRequest {
            username: "team_1".to_string(),
            password: "tok".to_string(),
            hostname: hostname.to_string(),
            ip: ip.to_string(),
        }
    }

    #[tokio::test]
    async fn test_single_hostname_good() {
        let provider = MemoryProvider::default();
        let reconciler = Reconciler::new(&provider, 60, 5);

        let result = apply(&request("home.example.com", "5.6.7.8"), &reconciler).await;
        assert_eq!(result, Ok(UpdateOutcome::Good("5.6.7.8".to_string())));
    }

    #[tokio::test]
    async fn test_all_unchanged_is_nochg() {
        let provider = MemoryProvider::with_records(vec![
            record("rec_1", "a", "A", "5.6.7.8"),
            record("rec_2", "b", "A", "5.6.7.8"),
        ]);
        let reconciler = Reconciler::new(&provider, 60, 5);

        let result = apply(&request("a.example.com,b.example.com", "5.6.7.8"), &reconciler).await;
        assert_eq!(result, Ok(UpdateOutcome::NoChange("5.6.7.8".to_string())));
    }

    #[tokio::test]
    async fn test_any_change_is_good() {
        let provider = MemoryProvider::with_records(vec![record("rec_1", "a", "A", "5.6.7.8")]);
        let reconciler = Reconciler::new(&provider, 60, 5);

        let result = apply(&request("a.example.com,b.example.com", "5.6.7.8"), &reconciler).await;
        assert_eq!(result, Ok(UpdateOutcome::Good("5.6.7.8".to_string())));
        assert_eq!(
            provider.calls(),
            vec![
                "list example.com None",
                "list example.com None",
                "create example.com b 5.6.7.8 60"
            ]
        );
    }

    #[tokio::test]
    async fn test_parse_failure_stops_later_hostnames() {
        let provider = MemoryProvider::default();
        let reconciler = Reconciler::new(&provider, 60, 5);

        let result = apply(
            &request("a.example.com,example.com,c.example.com", "5.6.7.8"),
            &reconciler,
        )
        .await;

        assert_eq!(result, Err(UpdateError::NotFqdn));
        assert_eq!(
            provider.calls(),
            vec!["list example.com None", "create example.com a 5.6.7.8 60"]
        );
    }

    #[tokio::test]
    async fn test_list_failure_is_badauth_for_any_count() {
        let provider = MemoryProvider {
            list_status: Some(StatusCode::UNAUTHORIZED),
            ..Default::default()
        };
        let reconciler = Reconciler::new(&provider, 60, 5);

        let result = apply(&request("a.example.com,b.example.com", "5.6.7.8"), &reconciler).await;
        assert_eq!(result, Err(UpdateError::BadAuth));
        assert_eq!(provider.calls().len(), 1);
    }
}
