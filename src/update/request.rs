use std::fmt;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::response::UpdateError;
use crate::dns::Credentials;

/// Clients differ on whether they pad the encoded credentials.
const BASIC_AUTH_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Raw query parameters of a DynDNS2 update call.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateParams {
    pub hostname: Option<String>,
    pub myip: Option<String>,
}

/// A validated update request. `username` is the provider team id and
/// `password` the API token.
#[derive(Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub ip: String,
}

impl fmt::Debug for UpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateRequest")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("hostname", &self.hostname)
            .field("ip", &self.ip)
            .finish()
    }
}

impl UpdateRequest {
    /// Validates the query and `authorization` header, in that order:
    /// hostname, then myip, then credentials.
    pub fn from_parts(
        params: UpdateParams,
        authorization: Option<&str>,
    ) -> Result<Self, UpdateError> {
        let hostname = match params.hostname.filter(|h| !h.is_empty()) {
            Some(h) => h,
            None => {
                warn!("hostname query parameter not provided");
                return Err(UpdateError::NotFqdn);
            }
        };

        let ip = match params.myip.filter(|ip| !ip.is_empty()) {
            Some(ip) => ip,
            None => {
                warn!("myip query parameter not provided");
                return Err(UpdateError::BadRequest);
            }
        };

        let Some(authorization) = authorization else {
            warn!("authorization header not provided");
            return Err(UpdateError::BadAuth);
        };

        let auth = parse_basic_auth(authorization).map_err(|e| {
            warn!("invalid authorization header: {}", e);
            UpdateError::BadAuth
        })?;

        Ok(Self {
            username: auth.username,
            password: auth.password,
            hostname,
            ip,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            team_id: self.username.clone(),
            token: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("not a Basic authorization scheme")]
    NotBasic,
    #[error("credentials are not valid base64")]
    InvalidBase64,
    #[error("credentials are not valid UTF-8")]
    InvalidUtf8,
    #[error("credentials are missing the ':' separator")]
    MissingSeparator,
}

/// Parses `Basic <base64(username:password)>`. The scheme is matched
/// case-insensitively and the password may itself contain colons.
pub fn parse_basic_auth(header: &str) -> Result<BasicAuth, AuthError> {
    let (scheme, encoded) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::NotBasic)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::NotBasic);
    }

    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(AuthError::InvalidBase64);
    }

    let decoded = BASIC_AUTH_ENGINE
        .decode(encoded)
        .map_err(|_| AuthError::InvalidBase64)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidUtf8)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MissingSeparator)?;

    Ok(BasicAuth {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    fn encode(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    fn params(hostname: Option<&str>, myip: Option<&str>) -> UpdateParams {
        UpdateParams {
            hostname: hostname.map(str::to_string),
            myip: myip.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_basic_auth() {
        let auth = parse_basic_auth(&encode("team_1:token")).unwrap();
        assert_eq!(auth.username, "team_1");
        assert_eq!(auth.password, "token");
    }

    #[test]
    fn test_parse_basic_auth_password_with_colon() {
        let auth = parse_basic_auth(&encode("team:a:b")).unwrap();
        assert_eq!(auth.username, "team");
        assert_eq!(auth.password, "a:b");
    }

    #[test]
    fn test_parse_basic_auth_lenient_scheme_and_padding() {
        // "team:tok" encodes to "dGVhbTp0b2s=" with padding
        let auth = parse_basic_auth("  bAsIc   dGVhbTp0b2s  ").unwrap();
        assert_eq!(auth.username, "team");
        assert_eq!(auth.password, "tok");
    }

    #[test]
    fn test_parse_basic_auth_rejects() {
        assert_eq!(parse_basic_auth("Bearer abc"), Err(AuthError::NotBasic));
        assert_eq!(parse_basic_auth("Basic"), Err(AuthError::NotBasic));
        assert_eq!(parse_basic_auth("Basic    "), Err(AuthError::NotBasic));
        assert_eq!(parse_basic_auth("Basic !!!"), Err(AuthError::InvalidBase64));
        assert_eq!(
            parse_basic_auth(&encode("no-separator")),
            Err(AuthError::MissingSeparator)
        );
    }

    #[test]
    fn test_from_parts() {
        let request = UpdateRequest::from_parts(
            params(Some("home.example.com"), Some("1.2.3.4")),
            Some(&encode("team_1:tok")),
        )
        .unwrap();

        assert_eq!(request.hostname, "home.example.com");
        assert_eq!(request.ip, "1.2.3.4");
        assert_eq!(
            request.credentials(),
            Credentials {
                team_id: "team_1".to_string(),
                token: "tok".to_string(),
            }
        );
    }

    #[test]
    fn test_from_parts_validation_order() {
        let auth = encode("team_1:tok");

        assert_eq!(
            UpdateRequest::from_parts(params(None, None), None),
            Err(UpdateError::NotFqdn)
        );
        assert_eq!(
            UpdateRequest::from_parts(params(Some(""), Some("1.2.3.4")), Some(&auth)),
            Err(UpdateError::NotFqdn)
        );
        assert_eq!(
            UpdateRequest::from_parts(params(Some("a.example.com"), None), None),
            Err(UpdateError::BadRequest)
        );
        assert_eq!(
            UpdateRequest::from_parts(params(Some("a.example.com"), Some("")), Some(&auth)),
            Err(UpdateError::BadRequest)
        );
        assert_eq!(
            UpdateRequest::from_parts(params(Some("a.example.com"), Some("1.2.3.4")), None),
            Err(UpdateError::BadAuth)
        );
        assert_eq!(
            UpdateRequest::from_parts(
                params(Some("a.example.com"), Some("1.2.3.4")),
                Some("Basic %%%")
            ),
            Err(UpdateError::BadAuth)
        );
    }

    #[test]
    fn test_ip_is_not_validated() {
        let request = UpdateRequest::from_parts(
            params(Some("a.example.com"), Some("not-an-ip")),
            Some(&encode("t:k")),
        )
        .unwrap();
        assert_eq!(request.ip, "not-an-ip");
    }

    #[test]
    fn test_debug_hides_password() {
        let request = UpdateRequest::from_parts(
            params(Some("a.example.com"), Some("1.2.3.4")),
            Some(&encode("team_1:hunter2")),
        )
        .unwrap();
        assert!(!format!("{:?}", request).contains("hunter2"));
    }
}
