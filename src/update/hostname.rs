//! Splits FQDNs into the subdomain and registrable domain the provider
//! addresses records by, using the public suffix list.

use std::fmt;

use thiserror::Error;

const MAX_DOMAIN_LEN: usize = 255;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHostname {
    pub subdomain: String,
    pub domain: String,
}

impl fmt::Display for ParsedHostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.subdomain, self.domain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HostnameError {
    #[error("domain name too short")]
    DomainTooShort,
    #[error("domain name too long, must be at most 255 characters")]
    DomainTooLong,
    #[error("domain label too short")]
    LabelTooShort,
    #[error("domain label too long, must be at most 63 characters")]
    LabelTooLong,
    #[error("domain label starts with a dash")]
    LabelStartsWithDash,
    #[error("domain label ends with a dash")]
    LabelEndsWithDash,
    #[error("domain label contains invalid characters")]
    LabelInvalidCharacters,
    #[error("no registrable domain")]
    NoDomain,
    #[error("no subdomain")]
    NoSubdomain,
}

/// Parses every entry of a comma-separated hostname list, lazily and in
/// order, so callers can stop at the first failure.
pub fn parse_hostnames(
    input: &str,
) -> impl Iterator<Item = Result<ParsedHostname, HostnameError>> + '_ {
    input.split(',').map(parse_hostname)
}

pub fn parse_hostname(input: &str) -> Result<ParsedHostname, HostnameError> {
    let name = normalize(input);
    validate(&name)?;

    let domain = psl::domain_str(&name).ok_or(HostnameError::NoDomain)?;
    if domain.len() >= name.len() {
        return Err(HostnameError::NoSubdomain);
    }

    // `domain` is a suffix of `name`, preceded by the separating dot.
    let subdomain = &name[..name.len() - domain.len() - 1];

    Ok(ParsedHostname {
        subdomain: subdomain.to_string(),
        domain: domain.to_string(),
    })
}

fn normalize(input: &str) -> String {
    let name = input.trim().to_ascii_lowercase();
    match name.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

fn validate(name: &str) -> Result<(), HostnameError> {
    if name.is_empty() {
        return Err(HostnameError::DomainTooShort);
    }
    if name.len() > MAX_DOMAIN_LEN {
        return Err(HostnameError::DomainTooLong);
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(HostnameError::LabelTooShort);
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(HostnameError::LabelTooLong);
        }
        if label.starts_with('-') {
            return Err(HostnameError::LabelStartsWithDash);
        }
        if label.ends_with('-') {
            return Err(HostnameError::LabelEndsWithDash);
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(HostnameError::LabelInvalidCharacters);
        }
    }

    Ok(())
}
