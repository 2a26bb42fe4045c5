//! DynDNS2 response tokens and their HTTP mapping.
//!
//! Every response is `text/plain`. Successful updates answer 200, malformed
//! requests 400, authentication failures 401 and provider write failures 502.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Successful outcome of an update request, carrying the reported IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// At least one record was created or changed.
    Good(String),
    /// Every record already pointed at the IP.
    NoChange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("notfqdn")]
    NotFqdn,
    #[error("badrequest")]
    BadRequest,
    #[error("badauth")]
    BadAuth,
    #[error("dnserr")]
    DnsErr,
}

pub type UpdateResult = Result<UpdateOutcome, UpdateError>;

impl UpdateOutcome {
    pub fn token(&self) -> String {
        match self {
            UpdateOutcome::Good(ip) => format!("good {}", ip),
            UpdateOutcome::NoChange(ip) => format!("nochg {}", ip),
        }
    }
}

impl UpdateError {
    pub fn token(&self) -> &'static str {
        match self {
            UpdateError::NotFqdn => "notfqdn",
            UpdateError::BadRequest => "badrequest",
            UpdateError::BadAuth => "badauth",
            UpdateError::DnsErr => "dnserr",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            UpdateError::NotFqdn | UpdateError::BadRequest => StatusCode::BAD_REQUEST,
            UpdateError::BadAuth => StatusCode::UNAUTHORIZED,
            UpdateError::DnsErr => StatusCode::BAD_GATEWAY,
        }
    }
}

fn plain_text(status: StatusCode, body: String) -> Response {
    let mut response = (status, body).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain"),
    );
    response
}

impl IntoResponse for UpdateOutcome {
    fn into_response(self) -> Response {
        plain_text(StatusCode::OK, self.token())
    }
}

impl IntoResponse for UpdateError {
    fn into_response(self) -> Response {
        plain_text(self.status(), self.token().to_string())
    }
}
