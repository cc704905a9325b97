//! HTTP fetch boundary.
//!
//! # Responsibilities
//! - Perform a single GET with reqwest
//! - Map transport outcomes into the `Failure` taxonomy
//! - Drive repeated attempts through an `Invoker`
//!
//! # Mapping
//! - reqwest timeout → `Failure::Timeout`
//! - connect / request / body errors → `Failure::Network`
//! - non-2xx response → `Failure::HttpStatus`
//! - anything else → `Failure::Other`

use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::resilience::failure::Failure;
use crate::resilience::retries::Invoker;
use crate::resilience::timeouts::with_deadline;

/// Header carrying the correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

// Cap on how much of an error body ends up in a failure message.
const MAX_ERROR_BODY: usize = 256;

/// Successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    pub status: u16,
    pub body: String,
}

/// Thin reqwest wrapper that reports failures in taxonomy form.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    attempt_timeout: Option<Duration>,
    request_id: Option<String>,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            attempt_timeout: None,
            request_id: None,
        }
    }

    /// Deadline applied to each individual attempt.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Correlation id sent as `x-request-id` on every attempt.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// One GET attempt.
    pub async fn get(&self, url: &Url) -> Result<FetchedResponse, Failure> {
        match self.attempt_timeout {
            Some(deadline) => with_deadline(deadline, self.send(url)).await,
            None => self.send(url).await,
        }
    }

    /// GET with retries under the given invoker.
    pub async fn get_with_retry(&self, url: &Url, invoker: Invoker) -> Result<FetchedResponse, Failure> {
        invoker.invoke(move || self.get(url)).await
    }

    async fn send(&self, url: &Url) -> Result<FetchedResponse, Failure> {
        let mut request = self.client.get(url.clone());
        if let Some(id) = &self.request_id {
            request = request.header(X_REQUEST_ID, id);
        }

        let response = request.send().await.map_err(|e| classify_error(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| classify_error(&e))?;

        if let Some(failure) = classify_status(status, &body) {
            tracing::debug!(url = %url, status = %status, "Non-success response");
            return Err(failure);
        }

        Ok(FetchedResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Map a reqwest error into the failure taxonomy.
pub fn classify_error(err: &reqwest::Error) -> Failure {
    if err.is_timeout() {
        Failure::Timeout { after: None }
    } else if err.is_connect() || err.is_request() || err.is_body() {
        Failure::network(err.to_string())
    } else if let Some(status) = err.status() {
        Failure::http(status.as_u16(), err.to_string())
    } else {
        Failure::other(err.to_string())
    }
}

/// `None` for 2xx, otherwise an `HttpStatus` failure carrying a body excerpt.
pub fn classify_status(status: StatusCode, body: &str) -> Option<Failure> {
    if status.is_success() {
        return None;
    }

    let reason = status.canonical_reason().unwrap_or("");
    let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
    let message = if excerpt.trim().is_empty() {
        reason.to_string()
    } else {
        format!("{}: {}", reason, excerpt.trim())
    };
    Some(Failure::http(status.as_u16(), message))
}
