//! Verification API client.
//!
//! Submits articles or URLs for verification and reads the history feed.
//! The verdict (AI status, confidence, ledger hash) is computed entirely
//! by the backend and passed through as typed data.

#[cfg(test)]
#[path = "verify_test.rs"]
mod verify_test;

use std::time::Duration;

use super::types::{VerificationRecord, VerificationVerdict, VerifyRequest};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Error taxonomy for verification operations.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The backend could not be reached at all.
    #[error("cannot connect to the backend at {base_url}; make sure the API server is running")]
    BackendUnreachable { base_url: String },
    /// The backend rejected the request.
    #[error("verification request failed: HTTP {status}")]
    Rejected { status: u16 },
    /// A 2xx response carried a body this client cannot interpret.
    #[error("unexpected backend response: {0}")]
    UnexpectedResponse(String),
    /// The underlying HTTP client failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for `/api/verify` and `/api/verifications`.
pub struct VerifyClient {
    base_url: String,
    http: reqwest::Client,
}

impl VerifyClient {
    /// Build a client over `base_url` (no trailing slash required).
    ///
    /// Verification runs a model server-side, so the timeout is more
    /// generous than the auth gateway's.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, VerifyError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    fn classify_transport(&self, error: &reqwest::Error) -> VerifyError {
        if error.is_connect() || error.is_timeout() {
            return VerifyError::BackendUnreachable {
                base_url: self.base_url.clone(),
            };
        }
        VerifyError::UnexpectedResponse(error.to_string())
    }

    /// Submit content for verification and return the backend's verdict.
    ///
    /// # Errors
    ///
    /// `Rejected` on a non-2xx response, `BackendUnreachable` on a
    /// connectivity failure.
    pub async fn verify(&self, request: &VerifyRequest) -> Result<VerificationVerdict, VerifyError> {
        let response = self
            .http
            .post(self.endpoint("/verify"))
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::Rejected {
                status: status.as_u16(),
            });
        }

        response
            .json::<VerificationVerdict>()
            .await
            .map_err(|e| VerifyError::UnexpectedResponse(e.to_string()))
    }

    /// Fetch verification history, newest first.
    ///
    /// `user_id` narrows the feed to one submitter; `None` reads the
    /// public feed.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`VerifyClient::verify`].
    pub async fn history(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<VerificationRecord>, VerifyError> {
        let limit = limit.to_string();
        let mut query: Vec<(&str, &str)> = vec![("limit", limit.as_str())];
        if let Some(user_id) = user_id {
            query.push(("userId", user_id));
        }

        let response = self
            .http
            .get(self.endpoint("/verifications"))
            .query(&query)
            .send()
            .await
            .map_err(|e| self.classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::Rejected {
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<VerificationRecord>>()
            .await
            .map_err(|e| VerifyError::UnexpectedResponse(e.to_string()))
    }
}
