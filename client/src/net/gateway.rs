//! Auth protocol client for the veritas backend.
//!
//! ARCHITECTURE
//! ============
//! Four intents (login, signup, logout, current-user) are translated into
//! HTTP calls under `/api/auth/*` and normalized into [`AuthError`]. The
//! backend is the sole authority on credential correctness; the vault copy
//! of the user is a cache that must be re-validated before it is trusted.
//!
//! ERROR HANDLING
//! ==============
//! User-initiated operations (login, signup) surface failures to the
//! caller. Session restore and logout never do: restore degrades to a
//! logged-out `None` and logout is best-effort by contract.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::types::{Credentials, ErrorBody, SignupData, SignupOutcome, User};
use crate::persist::SessionVault;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend error code marking an account that has not confirmed its email.
const EMAIL_NOT_CONFIRMED_CODE: &str = "email_not_confirmed";

/// Legacy detection: older backends only encode the sub-case in the
/// human-readable detail text.
const EMAIL_NOT_CONFIRMED_MARKER: &str = "Email not confirmed";

/// Error taxonomy for authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Login rejected by the backend. `email_not_confirmed` marks the
    /// sub-case callers surface as an additional notification next to the
    /// generic failure.
    #[error("{detail}")]
    InvalidCredentials {
        detail: String,
        email_not_confirmed: bool,
    },
    /// Signup rejected by the backend.
    #[error("{detail}")]
    SignupFailed { detail: String },
    /// The backend could not be reached at all (connection refused, name
    /// resolution, timeout).
    #[error("cannot connect to the backend at {base_url}; make sure the API server is running")]
    BackendUnreachable { base_url: String },
    /// A 2xx response carried a body this client cannot interpret.
    #[error("unexpected backend response: {0}")]
    UnexpectedResponse(String),
    /// Another login/signup/logout is still in flight on this session.
    #[error("another authentication operation is already in flight")]
    OperationInFlight,
    /// The underlying HTTP client could not be constructed.
    #[error("http client init failed: {0}")]
    Client(#[from] reqwest::Error),
}

impl AuthError {
    /// Whether this failure carries the email-not-confirmed sub-case.
    #[must_use]
    pub fn is_email_not_confirmed(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials {
                email_not_confirmed: true,
                ..
            }
        )
    }
}

/// HTTP client for the `/api/auth/*` surface.
///
/// Owns the coupling between backend responses and the persisted session
/// record: a successful login/signup writes the vault before returning,
/// and logout always clears it, so callers never observe the network and
/// the vault disagreeing.
pub struct AuthGateway {
    base_url: String,
    http: reqwest::Client,
    vault: Arc<dyn SessionVault>,
}

impl AuthGateway {
    /// Build a gateway over `base_url` (no trailing slash required) and
    /// the given vault, with the default request timeout.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        vault: Arc<dyn SessionVault>,
    ) -> Result<Self, AuthError> {
        Self::with_timeout(base_url, vault, DEFAULT_TIMEOUT)
    }

    /// Build a gateway with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        vault: Arc<dyn SessionVault>,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http,
            vault,
        })
    }

    /// Base URL this gateway talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Vault this gateway persists the session record into.
    #[must_use]
    pub fn vault(&self) -> Arc<dyn SessionVault> {
        Arc::clone(&self.vault)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    fn classify_transport(&self, error: &reqwest::Error) -> AuthError {
        if error.is_connect() || error.is_timeout() {
            return AuthError::BackendUnreachable {
                base_url: self.base_url.clone(),
            };
        }
        AuthError::UnexpectedResponse(error.to_string())
    }

    /// Authenticate with email and password.
    ///
    /// On success the returned user has already been persisted to the
    /// vault.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` when the backend rejects the credentials,
    /// `BackendUnreachable` when it cannot be reached.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let response = self
            .http
            .post(self.endpoint("/auth/login"))
            .json(credentials)
            .send()
            .await
            .map_err(|e| self.classify_transport(&e))?;

        if !response.status().is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            let detail = body
                .detail
                .unwrap_or_else(|| "Invalid email or password".to_owned());
            let email_not_confirmed = body.code.as_deref() == Some(EMAIL_NOT_CONFIRMED_CODE)
                || detail.contains(EMAIL_NOT_CONFIRMED_MARKER);
            return Err(AuthError::InvalidCredentials {
                detail,
                email_not_confirmed,
            });
        }

        let user = response
            .json::<User>()
            .await
            .map_err(|e| AuthError::UnexpectedResponse(e.to_string()))?;
        self.persist(&user);
        Ok(user)
    }

    /// Create an account.
    ///
    /// The outcome's `user` is `None` when the backend created an account
    /// pending confirmation rather than an active session; only an active
    /// user is persisted. The backend's `session` value is passed through
    /// unchanged.
    ///
    /// # Errors
    ///
    /// `SignupFailed` on an application-level rejection,
    /// `BackendUnreachable` on a connectivity failure.
    pub async fn signup(&self, data: &SignupData) -> Result<SignupOutcome, AuthError> {
        let response = self
            .http
            .post(self.endpoint("/auth/signup"))
            .json(data)
            .send()
            .await
            .map_err(|e| self.classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            let detail = body
                .detail
                .unwrap_or_else(|| format!("Signup failed: {status}"));
            return Err(AuthError::SignupFailed { detail });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| AuthError::UnexpectedResponse(e.to_string()))?;
        let session = body.get("session").cloned().unwrap_or(Value::Null);
        let user = serde_json::from_value::<User>(body).ok();
        if let Some(user) = &user {
            self.persist(user);
        }
        Ok(SignupOutcome { user, session })
    }

    /// End the session. Best-effort on the network; the vault is always
    /// cleared, so this never fails from the caller's perspective.
    pub async fn logout(&self) {
        if let Err(error) = self.http.post(self.endpoint("/auth/logout")).send().await {
            tracing::debug!(%error, "logout notification failed");
        }
        self.discard();
    }

    /// Restore and re-validate the cached session.
    ///
    /// Resolves `None` without touching the network when nothing is
    /// persisted. A cached record that cannot be parsed or re-validated
    /// is discarded; the backend may freshen fields (such as `role`)
    /// between checks, so a successful validation re-persists the record.
    pub async fn current_user(&self) -> Option<User> {
        let raw = self.vault.load()?;

        let cached = match serde_json::from_str::<User>(&raw) {
            Ok(user) => user,
            Err(error) => {
                tracing::warn!(%error, "persisted session record unparseable; treating as logged out");
                self.discard();
                return None;
            }
        };

        let response = match self
            .http
            .get(self.endpoint("/auth/me"))
            .query(&[("userId", cached.id.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!(%error, "session re-validation request failed");
                self.discard();
                return None;
            }
        };

        if !response.status().is_success() {
            self.discard();
            return None;
        }

        // The backend answers `null` for an identity it no longer knows.
        match response.json::<Option<User>>().await {
            Ok(Some(fresh)) => {
                self.persist(&fresh);
                Some(fresh)
            }
            Ok(None) => {
                self.discard();
                None
            }
            Err(error) => {
                tracing::debug!(%error, "session re-validation returned an unreadable body");
                self.discard();
                None
            }
        }
    }

    fn persist(&self, user: &User) {
        if let Ok(json) = serde_json::to_string(user) {
            if let Err(error) = self.vault.save(&json) {
                tracing::warn!(%error, "failed to persist session record");
            }
        }
    }

    fn discard(&self) {
        if let Err(error) = self.vault.clear() {
            tracing::warn!(%error, "failed to clear session record");
        }
    }
}
