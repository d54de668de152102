//! Wire DTOs for the veritas REST backend.
//!
//! DESIGN
//! ======
//! These types mirror the backend's JSON payloads field for field
//! (camelCase on the wire) so serde round-trips stay lossless. Opaque
//! backend values such as the signup `session` blob and the blockchain
//! hash are carried as-is with no local derivation.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An authenticated user as returned by the auth endpoints.
///
/// Either fully populated or absent; there is no partial identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier (UUID string).
    pub id: String,
    /// Account email address.
    pub email: String,
    /// Given name; the backend may return an empty string.
    #[serde(default)]
    pub first_name: String,
    /// Family name; the backend may return an empty string.
    #[serde(default)]
    pub last_name: String,
    /// Account role (e.g. `"user"`, `"validator"`).
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".to_owned()
}

/// Login request body. Exists only for the duration of one request and is
/// never persisted.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Signup request body. Like [`Credentials`], transient by contract.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Result of a signup call.
///
/// `user` is `None` when the backend created an account pending email
/// confirmation instead of an active session. `session` is the backend's
/// session blob passed through unchanged, `Value::Null` included.
#[derive(Clone, Debug, PartialEq)]
pub struct SignupOutcome {
    pub user: Option<User>,
    pub session: Value,
}

/// Error body shape used by the backend for rejected requests.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure detail.
    #[serde(default)]
    pub detail: Option<String>,
    /// Machine-readable failure code, when the backend provides one.
    #[serde(default)]
    pub code: Option<String>,
}

/// Submission payload for `POST /api/verify`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// `"text"` or `"url"`.
    pub input_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Submitting user, when logged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl VerifyRequest {
    /// Build a raw-article submission.
    #[must_use]
    pub fn from_text(text: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            input_type: "text".to_owned(),
            text: Some(text.into()),
            url: None,
            user_id,
        }
    }

    /// Build a URL submission; the backend fetches the article itself.
    #[must_use]
    pub fn from_url(url: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            input_type: "url".to_owned(),
            text: None,
            url: Some(url.into()),
            user_id,
        }
    }
}

/// Verdict returned by `POST /api/verify`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationVerdict {
    /// `"real"`, `"fake"` or `"uncertain"`.
    pub status: String,
    /// Model confidence in percent.
    #[serde(default)]
    pub confidence: i64,
    /// Opaque ledger hash minted by the backend.
    #[serde(default)]
    pub blockchain_hash: String,
    #[serde(default)]
    pub analysis: Option<VerdictAnalysis>,
    /// ISO 8601 timestamp of the verdict.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Nested analysis block of a [`VerificationVerdict`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictAnalysis {
    #[serde(default)]
    pub credibility_score: i64,
    #[serde(default)]
    pub language_pattern: String,
    #[serde(default)]
    pub fact_check: String,
    #[serde(default)]
    pub source_reliability: String,
}

/// One history row from `GET /api/verifications`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub status: String,
    #[serde(default)]
    pub confidence: i64,
    #[serde(default)]
    pub blockchain_hash: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Display name of the verifying model.
    #[serde(default)]
    pub verifier: Option<String>,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}
