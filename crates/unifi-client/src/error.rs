use thiserror::Error;

/// Top-level error type for the `unifi-client` crate.
///
/// Every failure the session dispatcher can produce maps to exactly one
/// variant, so callers can pick a remediation by matching: re-prompt for
/// credentials on [`AuthenticationFailed`](Self::AuthenticationFailed),
/// call `login()` on [`LoginRequired`](Self::LoginRequired), back off on
/// [`is_transient`](Self::is_transient) errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login was rejected or the controller could not be reached while
    /// logging in.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// An API call was attempted without an authenticated session.
    #[error("Login required -- call login() before issuing API requests")]
    LoginRequired,

    /// The controller kept reporting an expired session after the single
    /// re-login retry.
    #[error("Session expired -- re-authentication did not restore access")]
    SessionExpired,

    // ── Configuration ───────────────────────────────────────────────
    /// Base URL is malformed or uses a scheme the controller cannot serve.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Site identifier is empty.
    #[error("Invalid site name: {0:?}")]
    InvalidSiteName(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request exceeded the configured timeout.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: std::time::Duration },

    /// URL construction failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate loading failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// HTTP verb outside the set the controller accepts.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(reqwest::Method),

    // ── API ─────────────────────────────────────────────────────────
    /// Controller answered with a non-success status or an error envelope
    /// (`meta.rc != "ok"`).
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not the JSON shape we expected.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Request payload could not be encoded as JSON.
    #[error("Failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::LoginRequired)
    }

    /// Returns `true` if the caller simply needs to log in first.
    pub fn is_login_required(&self) -> bool {
        matches!(self, Self::LoginRequired)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status reported by the controller, if the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Classify a transport error, promoting timeouts to [`Error::Timeout`].
    pub(crate) fn from_transport(err: reqwest::Error, timeout: std::time::Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout }
        } else {
            Self::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_required_is_auth_expired() {
        assert!(Error::LoginRequired.is_auth_expired());
        assert!(Error::LoginRequired.is_login_required());
        assert!(!Error::SessionExpired.is_login_required());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Api {
            status: 503,
            message: "maintenance".into(),
        };
        assert!(err.is_transient());
        assert_eq!(err.status(), Some(503));

        let err = Error::Api {
            status: 400,
            message: "api.err.Invalid".into(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = Error::Api {
            status: 403,
            message: "insufficient permissions".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (HTTP 403): insufficient permissions"
        );
    }

    #[test]
    fn sub_second_timeout_keeps_precision() {
        let err = Error::Timeout {
            timeout: std::time::Duration::from_millis(300),
        };
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "Request timed out after 300ms");
    }
}
