// Transport configuration for building the reqwest::Client.
//
// TLS policy and timeout are fixed when the client is built; changing
// either means constructing a new `UnifiClient`.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Verify against the bundled web PKI roots.
    #[default]
    Verify,
    /// Verify against a custom CA certificate loaded from a PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed controllers).
    DangerAcceptInvalid,
}

impl TlsMode {
    /// Map the plain "verify TLS?" flag onto a mode.
    pub fn from_verify_flag(verify: bool) -> Self {
        if verify {
            Self::Verify
        } else {
            Self::DangerAcceptInvalid
        }
    }
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// The client keeps no cookie store: session cookies are held by the
    /// dispatcher and attached explicitly, so logout can drop them.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("unifi-client/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        match &self.tls {
            TlsMode::Verify => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_verifies_certificates() {
        let config = TransportConfig::default();
        assert_eq!(config.tls, TlsMode::Verify);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn verify_flag_maps_to_mode() {
        assert_eq!(TlsMode::from_verify_flag(true), TlsMode::Verify);
        assert_eq!(
            TlsMode::from_verify_flag(false),
            TlsMode::DangerAcceptInvalid
        );
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa("/nonexistent/ca.pem".into()),
            ..TransportConfig::default()
        };
        assert!(matches!(config.build_client(), Err(Error::Tls(_))));
    }
}
