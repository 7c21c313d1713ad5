// Session dispatcher
//
// Wraps `reqwest::Client` with controller URL construction, session header
// injection, envelope validation, and the single re-login retry. Endpoint
// modules (devices, clients, etc.) are inherent methods in separate files
// that all funnel through `request`.

use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, HeaderMap};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::ConnectionConfig;
use crate::error::Error;
use crate::flavor::ControllerFlavor;
use crate::models::{ApiResponse, EnvelopeMeta, Meta, UnifiOsError};
use crate::session::{SessionState, SessionTokens};

/// Envelope message the controller uses for a missing or expired session.
const LOGIN_REQUIRED_MSG: &str = "api.err.LoginRequired";

/// A controller path, relative to the flavor-specific API root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Site-scoped: `{base}{prefix}/api/s/{site}/{path}`.
    Site(String),
    /// Controller-level: `{base}{prefix}/api/{path}`.
    Api(String),
}

impl Endpoint {
    pub fn site(path: impl Into<String>) -> Self {
        Self::Site(path.into())
    }

    pub fn api(path: impl Into<String>) -> Self {
        Self::Api(path.into())
    }
}

impl From<&str> for Endpoint {
    fn from(path: &str) -> Self {
        Self::Site(path.to_owned())
    }
}

impl From<String> for Endpoint {
    fn from(path: String) -> Self {
        Self::Site(path)
    }
}

/// Session-authenticated client for one controller and one site.
///
/// Owns its [`ConnectionConfig`] and [`SessionState`]. Every API call goes
/// through [`request`](Self::request), which refuses to touch the network
/// until [`login`](Self::login) has succeeded. Methods that can change the
/// session take `&mut self`; share an instance across tasks only behind a
/// lock, or give each task its own client.
pub struct UnifiClient {
    http: reqwest::Client,
    config: ConnectionConfig,
    pub(crate) session: SessionState,
}

impl UnifiClient {
    /// Build a client, constructing the HTTP stack from the config's
    /// TLS and timeout settings.
    pub fn new(config: ConnectionConfig) -> Result<Self, Error> {
        let http = config.transport().build_client()?;
        Ok(Self::with_client(config, http))
    }

    /// Build a client around a pre-built `reqwest::Client`.
    ///
    /// The config's TLS and timeout settings are not applied to `http`.
    pub fn with_client(config: ConnectionConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            config,
            session: SessionState::Unauthenticated,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// The current site identifier.
    pub fn site(&self) -> &str {
        self.config.site()
    }

    pub fn flavor(&self) -> ControllerFlavor {
        self.config.flavor()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an endpoint to an absolute URL.
    ///
    /// On UniFi OS: `https://host/proxy/network/api/s/{site}/{path}`;
    /// on a legacy controller the prefix is empty.
    pub fn endpoint_url(&self, endpoint: &Endpoint) -> Result<Url, Error> {
        let base = self.base();
        let prefix = self.flavor().api_prefix();
        let full = match endpoint {
            Endpoint::Site(path) => format!(
                "{base}{prefix}/api/s/{}/{}",
                self.site(),
                path.trim_start_matches('/')
            ),
            Endpoint::Api(path) => format!("{base}{prefix}/api/{}", path.trim_start_matches('/')),
        };
        Ok(Url::parse(&full)?)
    }

    /// Build an unprefixed URL under the controller root (auth endpoints).
    pub(crate) fn root_url(&self, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}{path}", self.base()))?)
    }

    fn base(&self) -> &str {
        self.config.base_url().as_str().trim_end_matches('/')
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Issue one API call.
    ///
    /// A bare `&str` or `String` endpoint is site-relative: `"stat/device"`
    /// resolves to `/api/s/{site}/stat/device`. Paths that already carry the
    /// `s/{site}/` segment, or controller-level paths such as `self/sites`,
    /// must be passed as [`Endpoint::api`].
    ///
    /// Fails with [`Error::LoginRequired`] before any I/O when no session
    /// exists. The payload is sent as a JSON body for POST, PUT, PATCH and
    /// DELETE. If the controller reports an expired session, the client
    /// logs in again once and re-sends once; a second expiry surfaces as
    /// [`Error::SessionExpired`].
    pub async fn request(
        &mut self,
        method: Method,
        endpoint: impl Into<Endpoint>,
        payload: Option<&Value>,
    ) -> Result<ApiResponse, Error> {
        if !self.session.is_authenticated() {
            return Err(Error::LoginRequired);
        }

        let mutating = match method {
            Method::GET => false,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE => true,
            _ => return Err(Error::UnsupportedMethod(method)),
        };

        let url = self.endpoint_url(&endpoint.into())?;

        let body = match payload {
            Some(value) if mutating => Some(serde_json::to_vec(value).map_err(Error::Encode)?),
            Some(_) => {
                warn!(%url, "ignoring payload on GET request");
                None
            }
            None => None,
        };

        match self.send(&method, &url, body.as_deref()).await {
            Err(Error::SessionExpired) => {
                warn!(%url, "session expired, logging in again");
                self.session.reset();
                self.authenticate().await?;

                let retried = self.send(&method, &url, body.as_deref()).await;
                if matches!(retried, Err(Error::SessionExpired)) {
                    warn!(%url, "session still expired after re-login");
                    self.session.reset();
                }
                retried
            }
            other => other,
        }
    }

    /// Send a single attempt with the current session headers.
    async fn send(
        &mut self,
        method: &Method,
        url: &Url,
        body: Option<&[u8]>,
    ) -> Result<ApiResponse, Error> {
        let tokens = self.session.tokens().ok_or(Error::LoginRequired)?;

        debug!("{method} {url}");

        let mut builder = apply_session(self.http.request(method.clone(), url.clone()), tokens)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        let timeout = self.config.timeout();
        let resp = builder
            .send()
            .await
            .map_err(|e| Error::from_transport(e, timeout))?;

        self.rotate_csrf(resp.headers());
        parse_response(resp, timeout).await
    }

    fn rotate_csrf(&mut self, headers: &HeaderMap) {
        if let Some(tokens) = self.session.tokens_mut() {
            if tokens.rotate_csrf(headers) {
                trace!("CSRF token rotated");
            }
        }
    }

    // ── Typed helpers ────────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope's `data`.
    pub(crate) async fn get<T: DeserializeOwned>(
        &mut self,
        endpoint: impl Into<Endpoint>,
    ) -> Result<Vec<T>, Error> {
        self.request(Method::GET, endpoint, None)
            .await?
            .into_data()
    }

    /// Send a POST request with JSON body and unwrap the envelope's `data`.
    pub(crate) async fn post<T: DeserializeOwned>(
        &mut self,
        endpoint: impl Into<Endpoint>,
        body: &(impl Serialize + Sync),
    ) -> Result<Vec<T>, Error> {
        let body = serde_json::to_value(body).map_err(Error::Encode)?;
        self.request(Method::POST, endpoint, Some(&body))
            .await?
            .into_data()
    }

    /// Send a PUT request with JSON body and unwrap the envelope's `data`.
    pub(crate) async fn put<T: DeserializeOwned>(
        &mut self,
        endpoint: impl Into<Endpoint>,
        body: &(impl Serialize + Sync),
    ) -> Result<Vec<T>, Error> {
        let body = serde_json::to_value(body).map_err(Error::Encode)?;
        self.request(Method::PUT, endpoint, Some(&body))
            .await?
            .into_data()
    }
}

/// Attach the session cookie and CSRF token to a request.
pub(crate) fn apply_session(
    mut builder: reqwest::RequestBuilder,
    tokens: &SessionTokens,
) -> reqwest::RequestBuilder {
    if let Some(cookie) = tokens.cookie() {
        builder = builder.header(COOKIE, cookie);
    }
    if let Some(token) = tokens.csrf_token() {
        builder = builder.header("X-CSRF-Token", token);
    }
    builder
}

/// Validate status and envelope, producing the decoded body on success.
///
/// Expired sessions (HTTP 401, UniFi OS `{"error":{"code":401}}`, or
/// `api.err.LoginRequired`) map to [`Error::SessionExpired`] so the caller
/// can decide whether to retry.
async fn parse_response(
    resp: reqwest::Response,
    timeout: std::time::Duration,
) -> Result<ApiResponse, Error> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| Error::from_transport(e, timeout))?;

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::SessionExpired);
    }

    let envelope_msg = || {
        serde_json::from_str::<EnvelopeMeta>(&text)
            .ok()
            .and_then(|e| e.meta)
            .and_then(|m| m.msg)
    };

    if !status.is_success() {
        let message = envelope_msg();
        if message.as_deref() == Some(LOGIN_REQUIRED_MSG) {
            return Err(Error::SessionExpired);
        }
        let message = match (status, message) {
            (_, Some(msg)) => msg,
            (StatusCode::FORBIDDEN, None) => "insufficient permissions".into(),
            (_, None) => preview(&text),
        };
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    if text.trim().is_empty() {
        return Ok(ApiResponse::new(status, Value::Object(serde_json::Map::new())));
    }

    // UniFi OS sometimes returns `{"error":{"code":N,"message":"..."}}` with HTTP 200.
    if let Ok(UnifiOsError { error: Some(err) }) = serde_json::from_str::<UnifiOsError>(&text) {
        if err.code == 401 {
            return Err(Error::SessionExpired);
        }
        return Err(Error::Api {
            status: err.code,
            message: err.message.unwrap_or_default(),
        });
    }

    let body: Value = serde_json::from_str(&text).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&text)),
        body: text.clone(),
    })?;

    if let Some(meta) = body
        .get("meta")
        .and_then(|m| serde_json::from_value::<Meta>(m.clone()).ok())
    {
        if !meta.is_ok() {
            if meta.msg.as_deref() == Some(LOGIN_REQUIRED_MSG) {
                return Err(Error::SessionExpired);
            }
            return Err(Error::Api {
                status: status.as_u16(),
                message: meta.msg.unwrap_or_else(|| format!("rc={}", meta.rc)),
            });
        }
    }

    Ok(ApiResponse::new(status, body))
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client(flavor: ControllerFlavor) -> UnifiClient {
        let config = ConnectionConfig::new(
            "https://unifi.example.com:8443/",
            "admin",
            SecretString::from("secret"),
            "Branch01",
        )
        .unwrap()
        .with_flavor(flavor);
        UnifiClient::with_client(config, reqwest::Client::new())
    }

    #[test]
    fn legacy_site_url_has_no_prefix() {
        let url = client(ControllerFlavor::Legacy)
            .endpoint_url(&"stat/device".into())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://unifi.example.com:8443/api/s/branch01/stat/device"
        );
    }

    #[test]
    fn unifi_os_urls_use_proxy_prefix() {
        let c = client(ControllerFlavor::UnifiOs);
        let site = c.endpoint_url(&Endpoint::site("/stat/sta")).unwrap();
        assert_eq!(
            site.as_str(),
            "https://unifi.example.com:8443/proxy/network/api/s/branch01/stat/sta"
        );
        let api = c.endpoint_url(&Endpoint::api("self/sites")).unwrap();
        assert_eq!(
            api.as_str(),
            "https://unifi.example.com:8443/proxy/network/api/self/sites"
        );
    }

    #[test]
    fn bare_strings_are_site_relative() {
        let c = client(ControllerFlavor::UnifiOs);
        let bare = c.endpoint_url(&"s/default/stat/device".into()).unwrap();
        assert_eq!(
            bare.path(),
            "/proxy/network/api/s/branch01/s/default/stat/device"
        );
        let api = c
            .endpoint_url(&Endpoint::api("s/default/stat/device"))
            .unwrap();
        assert_eq!(api.path(), "/proxy/network/api/s/default/stat/device");
    }

    #[test]
    fn root_url_skips_api_prefix() {
        let c = client(ControllerFlavor::UnifiOs);
        let url = c.root_url(c.flavor().login_path()).unwrap();
        assert_eq!(url.as_str(), "https://unifi.example.com:8443/api/auth/login");
    }

    #[test]
    fn new_client_starts_unauthenticated() {
        let c = client(ControllerFlavor::Legacy);
        assert!(!c.is_authenticated());
        assert!(c.session().tokens().is_none());
    }
}
