// Session authentication
//
// Cookie-based login/logout. The login response's `Set-Cookie` values and
// CSRF token become the session; logout drops them whether or not the
// controller acknowledges.

use reqwest::header::{ACCEPT, REFERER};
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{debug, warn};

use crate::client::{UnifiClient, apply_session};
use crate::error::Error;
use crate::flavor::ControllerFlavor;
use crate::session::{SessionState, SessionTokens};

impl UnifiClient {
    /// Authenticate with the controller using the configured credentials.
    ///
    /// No-op if a session already exists. The login endpoint differs by
    /// flavor:
    /// - UniFi OS: `POST /api/auth/login`
    /// - Legacy: `POST /api/login`
    pub async fn login(&mut self) -> Result<(), Error> {
        if self.session.is_authenticated() {
            debug!("already logged in");
            return Ok(());
        }
        self.authenticate().await
    }

    /// End the current session.
    ///
    /// Local session state is cleared before the controller is contacted,
    /// so a failed logout call still leaves the client unauthenticated.
    /// Without a session this is a no-op and sends nothing.
    /// - UniFi OS: `POST /api/auth/logout`
    /// - Legacy: `POST /logout`
    pub async fn logout(&mut self) -> Result<(), Error> {
        let Some(tokens) = self.session.reset() else {
            debug!("no active session, skipping logout");
            return Ok(());
        };

        let url = self.root_url(self.flavor().logout_path())?;
        debug!("logging out at {}", url);

        let timeout = self.config().timeout();
        let resp = apply_session(self.http().post(url), &tokens)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::from_transport(e, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "controller rejected logout; local session already cleared");
            return Err(Error::Api {
                status: status.as_u16(),
                message: "logout rejected by controller".into(),
            });
        }

        debug!("logout complete");
        Ok(())
    }

    /// Send credentials unconditionally and install the new session.
    ///
    /// On failure the session is left as it was on entry; the retry path
    /// resets it first, so a failed re-login ends unauthenticated.
    pub(crate) async fn authenticate(&mut self) -> Result<(), Error> {
        let flavor = self.flavor();
        let url = self.root_url(flavor.login_path())?;

        debug!("logging in at {}", url);

        let body = json!({
            "username": self.config().username(),
            "password": self.config().password().expose_secret(),
            "remember": true,
        });

        let mut builder = self
            .http()
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&body);
        if flavor == ControllerFlavor::UnifiOs {
            let referer = self.root_url("/login")?;
            builder = builder.header(REFERER, referer.as_str());
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::AuthenticationFailed {
                message: format!("controller unreachable: {e}"),
                source: Some(e),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            return Err(Error::AuthenticationFailed {
                message: format!("login failed (HTTP {status}): {preview}"),
                source: None,
            });
        }

        let tokens = SessionTokens::from_login_headers(resp.headers());
        if tokens.cookie().is_none() {
            debug!("login response set no session cookie");
        }
        self.session = SessionState::Authenticated(tokens);

        debug!("login successful");
        Ok(())
    }
}
