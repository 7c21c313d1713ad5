// Session state owned by one `UnifiClient`.
//
// Two states only. The cookie and CSRF token exist exactly while the
// session is authenticated, so they live inside the `Authenticated` variant.

use reqwest::header::{HeaderMap, SET_COOKIE};
use secrecy::{ExposeSecret, SecretString};

/// Authentication state of a dispatcher instance.
#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(SessionTokens),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn tokens(&self) -> Option<&SessionTokens> {
        match self {
            Self::Authenticated(tokens) => Some(tokens),
            Self::Unauthenticated => None,
        }
    }

    pub(crate) fn tokens_mut(&mut self) -> Option<&mut SessionTokens> {
        match self {
            Self::Authenticated(tokens) => Some(tokens),
            Self::Unauthenticated => None,
        }
    }

    /// Drop the session, returning the tokens it held.
    pub(crate) fn reset(&mut self) -> Option<SessionTokens> {
        match std::mem::take(self) {
            Self::Authenticated(tokens) => Some(tokens),
            Self::Unauthenticated => None,
        }
    }
}

/// Credentials handed out by the controller at login.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    /// `Cookie` header value (`name=value; name2=value2`), if any were set.
    cookie: Option<SecretString>,
    /// CSRF token from `X-CSRF-Token`, rotated via `X-Updated-CSRF-Token`.
    csrf_token: Option<String>,
}

impl SessionTokens {
    pub fn new(cookie: Option<SecretString>, csrf_token: Option<String>) -> Self {
        Self { cookie, csrf_token }
    }

    /// Capture cookies and CSRF token from a login response.
    pub(crate) fn from_login_headers(headers: &HeaderMap) -> Self {
        let pairs: Vec<&str> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(cookie_pair)
            .collect();

        let cookie = (!pairs.is_empty()).then(|| SecretString::from(pairs.join("; ")));

        Self {
            cookie,
            csrf_token: header_str(headers, "x-csrf-token"),
        }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_ref().map(|c| c.expose_secret())
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Adopt a rotated CSRF token. Returns `true` if the token changed.
    pub(crate) fn rotate_csrf(&mut self, headers: &HeaderMap) -> bool {
        let Some(token) = header_str(headers, "x-updated-csrf-token") else {
            return false;
        };
        if self.csrf_token.as_deref() == Some(token.as_str()) {
            return false;
        }
        self.csrf_token = Some(token);
        true
    }
}

/// Extract the leading `name=value` of a `Set-Cookie` header, skipping
/// attributes and cookies the server is deleting (empty value).
fn cookie_pair(set_cookie: &str) -> Option<&str> {
    let pair = set_cookie.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    if name.trim().is_empty() || value.trim().is_empty() {
        return None;
    }
    Some(pair)
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
}
