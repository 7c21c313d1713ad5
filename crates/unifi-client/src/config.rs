// ── Connection configuration ──
//
// Describes *how* to reach one controller. Validated once at construction
// and then owned, read-only, by a single `UnifiClient`.

use std::time::Duration;

use secrecy::SecretString;
use url::{Host, Url};

use crate::error::Error;
use crate::flavor::ControllerFlavor;
use crate::transport::{TlsMode, TransportConfig};

/// Site used when none is configured.
pub const DEFAULT_SITE: &str = "default";

/// Connection parameters for one controller session.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    base_url: Url,
    username: String,
    password: SecretString,
    site: String,
    flavor: ControllerFlavor,
    transport: TransportConfig,
}

impl ConnectionConfig {
    /// Validate and build a config for the given controller.
    ///
    /// `base_url` must be `https://` (plain `http://` is accepted for
    /// loopback hosts only). The site is trimmed and lowercased and must
    /// not be empty. Defaults: legacy flavor, TLS verification on, 30 s
    /// timeout.
    pub fn new(
        base_url: &str,
        username: &str,
        password: SecretString,
        site: &str,
    ) -> Result<Self, Error> {
        let base_url = parse_base_url(base_url)?;

        let site = site.trim().to_lowercase();
        if site.is_empty() {
            return Err(Error::InvalidSiteName(site));
        }

        Ok(Self {
            base_url,
            username: username.trim().to_owned(),
            password,
            site,
            flavor: ControllerFlavor::default(),
            transport: TransportConfig::default(),
        })
    }

    pub fn with_flavor(mut self, flavor: ControllerFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.transport.tls = tls;
        self
    }

    /// Shorthand for `with_tls(TlsMode::from_verify_flag(verify))`.
    pub fn with_verify_tls(self, verify: bool) -> Self {
        self.with_tls(TlsMode::from_verify_flag(verify))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = timeout;
        self
    }

    /// Controller root, always without a trailing slash in generated URLs.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn flavor(&self) -> ControllerFlavor {
        self.flavor
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    pub fn timeout(&self) -> Duration {
        self.transport.timeout
    }
}

fn parse_base_url(raw: &str) -> Result<Url, Error> {
    let raw = raw.trim();
    let invalid = |reason: &str| Error::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: reason.to_owned(),
    };

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;

    match url.scheme() {
        "https" => {}
        "http" if is_loopback(&url) => {}
        _ => return Err(invalid("base URL must begin with https://")),
    }

    if url.host().is_none() {
        return Err(invalid("missing host"));
    }

    Ok(url)
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
