// unifi-client: Session-authenticated async client for the UniFi controller REST API
//
// One `UnifiClient` owns one controller session. Every endpoint method is a
// thin wrapper over `UnifiClient::request`, which builds the URL for the
// controller flavor, attaches the session cookie and CSRF token, validates
// the `{ meta, data }` envelope, and re-authenticates once on expiry.

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod flavor;
pub mod models;
pub mod requests;
pub mod session;
pub mod transport;

pub use client::{Endpoint, UnifiClient};
pub use config::{ConnectionConfig, DEFAULT_SITE};
pub use endpoints::clients::DEFAULT_HISTORY_HOURS;
pub use endpoints::{ReportInterval, ReportKind};
pub use error::Error;
pub use flavor::ControllerFlavor;
pub use models::{ApiResponse, Alarm, ClientEntry, Device, Meta, Site, Voucher, VoucherBatch};
pub use requests::{
    AutoUpdateSettings, GuestAuthorization, NewUser, SessionQuery, SessionType, StatsQuery,
    UpdateDay, VoucherRequest,
};
pub use session::{SessionState, SessionTokens};
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
