// Response types
//
// `ApiResponse` is what the dispatcher hands back for every call. The typed
// models below cover the endpoints callers read most; fields use
// `#[serde(default)]` liberally because the controller is inconsistent about
// field presence across firmware versions, and everything unmodelled lands
// in `extra`.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

// ── Response Envelope ────────────────────────────────────────────────

/// Metadata from the standard envelope. `rc == "ok"` means success.
///
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl Meta {
    pub fn is_ok(&self) -> bool {
        self.rc == "ok"
    }
}

/// Only the `meta` half of the envelope; `data` is left in the raw body.
#[derive(Debug, Deserialize)]
pub(crate) struct EnvelopeMeta {
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// UniFi OS wraps some errors as `{"error":{"code":N,"message":"..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct UnifiOsError {
    pub error: Option<UnifiOsErrorInner>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UnifiOsErrorInner {
    pub code: u16,
    pub message: Option<String>,
}

/// Decoded controller response.
///
/// Only produced for successful calls: error envelopes and non-2xx
/// statuses become [`Error`] values inside the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    body: Value,
}

impl ApiResponse {
    pub(crate) fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The full decoded body, envelope included.
    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    /// The envelope metadata, if the body carries one.
    pub fn meta(&self) -> Option<Meta> {
        self.body
            .get("meta")
            .and_then(|m| serde_json::from_value(m.clone()).ok())
    }

    /// Deserialize the envelope's `data` array.
    ///
    /// A body without `data` (e.g. `{}` from an empty response) yields an
    /// empty vector.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<Vec<T>, Error> {
        let data = match self.body {
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Array(Vec::new())),
            other => other,
        };

        let preview = || {
            let text = data.to_string();
            text.chars().take(200).collect::<String>()
        };

        match data {
            Value::Array(_) => serde_json::from_value(data.clone()).map_err(|e| {
                Error::Deserialization {
                    message: format!("{e} (data preview: {:?})", preview()),
                    body: data.to_string(),
                }
            }),
            Value::Null => Ok(Vec::new()),
            _ => Err(Error::Deserialization {
                message: format!("expected `data` array (data preview: {:?})", preview()),
                body: data.to_string(),
            }),
        }
    }
}

// ── Device ───────────────────────────────────────────────────────────

/// Device object from `stat/device`.
///
/// The controller can return 100+ fields per device. We model the most
/// commonly needed ones explicitly; everything else lands in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "_id")]
    pub id: String,
    pub mac: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub disabled: Option<bool>,
    /// 0=offline, 1=online, 2=pending, 4=upgrading, 5=provisioning
    #[serde(default)]
    pub state: i32,
    #[serde(default)]
    pub uptime: Option<i64>,
    #[serde(default)]
    pub num_sta: Option<i32>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    #[serde(default)]
    pub upgradable: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Client (Station) ─────────────────────────────────────────────────

/// Client device from `stat/sta` or `list/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientEntry {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub mac: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub oui: Option<String>,
    #[serde(default)]
    pub usergroup_id: Option<String>,
    #[serde(default)]
    pub is_guest: Option<bool>,
    #[serde(default)]
    pub is_wired: Option<bool>,
    #[serde(default)]
    pub authorized: Option<bool>,
    #[serde(default)]
    pub blocked: Option<bool>,
    #[serde(default)]
    pub essid: Option<String>,
    #[serde(default)]
    pub ap_mac: Option<String>,
    #[serde(default)]
    pub signal: Option<i32>,
    #[serde(default)]
    pub tx_bytes: Option<i64>,
    #[serde(default)]
    pub rx_bytes: Option<i64>,
    #[serde(default)]
    pub uptime: Option<i64>,
    #[serde(default)]
    pub first_seen: Option<i64>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Site ─────────────────────────────────────────────────────────────

/// Site object from `/api/self/sites`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Voucher ──────────────────────────────────────────────────────────

/// Hotspot voucher from `stat/voucher`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub create_time: Option<i64>,
    /// Validity in minutes once redeemed.
    #[serde(default)]
    pub duration: Option<i64>,
    /// Number of redemptions allowed (0 = unlimited).
    #[serde(default)]
    pub quota: Option<i64>,
    #[serde(default)]
    pub used: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub qos_rate_max_up: Option<i64>,
    #[serde(default)]
    pub qos_rate_max_down: Option<i64>,
    #[serde(default)]
    pub qos_usage_quota: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Data row returned by `create-voucher`; identifies the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherBatch {
    pub create_time: i64,
}

// ── Alarm ────────────────────────────────────────────────────────────

/// Alarm object from `list/alarm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub archived: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
