// Typed request payloads
//
// Endpoints whose body fields are known get a struct here instead of a
// free-form map. Optional fields are omitted from the JSON entirely, which
// is what the controller expects for "no limit".

use serde::Serialize;

// ── Hotspot ──────────────────────────────────────────────────────────

/// Parameters for `cmd/hotspot` `create-voucher`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoucherRequest {
    /// Validity in minutes once redeemed.
    #[serde(rename = "expire")]
    pub minutes: u32,
    /// Number of vouchers to create.
    #[serde(rename = "n")]
    pub count: u32,
    /// Redemptions allowed per voucher (0 = unlimited).
    pub quota: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Upload limit in Kbps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<u32>,
    /// Download limit in Kbps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down: Option<u32>,
    /// Data transfer quota in MB.
    #[serde(rename = "bytes", skip_serializing_if = "Option::is_none")]
    pub megabytes: Option<u32>,
}

impl VoucherRequest {
    /// One single-use voucher valid for `minutes`.
    pub fn new(minutes: u32) -> Self {
        Self {
            minutes,
            count: 1,
            quota: 1,
            note: None,
            up: None,
            down: None,
            megabytes: None,
        }
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn quota(mut self, quota: u32) -> Self {
        self.quota = quota;
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn rate_limits(mut self, up_kbps: Option<u32>, down_kbps: Option<u32>) -> Self {
        self.up = up_kbps;
        self.down = down_kbps;
        self
    }

    pub fn megabytes(mut self, megabytes: u32) -> Self {
        self.megabytes = Some(megabytes);
        self
    }
}

// ── Guests ───────────────────────────────────────────────────────────

/// Parameters for `cmd/stamgr` `authorize-guest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestAuthorization {
    pub minutes: u32,
    /// Upload limit in Kbps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<u32>,
    /// Download limit in Kbps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down: Option<u32>,
    /// Data transfer quota in MB.
    #[serde(rename = "bytes", skip_serializing_if = "Option::is_none")]
    pub megabytes: Option<u32>,
    /// AP the guest is associated with; speeds up authorization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_mac: Option<String>,
}

impl GuestAuthorization {
    pub fn new(minutes: u32) -> Self {
        Self {
            minutes,
            up: None,
            down: None,
            megabytes: None,
            ap_mac: None,
        }
    }

    pub fn rate_limits(mut self, up_kbps: Option<u32>, down_kbps: Option<u32>) -> Self {
        self.up = up_kbps;
        self.down = down_kbps;
        self
    }

    pub fn megabytes(mut self, megabytes: u32) -> Self {
        self.megabytes = Some(megabytes);
        self
    }

    pub fn ap_mac(mut self, ap_mac: &str) -> Self {
        self.ap_mac = Some(ap_mac.to_lowercase());
        self
    }
}

// ── Users ────────────────────────────────────────────────────────────

/// A client-device record for `group/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub mac: String,
    #[serde(rename = "usergroup_id")]
    pub user_group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_guest: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_wired: Option<bool>,
}

impl NewUser {
    pub fn new(mac: &str, user_group_id: impl Into<String>) -> Self {
        Self {
            mac: mac.to_lowercase(),
            user_group_id: user_group_id.into(),
            name: None,
            note: None,
            is_guest: None,
            is_wired: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn guest(mut self, is_guest: bool) -> Self {
        self.is_guest = Some(is_guest);
        self
    }

    pub fn wired(mut self, is_wired: bool) -> Self {
        self.is_wired = Some(is_wired);
        self
    }
}

// ── System ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateDay {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

/// Parameters for `cmd/system` `set-auto-update-settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoUpdateSettings {
    pub enabled: bool,
    /// Hour of day, 0-23.
    pub hour: u8,
    pub day: UpdateDay,
    pub timezone: String,
}

impl Default for AutoUpdateSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            hour: 4,
            day: UpdateDay::Sun,
            timezone: "America/Los_Angeles".into(),
        }
    }
}

// ── Stats ────────────────────────────────────────────────────────────

/// Optional overrides for a `stat/report` query.
///
/// Timestamps are epoch milliseconds. Anything left `None` falls back to
/// the per-report defaults (see [`ReportKind`](crate::ReportKind)).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsQuery {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub attrs: Option<Vec<String>>,
}

impl StatsQuery {
    pub fn between(start: i64, end: i64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            attrs: None,
        }
    }

    pub fn attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs = Some(attrs.into_iter().map(Into::into).collect());
        self
    }
}

/// Which login sessions `stat/session` should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    All,
    Guest,
    User,
}

/// Query for `stat/session`. Timestamps are epoch **seconds**.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionQuery {
    pub start: Option<i64>,
    pub end: Option<i64>,
    /// Only honoured together with an explicit `start`/`end`.
    pub mac: Option<String>,
    pub session_type: SessionType,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn voucher_defaults_omit_optional_limits() {
        let body = serde_json::to_value(VoucherRequest::new(1440)).unwrap();
        assert_eq!(body, json!({ "expire": 1440, "n": 1, "quota": 1 }));
    }

    #[test]
    fn voucher_fields_use_controller_names() {
        let req = VoucherRequest::new(60)
            .count(5)
            .quota(0)
            .note("conference")
            .rate_limits(Some(512), Some(2048))
            .megabytes(100);
        let body = serde_json::to_value(req).unwrap();
        assert_eq!(
            body,
            json!({
                "expire": 60,
                "n": 5,
                "quota": 0,
                "note": "conference",
                "up": 512,
                "down": 2048,
                "bytes": 100
            })
        );
    }

    #[test]
    fn guest_authorization_lowercases_ap_mac() {
        let body =
            serde_json::to_value(GuestAuthorization::new(30).ap_mac("AA:BB:CC:00:11:22")).unwrap();
        assert_eq!(body, json!({ "minutes": 30, "ap_mac": "aa:bb:cc:00:11:22" }));
    }

    #[test]
    fn auto_update_defaults() {
        let body = serde_json::to_value(AutoUpdateSettings::default()).unwrap();
        assert_eq!(
            body,
            json!({
                "enabled": true,
                "hour": 4,
                "day": "sun",
                "timezone": "America/Los_Angeles"
            })
        );
    }

    #[test]
    fn new_user_renames_group_field() {
        let body = serde_json::to_value(NewUser::new("AA:BB:CC:DD:EE:FF", "grp1").wired(true))
            .unwrap();
        assert_eq!(
            body,
            json!({ "mac": "aa:bb:cc:dd:ee:ff", "usergroup_id": "grp1", "is_wired": true })
        );
    }
}
