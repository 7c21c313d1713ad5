// Statistics endpoints
//
// Historical reports live under stat/report/{interval}.{kind} and take a
// POSTed JSON body of {attrs, start, end, mac?}. Report timestamps are epoch
// milliseconds; session and authorization queries use epoch seconds.

use std::fmt;

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::client::UnifiClient;
use crate::error::Error;
use crate::requests::{SessionQuery, StatsQuery};

const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;
const WEEK_SECS: i64 = 7 * 24 * 3600;

const DEFAULT_IPS_LIMIT: u32 = 10_000;
const DEFAULT_LATEST_SESSIONS: u32 = 5;

/// Report resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportInterval {
    FiveMinutes,
    Hourly,
    Daily,
    Monthly,
}

impl ReportInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FiveMinutes => "5minutes",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ReportInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a report aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Site,
    AccessPoint,
    User,
    Gateway,
}

/// Default lookback for a report when the caller leaves `start` unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    /// Send no window at all; the controller picks.
    Controller,
    /// `end - span`, with `end` defaulting to now (optionally floored to the hour).
    Span { span_ms: i64, floor_end: bool },
}

impl ReportKind {
    /// Path suffix after the interval (`5minutes.ap`, `daily.gw`, ...).
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::AccessPoint => "ap",
            Self::User => "user",
            Self::Gateway => "gw",
        }
    }

    /// Attributes requested when the caller supplies none.
    pub fn default_attrs(self) -> &'static [&'static str] {
        match self {
            Self::Site => &[
                "bytes",
                "wan-tx_bytes",
                "wan-rx_bytes",
                "wlan_bytes",
                "num_sta",
                "lan-num_sta",
                "wlan-num_sta",
                "time",
            ],
            Self::AccessPoint => &["bytes", "num_sta", "time"],
            Self::User => &["time", "rx_bytes", "tx_bytes"],
            Self::Gateway => &["time", "mem", "cpu", "loadavg_5"],
        }
    }

    /// User and gateway reports always need `time` first in the list.
    fn prefixes_time(self) -> bool {
        matches!(self, Self::User | Self::Gateway)
    }

    fn default_window(self, interval: ReportInterval) -> Window {
        use ReportInterval::{Daily, FiveMinutes, Hourly, Monthly};

        let span = |span_ms| Window::Span {
            span_ms,
            floor_end: false,
        };
        let floored = |span_ms| Window::Span {
            span_ms,
            floor_end: true,
        };

        match (self, interval) {
            (Self::Site, FiveMinutes) => Window::Controller,
            (Self::Site | Self::Gateway, Daily | Monthly) => floored(52 * WEEK_MS),
            (_, FiveMinutes) => span(12 * HOUR_MS),
            (_, Hourly) | (Self::AccessPoint | Self::User, Daily) => span(WEEK_MS),
            (Self::AccessPoint, Monthly) => span(52 * WEEK_MS),
            (Self::User, Monthly) => span(13 * WEEK_MS),
        }
    }

    fn report_path(self, interval: ReportInterval) -> String {
        format!("stat/report/{}.{}", interval.as_str(), self.suffix())
    }
}

/// Build the JSON body for a `stat/report` request against a fixed clock.
fn report_body(
    kind: ReportKind,
    interval: ReportInterval,
    query: &StatsQuery,
    mac: Option<&str>,
    now_ms: i64,
) -> Value {
    let attrs: Vec<String> = match &query.attrs {
        Some(attrs) if kind.prefixes_time() => std::iter::once("time".to_owned())
            .chain(attrs.iter().cloned())
            .collect(),
        Some(attrs) => attrs.clone(),
        None => kind.default_attrs().iter().map(|&a| a.to_owned()).collect(),
    };

    let mut body = Map::new();
    body.insert("attrs".into(), json!(attrs));

    match kind.default_window(interval) {
        Window::Controller => {
            if let Some(start) = query.start {
                body.insert("start".into(), json!(start));
            }
            if let Some(end) = query.end {
                body.insert("end".into(), json!(end));
            }
        }
        Window::Span { span_ms, floor_end } => {
            let end = query.end.unwrap_or(if floor_end {
                now_ms - now_ms.rem_euclid(HOUR_MS)
            } else {
                now_ms
            });
            let start = query.start.unwrap_or(end - span_ms);
            body.insert("start".into(), json!(start));
            body.insert("end".into(), json!(end));
        }
    }

    if let Some(mac) = mac {
        body.insert("mac".into(), json!(mac.to_lowercase()));
    }

    Value::Object(body)
}

/// Resolve a `(start, end)` pair, defaulting to the `span` before `now`.
fn window(start: Option<i64>, end: Option<i64>, span: i64, now: i64) -> (i64, i64) {
    let end = end.unwrap_or(now);
    (start.unwrap_or(end - span), end)
}

fn session_body(query: &SessionQuery, now_secs: i64) -> Value {
    let (start, end) = window(query.start, query.end, WEEK_SECS, now_secs);
    let mut body = json!({
        "type": query.session_type,
        "start": start,
        "end": end,
    });

    // The controller only filters by MAC inside an explicit window.
    let explicit = query.start.is_some() && query.end.is_some();
    if let (true, Some(mac), Some(obj)) = (explicit, &query.mac, body.as_object_mut()) {
        obj.insert("mac".into(), json!(mac.to_lowercase()));
    }
    body
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

impl UnifiClient {
    /// Fetch any `stat/report/{interval}.{kind}` report.
    ///
    /// Unset `query` fields fall back to the report's default window and
    /// attribute list. `mac` narrows AP and user reports to one device.
    pub async fn stats_report(
        &mut self,
        kind: ReportKind,
        interval: ReportInterval,
        query: &StatsQuery,
        mac: Option<&str>,
    ) -> Result<Vec<Value>, Error> {
        let body = report_body(kind, interval, query, mac, now_ms());
        debug!(report = %kind.report_path(interval), ?mac, "fetching stats report");
        self.post(kind.report_path(interval), &body).await
    }

    /// Site-wide traffic and client-count report.
    pub async fn site_stats(
        &mut self,
        interval: ReportInterval,
        query: &StatsQuery,
    ) -> Result<Vec<Value>, Error> {
        self.stats_report(ReportKind::Site, interval, query, None).await
    }

    /// Access point report, for one AP or all of them.
    pub async fn ap_stats(
        &mut self,
        interval: ReportInterval,
        mac: Option<&str>,
        query: &StatsQuery,
    ) -> Result<Vec<Value>, Error> {
        self.stats_report(ReportKind::AccessPoint, interval, query, mac).await
    }

    /// Per-client report. Needs "Clients Historical Data" enabled on the
    /// controller.
    pub async fn user_stats(
        &mut self,
        interval: ReportInterval,
        mac: Option<&str>,
        query: &StatsQuery,
    ) -> Result<Vec<Value>, Error> {
        self.stats_report(ReportKind::User, interval, query, mac).await
    }

    /// Gateway resource usage report.
    pub async fn gateway_stats(
        &mut self,
        interval: ReportInterval,
        query: &StatsQuery,
    ) -> Result<Vec<Value>, Error> {
        self.stats_report(ReportKind::Gateway, interval, query, None).await
    }

    /// Speed test history (epoch ms, default last 24 hours).
    ///
    /// `POST /api/s/{site}/stat/report/archive.speedtest`
    pub async fn speedtest_results(
        &mut self,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Vec<Value>, Error> {
        let (start, end) = window(start, end, DAY_MS, now_ms());
        debug!(start, end, "fetching speedtest results");
        self.post(
            "stat/report/archive.speedtest",
            &json!({
                "attrs": ["xput_download", "xput_upload", "latency", "time"],
                "start": start,
                "end": end,
            }),
        )
        .await
    }

    /// IPS/IDS events (epoch ms, default last 24 hours, 10000 events).
    ///
    /// `POST /api/s/{site}/stat/ips/event`
    pub async fn ips_events(
        &mut self,
        start: Option<i64>,
        end: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, Error> {
        let (start, end) = window(start, end, DAY_MS, now_ms());
        let limit = limit.unwrap_or(DEFAULT_IPS_LIMIT);
        debug!(start, end, limit, "fetching IPS events");
        self.post(
            "stat/ips/event",
            &json!({
                "start": start,
                "end": end,
                "_limit": limit,
            }),
        )
        .await
    }

    /// Login sessions (epoch seconds, default last 7 days).
    ///
    /// `POST /api/s/{site}/stat/session`
    pub async fn sessions(&mut self, query: &SessionQuery) -> Result<Vec<Value>, Error> {
        let body = session_body(query, now_secs());
        debug!(session_type = ?query.session_type, "fetching login sessions");
        self.post("stat/session", &body).await
    }

    /// The most recent `limit` (default 5) sessions for one client.
    pub async fn latest_client_sessions(
        &mut self,
        mac: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, Error> {
        let limit = limit.unwrap_or(DEFAULT_LATEST_SESSIONS);
        debug!(mac, limit, "fetching latest client sessions");
        self.post(
            "stat/session",
            &json!({
                "mac": mac.to_lowercase(),
                "_limit": limit,
                "_sort": "-assoc_time",
            }),
        )
        .await
    }

    /// Guest authorizations (epoch seconds, default last 7 days).
    ///
    /// `POST /api/s/{site}/stat/authorization`
    pub async fn authorizations(
        &mut self,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Vec<Value>, Error> {
        let (start, end) = window(start, end, WEEK_SECS, now_secs());
        debug!(start, end, "fetching authorizations");
        self.post(
            "stat/authorization",
            &json!({
                "start": start,
                "end": end,
            }),
        )
        .await
    }
}
