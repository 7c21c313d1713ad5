// WLAN configuration endpoints (rest/wlanconf)

use tracing::debug;

use crate::client::UnifiClient;
use crate::error::Error;

impl UnifiClient {
    /// List WLAN configurations, or the single one with `wlan_id`.
    ///
    /// Returns loosely-typed JSON because the field set depends on the
    /// security mode and controller version.
    ///
    /// `GET /api/s/{site}/rest/wlanconf[/{id}]`
    pub async fn list_wlan_configs(
        &mut self,
        wlan_id: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, Error> {
        let path = match wlan_id {
            Some(id) => format!("rest/wlanconf/{}", id.trim()),
            None => "rest/wlanconf".to_owned(),
        };
        debug!(?wlan_id, "listing WLAN configs");
        self.get(path).await
    }

    /// Update a WLAN. Only the keys present in `settings` are changed.
    ///
    /// `PUT /api/s/{site}/rest/wlanconf/{id}`
    pub async fn set_wlan_settings(
        &mut self,
        wlan_id: &str,
        settings: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Vec<serde_json::Value>, Error> {
        debug!(wlan_id, keys = settings.len(), "updating WLAN settings");
        self.put(format!("rest/wlanconf/{}", wlan_id.trim()), settings).await
    }
}
