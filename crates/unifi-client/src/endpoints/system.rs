// System endpoints
//
// Alarms and controller auto-update scheduling.

use serde_json::json;
use tracing::debug;

use crate::client::UnifiClient;
use crate::error::Error;
use crate::models::Alarm;
use crate::requests::AutoUpdateSettings;

impl UnifiClient {
    /// List alarms for the site.
    ///
    /// `GET /api/s/{site}/list/alarm`
    pub async fn list_alarms(&mut self) -> Result<Vec<Alarm>, Error> {
        debug!("listing alarms");
        self.get("list/alarm").await
    }

    /// Configure the controller's automatic update window.
    ///
    /// `POST /api/s/{site}/cmd/system` with `{"cmd": "set-auto-update-settings", ...}`
    pub async fn set_auto_update_settings(
        &mut self,
        settings: &AutoUpdateSettings,
    ) -> Result<(), Error> {
        debug!(
            enabled = settings.enabled,
            hour = settings.hour,
            "setting auto-update schedule"
        );

        let mut body = serde_json::to_value(settings).map_err(Error::Encode)?;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("cmd".into(), json!("set-auto-update-settings"));
        }

        let _: Vec<serde_json::Value> = self.post("cmd/system", &body).await?;
        Ok(())
    }
}
