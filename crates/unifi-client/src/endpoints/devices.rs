// Device endpoints
//
// Reads via stat/device, settings via rest/device, LED locate via cmd/devmgr.

use serde_json::json;
use tracing::debug;

use crate::client::UnifiClient;
use crate::error::Error;
use crate::models::Device;

impl UnifiClient {
    /// List all devices, or the single device with `mac`.
    ///
    /// `GET /api/s/{site}/stat/device[/{mac}]`
    pub async fn list_devices(&mut self, mac: Option<&str>) -> Result<Vec<Device>, Error> {
        let path = match mac {
            Some(mac) => format!("stat/device/{}", mac.to_lowercase()),
            None => "stat/device".to_owned(),
        };
        debug!(?mac, "listing devices");
        self.get(path).await
    }

    /// Get a single device by MAC address, `None` if the site has no match.
    pub async fn get_device(&mut self, mac: &str) -> Result<Option<Device>, Error> {
        let devices = self.list_devices(Some(mac)).await?;
        Ok(devices.into_iter().next())
    }

    /// Disable or re-enable a device.
    ///
    /// `PUT /api/s/{site}/rest/device/{mac}` with `{"disabled": bool}`
    pub async fn disable_device(&mut self, mac: &str, disable: bool) -> Result<(), Error> {
        let mac = mac.to_lowercase();
        debug!(mac = %mac, disable, "setting device disabled state");
        let _: Vec<serde_json::Value> = self
            .put(
                format!("rest/device/{mac}"),
                &json!({
                    "disabled": disable,
                    "mac": mac,
                }),
            )
            .await?;
        Ok(())
    }

    /// Push arbitrary device settings.
    ///
    /// The settings object is forwarded as-is; its shape depends on the
    /// device type and firmware.
    ///
    /// `PUT /api/s/{site}/rest/device/{mac}`
    pub async fn set_device_settings(
        &mut self,
        mac: &str,
        settings: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Vec<Device>, Error> {
        let mac = mac.to_lowercase();
        debug!(mac = %mac, keys = settings.len(), "updating device settings");
        self.put(format!("rest/device/{mac}"), settings).await
    }

    /// Toggle the LED locator on a device.
    ///
    /// `enable: true` sends `set-locate`, `false` sends `unset-locate`.
    pub async fn locate_device(&mut self, mac: &str, enable: bool) -> Result<(), Error> {
        let cmd = if enable { "set-locate" } else { "unset-locate" };
        debug!(mac, cmd, "toggling device locate LED");
        let _: Vec<serde_json::Value> = self
            .post(
                "cmd/devmgr",
                &json!({
                    "cmd": cmd,
                    "mac": mac.to_lowercase(),
                }),
            )
            .await?;
        Ok(())
    }
}
