// Client (station) endpoints
//
// Reads via stat/sta, list/user, stat/guest and stat/alluser; commands via
// cmd/stamgr; record edits via group/user and upd/user.

use serde_json::json;
use tracing::debug;

use crate::client::UnifiClient;
use crate::error::Error;
use crate::models::ClientEntry;
use crate::requests::{GuestAuthorization, NewUser};

/// Default look-back for guest and all-user queries: one year.
pub const DEFAULT_HISTORY_HOURS: u32 = 8760;

impl UnifiClient {
    /// List online clients, or the single client with `mac`.
    ///
    /// `GET /api/s/{site}/stat/sta[/{mac}]`
    pub async fn list_clients(&mut self, mac: Option<&str>) -> Result<Vec<ClientEntry>, Error> {
        let path = match mac {
            Some(mac) => format!("stat/sta/{}", mac.to_lowercase()),
            None => "stat/sta".to_owned(),
        };
        debug!(?mac, "listing connected clients");
        self.get(path).await
    }

    /// List all known client records (online or not).
    ///
    /// `GET /api/s/{site}/list/user`
    pub async fn list_users(&mut self) -> Result<Vec<ClientEntry>, Error> {
        debug!("listing known users");
        self.get("list/user").await
    }

    /// List guest devices with valid access in the last `within_hours`.
    ///
    /// `POST /api/s/{site}/stat/guest` with `{"within": N}`
    pub async fn list_guests(
        &mut self,
        within_hours: Option<u32>,
    ) -> Result<Vec<ClientEntry>, Error> {
        let within = within_hours.unwrap_or(DEFAULT_HISTORY_HOURS);
        debug!(within, "listing guests");
        self.post("stat/guest", &json!({ "within": within })).await
    }

    /// List every client seen in the last `history_hours`.
    ///
    /// The per-client stats in the result are all-time totals; the window
    /// only selects which clients are returned.
    ///
    /// `POST /api/s/{site}/stat/alluser`
    pub async fn stat_allusers(
        &mut self,
        history_hours: Option<u32>,
    ) -> Result<Vec<ClientEntry>, Error> {
        let within = history_hours.unwrap_or(DEFAULT_HISTORY_HOURS);
        debug!(within, "listing all users");
        self.post(
            "stat/alluser",
            &json!({
                "type": "all",
                "conn": "all",
                "within": within,
            }),
        )
        .await
    }

    /// Authorize a guest client on the hotspot portal.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "authorize-guest", ...}`
    pub async fn authorize_guest(
        &mut self,
        mac: &str,
        authorization: &GuestAuthorization,
    ) -> Result<(), Error> {
        debug!(mac, minutes = authorization.minutes, "authorizing guest");

        let mut body = serde_json::to_value(authorization).map_err(Error::Encode)?;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("cmd".into(), json!("authorize-guest"));
            obj.insert("mac".into(), json!(mac.to_lowercase()));
        }

        let _: Vec<serde_json::Value> = self.post("cmd/stamgr", &body).await?;
        Ok(())
    }

    /// Revoke a guest authorization.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "unauthorize-guest", "mac": "..."}`
    pub async fn unauthorize_guest(&mut self, mac: &str) -> Result<(), Error> {
        debug!(mac, "unauthorizing guest");
        self.stamgr("unauthorize-guest", mac).await
    }

    /// Force a client to reconnect.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "kick-sta", "mac": "..."}`
    pub async fn reconnect_client(&mut self, mac: &str) -> Result<(), Error> {
        debug!(mac, "kicking client");
        self.stamgr("kick-sta", mac).await
    }

    /// Block a client by MAC address.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "block-sta", "mac": "..."}`
    pub async fn block_client(&mut self, mac: &str) -> Result<(), Error> {
        debug!(mac, "blocking client");
        self.stamgr("block-sta", mac).await
    }

    /// Unblock a client by MAC address.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "unblock-sta", "mac": "..."}`
    pub async fn unblock_client(&mut self, mac: &str) -> Result<(), Error> {
        debug!(mac, "unblocking client");
        self.stamgr("unblock-sta", mac).await
    }

    /// Forget (permanently remove) one or more clients.
    ///
    /// Can take minutes on large controllers.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "forget-sta", "macs": [...]}`
    pub async fn forget_clients(&mut self, macs: &[&str]) -> Result<(), Error> {
        let macs: Vec<String> = macs.iter().map(|m| m.to_lowercase()).collect();
        debug!(count = macs.len(), "forgetting clients");
        let _: Vec<serde_json::Value> = self
            .post(
                "cmd/stamgr",
                &json!({
                    "cmd": "forget-sta",
                    "macs": macs,
                }),
            )
            .await?;
        Ok(())
    }

    /// Create a client-device record.
    ///
    /// `POST /api/s/{site}/group/user` with `{"objects": [{"data": {...}}]}`
    pub async fn create_user(&mut self, user: &NewUser) -> Result<Vec<serde_json::Value>, Error> {
        debug!(mac = %user.mac, "creating user");
        self.post("group/user", &json!({ "objects": [{ "data": user }] }))
            .await
    }

    /// Set or clear (empty string) a client note.
    ///
    /// `POST /api/s/{site}/upd/user/{user_id}` with `{"note": "..."}`
    pub async fn set_client_note(&mut self, user_id: &str, note: &str) -> Result<(), Error> {
        debug!(user_id, "updating client note");
        let path = format!("upd/user/{}", user_id.trim());
        let _: Vec<serde_json::Value> = self.post(path, &json!({ "note": note })).await?;
        Ok(())
    }

    /// Set or clear (empty string) a client alias.
    ///
    /// `POST /api/s/{site}/upd/user/{user_id}` with `{"name": "..."}`
    pub async fn set_client_name(&mut self, user_id: &str, name: &str) -> Result<(), Error> {
        debug!(user_id, "updating client name");
        let path = format!("upd/user/{}", user_id.trim());
        let _: Vec<serde_json::Value> = self.post(path, &json!({ "name": name })).await?;
        Ok(())
    }

    async fn stamgr(&mut self, cmd: &str, mac: &str) -> Result<(), Error> {
        let _: Vec<serde_json::Value> = self
            .post(
                "cmd/stamgr",
                &json!({
                    "cmd": cmd,
                    "mac": mac.to_lowercase(),
                }),
            )
            .await?;
        Ok(())
    }
}
