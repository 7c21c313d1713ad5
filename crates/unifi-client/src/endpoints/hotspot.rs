// Hotspot endpoints
//
// Vouchers and guest extensions via cmd/hotspot; voucher and social-auth
// reads via stat/.

use serde_json::json;
use tracing::debug;

use crate::client::UnifiClient;
use crate::error::Error;
use crate::models::{Voucher, VoucherBatch};
use crate::requests::VoucherRequest;

impl UnifiClient {
    /// Create one or more vouchers.
    ///
    /// Returns the batch's `create_time`, which identifies the new vouchers
    /// in [`stat_vouchers`](Self::stat_vouchers) results.
    ///
    /// `POST /api/s/{site}/cmd/hotspot` with `{"cmd": "create-voucher", ...}`
    pub async fn create_voucher(
        &mut self,
        request: &VoucherRequest,
    ) -> Result<Vec<VoucherBatch>, Error> {
        debug!(minutes = request.minutes, count = request.count, "creating vouchers");

        let mut body = serde_json::to_value(request).map_err(Error::Encode)?;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("cmd".into(), json!("create-voucher"));
        }

        self.post("cmd/hotspot", &body).await
    }

    /// List vouchers, or the single voucher with `voucher_id`.
    ///
    /// `GET /api/s/{site}/stat/voucher[/{id}]`
    pub async fn stat_vouchers(&mut self, voucher_id: Option<&str>) -> Result<Vec<Voucher>, Error> {
        let path = match voucher_id {
            Some(id) => format!("stat/voucher/{}", id.trim()),
            None => "stat/voucher".to_owned(),
        };
        debug!(?voucher_id, "listing vouchers");
        self.get(path).await
    }

    /// Extend a guest's authorization by `minutes`.
    ///
    /// `POST /api/s/{site}/cmd/hotspot` with `{"cmd": "extend", "mac": "...", "minutes": N}`
    pub async fn extend_guest_validity(&mut self, mac: &str, minutes: u32) -> Result<(), Error> {
        debug!(mac, minutes, "extending guest validity");
        let _: Vec<serde_json::Value> = self
            .post(
                "cmd/hotspot",
                &json!({
                    "cmd": "extend",
                    "mac": mac.to_lowercase(),
                    "minutes": minutes,
                }),
            )
            .await?;
        Ok(())
    }

    /// List social-login authorizations.
    ///
    /// `GET /api/s/{site}/stat/social-auth`
    pub async fn list_social_auth(&mut self) -> Result<Vec<serde_json::Value>, Error> {
        debug!("listing social auth");
        self.get("stat/social-auth").await
    }
}
