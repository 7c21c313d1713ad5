// Site endpoints
//
// Site listing is controller-scoped (`/api/self/sites`, `/api/stat/sites`)
// rather than the usual `/api/s/{site}/...` pattern. Site management always
// goes through the `default` site's sitemgr, whichever site this client uses.

use serde_json::json;
use tracing::debug;

use crate::client::{Endpoint, UnifiClient};
use crate::error::Error;
use crate::models::Site;

const SITEMGR: &str = "s/default/cmd/sitemgr";

impl UnifiClient {
    /// List all sites visible to the authenticated user.
    ///
    /// `GET /api/self/sites`
    pub async fn list_sites(&mut self) -> Result<Vec<Site>, Error> {
        debug!("listing sites");
        self.get(Endpoint::api("self/sites")).await
    }

    /// Per-site health summaries for every site on the controller.
    ///
    /// `GET /api/stat/sites`
    pub async fn stat_sites(&mut self) -> Result<Vec<serde_json::Value>, Error> {
        debug!("fetching site stats");
        self.get(Endpoint::api("stat/sites")).await
    }

    /// Create a new site. `name` defaults to a controller-generated slug.
    ///
    /// `POST /api/s/default/cmd/sitemgr` with `{"cmd": "add-site", "desc": "..."}`
    pub async fn create_site(
        &mut self,
        desc: &str,
        name: Option<&str>,
    ) -> Result<Vec<Site>, Error> {
        debug!(desc, ?name, "creating site");
        let mut body = json!({
            "cmd": "add-site",
            "desc": desc,
        });
        if let (Some(name), Some(obj)) = (name, body.as_object_mut()) {
            obj.insert("name".into(), json!(name));
        }
        self.post(Endpoint::api(SITEMGR), &body).await
    }

    /// Delete a site by its `_id`.
    ///
    /// `POST /api/s/default/cmd/sitemgr` with `{"cmd": "delete-site", "site": "..."}`
    pub async fn delete_site(&mut self, site_id: &str) -> Result<(), Error> {
        debug!(site_id, "deleting site");
        let _: Vec<serde_json::Value> = self
            .post(
                Endpoint::api(SITEMGR),
                &json!({
                    "cmd": "delete-site",
                    "site": site_id,
                }),
            )
            .await?;
        Ok(())
    }

    /// Subsystem health entries (wan, lan, wlan, vpn, ...).
    ///
    /// `GET /api/s/{site}/stat/health`
    pub async fn list_health(&mut self) -> Result<Vec<serde_json::Value>, Error> {
        debug!("fetching site health");
        self.get("stat/health").await
    }

    /// Dashboard metrics for the site.
    ///
    /// `GET /api/s/{site}/stat/dashboard`
    pub async fn list_dashboard(&mut self) -> Result<Vec<serde_json::Value>, Error> {
        debug!("fetching dashboard");
        self.get("stat/dashboard").await
    }
}
