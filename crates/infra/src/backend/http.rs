//! reqwest-backed privilege/menu client.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use stockroom_auth::{MenuEntry, PrivilegeSet, RoleMenu};
use stockroom_core::RoleCode;

use super::{FetchError, MenuSource, PrivilegeSource};
use crate::config::BackendConfig;

/// `GET /role_privileges?role_code=<CODE>` payload.
#[derive(Debug, Deserialize)]
struct RolePrivilegesResponse {
    role_code: Option<String>,
    privileges: PrivilegeSet,
}

/// Client for the backend's role endpoints.
///
/// Point `base_url` at the request gateway to get its cold-start retries for
/// free, or straight at the backend.
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    http: reqwest::Client,
    base_url: String,
    credential: Option<String>,
}

impl HttpBackendClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: &BackendConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credential: config.credential.clone(),
        }
    }

    /// Send, require a 2xx, and decode the body as JSON.
    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FetchError> {
        let request = match &self.credential {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let resp = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

#[async_trait::async_trait]
impl PrivilegeSource for HttpBackendClient {
    async fn fetch_role_privileges(&self, role_code: &RoleCode) -> Result<PrivilegeSet, FetchError> {
        let url = format!("{}/role_privileges", self.base_url);
        let payload: RolePrivilegesResponse = self
            .get_json(self.http.get(&url).query(&[("role_code", role_code.as_str())]))
            .await?;

        tracing::debug!(
            role_code = %role_code,
            echoed_role_code = ?payload.role_code,
            resources = payload.privileges.resources().count(),
            "fetched role privileges"
        );
        Ok(payload.privileges)
    }
}

#[async_trait::async_trait]
impl MenuSource for HttpBackendClient {
    async fn fetch_role_menus(&self, role_code: &RoleCode) -> Result<Vec<MenuEntry>, FetchError> {
        let url = format!("{}/role_menus/role/{}", self.base_url, role_code.as_str());
        let menus: Vec<RoleMenu> = self.get_json(self.http.get(&url)).await?;

        Ok(menus.into_iter().map(|m| m.menu).collect())
    }
}
