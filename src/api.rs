//! API client for the analytics backend
//!
//! Uses shared types from gitrends-types for every response.

use gitrends_types::{
    ChangeCouplingEntry, CommitSpreadEntry, EntryType, ErrorResponse, FileHistoryEntry, HotspotEntry,
    MainDeveloperEntry, ModuleEntry, StructureNode, SumOfCouplingsEntry,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::ApiError;

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|e| ApiError::InvalidUrl {
            url: path.to_string(),
            message: e.to_string(),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let url = self.url(path)?;
        debug!(%url, "GET");

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    // =========================================================================
    // ENDPOINTS
    // =========================================================================

    pub async fn hotspots(&self, entry_type: EntryType, count: usize) -> Result<Vec<HotspotEntry>, ApiError> {
        let path = format!("/api/{}/hotspots", entry_type.as_str());
        self.get(&path, &[("count", count.to_string())]).await
    }

    pub async fn hotspots_structure(&self) -> Result<StructureNode, ApiError> {
        self.get("/api/file/hotspots-structure", &[]).await
    }

    pub async fn change_couplings(&self, entry_type: EntryType, count: usize) -> Result<Vec<ChangeCouplingEntry>, ApiError> {
        let path = format!("/api/{}/change-coupling", entry_type.as_str());
        self.get(&path, &[("count", count.to_string())]).await
    }

    /// Couplings of a single file or module
    pub async fn change_couplings_for(&self, entry_type: EntryType, name: &str) -> Result<Vec<ChangeCouplingEntry>, ApiError> {
        let path = format!("/api/{}/change-coupling", entry_type.as_str());
        self.get(&path, &[("name", name.to_string())]).await
    }

    pub async fn change_coupling_structure(&self, entry_type: EntryType) -> Result<StructureNode, ApiError> {
        let path = format!("/api/{}/change-coupling-structure", entry_type.as_str());
        self.get(&path, &[]).await
    }

    pub async fn main_developers(&self, entry_type: EntryType) -> Result<Vec<MainDeveloperEntry>, ApiError> {
        let path = format!("/api/{}/main-developer", entry_type.as_str());
        self.get(&path, &[]).await
    }

    pub async fn main_developer_structure(&self) -> Result<StructureNode, ApiError> {
        self.get("/api/file/main-developer-structure", &[]).await
    }

    pub async fn modules(&self) -> Result<Vec<ModuleEntry>, ApiError> {
        self.get("/api/module", &[]).await
    }

    pub async fn sum_of_couplings(&self, entry_type: EntryType, count: usize) -> Result<Vec<SumOfCouplingsEntry>, ApiError> {
        let path = format!("/api/{}/sum-of-couplings", entry_type.as_str());
        self.get(&path, &[("count", count.to_string())]).await
    }

    pub async fn commit_spread(&self) -> Result<Vec<CommitSpreadEntry>, ApiError> {
        self.get("/api/module/commit-spread", &[]).await
    }

    pub async fn file_history(&self, file_name: &str) -> Result<Vec<FileHistoryEntry>, ApiError> {
        let path = format!("/api/file/history/{}", file_name.trim_start_matches('/'));
        self.get(&path, &[]).await
    }
}
