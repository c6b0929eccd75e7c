//! Remote collaborators consumed by the workflow.

pub mod api;
pub mod error;
pub mod session;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{CalculationRequest, CalculationResult, CatalogItem, Zone};
use crate::util::json::string_or_number;

pub use api::ApiClient;
pub use error::ApiError;
pub use session::{SessionContext, StoredSession};

/// Filters for a catalog page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogQuery {
    pub customer_id: Option<String>,
    pub active_only: bool,
    pub size: u32,
}

impl CatalogQuery {
    pub fn active_for(customer_id: Option<String>, size: u32) -> Self {
        Self {
            customer_id,
            active_only: true,
            size,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ZoneLookupResponse {
    pub zip_code: String,
    #[serde(deserialize_with = "zone_from_json")]
    pub zone: Zone,
    /// Set when the service itself fell back to an estimate.
    #[serde(default)]
    pub estimated: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SystemSettings {
    #[serde(rename = "debugMode", default)]
    pub debug_mode: bool,
    #[serde(rename = "companyName", default)]
    pub company_name: Option<String>,
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load_catalog(&self, query: &CatalogQuery) -> Result<Vec<CatalogItem>, ApiError>;
}

#[async_trait]
pub trait ZoneLookup: Send + Sync {
    async fn lookup_zone(&self, zip: &str) -> Result<ZoneLookupResponse, ApiError>;
}

#[async_trait]
pub trait CalculationService: Send + Sync {
    async fn calculate(&self, request: &CalculationRequest)
        -> Result<CalculationResult, ApiError>;
}

#[async_trait]
pub trait SettingsSource: Send + Sync {
    async fn load_settings(&self) -> Result<SystemSettings, ApiError>;
}

fn zone_from_json<'de, D>(deserializer: D) -> Result<Zone, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = string_or_number(deserializer)?;
    raw.trim()
        .parse::<u32>()
        .map(Zone::new)
        .map_err(|_| serde::de::Error::custom(format!("invalid zone {raw:?}")))
}
