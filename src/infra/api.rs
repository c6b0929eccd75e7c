//! Asynchronous client for the shipping calculation service.
//!
//! - Attaches the session's bearer token to every request.
//! - Maps `401` to [`ApiError::Unauthorized`] after notifying the session.
//! - Pins each endpoint to one response schema.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::domain::{CalculationRequest, CalculationResult, CatalogItem};
use crate::infra::error::{extract_detail, ApiError};
use crate::infra::{
    CalculationService, CatalogQuery, CatalogSource, SessionContext, SettingsSource,
    SystemSettings, ZoneLookup, ZoneLookupResponse,
};
use crate::util::json::string_or_number;
use crate::util::version::user_agent;

const PRODUCTS_PATH: &str = "api/v1/products/";
const ZONE_LOOKUP_PATH: &str = "api/v1/zone-lookup/lookup/";
const CALCULATE_PATH: &str = "api/v1/calculations/calculate";
const SETTINGS_PATH: &str = "api/v1/system-settings/";

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<dyn SessionContext>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionContext>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionContext> {
        &self.session
    }

    pub async fn get_products(&self, query: &CatalogQuery) -> Result<Vec<CatalogItem>, ApiError> {
        let mut url = self.url(PRODUCTS_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(customer_id) = &query.customer_id {
                pairs.append_pair("customer_id", customer_id);
            }
            pairs.append_pair("active_only", if query.active_only { "true" } else { "false" });
            pairs.append_pair("size", &query.size.to_string());
        }

        debug!(%url, "requesting product catalog");
        let page: ProductPage = self.send_json(self.http.get(url)).await?;
        let received = page.products.len();

        let items: Vec<CatalogItem> = page
            .products
            .into_iter()
            .map(CatalogItem::from)
            .filter(|item| {
                let valid = item.has_valid_measurements();
                if !valid {
                    warn!(id = %item.id, sku = %item.sku, "dropping product with invalid measurements");
                }
                valid
            })
            .collect();

        info!(
            received,
            kept = items.len(),
            total = page.total,
            "product catalog loaded"
        );
        Ok(items)
    }

    pub async fn lookup_zone(&self, zip: &str) -> Result<ZoneLookupResponse, ApiError> {
        let mut url = self.url(ZONE_LOOKUP_PATH)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(zip);

        debug!(%url, "looking up zone");
        let response: ZoneLookupResponse = self.send_json(self.http.get(url)).await?;
        debug!(zip, zone = %response.zone, estimated = response.estimated, "zone lookup answered");
        Ok(response)
    }

    pub async fn calculate_shipping(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, ApiError> {
        let url = self.url(CALCULATE_PATH)?;
        debug!(
            items = request.items.len(),
            destination = %request.destination_zip,
            service_level = %request.service_level,
            "submitting calculation"
        );
        let result: CalculationResult = self.send_json(self.http.post(url).json(request)).await?;
        info!(
            calculation_id = %result.calculation_id,
            boxes = result.total_boxes,
            total_cost = result.cost_breakdown.total_cost,
            "calculation completed"
        );
        Ok(result)
    }

    pub async fn get_system_settings(&self) -> Result<SystemSettings, ApiError> {
        let url = self.url(SETTINGS_PATH)?;
        self.send_json(self.http.get(url)).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let builder = match self.session.current_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "request rejected as unauthorized");
            self.session.on_unauthorized();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            warn!(status = status.as_u16(), detail = ?detail, "request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
                body,
            });
        }

        Ok(response)
    }

    async fn send_json<T>(&self, builder: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn load_catalog(&self, query: &CatalogQuery) -> Result<Vec<CatalogItem>, ApiError> {
        self.get_products(query).await
    }
}

#[async_trait]
impl ZoneLookup for ApiClient {
    async fn lookup_zone(&self, zip: &str) -> Result<ZoneLookupResponse, ApiError> {
        ApiClient::lookup_zone(self, zip).await
    }
}

#[async_trait]
impl CalculationService for ApiClient {
    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, ApiError> {
        self.calculate_shipping(request).await
    }
}

#[async_trait]
impl SettingsSource for ApiClient {
    async fn load_settings(&self) -> Result<SystemSettings, ApiError> {
        self.get_system_settings().await
    }
}

/// The only accepted catalog shape.
#[derive(Debug, Deserialize)]
struct ProductPage {
    products: Vec<ProductDto>,
    #[serde(default)]
    total: u64,
}

#[derive(Debug, Deserialize)]
struct ProductDto {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    name: String,
    #[serde(default)]
    sku: String,
    length: f64,
    width: f64,
    height: f64,
    weight: f64,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(rename = "customerId", alias = "customer_id", default)]
    customer_id: String,
}

fn default_active() -> bool {
    true
}

impl From<ProductDto> for CatalogItem {
    fn from(value: ProductDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            sku: value.sku,
            length: value.length,
            width: value.width,
            height: value.height,
            weight: value.weight,
            active: value.active,
            customer_id: value.customer_id,
        }
    }
}
