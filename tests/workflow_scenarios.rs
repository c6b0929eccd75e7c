use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use shipping_calculator::config::ClientConfig;
use shipping_calculator::domain::{
    CalculationRequest, CalculationResult, CatalogItem, ServiceLevel, Zone,
};
use shipping_calculator::infra::{
    ApiError, CalculationService, CatalogQuery, CatalogSource, SettingsSource, StoredSession,
    SystemSettings, ZoneLookup, ZoneLookupResponse,
};
use shipping_calculator::workflow::{Step, Workflow, WorkflowError, ZoneResolver};

struct FakeBackend {
    zone_fails: bool,
    calculation_detail: Option<String>,
    settings_fail: bool,
    products: Vec<CatalogItem>,
    zone_calls: AtomicUsize,
    calculation_calls: AtomicUsize,
    catalog_calls: AtomicUsize,
    last_request: Mutex<Option<CalculationRequest>>,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            zone_fails: false,
            calculation_detail: None,
            settings_fail: false,
            products: vec![ribeye()],
            zone_calls: AtomicUsize::new(0),
            calculation_calls: AtomicUsize::new(0),
            catalog_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    fn calculations(&self) -> usize {
        self.calculation_calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<CalculationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ZoneLookup for FakeBackend {
    async fn lookup_zone(&self, zip: &str) -> Result<ZoneLookupResponse, ApiError> {
        self.zone_calls.fetch_add(1, Ordering::SeqCst);
        if self.zone_fails {
            return Err(ApiError::Status {
                status: 502,
                detail: None,
                body: "bad gateway".into(),
            });
        }
        Ok(ZoneLookupResponse {
            zip_code: zip.to_string(),
            zone: Zone::new(5),
            estimated: false,
        })
    }
}

#[async_trait]
impl CatalogSource for FakeBackend {
    async fn load_catalog(&self, query: &CatalogQuery) -> Result<Vec<CatalogItem>, ApiError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        assert!(query.active_only);
        Ok(self.products.clone())
    }
}

#[async_trait]
impl CalculationService for FakeBackend {
    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, ApiError> {
        self.calculation_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(detail) = &self.calculation_detail {
            return Err(ApiError::Status {
                status: 400,
                detail: Some(detail.clone()),
                body: json!({ "detail": detail }).to_string(),
            });
        }
        Ok(result_for(request))
    }
}

#[async_trait]
impl SettingsSource for FakeBackend {
    async fn load_settings(&self) -> Result<SystemSettings, ApiError> {
        if self.settings_fail {
            return Err(ApiError::Decode("settings unavailable".into()));
        }
        Ok(SystemSettings {
            debug_mode: true,
            company_name: None,
        })
    }
}

fn ribeye() -> CatalogItem {
    CatalogItem {
        id: "42".into(),
        name: "Frozen Ribeye".into(),
        sku: "RIB-12".into(),
        length: 10.0,
        width: 8.0,
        height: 6.0,
        weight: 2.0,
        active: true,
        customer_id: "acme".into(),
    }
}

fn result_for(request: &CalculationRequest) -> CalculationResult {
    let total_weight: f64 = request.items.iter().map(|item| item.weight).sum();
    serde_json::from_value(json!({
        "destination_zip": request.destination_zip,
        "zone": 6,
        "service_level": request.service_level.as_str(),
        "total_weight": total_weight,
        "total_boxes": 1,
        "overall_efficiency": 64.2,
        "cost_breakdown": {
            "base_rate": 18.5,
            "material_rate": 4.25,
            "accessories": 1.0,
            "total_cost": 23.75
        },
        "packed_boxes": [],
        "recommendations": [{"message": "Consider a smaller box"}],
        "calculation_id": "5b1f5c9e-2f0d-4c59-8d8e-1f1d0a3c7b21",
        "created_at": "2024-05-01T10:00:00Z",
        "debug_info": {
            "steps": [{"step": 1, "name": "validate", "status": "success", "details": "request accepted"}]
        }
    }))
    .unwrap()
}

fn new_workflow() -> Workflow {
    let session = Arc::new(StoredSession::in_memory(
        Some("token".into()),
        Some("acme".into()),
    ));
    Workflow::new(&ClientConfig::new().unwrap(), session)
}

/// Drives the workflow up to the calculate step with 3 ribeyes to `zip`.
async fn prepare_order(workflow: &mut Workflow, backend: &Arc<FakeBackend>, zip: &str) {
    let resolver = ZoneResolver::new(backend.clone());
    workflow.load_catalog(backend.as_ref()).await;
    workflow.set_service_level(ServiceLevel::Overnight);
    workflow.update_destination_zip(zip, &resolver).await;
    workflow.advance().unwrap();

    let item = workflow.catalog().find("42").cloned().unwrap();
    workflow.set_quantity(&item, 3);
    workflow.advance().unwrap();
    workflow.advance().unwrap();
    assert_eq!(workflow.step(), Step::Calculate);
}

#[tokio::test]
async fn overnight_order_is_expanded_and_submitted() {
    let backend = Arc::new(FakeBackend::new());
    let mut workflow = new_workflow();
    prepare_order(&mut workflow, &backend, "60540").await;

    let summary = workflow.review_summary();
    assert_eq!(summary.unit_count, 3);
    assert!((summary.total_weight - 6.5).abs() < 1e-9);

    workflow.calculate(backend.as_ref()).await.unwrap();

    let request = backend.last_request().unwrap();
    let ids: Vec<&str> = request.items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["42-0", "42-1", "42-2", "dry-ice-0"]);
    for item in &request.items[..3] {
        assert_eq!(item.name, "Frozen Ribeye");
        assert_eq!(item.weight, 2.0);
        assert_eq!(item.quantity, 1);
    }
    assert_eq!(request.items[3].name, "Dry Ice Pack 1");
    assert_eq!(request.items[3].weight, 0.5);
    assert_eq!(request.destination_zip, "60540");
    assert_eq!(request.origin_zip, "60540");
    assert_eq!(request.customer_id, "acme");

    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["service_level"], "overnight");

    assert_eq!(workflow.step(), Step::Results);
    assert_eq!(workflow.error(), None);
    assert_eq!(workflow.result().map(|r| r.total_boxes), Some(1));
}

#[tokio::test]
async fn calculation_detail_is_shown_and_step_kept() {
    let backend = Arc::new(FakeBackend {
        calculation_detail: Some("No rate found for zone 9".into()),
        ..FakeBackend::new()
    });
    let mut workflow = new_workflow();
    prepare_order(&mut workflow, &backend, "60540").await;

    workflow.calculate(backend.as_ref()).await.unwrap();

    assert_eq!(workflow.error(), Some("No rate found for zone 9"));
    assert_eq!(workflow.step(), Step::Calculate);
    assert!(workflow.result().is_none());
}

#[tokio::test]
async fn start_over_clears_the_order() {
    let backend = Arc::new(FakeBackend::new());
    let mut workflow = new_workflow();
    prepare_order(&mut workflow, &backend, "60540").await;
    workflow.calculate(backend.as_ref()).await.unwrap();
    assert_eq!(workflow.step(), Step::Results);

    workflow.start_over();

    assert_eq!(workflow.step(), Step::DestinationAndService);
    assert!(workflow.cart().is_empty());
    assert_eq!(workflow.destination_zip(), "");
    assert!(workflow.result().is_none());
    assert_eq!(workflow.error(), None);
    assert!(workflow.zone().is_none());
}

#[tokio::test]
async fn empty_cart_cannot_leave_product_selection() {
    let backend = Arc::new(FakeBackend::new());
    let resolver = ZoneResolver::new(backend.clone());
    let mut workflow = new_workflow();
    workflow.update_destination_zip("60540", &resolver).await;
    workflow.advance().unwrap();

    assert_eq!(workflow.advance(), Err(WorkflowError::NoProducts));
    assert_eq!(workflow.step(), Step::ProductSelection);
}

#[tokio::test]
async fn short_zip_is_rejected_without_network() {
    let backend = Arc::new(FakeBackend::new());
    let resolver = ZoneResolver::new(backend.clone());
    let mut workflow = new_workflow();
    prepare_order(&mut workflow, &backend, "60540").await;
    let zone_calls = backend.zone_calls.load(Ordering::SeqCst);

    workflow.update_destination_zip("6054", &resolver).await;
    let outcome = workflow.calculate(backend.as_ref()).await;

    assert_eq!(outcome, Err(WorkflowError::InvalidZip));
    assert_eq!(workflow.error(), Some("Please enter a valid 5-digit ZIP code"));
    assert_eq!(backend.calculations(), 0);
    assert_eq!(backend.zone_calls.load(Ordering::SeqCst), zone_calls);
    assert_eq!(workflow.step(), Step::Calculate);
}

#[tokio::test]
async fn failed_zone_lookup_uses_estimate() {
    let backend = Arc::new(FakeBackend {
        zone_fails: true,
        ..FakeBackend::new()
    });
    let resolver = ZoneResolver::new(backend.clone());
    let mut workflow = new_workflow();

    workflow.update_destination_zip("60540", &resolver).await;

    let zone = workflow.zone().cloned().unwrap();
    assert_eq!(zone.zone, Zone::new(6));
    assert!(zone.is_estimated());
    assert_eq!(workflow.error(), None);
    assert_eq!(workflow.advance(), Ok(Step::ProductSelection));
}

#[tokio::test]
async fn superseded_calculation_response_is_dropped() {
    let backend = Arc::new(FakeBackend::new());
    let mut workflow = new_workflow();
    prepare_order(&mut workflow, &backend, "60540").await;

    let first = workflow.begin_calculation().unwrap();
    let second = workflow.begin_calculation().unwrap();

    let late = backend.calculate(first.request()).await;
    assert!(!workflow.complete_calculation(&first, late));
    assert_eq!(workflow.step(), Step::Calculate);

    let fresh = backend.calculate(second.request()).await;
    assert!(workflow.complete_calculation(&second, fresh));
    assert_eq!(workflow.step(), Step::Results);
}

#[tokio::test]
async fn debug_view_follows_settings_and_override() {
    let backend = Arc::new(FakeBackend {
        settings_fail: true,
        ..FakeBackend::new()
    });
    let mut workflow = new_workflow();
    workflow.load_settings(backend.as_ref()).await;
    assert!(!workflow.debug_mode());

    prepare_order(&mut workflow, &backend, "60540").await;
    workflow.calculate(backend.as_ref()).await.unwrap();
    assert!(!workflow.debug_view_available());

    workflow.enable_debug_override();
    assert!(workflow.debug_view_available());

    let healthy = Arc::new(FakeBackend::new());
    workflow.load_settings(healthy.as_ref()).await;
    assert!(workflow.debug_mode());
}

#[tokio::test]
async fn catalog_search_and_selector_increment() {
    let backend = Arc::new(FakeBackend::new());
    let mut workflow = new_workflow();
    workflow.load_catalog(backend.as_ref()).await;
    assert_eq!(backend.catalog_calls.load(Ordering::SeqCst), 1);

    let hits: Vec<CatalogItem> = workflow
        .filtered_catalog("rib")
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(hits.len(), 1);
    assert!(workflow.filtered_catalog("salmon").is_empty());

    assert_eq!(workflow.add_product(&hits[0]), 1);
    assert_eq!(workflow.add_product(&hits[0]), 2);
    workflow.set_quantity(&hits[0], 0);
    assert!(workflow.cart().is_empty());
}
