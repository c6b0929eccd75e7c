//! Calculation workflow state machine.
//!
//! Every asynchronous operation is split into a `begin_*` call that hands out
//! a ticket and a `complete_*` call that applies the outcome. A ticket is only
//! honoured while it is the most recent one of its kind, so late responses
//! from superseded requests never overwrite newer state. The `async`
//! convenience methods chain both halves for callers that can hold the
//! workflow across an `.await`.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::domain::{
    build_calculation_request, is_complete_zip, is_valid_zip, CalculationRequest,
    CalculationResult, Cart, CatalogItem, ServiceLevel, ZoneResolution,
};
use crate::infra::{
    ApiError, CalculationService, CatalogQuery, CatalogSource, SessionContext, SettingsSource,
};

use super::catalog::{CatalogState, CATALOG_FAILURE_MESSAGE, EMPTY_CATALOG_MESSAGE};
use super::error::WorkflowError;
use super::step::Step;
use super::summary::ReviewSummary;
use super::zone_resolver::ZoneResolver;

pub const CALCULATION_FAILURE_MESSAGE: &str = "Failed to calculate shipping";

/// Pending zone lookup for one ZIP input.
#[derive(Clone, Debug)]
pub struct ZoneTicket {
    generation: u64,
    zip: String,
}

impl ZoneTicket {
    pub fn zip(&self) -> &str {
        &self.zip
    }
}

#[derive(Clone, Debug)]
pub struct CatalogTicket {
    generation: u64,
    query: CatalogQuery,
}

impl CatalogTicket {
    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }
}

/// Pending calculation carrying the request that was built for it.
#[derive(Clone, Debug)]
pub struct CalculationTicket {
    generation: u64,
    request_id: Uuid,
    request: CalculationRequest,
}

impl CalculationTicket {
    pub fn request(&self) -> &CalculationRequest {
        &self.request
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

pub struct Workflow {
    session: Arc<dyn SessionContext>,
    origin_zip: String,
    catalog_page_size: u32,

    step: Step,
    service_level: ServiceLevel,
    destination_zip: String,
    zone: Option<ZoneResolution>,
    zone_pending: bool,
    cart: Cart,
    catalog: CatalogState,
    result: Option<CalculationResult>,
    error: Option<String>,
    calculating: bool,

    debug_mode: bool,
    debug_override: bool,

    zone_generation: u64,
    catalog_generation: u64,
    calculation_generation: u64,
}

impl Workflow {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionContext>) -> Self {
        Self {
            session,
            origin_zip: config.origin_zip.clone(),
            catalog_page_size: config.catalog_page_size,
            step: Step::default(),
            service_level: ServiceLevel::default(),
            destination_zip: String::new(),
            zone: None,
            zone_pending: false,
            cart: Cart::new(),
            catalog: CatalogState::default(),
            result: None,
            error: None,
            calculating: false,
            debug_mode: false,
            debug_override: false,
            zone_generation: 0,
            catalog_generation: 0,
            calculation_generation: 0,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn service_level(&self) -> ServiceLevel {
        self.service_level
    }

    pub fn destination_zip(&self) -> &str {
        &self.destination_zip
    }

    pub fn origin_zip(&self) -> &str {
        &self.origin_zip
    }

    pub fn zone(&self) -> Option<&ZoneResolution> {
        self.zone.as_ref()
    }

    /// A lookup for the current ZIP has been handed out and not yet applied.
    pub fn is_zone_pending(&self) -> bool {
        self.zone_pending
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        self.result.as_ref()
    }

    /// User-visible error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_calculating(&self) -> bool {
        self.calculating
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // Destination and service.

    pub fn set_service_level(&mut self, level: ServiceLevel) {
        self.service_level = level;
    }

    /// Records ZIP input. The previous zone is always dropped; a lookup
    /// ticket is returned once the input reaches five characters.
    pub fn set_destination_zip(&mut self, zip: &str) -> Option<ZoneTicket> {
        self.destination_zip = zip.trim().to_string();
        self.zone = None;
        self.zone_generation += 1;
        self.zone_pending = is_complete_zip(&self.destination_zip);

        if !self.zone_pending {
            return None;
        }
        Some(ZoneTicket {
            generation: self.zone_generation,
            zip: self.destination_zip.clone(),
        })
    }

    /// Applies a zone resolution. Returns `false` when the ZIP has changed since.
    pub fn apply_zone(&mut self, ticket: &ZoneTicket, resolution: Option<ZoneResolution>) -> bool {
        if ticket.generation != self.zone_generation || ticket.zip != self.destination_zip {
            debug!(zip = %ticket.zip, "ignoring zone for superseded ZIP input");
            return false;
        }
        self.zone = resolution;
        self.zone_pending = false;
        true
    }

    pub async fn update_destination_zip(&mut self, zip: &str, resolver: &ZoneResolver) {
        if let Some(ticket) = self.set_destination_zip(zip) {
            let resolution = resolver.resolve(ticket.zip()).await;
            self.apply_zone(&ticket, resolution);
        }
    }

    // Cart.

    /// Stepper semantics: sets the quantity, removing the line at zero or below.
    pub fn set_quantity(&mut self, item: &CatalogItem, quantity: i64) {
        self.cart.upsert(item, quantity);
    }

    /// Selector semantics: adds one unit and returns the new quantity.
    pub fn add_product(&mut self, item: &CatalogItem) -> u32 {
        self.cart.add_one(item)
    }

    pub fn remove_product(&mut self, item_id: &str) -> bool {
        self.cart.remove(item_id)
    }

    pub fn review_summary(&self) -> ReviewSummary {
        ReviewSummary::new(
            &self.cart,
            self.service_level,
            &self.destination_zip,
            self.zone.as_ref(),
        )
    }

    // Navigation.

    /// Moves one step forward if the current step's guard allows it.
    /// The destination step only needs a full-length ZIP; the zone may still
    /// be pending. Results are only reached through a successful calculation.
    pub fn advance(&mut self) -> Result<Step, WorkflowError> {
        let next = match self.step {
            Step::DestinationAndService => {
                if !is_complete_zip(&self.destination_zip) {
                    return Err(WorkflowError::InvalidZip);
                }
                Step::ProductSelection
            }
            Step::ProductSelection => {
                if self.cart.is_empty() {
                    return Err(WorkflowError::NoProducts);
                }
                Step::Review
            }
            Step::Review => Step::Calculate,
            step @ (Step::Calculate | Step::Results) => {
                return Err(WorkflowError::CannotAdvance(step))
            }
        };
        self.move_to(next);
        Ok(next)
    }

    /// Backward moves are always permitted and keep cart, ZIP and result.
    pub fn back(&mut self) -> Step {
        let previous = self.step.previous();
        self.move_to(previous);
        previous
    }

    /// Results back to product selection with the cart intact.
    pub fn modify_order(&mut self) {
        self.move_to(Step::ProductSelection);
    }

    /// Clears result, cart, destination and error and returns to the first
    /// step. Service level, catalog and the debug override survive.
    pub fn start_over(&mut self) {
        self.move_to(Step::DestinationAndService);
        self.result = None;
        self.cart.clear();
        self.destination_zip.clear();
        self.zone = None;
        self.zone_pending = false;
        self.zone_generation += 1;
        self.error = None;
        info!("workflow restarted");
    }

    /// Full reset, including the debug override.
    pub fn reset(&mut self) {
        self.start_over();
        self.service_level = ServiceLevel::default();
        self.debug_override = false;
    }

    fn move_to(&mut self, step: Step) {
        if self.step == step {
            return;
        }
        if self.calculating {
            debug!(from = %self.step, to = %step, "navigation abandons pending calculation");
            self.calculation_generation += 1;
            self.calculating = false;
        }
        self.step = step;
    }

    // Calculation.

    /// Validates local state and builds the request. Validation failures are
    /// also recorded as the visible error; nothing is sent for them.
    pub fn begin_calculation(&mut self) -> Result<CalculationTicket, WorkflowError> {
        if self.step != Step::Calculate {
            return Err(WorkflowError::WrongStep {
                expected: Step::Calculate,
                actual: self.step,
            });
        }

        let customer_id = match self.validate_submission() {
            Ok(customer_id) => customer_id,
            Err(err) => {
                warn!(error = %err, "calculation rejected before submission");
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        let request = build_calculation_request(
            self.cart.lines(),
            self.service_level,
            &self.destination_zip,
            &self.origin_zip,
            &customer_id,
        );

        self.calculation_generation += 1;
        self.calculating = true;
        self.error = None;

        let ticket = CalculationTicket {
            generation: self.calculation_generation,
            request_id: Uuid::new_v4(),
            request,
        };
        info!(
            request_id = %ticket.request_id,
            items = ticket.request.items.len(),
            units = self.cart.unit_count(),
            service_level = %self.service_level,
            destination = %self.destination_zip,
            "calculation request assembled"
        );
        Ok(ticket)
    }

    /// Applies a calculation outcome. Returns `false` for superseded tickets,
    /// which leave the state untouched.
    pub fn complete_calculation(
        &mut self,
        ticket: &CalculationTicket,
        outcome: Result<CalculationResult, ApiError>,
    ) -> bool {
        if ticket.generation != self.calculation_generation || self.step != Step::Calculate {
            debug!(request_id = %ticket.request_id, "ignoring stale calculation response");
            return false;
        }

        self.calculating = false;
        match outcome {
            Ok(result) => {
                info!(
                    request_id = %ticket.request_id,
                    calculation_id = %result.calculation_id,
                    boxes = result.total_boxes,
                    "calculation succeeded"
                );
                self.result = Some(result);
                self.error = None;
                self.step = Step::Results;
            }
            Err(ApiError::Unauthorized) => {
                debug!(request_id = %ticket.request_id, "calculation rejected, session needs re-authentication");
            }
            Err(err) => {
                let message = calculation_error_message(&err);
                warn!(request_id = %ticket.request_id, error = %err, "calculation failed");
                self.error = Some(message);
            }
        }
        true
    }

    /// Submits from the calculate step. Remote failures end up in
    /// [`Workflow::error`]; only local validation failures are returned.
    pub async fn calculate(
        &mut self,
        service: &dyn CalculationService,
    ) -> Result<(), WorkflowError> {
        let ticket = self.begin_calculation()?;
        let outcome = service.calculate(ticket.request()).await;
        self.complete_calculation(&ticket, outcome);
        Ok(())
    }

    fn validate_submission(&self) -> Result<String, WorkflowError> {
        if self.cart.is_empty() {
            return Err(WorkflowError::NoProducts);
        }
        if !is_valid_zip(&self.destination_zip) {
            return Err(WorkflowError::InvalidZip);
        }
        self.session
            .customer_id()
            .filter(|id| !id.is_empty())
            .ok_or(WorkflowError::NotAuthenticated)
    }

    // Catalog.

    /// Starts a catalog load. Without a session token nothing is requested.
    pub fn begin_catalog_load(&mut self) -> Option<CatalogTicket> {
        if self.session.current_token().is_none() {
            debug!("skipping catalog load without a session");
            return None;
        }
        self.catalog_generation += 1;
        self.catalog = CatalogState::Loading;
        Some(CatalogTicket {
            generation: self.catalog_generation,
            query: CatalogQuery::active_for(None, self.catalog_page_size),
        })
    }

    pub fn complete_catalog_load(
        &mut self,
        ticket: &CatalogTicket,
        outcome: Result<Vec<CatalogItem>, ApiError>,
    ) -> bool {
        if ticket.generation != self.catalog_generation {
            debug!("ignoring stale catalog response");
            return false;
        }

        match outcome {
            Ok(items) => {
                info!(products = items.len(), "catalog ready");
                self.catalog = CatalogState::Loaded(items);
                match self.catalog.message() {
                    Some(message) => self.error = Some(message.to_string()),
                    None if self.has_catalog_error() => self.error = None,
                    None => {}
                }
            }
            Err(ApiError::Unauthorized) => {
                debug!("catalog load rejected, session needs re-authentication");
                self.catalog = CatalogState::Idle;
            }
            Err(err) => {
                warn!(error = %err, "catalog load failed");
                self.catalog = CatalogState::Failed(CATALOG_FAILURE_MESSAGE.to_string());
                self.error = Some(CATALOG_FAILURE_MESSAGE.to_string());
            }
        }
        true
    }

    fn has_catalog_error(&self) -> bool {
        matches!(
            self.error.as_deref(),
            Some(CATALOG_FAILURE_MESSAGE | EMPTY_CATALOG_MESSAGE)
        )
    }

    /// Loads (or retries loading) the product catalog.
    pub async fn load_catalog(&mut self, source: &dyn CatalogSource) {
        if let Some(ticket) = self.begin_catalog_load() {
            let outcome = source.load_catalog(ticket.query()).await;
            self.complete_catalog_load(&ticket, outcome);
        }
    }

    pub fn filtered_catalog(&self, query: &str) -> Vec<&CatalogItem> {
        self.catalog.search(query)
    }

    // Diagnostics.

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.debug_mode = enabled;
    }

    pub async fn load_settings(&mut self, source: &dyn SettingsSource) {
        self.debug_mode = fetch_debug_mode(self.session.as_ref(), source).await;
    }

    pub fn debug_override(&self) -> bool {
        self.debug_override
    }

    /// Forces the diagnostic view on. Only [`Workflow::reset`] turns it off.
    pub fn enable_debug_override(&mut self) {
        self.debug_override = true;
    }

    /// Whether the "enable debug" affordance should be offered.
    pub fn can_enable_debug_override(&self) -> bool {
        !self.debug_mode && !self.debug_override
    }

    pub fn debug_view_available(&self) -> bool {
        (self.debug_mode || self.debug_override)
            && self.result.as_ref().is_some_and(CalculationResult::has_debug_info)
    }
}

/// Debug flag from system settings. Unauthenticated sessions and any
/// failure yield `false`.
pub async fn fetch_debug_mode(session: &dyn SessionContext, source: &dyn SettingsSource) -> bool {
    if session.current_token().is_none() {
        return false;
    }
    match source.load_settings().await {
        Ok(settings) => settings.debug_mode,
        Err(err) => {
            warn!(error = %err, "system settings unavailable, debug mode off");
            false
        }
    }
}

/// Preferred message for a failed submission: the structured `detail`,
/// else the transport error text, else a generic message.
pub fn calculation_error_message(error: &ApiError) -> String {
    if let Some(detail) = error.detail() {
        return detail.to_string();
    }
    let text = error.to_string();
    if text.trim().is_empty() {
        CALCULATION_FAILURE_MESSAGE.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Zone, ZoneOrigin, MAX_LINE_QUANTITY};
    use crate::infra::StoredSession;

    fn workflow() -> Workflow {
        let session = Arc::new(StoredSession::in_memory(
            Some("token".into()),
            Some("acme".into()),
        ));
        Workflow::new(&ClientConfig::new().unwrap(), session)
    }

    fn ribeye() -> CatalogItem {
        CatalogItem {
            id: "7".into(),
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

    fn resolve(workflow: &mut Workflow, zip: &str) {
        let ticket = workflow.set_destination_zip(zip).unwrap();
        workflow.apply_zone(
            &ticket,
            Some(ZoneResolution {
                zip_code: zip.to_string(),
                zone: Zone::new(6),
                origin: ZoneOrigin::Lookup,
            }),
        );
    }

    fn at_calculate_step() -> Workflow {
        let mut workflow = workflow();
        resolve(&mut workflow, "60540");
        workflow.advance().unwrap();
        workflow.set_quantity(&ribeye(), 3);
        workflow.advance().unwrap();
        workflow.advance().unwrap();
        assert_eq!(workflow.step(), Step::Calculate);
        workflow
    }

    fn status_error(detail: Option<&str>) -> ApiError {
        ApiError::Status {
            status: 400,
            detail: detail.map(str::to_string),
            body: String::new(),
        }
    }

    #[test]
    fn destination_step_needs_full_zip_only() {
        let mut workflow = workflow();
        assert_eq!(workflow.advance(), Err(WorkflowError::InvalidZip));

        assert!(workflow.set_destination_zip("6054").is_none());
        assert_eq!(workflow.advance(), Err(WorkflowError::InvalidZip));

        // Lookup still in flight.
        let ticket = workflow.set_destination_zip("60540").unwrap();
        assert_eq!(workflow.advance(), Ok(Step::ProductSelection));
        assert_eq!(workflow.zone(), None);

        workflow.apply_zone(
            &ticket,
            Some(ZoneResolution {
                zip_code: "60540".into(),
                zone: Zone::new(6),
                origin: ZoneOrigin::LocalEstimate,
            }),
        );
        assert_eq!(workflow.zone().map(|zone| zone.zone), Some(Zone::new(6)));
    }

    #[test]
    fn zone_lookup_pending_until_applied() {
        let mut workflow = workflow();
        assert!(workflow.set_destination_zip("605").is_none());
        assert!(!workflow.is_zone_pending());

        let old = workflow.set_destination_zip("60540").unwrap();
        assert!(workflow.is_zone_pending());
        let current = workflow.set_destination_zip("10001").unwrap();
        assert!(!workflow.apply_zone(&old, None));
        assert!(workflow.is_zone_pending());

        assert!(workflow.apply_zone(&current, None));
        assert!(!workflow.is_zone_pending());
        assert_eq!(workflow.zone(), None);

        workflow.set_destination_zip("60540");
        workflow.start_over();
        assert!(!workflow.is_zone_pending());
    }

    #[test]
    fn unresolvable_zip_still_moves_on() {
        let mut workflow = workflow();
        let ticket = workflow.set_destination_zip("60a40").unwrap();
        workflow.apply_zone(&ticket, None);
        assert_eq!(workflow.advance(), Ok(Step::ProductSelection));
        assert_eq!(workflow.review_summary().zone, None);
    }

    #[test]
    fn late_zone_for_old_input_is_ignored() {
        let mut workflow = workflow();
        let stale = workflow.set_destination_zip("60540").unwrap();
        let fresh = workflow.set_destination_zip("10001").unwrap();

        let applied = workflow.apply_zone(
            &stale,
            Some(ZoneResolution {
                zip_code: "60540".into(),
                zone: Zone::new(6),
                origin: ZoneOrigin::Lookup,
            }),
        );
        assert!(!applied);
        assert!(workflow.zone().is_none());

        assert!(workflow.apply_zone(
            &fresh,
            Some(ZoneResolution {
                zip_code: "10001".into(),
                zone: Zone::new(8),
                origin: ZoneOrigin::Lookup,
            }),
        ));
        assert_eq!(workflow.zone().map(|z| z.zone), Some(Zone::new(8)));
    }

    #[test]
    fn shortening_the_zip_clears_the_zone() {
        let mut workflow = workflow();
        resolve(&mut workflow, "60540");
        assert!(workflow.zone().is_some());
        workflow.set_destination_zip("6054");
        assert!(workflow.zone().is_none());
    }

    #[test]
    fn product_step_needs_a_cart_line() {
        let mut workflow = workflow();
        resolve(&mut workflow, "60540");
        workflow.advance().unwrap();

        assert_eq!(workflow.advance(), Err(WorkflowError::NoProducts));
        assert_eq!(workflow.step(), Step::ProductSelection);

        workflow.add_product(&ribeye());
        assert_eq!(workflow.advance(), Ok(Step::Review));
        assert_eq!(workflow.advance(), Ok(Step::Calculate));
        assert_eq!(
            workflow.advance(),
            Err(WorkflowError::CannotAdvance(Step::Calculate))
        );
    }

    #[test]
    fn back_keeps_intermediate_state() {
        let mut workflow = at_calculate_step();
        assert_eq!(workflow.back(), Step::Review);
        assert_eq!(workflow.back(), Step::ProductSelection);
        assert_eq!(workflow.back(), Step::DestinationAndService);
        assert_eq!(workflow.cart().quantity_of("7"), 3);
        assert_eq!(workflow.destination_zip(), "60540");
    }

    #[test]
    fn oversized_quantity_is_capped_before_building_the_request() {
        let mut workflow = at_calculate_step();
        workflow.set_quantity(&ribeye(), 4_000_000_000);

        let ticket = workflow.begin_calculation().unwrap();
        let units = MAX_LINE_QUANTITY as usize;
        assert_eq!(ticket.request().items.len(), units + 1);
        assert_eq!(workflow.review_summary().unit_count, u64::from(MAX_LINE_QUANTITY));
    }

    #[test]
    fn successful_calculation_moves_to_results() {
        let mut workflow = at_calculate_step();
        let ticket = workflow.begin_calculation().unwrap();
        assert!(workflow.is_calculating());
        assert_eq!(ticket.request().items.len(), 4);
        assert_eq!(ticket.request().customer_id, "acme");

        let result: CalculationResult = serde_json::from_value(serde_json::json!({
            "destination_zip": "60540",
            "zone": 6,
            "service_level": "overnight",
            "total_weight": 6.5,
            "total_boxes": 1,
            "overall_efficiency": 70.0,
            "cost_breakdown": {"base_rate": 10.0, "material_rate": 2.0, "accessories": 0.0, "total_cost": 12.0},
            "calculation_id": "c-1",
            "created_at": "2024-05-01T10:00:00"
        }))
        .unwrap();

        assert!(workflow.complete_calculation(&ticket, Ok(result)));
        assert_eq!(workflow.step(), Step::Results);
        assert!(!workflow.is_calculating());
        assert!(workflow.result().is_some());

        workflow.modify_order();
        assert_eq!(workflow.step(), Step::ProductSelection);
        assert_eq!(workflow.cart().quantity_of("7"), 3);
    }

    #[test]
    fn failures_surface_detail_and_stay_on_calculate() {
        let mut workflow = at_calculate_step();
        let ticket = workflow.begin_calculation().unwrap();
        workflow.complete_calculation(&ticket, Err(status_error(Some("No rate found for zone 9"))));

        assert_eq!(workflow.step(), Step::Calculate);
        assert_eq!(workflow.error(), Some("No rate found for zone 9"));

        let ticket = workflow.begin_calculation().unwrap();
        assert_eq!(workflow.error(), None, "retry clears the previous error");
        workflow.complete_calculation(&ticket, Err(status_error(None)));
        assert_eq!(workflow.error(), Some("Request failed with status code 400"));
    }

    #[test]
    fn unauthorized_calculation_sets_no_error() {
        let mut workflow = at_calculate_step();
        let ticket = workflow.begin_calculation().unwrap();
        workflow.complete_calculation(&ticket, Err(ApiError::Unauthorized));
        assert_eq!(workflow.error(), None);
        assert_eq!(workflow.step(), Step::Calculate);
        assert!(!workflow.is_calculating());
    }

    #[test]
    fn only_latest_calculation_is_applied() {
        let mut workflow = at_calculate_step();
        let first = workflow.begin_calculation().unwrap();
        let second = workflow.begin_calculation().unwrap();
        assert_ne!(first.request_id(), second.request_id());

        assert!(!workflow.complete_calculation(&first, Err(status_error(Some("old")))));
        assert_eq!(workflow.error(), None);
        assert!(workflow.complete_calculation(&second, Err(status_error(Some("new")))));
        assert_eq!(workflow.error(), Some("new"));
    }

    #[test]
    fn navigating_away_abandons_the_pending_calculation() {
        let mut workflow = at_calculate_step();
        let ticket = workflow.begin_calculation().unwrap();
        workflow.back();
        assert!(!workflow.is_calculating());

        workflow.advance().unwrap();
        assert!(!workflow.complete_calculation(&ticket, Err(status_error(Some("late")))));
        assert_eq!(workflow.error(), None);
    }

    #[test]
    fn validation_errors_are_visible() {
        let mut workflow = at_calculate_step();
        workflow.set_destination_zip("6054");
        assert_eq!(
            workflow.begin_calculation().map(|_| ()),
            Err(WorkflowError::InvalidZip)
        );
        assert_eq!(workflow.error(), Some("Please enter a valid 5-digit ZIP code"));

        workflow.set_destination_zip("60540");
        workflow.remove_product("7");
        assert_eq!(
            workflow.begin_calculation().map(|_| ()),
            Err(WorkflowError::NoProducts)
        );
        assert_eq!(workflow.error(), Some("Please select at least one product"));
    }

    #[test]
    fn missing_customer_blocks_submission() {
        let session = Arc::new(StoredSession::in_memory(Some("token".into()), None));
        let mut workflow = Workflow::new(&ClientConfig::new().unwrap(), session);
        resolve(&mut workflow, "60540");
        workflow.advance().unwrap();
        workflow.set_quantity(&ribeye(), 1);
        workflow.advance().unwrap();
        workflow.advance().unwrap();

        assert_eq!(
            workflow.begin_calculation().map(|_| ()),
            Err(WorkflowError::NotAuthenticated)
        );
        assert_eq!(workflow.error(), Some("User not authenticated"));
    }

    #[test]
    fn calculation_is_only_submitted_from_calculate_step() {
        let mut workflow = workflow();
        assert!(matches!(
            workflow.begin_calculation(),
            Err(WorkflowError::WrongStep { .. })
        ));
    }

    #[test]
    fn debug_override_survives_start_over_but_not_reset() {
        let mut workflow = workflow();
        assert!(workflow.can_enable_debug_override());
        workflow.enable_debug_override();
        assert!(!workflow.can_enable_debug_override());

        workflow.start_over();
        assert!(workflow.debug_override());

        workflow.reset();
        assert!(!workflow.debug_override());
    }

    #[test]
    fn catalog_outcomes() {
        let mut workflow = workflow();
        let ticket = workflow.begin_catalog_load().unwrap();
        assert!(workflow.catalog().is_loading());
        assert!(workflow.complete_catalog_load(&ticket, Ok(vec![ribeye()])));
        assert_eq!(workflow.catalog().products().len(), 1);
        assert_eq!(workflow.error(), None);

        let ticket = workflow.begin_catalog_load().unwrap();
        workflow.complete_catalog_load(&ticket, Ok(Vec::new()));
        assert_eq!(
            workflow.error(),
            Some("No products available for your customer account. Please contact your administrator.")
        );

        let ticket = workflow.begin_catalog_load().unwrap();
        workflow.complete_catalog_load(&ticket, Err(status_error(None)));
        assert_eq!(workflow.error(), Some("Failed to load products"));
        assert!(workflow.catalog().products().is_empty());

        let ticket = workflow.begin_catalog_load().unwrap();
        workflow.complete_catalog_load(&ticket, Ok(vec![ribeye()]));
        assert_eq!(workflow.catalog().products().len(), 1);
        assert_eq!(workflow.error(), None);
    }

    #[test]
    fn catalog_retry_keeps_unrelated_errors() {
        let mut workflow = at_calculate_step();
        let ticket = workflow.begin_calculation().unwrap();
        workflow.complete_calculation(&ticket, Err(status_error(Some("No rate found for zone 9"))));

        let ticket = workflow.begin_catalog_load().unwrap();
        workflow.complete_catalog_load(&ticket, Ok(vec![ribeye()]));
        assert_eq!(workflow.error(), Some("No rate found for zone 9"));
    }

    #[test]
    fn stale_catalog_response_is_ignored() {
        let mut workflow = workflow();
        let old = workflow.begin_catalog_load().unwrap();
        let new = workflow.begin_catalog_load().unwrap();
        assert!(workflow.complete_catalog_load(&new, Ok(vec![ribeye()])));
        assert!(!workflow.complete_catalog_load(&old, Err(status_error(None))));
        assert_eq!(workflow.catalog().products().len(), 1);
    }

    #[test]
    fn catalog_needs_a_session() {
        let session = Arc::new(StoredSession::in_memory(None, None));
        let mut workflow = Workflow::new(&ClientConfig::new().unwrap(), session);
        assert!(workflow.begin_catalog_load().is_none());
        assert_eq!(workflow.catalog(), &CatalogState::Idle);
    }
}
