//! Shipping calculation domain: catalog items, cart aggregation, packaging
//! rules, request assembly, zones and the result contract.

pub mod cart;
pub mod entities;
pub mod packaging;
pub mod request;
pub mod result;
pub mod zone;

pub use cart::{Cart, CartLine, MAX_LINE_QUANTITY};
pub use entities::{
    CalculationRequest, CatalogItem, CatalogItemId, Dimensions, RateServiceLevel, ServiceLevel,
    ShippingItem, UnknownServiceLevel,
};
pub use packaging::{derive_packaging, packaging_spec, PackagingSpec};
pub use request::build_calculation_request;
pub use result::{
    format_currency, format_weight, AlgorithmDebug, BoxDescriptor, CalculationResult,
    CostBreakdown, CostCalculationEcho, DebugInfo, DebugStep, PackedBox, PackedItem,
    Recommendation, StrategyAttempt, SuggestedProduct,
};
pub use zone::{
    estimate_zone, is_complete_zip, is_valid_zip, Zone, ZoneOrigin, ZoneResolution, ZIP_LENGTH,
};
