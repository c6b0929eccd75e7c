//! Calculation result contract returned by the remote packing service.
//!
//! Consumed verbatim; helpers here only derive display values and never
//! correct the payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    OffsetDateTime, PrimitiveDateTime,
};
use uuid::Uuid;

use super::zone::Zone;
use crate::util::json::lenient_string;

const COST_TOLERANCE: f64 = 0.005;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub destination_zip: String,
    pub zone: Zone,
    pub service_level: String,
    pub total_weight: f64,
    pub total_boxes: u32,
    pub overall_efficiency: f64,
    #[serde(default)]
    pub box_costs: f64,
    pub cost_breakdown: CostBreakdown,
    #[serde(default)]
    pub packed_boxes: Vec<PackedBox>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    pub calculation_id: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<DebugInfo>,
}

impl CalculationResult {
    /// Parses `created_at`. Offset-less timestamps are taken as UTC.
    pub fn created_at_parsed(&self) -> Option<OffsetDateTime> {
        let raw = self.created_at.trim();
        OffsetDateTime::parse(raw, &Rfc3339)
            .ok()
            .or_else(|| {
                PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT)
                    .ok()
                    .map(PrimitiveDateTime::assume_utc)
            })
    }

    pub fn calculation_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.calculation_id).ok()
    }

    /// Units across all packed boxes.
    pub fn packed_unit_count(&self) -> u64 {
        self.packed_boxes.iter().map(PackedBox::unit_count).sum()
    }

    pub fn has_debug_info(&self) -> bool {
        self.debug_info.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub base_rate: f64,
    pub material_rate: f64,
    pub accessories: f64,
    pub total_cost: f64,
}

impl CostBreakdown {
    pub fn component_sum(&self) -> f64 {
        self.base_rate + self.material_rate + self.accessories
    }

    /// `total_cost` matches the sum of its parts to the cent. Informational only.
    pub fn is_consistent(&self) -> bool {
        (self.component_sum() - self.total_cost).abs() < COST_TOLERANCE
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxDescriptor {
    #[serde(deserialize_with = "crate::util::json::string_or_number")]
    pub id: String,
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub max_weight: f64,
    pub cost: f64,
}

impl BoxDescriptor {
    pub fn dimensions_label(&self) -> String {
        super::entities::Dimensions::new(self.length, self.width, self.height).label()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackedItem {
    pub item_id: String,
    pub item_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub dimensions: String,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackedBox {
    #[serde(rename = "box")]
    pub container: BoxDescriptor,
    #[serde(default)]
    pub items: Vec<PackedItem>,
    pub total_weight: f64,
    pub total_volume: f64,
    pub utilization: f64,
    #[serde(default)]
    pub packing_efficiency: f64,
}

impl PackedBox {
    /// Volume utilization clamped to `[0, 100]`.
    pub fn utilization_pct(&self) -> f64 {
        if self.utilization.is_finite() {
            self.utilization.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, deserialize_with = "lenient_string")]
    pub box_id: String,
    #[serde(default)]
    pub box_name: String,
    #[serde(default)]
    pub recommendation_type: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_products: Option<Vec<SuggestedProduct>>,
}

impl Recommendation {
    pub fn suggestions(&self) -> &[SuggestedProduct] {
        self.suggested_products.as_deref().unwrap_or(&[])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestedProduct {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sku: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dimensions: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub weight: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub volume: String,
}

/// Diagnostic trace, present only when the service ran in debug mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    #[serde(default)]
    pub steps: Vec<DebugStep>,
    #[serde(default)]
    pub algorithm_debug: AlgorithmDebug,
    #[serde(default)]
    pub box_selection: Value,
    #[serde(default)]
    pub cost_calculation: CostCalculationEcho,
    #[serde(default)]
    pub timing: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebugStep {
    pub step: u32,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub details: String,
    /// Step-specific payload (box lists, counts, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DebugStep {
    pub fn succeeded(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmDebug {
    #[serde(default)]
    pub strategy_attempts: Vec<StrategyAttempt>,
    #[serde(default)]
    pub box_evaluations: Vec<Value>,
    #[serde(default)]
    pub item_placements: Vec<Value>,
    #[serde(default)]
    pub final_selection: FinalSelection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyAttempt {
    pub strategy: String,
    pub success: bool,
    #[serde(default)]
    pub boxes_used: u32,
    #[serde(default)]
    pub overflow_items: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalSelection {
    #[serde(default)]
    pub strategy: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostCalculationEcho {
    #[serde(default)]
    pub zone: Option<Zone>,
    #[serde(default)]
    pub base_rate: f64,
    #[serde(default)]
    pub material_rate: f64,
    #[serde(default)]
    pub accessories_rate: f64,
    #[serde(default)]
    pub total_cost: f64,
}

pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

pub fn format_weight(pounds: f64) -> String {
    format!("{pounds:.1} lbs")
}
