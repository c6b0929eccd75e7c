use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier for catalog items. The catalog may hand out numeric or string
/// ids; both are normalized to a string.
pub type CatalogItemId = String;

/// Product record from the read-only catalog. Dimensions are inches, weight is pounds.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub name: String,
    pub sku: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub active: bool,
    pub customer_id: String,
}

impl CatalogItem {
    pub fn unit_volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Every linear dimension and the weight must be finite and strictly positive.
    pub fn has_valid_measurements(&self) -> bool {
        [self.length, self.width, self.height, self.weight]
            .iter()
            .all(|value| value.is_finite() && *value > 0.0)
    }

    pub fn dimensions_label(&self) -> String {
        Dimensions::new(self.length, self.width, self.height).label()
    }

    /// Case-insensitive match against name or SKU. An empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self.sku.to_lowercase().contains(&needle)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    pub fn label(&self) -> String {
        format!(
            "{}\" × {}\" × {}\"",
            self.length, self.width, self.height
        )
    }
}

/// Shipment speed tier used by the calculation workflow.
///
/// Serialized lowercase (`overnight`, `second_day`) as the calculation
/// endpoint expects. Not interchangeable with [`RateServiceLevel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLevel {
    #[default]
    Overnight,
    SecondDay,
}

impl ServiceLevel {
    pub const ALL: [ServiceLevel; 2] = [ServiceLevel::Overnight, ServiceLevel::SecondDay];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceLevel::Overnight => "overnight",
            ServiceLevel::SecondDay => "second_day",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceLevel::Overnight => "Overnight",
            ServiceLevel::SecondDay => "2nd Day",
        }
    }
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown service level: {0}")]
pub struct UnknownServiceLevel(pub String);

impl FromStr for ServiceLevel {
    type Err = UnknownServiceLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "overnight" => Ok(ServiceLevel::Overnight),
            "second_day" => Ok(ServiceLevel::SecondDay),
            _ => Err(UnknownServiceLevel(value.to_string())),
        }
    }
}

/// Service tiers of the administrative rate tables (PascalCase on the wire).
///
/// There is no mapping to or from [`ServiceLevel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateServiceLevel {
    Ground,
    TwoDay,
    StandardOvernight,
}

impl RateServiceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateServiceLevel::Ground => "Ground",
            RateServiceLevel::TwoDay => "TwoDay",
            RateServiceLevel::StandardOvernight => "StandardOvernight",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RateServiceLevel::Ground => "Ground",
            RateServiceLevel::TwoDay => "2-Day",
            RateServiceLevel::StandardOvernight => "Standard Overnight",
        }
    }
}

/// One physical unit on the wire. The packer places every unit on its own,
/// so `quantity` is always 1 for items the workflow builds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShippingItem {
    pub id: String,
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub quantity: u32,
}

/// Body of `POST /api/v1/calculations/calculate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub items: Vec<ShippingItem>,
    pub destination_zip: String,
    pub service_level: ServiceLevel,
    pub origin_zip: String,
    pub customer_id: String,
}
