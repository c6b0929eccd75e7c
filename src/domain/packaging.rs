use super::entities::{Dimensions, ServiceLevel, ShippingItem};

const DRY_ICE_UNIT_DIMENSIONS: Dimensions = Dimensions::new(5.75, 5.5, 1.0);
const DRY_ICE_UNIT_WEIGHT: f64 = 0.5;

/// Fixed temperature-control packaging required for a service level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackagingSpec {
    pub count: u32,
    pub unit_dimensions: Dimensions,
    pub unit_weight: f64,
}

impl PackagingSpec {
    pub fn total_weight(&self) -> f64 {
        f64::from(self.count) * self.unit_weight
    }
}

pub const fn packaging_spec(level: ServiceLevel) -> PackagingSpec {
    let count = match level {
        ServiceLevel::Overnight => 1,
        ServiceLevel::SecondDay => 2,
    };
    PackagingSpec {
        count,
        unit_dimensions: DRY_ICE_UNIT_DIMENSIONS,
        unit_weight: DRY_ICE_UNIT_WEIGHT,
    }
}

/// Expands the packaging spec for `level` into wire items
/// (`dry-ice-{i}`, "Dry Ice Pack {i+1}").
pub fn derive_packaging(level: ServiceLevel) -> Vec<ShippingItem> {
    let spec = packaging_spec(level);
    (0..spec.count)
        .map(|index| ShippingItem {
            id: format!("dry-ice-{index}"),
            name: format!("Dry Ice Pack {}", index + 1),
            length: spec.unit_dimensions.length,
            width: spec.unit_dimensions.width,
            height: spec.unit_dimensions.height,
            weight: spec.unit_weight,
            quantity: 1,
        })
        .collect()
}
