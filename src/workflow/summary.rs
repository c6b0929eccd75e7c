use crate::domain::{packaging_spec, Cart, ServiceLevel, ZoneResolution};

/// Figures shown on the review step before submitting.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewSummary {
    pub line_count: usize,
    pub unit_count: u64,
    pub product_weight: f64,
    pub packaging_count: u32,
    pub packaging_weight: f64,
    pub total_weight: f64,
    pub service_level: ServiceLevel,
    pub destination_zip: String,
    pub zone: Option<ZoneResolution>,
}

impl ReviewSummary {
    pub fn new(
        cart: &Cart,
        service_level: ServiceLevel,
        destination_zip: &str,
        zone: Option<&ZoneResolution>,
    ) -> Self {
        let spec = packaging_spec(service_level);
        let product_weight = cart.total_weight();
        let packaging_weight = spec.total_weight();
        Self {
            line_count: cart.len(),
            unit_count: cart.unit_count(),
            product_weight,
            packaging_count: spec.count,
            packaging_weight,
            total_weight: product_weight + packaging_weight,
            service_level,
            destination_zip: destination_zip.to_string(),
            zone: zone.cloned(),
        }
    }

    /// `"60540, Zone 6"`, with the estimate marker when the zone is a guess.
    pub fn destination_label(&self) -> String {
        match &self.zone {
            Some(zone) => format!("{}, {}", self.destination_zip, zone.label()),
            None => self.destination_zip.clone(),
        }
    }
}
