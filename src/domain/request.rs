use super::{
    cart::CartLine,
    entities::{CalculationRequest, ServiceLevel, ShippingItem},
    packaging::derive_packaging,
};

/// Assembles the wire request from cart lines and service level.
///
/// Each line is expanded into `quantity` single-unit items with ids
/// `"{item_id}-{index}"`, followed by the packaging items for `service_level`.
/// No validation happens here; callers check the cart and ZIP first.
pub fn build_calculation_request(
    lines: &[CartLine],
    service_level: ServiceLevel,
    destination_zip: &str,
    origin_zip: &str,
    customer_id: &str,
) -> CalculationRequest {
    let packaging = derive_packaging(service_level);
    let unit_count: usize = lines.iter().map(|line| line.quantity() as usize).sum();

    let mut items = Vec::with_capacity(unit_count + packaging.len());
    for line in lines {
        items.extend(expand_line(line));
    }
    items.extend(packaging);

    CalculationRequest {
        items,
        destination_zip: destination_zip.to_string(),
        service_level,
        origin_zip: origin_zip.to_string(),
        customer_id: customer_id.to_string(),
    }
}

pub fn expand_line(line: &CartLine) -> impl Iterator<Item = ShippingItem> + '_ {
    let item = line.item();
    (0..line.quantity()).map(move |index| ShippingItem {
        id: format!("{}-{index}", item.id),
        name: item.name.clone(),
        length: item.length,
        width: item.width,
        height: item.height,
        weight: item.weight,
        quantity: 1,
    })
}
