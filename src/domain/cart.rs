//! Cart aggregation over catalog items.
//!
//! Lines are keyed by catalog item id and keep insertion order for display.
//! Two mutation styles share the same store:
//! - [`Cart::upsert`] sets a quantity directly (stepper controls).
//! - [`Cart::add_one`] increments on every add (lightweight selector).

use super::entities::CatalogItem;

/// Upper bound for a single line. Requests expand one item per unit, so the
/// quantity bounds the request size.
pub const MAX_LINE_QUANTITY: u32 = 999;

#[derive(Clone, Debug, PartialEq)]
pub struct CartLine {
    item: CatalogItem,
    quantity: u32,
    total_weight: f64,
    total_volume: f64,
}

impl CartLine {
    fn new(item: CatalogItem, quantity: u32) -> Self {
        let mut line = Self {
            item,
            quantity,
            total_weight: 0.0,
            total_volume: 0.0,
        };
        line.recompute();
        line
    }

    fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.recompute();
    }

    fn recompute(&mut self) {
        let quantity = f64::from(self.quantity);
        self.total_weight = self.item.weight * quantity;
        self.total_volume = self.item.unit_volume() * quantity;
    }

    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the quantity for `item`, replacing any previous quantity.
    /// A non-positive quantity removes the line; larger ones are clamped to
    /// [`MAX_LINE_QUANTITY`].
    pub fn upsert(&mut self, item: &CatalogItem, quantity: i64) {
        if quantity <= 0 {
            self.remove(&item.id);
            return;
        }

        let quantity = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(MAX_LINE_QUANTITY);
        match self.position(&item.id) {
            Some(index) => self.lines[index].set_quantity(quantity),
            None => self.lines.push(CartLine::new(item.clone(), quantity)),
        }
    }

    /// Adds one unit of `item`: the first add creates the line with quantity 1,
    /// later adds increment it. Returns the resulting quantity.
    pub fn add_one(&mut self, item: &CatalogItem) -> u32 {
        match self.position(&item.id) {
            Some(index) => {
                let line = &mut self.lines[index];
                let next = line.quantity.saturating_add(1).min(MAX_LINE_QUANTITY);
                line.set_quantity(next);
                next
            }
            None => {
                self.lines.push(CartLine::new(item.clone(), 1));
                1
            }
        }
    }

    /// Removes the line for `item_id`. Returns whether a line was present.
    pub fn remove(&mut self, item_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.item.id != item_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn quantity_of(&self, item_id: &str) -> u32 {
        self.position(item_id)
            .map(|index| self.lines[index].quantity)
            .unwrap_or(0)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities over all lines.
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn total_weight(&self) -> f64 {
        self.lines.iter().map(CartLine::total_weight).sum()
    }

    pub fn total_volume(&self) -> f64 {
        self.lines.iter().map(CartLine::total_volume).sum()
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.item.id == item_id)
    }
}
