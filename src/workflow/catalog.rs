use crate::domain::CatalogItem;

pub const EMPTY_CATALOG_MESSAGE: &str =
    "No products available for your customer account. Please contact your administrator.";
pub const CATALOG_FAILURE_MESSAGE: &str = "Failed to load products";

/// Lifecycle of the product catalog the selection step draws from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CatalogState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<CatalogItem>),
    Failed(String),
}

impl CatalogState {
    /// Products available for selection. Empty unless loaded.
    pub fn products(&self) -> &[CatalogItem] {
        match self {
            CatalogState::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CatalogState::Loading)
    }

    /// Message to show instead of a product list, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            CatalogState::Loaded(items) if items.is_empty() => Some(EMPTY_CATALOG_MESSAGE),
            CatalogState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn find(&self, item_id: &str) -> Option<&CatalogItem> {
        self.products().iter().find(|item| item.id == item_id)
    }

    /// Case-insensitive search over name and SKU.
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        self.products()
            .iter()
            .filter(|item| item.matches_query(query))
            .collect()
    }
}
