//! Multi-step calculation workflow built on the domain rules and the
//! remote collaborators.

pub mod catalog;
pub mod error;
pub mod machine;
pub mod step;
pub mod summary;
pub mod zone_resolver;

pub use catalog::{CatalogState, CATALOG_FAILURE_MESSAGE, EMPTY_CATALOG_MESSAGE};
pub use error::WorkflowError;
pub use machine::{
    calculation_error_message, fetch_debug_mode, CalculationTicket, CatalogTicket, Workflow,
    ZoneTicket, CALCULATION_FAILURE_MESSAGE,
};
pub use step::Step;
pub use summary::ReviewSummary;
pub use zone_resolver::ZoneResolver;
