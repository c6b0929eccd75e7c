use thiserror::Error;

use super::step::Step;

/// Local failures raised by the workflow before anything reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Please select at least one product")]
    NoProducts,
    #[error("Please enter a valid 5-digit ZIP code")]
    InvalidZip,
    #[error("User not authenticated")]
    NotAuthenticated,
    #[error("cannot advance from {0}")]
    CannotAdvance(Step),
    #[error("calculation is only submitted from {expected}, currently at {actual}")]
    WrongStep { expected: Step, actual: Step },
}
