use std::fmt;

/// The five ordered steps of a calculation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    #[default]
    DestinationAndService = 1,
    ProductSelection = 2,
    Review = 3,
    Calculate = 4,
    Results = 5,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::DestinationAndService,
        Step::ProductSelection,
        Step::Review,
        Step::Calculate,
        Step::Results,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::DestinationAndService => "Destination & Service",
            Step::ProductSelection => "Select Products",
            Step::Review => "Review Order",
            Step::Calculate => "Calculate",
            Step::Results => "Results",
        }
    }

    /// Where "back" leads. Results returns to product selection.
    pub fn previous(self) -> Step {
        match self {
            Step::DestinationAndService | Step::ProductSelection => Step::DestinationAndService,
            Step::Review | Step::Results => Step::ProductSelection,
            Step::Calculate => Step::Review,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.label())
    }
}
