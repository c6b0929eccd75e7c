pub mod calculator;
pub mod session;

pub use calculator::CalculatorPage;
pub use session::SessionPage;
