pub const APP_NAME: &str = "Shipping Calculator";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_label() -> String {
    format!("v{APP_VERSION}")
}

/// User agent sent with every API request.
pub fn user_agent() -> String {
    format!("shipping-calculator/{APP_VERSION}")
}
