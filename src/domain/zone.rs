use std::fmt;

use serde::{Deserialize, Serialize};

pub const ZIP_LENGTH: usize = 5;

/// Carrier distance band for a destination ZIP (1–8 in practice).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(u32);

impl Zone {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a resolved zone came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneOrigin {
    /// Authoritative zone from the lookup service.
    Lookup,
    /// The lookup service answered but flagged its own estimate.
    LookupEstimate,
    /// The lookup failed and the local heuristic was used.
    LocalEstimate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneResolution {
    pub zip_code: String,
    pub zone: Zone,
    pub origin: ZoneOrigin,
}

impl ZoneResolution {
    pub fn is_estimated(&self) -> bool {
        !matches!(self.origin, ZoneOrigin::Lookup)
    }

    pub fn label(&self) -> String {
        if self.is_estimated() {
            format!("Zone {} (estimated)", self.zone)
        } else {
            format!("Zone {}", self.zone)
        }
    }
}

/// Input has reached the full ZIP length. Lookups are only triggered then.
pub fn is_complete_zip(input: &str) -> bool {
    input.chars().count() == ZIP_LENGTH
}

/// Exactly five ASCII digits.
pub fn is_valid_zip(input: &str) -> bool {
    input.len() == ZIP_LENGTH && input.bytes().all(|byte| byte.is_ascii_digit())
}

/// Local fallback estimate: `ceil(last three digits / 100)`, floored at zone 1.
///
/// Returns `None` for incomplete input or when the tail is not numeric.
pub fn estimate_zone(zip: &str) -> Option<Zone> {
    if !is_complete_zip(zip) {
        return None;
    }

    let tail: String = zip.chars().skip(ZIP_LENGTH - 3).collect();
    if !tail.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let digits: u32 = tail.parse().ok()?;
    Some(Zone(digits.div_ceil(100).max(1)))
}
