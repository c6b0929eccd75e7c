use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{estimate_zone, is_complete_zip, ZoneOrigin, ZoneResolution};
use crate::infra::{ApiError, ZoneLookup};

/// Maps a destination ZIP to a zone: remote lookup first, local estimate on failure.
#[derive(Clone)]
pub struct ZoneResolver {
    lookup: Arc<dyn ZoneLookup>,
}

impl ZoneResolver {
    pub fn new(lookup: Arc<dyn ZoneLookup>) -> Self {
        Self { lookup }
    }

    /// Returns `None` for incomplete input, for a rejected session, and when
    /// neither the lookup nor the estimate yields a zone.
    pub async fn resolve(&self, zip: &str) -> Option<ZoneResolution> {
        if !is_complete_zip(zip) {
            return None;
        }

        match self.lookup.lookup_zone(zip).await {
            Ok(response) => {
                let origin = if response.estimated {
                    ZoneOrigin::LookupEstimate
                } else {
                    ZoneOrigin::Lookup
                };
                Some(ZoneResolution {
                    zip_code: zip.to_string(),
                    zone: response.zone,
                    origin,
                })
            }
            Err(ApiError::Unauthorized) => {
                debug!(zip, "zone lookup rejected, session needs re-authentication");
                None
            }
            Err(err) => {
                let estimate = estimate_zone(zip);
                warn!(zip, error = %err, estimate = ?estimate.map(|zone| zone.value()), "zone lookup failed, using local estimate");
                estimate.map(|zone| ZoneResolution {
                    zip_code: zip.to_string(),
                    zone,
                    origin: ZoneOrigin::LocalEstimate,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::Zone;
    use crate::infra::ZoneLookupResponse;

    enum Reply {
        Zone(u32, bool),
        Unavailable,
        Unauthorized,
    }

    struct FakeLookup {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl FakeLookup {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ZoneLookup for FakeLookup {
        async fn lookup_zone(&self, zip: &str) -> Result<ZoneLookupResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Zone(zone, estimated) => Ok(ZoneLookupResponse {
                    zip_code: zip.to_string(),
                    zone: Zone::new(zone),
                    estimated,
                }),
                Reply::Unavailable => Err(ApiError::Status {
                    status: 503,
                    detail: None,
                    body: String::new(),
                }),
                Reply::Unauthorized => Err(ApiError::Unauthorized),
            }
        }
    }

    #[tokio::test]
    async fn remote_zone_is_authoritative() {
        let lookup = FakeLookup::new(Reply::Zone(4, false));
        let resolver = ZoneResolver::new(lookup.clone());

        let resolution = resolver.resolve("60540").await.unwrap();
        assert_eq!(resolution.zone, Zone::new(4));
        assert_eq!(resolution.origin, ZoneOrigin::Lookup);
        assert!(!resolution.is_estimated());
    }

    #[tokio::test]
    async fn service_side_estimates_stay_marked() {
        let resolver = ZoneResolver::new(FakeLookup::new(Reply::Zone(3, true)));
        let resolution = resolver.resolve("10250").await.unwrap();
        assert_eq!(resolution.origin, ZoneOrigin::LookupEstimate);
        assert!(resolution.is_estimated());
    }

    #[tokio::test]
    async fn failed_lookup_falls_back_to_estimate() {
        let resolver = ZoneResolver::new(FakeLookup::new(Reply::Unavailable));

        let resolution = resolver.resolve("60540").await.unwrap();
        assert_eq!(resolution.zone, Zone::new(6));
        assert_eq!(resolution.origin, ZoneOrigin::LocalEstimate);

        let resolution = resolver.resolve("00199").await.unwrap();
        assert_eq!(resolution.zone, Zone::new(2));
    }

    #[tokio::test]
    async fn incomplete_zip_never_calls_the_service() {
        let lookup = FakeLookup::new(Reply::Zone(4, false));
        let resolver = ZoneResolver::new(lookup.clone());

        assert_eq!(resolver.resolve("6054").await, None);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unauthorized_leaves_zone_unresolved() {
        let resolver = ZoneResolver::new(FakeLookup::new(Reply::Unauthorized));
        assert_eq!(resolver.resolve("60540").await, None);
    }
}
