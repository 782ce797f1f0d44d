use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::types::PostalCodeResolution;

#[derive(Clone)]
struct Entry {
    resolution: PostalCodeResolution,
    inserted_at: Instant,
}

/// Process-local, read-mostly cache of successful resolutions keyed by
/// `(code, country)`. Entries are immutable once inserted; a stale entry is
/// simply evicted and recomputed rather than mutated in place.
#[derive(Clone)]
pub struct ResolutionCache {
    entries: Arc<RwLock<HashMap<(String, String), Entry>>>,
    ttl: Duration,
}

impl ResolutionCache {
    pub fn new(ttl: Duration) -> Self {
        ResolutionCache {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn get(&self, code: &str, country: &str) -> Option<PostalCodeResolution> {
        let guard = self.entries.read().await;
        let entry = guard.get(&(code.to_string(), country.to_string()))?;
        if entry.inserted_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.resolution.clone())
    }

    pub async fn put(&self, code: &str, country: &str, resolution: PostalCodeResolution) {
        let mut guard = self.entries.write().await;
        guard.insert(
            (code.to_string(), country.to_string()),
            Entry {
                resolution,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::types::Provenance;

    fn sample() -> PostalCodeResolution {
        PostalCodeResolution {
            pincode: "560001".to_string(),
            latitude: 12.97,
            longitude: 77.59,
            state: Some("Karnataka".to_string()),
            district: Some("Bengaluru Urban".to_string()),
            hospital_count: 5,
            source: Provenance::LocalExactCentroid,
        }
    }

    #[tokio::test]
    async fn caches_and_returns_hit() {
        let cache = ResolutionCache::new(Duration::from_secs(60));
        cache.put("560001", "IN", sample()).await;
        assert!(cache.get("560001", "IN").await.is_some());
        assert!(cache.get("000000", "IN").await.is_none());
    }

    #[tokio::test]
    async fn expires_after_ttl() {
        let cache = ResolutionCache::new(Duration::from_millis(1));
        cache.put("560001", "IN", sample()).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.get("560001", "IN").await.is_none());
    }
}
