//! Resolución de ofertas: caché primero, fetch remoto después, predicción
//! como último recurso.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::catalog::{CourseSource, fetch_offerings};
use crate::models::{OfferingCache, TermKey};

use super::predict::predict_offerings;
use super::store::OfferingStore;

// Process-wide hit/miss counters; snapshotted into analytics after each
// planning request.
static CACHE_HITS: AtomicI64 = AtomicI64::new(0);
static CACHE_MISSES: AtomicI64 = AtomicI64::new(0);

/// Current (hits, misses) counter values.
pub fn cache_counters() -> (i64, i64) {
    (CACHE_HITS.load(Ordering::Relaxed), CACHE_MISSES.load(Ordering::Relaxed))
}

/// Resolve the offerings for one term against a cache snapshot.
///
/// Cache hit iff the key is present with a non-empty set; the snapshot is
/// returned unchanged and nothing is fetched. Otherwise the catalog is
/// queried, the (possibly empty) result is merged into a copy of the cache
/// under that key, the copy is persisted best-effort, and both the result
/// and the updated copy are returned — whether or not the persist succeeded.
pub async fn resolve_offerings<S: CourseSource>(
    source: &S,
    store: &dyn OfferingStore,
    key: TermKey,
    cache: &OfferingCache,
) -> (Vec<String>, OfferingCache) {
    if let Some(existing) = cache.semesters.get(&key.key()) {
        if !existing.is_empty() {
            CACHE_HITS.fetch_add(1, Ordering::Relaxed);
            log::debug!("offerings: cache hit for {} ({} courses)", key, existing.len());
            return (existing.clone(), cache.clone());
        }
    }

    CACHE_MISSES.fetch_add(1, Ordering::Relaxed);
    let fetched = fetch_offerings(source, key).await;

    let mut updated = cache.clone();
    updated.semesters.insert(key.key(), fetched.clone());
    updated.last_updated = Utc::now().to_rfc3339();
    store.write(&updated);

    (fetched, updated)
}

/// `resolve_offerings` plus the prediction fallback. The third element of
/// the result reports whether the offerings came from prediction; it is true
/// even when the prediction itself turned out empty.
pub async fn resolve_with_prediction<S: CourseSource>(
    source: &S,
    store: &dyn OfferingStore,
    key: TermKey,
    cache: &OfferingCache,
) -> (Vec<String>, OfferingCache, bool) {
    let (offerings, updated) = resolve_offerings(source, store, key, cache).await;
    if !offerings.is_empty() {
        return (offerings, updated, false);
    }

    // An empty set here covers both "verified zero offerings" and "catalog
    // unreachable"; the cache stores them identically, so prediction fires
    // for both. Known conflation, kept as-is.
    let predicted = predict_offerings(key, &updated);
    log::info!(
        "offerings: {} resolved empty, predicted {} courses from {}",
        key,
        predicted.len(),
        key.prior_year()
    );
    (predicted, updated, true)
}
