//! Predicción heurística de ofertas.

use crate::models::{OfferingCache, TermKey};

/// Fallback when authoritative data for a term is absent or empty: the same
/// term of the prior year, as cached. Pure lookup — no network, no cache
/// mutation, and no recursion to older years when the prior year is also
/// missing.
pub fn predict_offerings(key: TermKey, cache: &OfferingCache) -> Vec<String> {
    cache
        .semesters
        .get(&key.prior_year().key())
        .cloned()
        .unwrap_or_default()
}
