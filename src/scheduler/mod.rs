//! Asignación greedy de cursos deseados a semestres futuros.
//!
//! Single linear sweep over a bounded term horizon with one piece of mutable
//! state: the set of courses still waiting for a slot. Later terms only see
//! what earlier terms did not consume; there is no backtracking and no
//! reconsideration of a committed term.

use std::collections::HashSet;

use crate::catalog::CourseSource;
use crate::equivalence::normalize_code;
use crate::models::{OfferingCache, PlanItem, SemesterPlan, TermKey};
use crate::offerings::{OfferingStore, resolve_with_prediction};

/// Number of consecutive terms considered, starting at the requested term.
/// Three terms per year, so 12 covers four academic years.
pub const TERM_HORIZON: usize = 12;

/// Greedily place `desired` (ranked best-first) into future terms.
///
/// Per term: resolve that term's offerings (with prediction fallback),
/// intersect with the still-unscheduled codes preserving the caller's
/// ranking order, and commit up to `per_term_capacity` of them. The ranking
/// order is the sole tie-break — never alphabetical, never arbitrary.
/// Courses the horizon cannot place are silently omitted; that is a normal
/// outcome with a low capacity or persistently absent offerings, not an
/// error.
pub async fn build_plan<S: CourseSource>(
    source: &S,
    store: &dyn OfferingStore,
    desired: &[String],
    per_term_capacity: i64,
    start: TermKey,
) -> SemesterPlan {
    // Callers validate capacity; still cap defensively so a bad value makes
    // an empty plan instead of an unbounded one.
    if per_term_capacity <= 0 {
        log::warn!("scheduler: non-positive capacity {}, returning empty plan", per_term_capacity);
        return Vec::new();
    }
    let capacity = per_term_capacity as usize;

    // Remaining = ranked desired codes, normalized, first display form kept
    // on duplicates.
    let mut remaining: Vec<(String, String)> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for code in desired {
        let norm = normalize_code(code);
        if seen.insert(norm.clone()) {
            remaining.push((norm, code.clone()));
        }
    }

    if remaining.is_empty() {
        return Vec::new();
    }

    let mut cache = store.read().unwrap_or_else(OfferingCache::empty);
    let mut plan: SemesterPlan = Vec::new();
    let mut key = start;

    for _ in 0..TERM_HORIZON {
        if remaining.is_empty() {
            break;
        }

        let (offerings, updated, from_prediction) =
            resolve_with_prediction(source, store, key, &cache).await;
        cache = updated;

        let offered: HashSet<String> = offerings.iter().map(|c| normalize_code(c)).collect();

        let mut scheduled: Vec<String> = Vec::new();
        let mut leftover: Vec<(String, String)> = Vec::new();
        for (norm, display) in remaining.into_iter() {
            if scheduled.len() < capacity && offered.contains(&norm) {
                scheduled.push(display);
            } else {
                leftover.push((norm, display));
            }
        }
        remaining = leftover;

        // Sparse plan: a term that takes nothing produces no item.
        if !scheduled.is_empty() {
            plan.push(PlanItem {
                year: key.year,
                term: key.term.as_str().to_string(),
                label: key.label(),
                courses: scheduled,
                from_prediction,
            });
        }

        key = key.next();
    }

    if !remaining.is_empty() {
        log::info!(
            "scheduler: {} desired course(s) left unscheduled after {} terms",
            remaining.len(),
            TERM_HORIZON
        );
    }

    plan
}
