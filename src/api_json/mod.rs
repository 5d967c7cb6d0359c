use serde::{Deserialize, Serialize};
use std::error::Error;

use crate::models::{Term, TermKey};

/// Parámetros de entrada para una solicitud de plan de semestres.
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "email": "student@example.com",
///   "completed": ["CMPT 120", "MATH 150"],
///   "desired": ["CMPT 225", "CMPT 295", "MATH 240"],
///   "per_term_capacity": 3,
///   "start_year": 2024,
///   "start_term": "fall"
/// }
/// ```
///
/// # Campos:
/// - `email`: student email (used only for profile persistence/analytics)
/// - `completed`: course codes the student already finished
/// - `desired`: ranked desired courses, best first. The ranking is produced
///   upstream by the recommendation oracle; this service only consumes the
///   order, it never re-ranks.
/// - `per_term_capacity`: courses per term; the two supported presets are
///   3 (regular load) and 5 (full load)
/// - `start_year` / `start_term`: optional first term of the plan; defaults
///   to the current term
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub email: String,
    pub completed: Vec<String>,
    pub desired: Vec<String>,
    pub per_term_capacity: i64,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub start_term: Option<String>,
}

/// Supported per-term course loads.
pub const CAPACITY_PRESETS: &[i64] = &[3, 5];

pub fn parse_plan_request(json_str: &str) -> Result<PlanRequest, serde_json::Error> {
    serde_json::from_str::<PlanRequest>(json_str)
}

/// The API only accepts the two presets; anything else is a caller error.
/// (The scheduler itself additionally defends against non-positive values.)
pub fn validate_capacity(per_term_capacity: i64) -> Result<(), Box<dyn Error>> {
    if CAPACITY_PRESETS.contains(&per_term_capacity) {
        Ok(())
    } else {
        Err(format!(
            "per_term_capacity must be one of {:?}, got {}",
            CAPACITY_PRESETS, per_term_capacity
        )
        .into())
    }
}

/// First term of the plan: the request's explicit year/term when given,
/// today's term otherwise. A term name outside the fixed cycle fails fast
/// here (configuration error) instead of producing a wrong schedule.
pub fn resolve_start_term(req: &PlanRequest) -> Result<TermKey, Box<dyn Error>> {
    let current = TermKey::current();
    let term = match &req.start_term {
        Some(name) => Term::parse(name)?,
        None => current.term,
    };
    let year = req.start_year.unwrap_or(current.year);
    Ok(TermKey::new(year, term))
}
