use actix_cors::Cors;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, Responder, web};
use serde_json::json;
use std::error::Error;
use std::fs::create_dir_all;
use std::path::Path;
use std::time::Instant;

use crate::api_json::{PlanRequest, parse_plan_request, resolve_start_term, validate_capacity};
use crate::catalog::HttpCatalogClient;
use crate::equivalence::{expand_taken, filter_untaken, normalize_code};
use crate::offerings::{FileStore, OfferingStore, resolve_with_prediction};
use crate::scheduler::build_plan;

/// Degree summary constants for the derived `credits_remaining` figure.
/// Computed here at the service layer; the planning subsystem itself knows
/// nothing about credits.
const DEGREE_TOTAL_CREDITS: i64 = 120;
const CREDITS_PER_COURSE: i64 = 3;

const STUDENTS_FILE: &str = "data/students.json";

/// Shared planning pipeline for the POST and GET variants:
/// expand taken set -> filter desired -> build plan -> summary figures.
async fn execute_plan(params: &PlanRequest) -> Result<serde_json::Value, Box<dyn Error>> {
    validate_capacity(params.per_term_capacity)?;
    let start = resolve_start_term(params)?;

    let taken = expand_taken(&params.completed);
    let desired = filter_untaken(&params.desired, &taken);

    let source = HttpCatalogClient::from_env();
    let store = FileStore::from_env();
    let plan = build_plan(&source, &store, &desired, params.per_term_capacity, start).await;

    let scheduled: std::collections::HashSet<String> = plan
        .iter()
        .flat_map(|item| item.courses.iter().map(|c| normalize_code(c)))
        .collect();
    let unscheduled: Vec<&String> = desired
        .iter()
        .filter(|c| !scheduled.contains(&normalize_code(c)))
        .collect();

    let credits_remaining =
        (DEGREE_TOTAL_CREDITS - params.completed.len() as i64 * CREDITS_PER_COURSE).max(0);

    Ok(json!({
        "status": "ok",
        "start": start.label(),
        "plan": plan,
        "scheduled": scheduled.len(),
        "unscheduled": unscheduled,
        "credits_remaining": credits_remaining,
    }))
}

async fn plan_handler(req: HttpRequest, body: web::Json<serde_json::Value>) -> impl Responder {
    let body_value = body.into_inner();
    let json_str = match serde_json::to_string(&body_value) {
        Ok(s) => s,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e)}));
        }
    };

    let params = match parse_plan_request(&json_str) {
        Ok(p) => p,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({"error": format!("failed to parse input: {}", e)}));
        }
    };

    let started = Instant::now();
    match execute_plan(&params).await {
        Ok(resp) => {
            record_analytics(&req, &json_str, &resp, started.elapsed().as_millis() as i64);
            HttpResponse::Ok().json(resp)
        }
        Err(e) => HttpResponse::BadRequest().json(json!({"error": format!("{}", e)})),
    }
}

/// GET /plan handler: accepts simple query-string parameters.
/// Expected (comma-separated lists):
/// - completed
/// - desired
/// - per_term_capacity
/// - start_year, start_term
/// - email
async fn plan_get_handler(
    req: HttpRequest,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let split_list = |s_opt: Option<&String>| -> Vec<String> {
        match s_opt {
            Some(s) if !s.trim().is_empty() => s
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    };

    let qm = query.into_inner();
    let completed = split_list(qm.get("completed"));
    let desired = split_list(qm.get("desired"));
    let per_term_capacity = qm
        .get("per_term_capacity")
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(3);
    let email = qm.get("email").cloned().unwrap_or_default();

    let params = PlanRequest {
        email,
        completed,
        desired,
        per_term_capacity,
        start_year: qm.get("start_year").and_then(|s| s.parse::<i32>().ok()),
        start_term: qm.get("start_term").cloned(),
    };

    let json_str = serde_json::to_string(&params).unwrap_or_default();
    let started = Instant::now();
    match execute_plan(&params).await {
        Ok(resp) => {
            record_analytics(&req, &json_str, &resp, started.elapsed().as_millis() as i64);
            HttpResponse::Ok().json(resp)
        }
        Err(e) => HttpResponse::BadRequest().json(json!({"error": format!("{}", e)})),
    }
}

/// GET /offerings?year=2024&term=fall
/// Debug view of one term's resolution, through the same resolver path the
/// scheduler uses (cache, fetch, prediction fallback).
async fn offerings_handler(
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let qm = query.into_inner();
    let year = match qm.get("year").and_then(|s| s.parse::<i32>().ok()) {
        Some(y) => y,
        None => return HttpResponse::BadRequest().json(json!({"error": "year query parameter is required"})),
    };
    let term = match qm.get("term").map(|s| crate::models::Term::parse(s)) {
        Some(Ok(t)) => t,
        Some(Err(e)) => return HttpResponse::BadRequest().json(json!({"error": format!("{}", e)})),
        None => return HttpResponse::BadRequest().json(json!({"error": "term query parameter is required"})),
    };

    let key = crate::models::TermKey::new(year, term);
    let source = HttpCatalogClient::from_env();
    let store = FileStore::from_env();
    let cache = store.read().unwrap_or_else(crate::models::OfferingCache::empty);

    let (offerings, _updated, from_prediction) =
        resolve_with_prediction(&source, &store, key, &cache).await;

    HttpResponse::Ok().json(json!({
        "term": key.key(),
        "label": key.label(),
        "fromPrediction": from_prediction,
        "count": offerings.len(),
        "courses": offerings,
    }))
}

/// POST /students
/// Persists the student profile to `data/students.json`, replacing any
/// existing entry with the same email.
async fn save_student_handler(body: web::Json<serde_json::Value>) -> impl Responder {
    let body_value = body.into_inner();
    let json_str = match serde_json::to_string(&body_value) {
        Ok(s) => s,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e)}));
        }
    };

    let student = match parse_plan_request(&json_str) {
        Ok(s) => s,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({"error": format!("failed to parse input: {}", e)}));
        }
    };

    if student.email.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({"error": "email is required"}));
    }

    if let Some(dir) = Path::new(STUDENTS_FILE).parent() {
        if let Err(e) = create_dir_all(dir) {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("failed to create data dir: {}", e)}));
        }
    }

    let mut students: Vec<PlanRequest> = Vec::new();
    if Path::new(STUDENTS_FILE).exists() {
        match std::fs::read_to_string(STUDENTS_FILE) {
            Ok(contents) if !contents.trim().is_empty() => {
                match serde_json::from_str::<Vec<PlanRequest>>(&contents) {
                    Ok(mut v) => students.append(&mut v),
                    Err(_) => {
                        // Existing file is invalid: start fresh rather than fail.
                        students = Vec::new();
                    }
                }
            }
            _ => { /* empty file or read error -> start fresh */ }
        }
    }

    students.retain(|s| s.email.to_lowercase() != student.email.to_lowercase());
    students.push(student);

    let text = match serde_json::to_string_pretty(&students) {
        Ok(t) => t,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("failed to serialize students: {}", e)}));
        }
    };
    if let Err(e) = std::fs::write(STUDENTS_FILE, text) {
        return HttpResponse::InternalServerError()
            .json(json!({"error": format!("failed to write file: {}", e)}));
    }

    HttpResponse::Ok().json(json!({"status": "ok", "count": students.len()}))
}

async fn help_handler() -> impl Responder {
    let example = PlanRequest {
        email: "student@example.com".to_string(),
        completed: vec!["CMPT 120".to_string(), "MATH 150".to_string()],
        desired: vec!["CMPT 225".to_string(), "CMPT 295".to_string(), "MATH 240".to_string()],
        per_term_capacity: 3,
        start_year: Some(2024),
        start_term: Some("fall".to_string()),
    };

    let help = json!({
        "description": "Semester planning API. POST /plan takes a JSON PlanRequest (see 'post_example'); GET /plan takes comma-separated lists in the query string. 'desired' must already be ranked best-first by the upstream recommender.",
        "post_example": example,
        "get_example_query": "/plan?completed=CMPT%20120,MATH%20150&desired=CMPT%20225,CMPT%20295&per_term_capacity=3&start_year=2024&start_term=fall",
        "capacity_presets": [3, 5],
        "note": "Offerings come from the term catalog with a per-term cache; when a term has no authoritative data the prior year's same term is used and plan items carry fromPrediction=true.",
    });

    HttpResponse::Ok().json(help)
}

/// Best-effort analytics; failures are logged and never affect the response.
fn record_analytics(req: &HttpRequest, request_json: &str, response: &serde_json::Value, duration_ms: i64) {
    let client_ip = req
        .peer_addr()
        .map(|a| a.ip().to_string())
        .unwrap_or_default();
    let response_json = response.to_string();
    if let Err(e) = crate::analithics::log_query(request_json, &response_json, duration_ms, &client_ip) {
        log::warn!("analytics: query not recorded: {}", e);
    }

    let entries = FileStore::from_env()
        .read()
        .map(|c| c.semesters.len() as i64)
        .unwrap_or(0);
    if let Err(e) = crate::analithics::record_cache_snapshot(entries) {
        log::warn!("analytics: cache snapshot not recorded: {}", e);
    }
}

pub async fn run_server(bind_addr: &str) -> std::io::Result<()> {
    HttpServer::new(|| {
        App::new()
            .wrap(Cors::permissive())
            .route("/plan", web::post().to(plan_handler))
            .route("/plan", web::get().to(plan_get_handler))
            .route("/offerings", web::get().to(offerings_handler))
            .route("/students", web::post().to(save_student_handler))
            .route("/help", web::get().to(help_handler))
    })
    .bind(bind_addr)?
    .run()
    .await
}
