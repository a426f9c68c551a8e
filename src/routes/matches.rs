use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::MatchError;
use crate::models::{
    HealthResponse, JobCandidate, MatchResult, RankJobsRequest, RankJobsResponse, RankOptions,
    SearchJobsRequest,
};
use crate::routes::{error_response, AppState};
use crate::services::normalize_jobs;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/rank", web::post().to(rank_jobs))
        .route("/matches/search", web::post().to(search_jobs));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        similarity_mode: state.matcher.similarity_mode().to_string(),
        cached_profiles: state.matcher.cache().stats().entries,
        timestamp: chrono::Utc::now(),
    })
}

/// Rank jobs endpoint
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "jobs": [{ "title": "string", "body": "string", ... }],
///   "rawJobs": [{ "source": "reddit", "title": "string", ... }],
///   "topK": 10,
///   "minScore": 0.25
/// }
/// ```
async fn rank_jobs(state: web::Data<AppState>, req: web::Json<RankJobsRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: field_errors={:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let candidates = collect_candidates(req.jobs, req.raw_jobs);
    let options = rank_options(&state, req.top_k, req.min_score);
    let total_candidates = candidates.len();

    tracing::info!(
        "Ranking {} jobs for user: {}, top_k: {}",
        total_candidates,
        req.user_id,
        options.top_k
    );

    let worker = state.clone();
    let user_id = req.user_id;
    let outcome = web::block(move || {
        worker
            .matcher
            .rank_for_user(worker.profiles.as_ref(), &user_id, candidates, options)
    })
    .await;

    respond(&state, outcome, total_candidates)
}

/// Search jobs endpoint
///
/// POST /api/v1/matches/search
///
/// Same body as `/matches/rank` plus a free-text `query`.
async fn search_jobs(state: web::Data<AppState>, req: web::Json<SearchJobsRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: field_errors={:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let candidates = collect_candidates(req.jobs, req.raw_jobs);
    let options = rank_options(&state, req.top_k, req.min_score);
    let total_candidates = candidates.len();

    tracing::info!(
        "Searching {} jobs for user: {}, query: {:?}",
        total_candidates,
        req.user_id,
        req.query
    );

    let worker = state.clone();
    let (user_id, query) = (req.user_id, req.query);
    let outcome = web::block(move || {
        worker
            .matcher
            .search_for_user(worker.profiles.as_ref(), &user_id, &query, candidates, options)
    })
    .await;

    respond(&state, outcome, total_candidates)
}

fn collect_candidates(
    mut jobs: Vec<JobCandidate>,
    raw_jobs: Vec<crate::services::RawJob>,
) -> Vec<JobCandidate> {
    if !raw_jobs.is_empty() {
        jobs.extend(normalize_jobs(raw_jobs));
    }
    jobs
}

fn rank_options(state: &AppState, top_k: Option<u16>, min_score: Option<f64>) -> RankOptions {
    RankOptions {
        top_k: state.matching.effective_top_k(top_k),
        min_score: min_score.or(state.matching.min_score),
    }
}

fn respond(
    state: &AppState,
    outcome: Result<Result<Vec<MatchResult>, MatchError>, actix_web::error::BlockingError>,
    total_candidates: usize,
) -> HttpResponse {
    match outcome {
        Ok(Ok(matches)) => HttpResponse::Ok().json(RankJobsResponse {
            matches,
            total_candidates,
            similarity_mode: state.matcher.similarity_mode().to_string(),
        }),
        Ok(Err(e @ MatchError::MissingProfile(_))) => {
            tracing::info!("{}", e);
            error_response(StatusCode::NOT_FOUND, "Profile not found", e.to_string())
        }
        Err(e) => {
            tracing::error!("Ranking worker failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Ranking failed", e.to_string())
        }
    }
}
