use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use crate::models::Profile;
use crate::routes::{error_response, AppState};
use crate::services::ProfileSource;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profiles/{user_id}", web::get().to(get_profile))
        .route("/profiles/{user_id}", web::put().to(put_profile))
        .route("/profiles/{user_id}/cache", web::delete().to(invalidate_cache));
}

/// GET /api/v1/profiles/{userId}
async fn get_profile(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    match state.profiles.get_profile(&user_id) {
        Some(profile) => HttpResponse::Ok().json(profile),
        None => error_response(
            StatusCode::NOT_FOUND,
            "Profile not found",
            format!("No profile found for user: {}", user_id),
        ),
    }
}

/// PUT /api/v1/profiles/{userId}
///
/// Inserts or replaces the profile. The id in the path wins over any id in
/// the body, and the cached projection is dropped.
async fn put_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Profile>,
) -> impl Responder {
    let mut profile = body.into_inner();
    profile.id = path.into_inner();

    let user_id = profile.id.clone();
    let replaced = state.profiles.upsert(profile.clone()).is_some();
    state.matcher.invalidate_profile(&user_id);

    tracing::info!("Stored profile for {} (replaced: {})", user_id, replaced);

    if replaced {
        HttpResponse::Ok().json(profile)
    } else {
        HttpResponse::Created().json(profile)
    }
}

/// DELETE /api/v1/profiles/{userId}/cache
async fn invalidate_cache(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    state.matcher.invalidate_profile(&path.into_inner());
    HttpResponse::NoContent().finish()
}
