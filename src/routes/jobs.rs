use actix_web::{web, HttpResponse, Responder};
use crate::models::{NormalizeJobsRequest, NormalizeJobsResponse};
use crate::services::normalize_jobs;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/jobs/normalize", web::post().to(normalize));
}

/// POST /api/v1/jobs/normalize
///
/// Converts scraped Reddit posts and Glassdoor listings into canonical jobs
/// without ranking them.
async fn normalize(req: web::Json<NormalizeJobsRequest>) -> impl Responder {
    let jobs = normalize_jobs(req.into_inner().raw_jobs);
    HttpResponse::Ok().json(NormalizeJobsResponse { jobs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExperienceLevel;
    use actix_web::{test, App};
    use serde_json::json;

    #[actix_web::test]
    async fn test_normalize_mixed_sources() {
        let app = test::init_service(App::new().configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/jobs/normalize")
            .set_json(json!({"rawJobs": [
                {"source": "reddit", "title": "Senior Rust engineer", "content": "Berlin office"},
                {"source": "glassdoor", "title": "Data Intern", "company": "Acme",
                 "description": "Excel and SQL", "remote_type": "remote"}
            ]}))
            .to_request();
        let body: NormalizeJobsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.jobs.len(), 2);
        assert_eq!(body.jobs[0].experience_level, ExperienceLevel::Senior);
        assert_eq!(body.jobs[0].location, "Berlin");
        assert!(body.jobs[1].remote);
        assert_eq!(body.jobs[1].job_type.as_deref(), Some("internship"));
        assert_eq!(body.jobs[1].skills_mentioned, vec!["excel", "sql"]);
    }
}
