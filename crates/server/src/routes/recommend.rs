use actix_web::{get, web, HttpResponse};
use scholarlink_common::{Result, ScholarlinkError};
use scholarlink_engine::{Recommendation, DEFAULT_THRESHOLD, DEFAULT_TOP_N};
use tracing::debug;

use crate::state::AppState;
use crate::types::{ProfessorQuery, RecommendResponse, StudentQuery};

/// Convert an engine result into the HTTP payload
///
/// This is the outermost boundary of the query path: an unknown
/// identifier degrades to an empty result list instead of an error, so a
/// missing recommendation never crashes a request.
fn into_response(
    query_id: &str,
    result: Result<Vec<Recommendation>>,
) -> actix_web::Result<HttpResponse> {
    let results = match result {
        Ok(results) => results,
        Err(e) if e.is_not_found() => {
            debug!("Unknown identifier '{}'; returning empty result list", query_id);
            Vec::new()
        }
        Err(e) => return Err(actix_web::error::ErrorInternalServerError(e)),
    };

    Ok(HttpResponse::Ok().json(RecommendResponse {
        query_id: query_id.to_string(),
        count: results.len(),
        results,
    }))
}

fn check_non_empty(id: &str) -> actix_web::Result<()> {
    if id.trim().is_empty() {
        return Err(actix_web::error::ErrorBadRequest(
            ScholarlinkError::invalid_input("Identifier cannot be empty"),
        ));
    }
    Ok(())
}

/// Recommend professors for a student
#[get("/recommend/professors")]
pub async fn recommend_professors(
    query: web::Query<StudentQuery>,
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    check_non_empty(&query.student_id)?;

    let result = state
        .recommender
        .recommend_professors(
            &query.student_id,
            query.top_n.unwrap_or(DEFAULT_TOP_N),
            query.threshold.unwrap_or(DEFAULT_THRESHOLD),
        )
        .await;

    into_response(&query.student_id, result)
}

/// Recommend students for a professor
#[get("/recommend/students")]
pub async fn recommend_students(
    query: web::Query<ProfessorQuery>,
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    check_non_empty(&query.professor_id)?;

    let result = state
        .recommender
        .recommend_students(
            &query.professor_id,
            query.top_n.unwrap_or(DEFAULT_TOP_N),
            query.threshold.unwrap_or(DEFAULT_THRESHOLD),
        )
        .await;

    into_response(&query.professor_id, result)
}

/// Recommend students with similar interests to a student
#[get("/recommend/similar-students")]
pub async fn recommend_similar_students(
    query: web::Query<StudentQuery>,
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    check_non_empty(&query.student_id)?;

    let result = state
        .recommender
        .recommend_students_to_students(
            &query.student_id,
            query.top_n.unwrap_or(DEFAULT_TOP_N),
            query.threshold.unwrap_or(DEFAULT_THRESHOLD),
        )
        .await;

    into_response(&query.student_id, result)
}

/// Recommend professors with similar interests to a professor
#[get("/recommend/similar-professors")]
pub async fn recommend_similar_professors(
    query: web::Query<ProfessorQuery>,
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    check_non_empty(&query.professor_id)?;

    let result = state
        .recommender
        .recommend_professors_to_professors(
            &query.professor_id,
            query.top_n.unwrap_or(DEFAULT_TOP_N),
            query.threshold.unwrap_or(DEFAULT_THRESHOLD),
        )
        .await;

    into_response(&query.professor_id, result)
}
