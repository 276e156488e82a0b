use actix_web::{get, web, HttpResponse};

use crate::state::AppState;
use crate::types::StatusResponse;

/// Liveness check
#[get("/health")]
pub async fn health() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

/// Served snapshot and reload loop state
#[get("/status")]
pub async fn status(
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let snapshot = state.store.current().await;
    let reload = state.reload_status.read().await.clone();

    Ok(HttpResponse::Ok().json(StatusResponse {
        students: snapshot.students().len(),
        professors: snapshot.professors().len(),
        dim: snapshot.dim(),
        embedding_model: state.config.embedding_model.clone(),
        reload,
    }))
}
