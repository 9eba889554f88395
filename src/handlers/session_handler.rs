use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{NavigateRequest, RecordAnswerRequest, StartSessionRequest},
};

#[post("/api/quizzes/{quiz_id}/sessions")]
pub async fn start_session(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<StartSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let view = state
        .session_service
        .start_session(&quiz_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(view))
}

#[get("/api/sessions/{id}")]
pub async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let view = state.session_service.session_view(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/answers")]
pub async fn record_answer(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<RecordAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    let view = state.session_service.record_answer(&id, request).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/navigate")]
pub async fn navigate(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<NavigateRequest>,
) -> Result<HttpResponse, AppError> {
    let view = state
        .session_service
        .navigate(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/submit")]
pub async fn submit(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let view = state.session_service.submit(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/restart")]
pub async fn restart(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let view = state.session_service.restart(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[delete("/api/sessions/{id}")]
pub async fn leave(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.session_service.leave(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
