use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError};

#[get("/api/learners/{learner_id}/gradebook")]
pub async fn gradebook(
    state: web::Data<AppState>,
    learner_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let view = state.gradebook_service.gradebook(&learner_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[get("/api/learners/{learner_id}/quizzes/{quiz_id}/attempts")]
pub async fn attempt_history(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (learner_id, quiz_id) = path.into_inner();
    let attempts = state
        .attempt_ledger
        .attempt_history(&quiz_id, &learner_id)
        .await?;
    Ok(HttpResponse::Ok().json(attempts))
}

#[get("/api/learners/{learner_id}/quizzes/{quiz_id}/results")]
pub async fn quiz_results(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (learner_id, quiz_id) = path.into_inner();
    let results = state
        .gradebook_service
        .quiz_results(&learner_id, &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(results))
}
