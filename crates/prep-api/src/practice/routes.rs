use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use prep_db::{
    models::{NewPracticeSession, PracticeSession},
    repositories::practice,
};
use uuid::Uuid;

use crate::{
    ApiState,
    error::ApiError,
    user::ensure_user_exists,
    validation::{validate_counts, validate_name, validate_subject},
};

const LIST_LIMIT: i64 = 100;

/// Create the practice routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/practice/session", post(create_session))
        .route("/practice/sessions/{user_id}", get(list_sessions))
}

async fn create_session(
    State(state): State<ApiState>,
    Json(payload): Json<NewPracticeSession>,
) -> Result<(StatusCode, Json<PracticeSession>), ApiError> {
    validate_subject(&payload.subject)?;
    validate_name("chapter", &payload.chapter)?;
    validate_counts(payload.questions_correct, payload.questions_attempted)?;
    if payload.time_spent < 0 {
        return Err(ApiError::Validation(
            "timeSpent cannot be negative".to_string(),
        ));
    }

    ensure_user_exists(&state.pool, payload.user_id).await?;

    let session = practice::insert(&state.pool, &payload).await?;
    tracing::debug!(session_id = %session.id, user_id = %session.user_id, "Stored practice session");

    Ok((StatusCode::CREATED, Json(session)))
}

/// Most recent sessions first
async fn list_sessions(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PracticeSession>>, ApiError> {
    Ok(Json(
        practice::list_for_user(&state.pool, user_id, LIST_LIMIT).await?,
    ))
}
