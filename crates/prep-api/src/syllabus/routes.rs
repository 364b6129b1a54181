use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use prep_db::{
    models::SyllabusProgress,
    repositories::syllabus::{self, SyllabusTopic},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    ApiState,
    error::ApiError,
    user::ensure_user_exists,
    validation::{validate_class_type, validate_name, validate_syllabus_status},
};

/// Create the syllabus tracker routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/syllabus/progress", post(update_status))
        .route("/syllabus/progress/{user_id}", get(list_statuses))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate {
    user_id: Uuid,
    class_type: String,
    subject_id: String,
    chapter_id: String,
    topic_id: String,
    status: String,
}

async fn update_status(
    State(state): State<ApiState>,
    Json(payload): Json<StatusUpdate>,
) -> Result<Json<SyllabusProgress>, ApiError> {
    validate_class_type(&payload.class_type)?;
    validate_name("subjectId", &payload.subject_id)?;
    validate_name("chapterId", &payload.chapter_id)?;
    validate_name("topicId", &payload.topic_id)?;
    validate_syllabus_status(&payload.status)?;

    ensure_user_exists(&state.pool, payload.user_id).await?;

    let topic = SyllabusTopic {
        class_type: &payload.class_type,
        subject_id: &payload.subject_id,
        chapter_id: &payload.chapter_id,
        topic_id: &payload.topic_id,
    };
    let stored = syllabus::upsert_status(&state.pool, payload.user_id, topic, &payload.status).await?;

    Ok(Json(stored))
}

async fn list_statuses(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<SyllabusProgress>>, ApiError> {
    Ok(Json(syllabus::list_for_user(&state.pool, user_id).await?))
}
