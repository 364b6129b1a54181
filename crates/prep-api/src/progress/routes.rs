use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use prep_db::{models::TopicProgress, repositories::progress};
use prep_mastery::{Classification, MasteryError, TopicTally};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    ApiState,
    error::ApiError,
    user::ensure_user_exists,
    validation::{validate_name, validate_subject},
};

/// Create the topic progress routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/topic-progress", post(record_practice))
        .route("/topic-progress/{user_id}", get(list_progress))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PracticeSubmission {
    user_id: Uuid,
    subject: String,
    chapter: String,
    topic: String,
    correct: u32,
    total: u32,
}

fn to_counter(value: u32) -> Result<i32, ApiError> {
    i32::try_from(value).map_err(|_| MasteryError::Overflow.into())
}

fn to_tally(row: &TopicProgress) -> Result<TopicTally, ApiError> {
    let correct = u32::try_from(row.correct_attempts)
        .map_err(|_| ApiError::Internal("negative correct_attempts".to_string()))?;
    let total = u32::try_from(row.total_attempts)
        .map_err(|_| ApiError::Internal("negative total_attempts".to_string()))?;
    Ok(TopicTally::new(correct, total))
}

/// Merge a practice submission into the user's cumulative topic counters.
///
/// The counters are incremented by a single upsert, then accuracy and
/// classification are recomputed from the stored totals in the same
/// transaction.
async fn record_practice(
    State(state): State<ApiState>,
    Json(payload): Json<PracticeSubmission>,
) -> Result<Json<TopicProgress>, ApiError> {
    validate_subject(&payload.subject)?;
    validate_name("chapter", &payload.chapter)?;
    validate_name("topic", &payload.topic)?;

    let submission = TopicTally::default().merge(TopicTally::new(payload.correct, payload.total))?;
    let first = submission.summary()?;

    let mut tx = state.pool.begin().await?;
    ensure_user_exists(&mut *tx, payload.user_id).await?;

    let mut row = progress::increment_counters(
        &mut *tx,
        payload.user_id,
        &payload.subject,
        &payload.chapter,
        &payload.topic,
        to_counter(submission.correct)?,
        to_counter(submission.total)?,
        first.accuracy,
        first.classification.as_str(),
    )
    .await?;

    let merged = to_tally(&row)?.summary()?;
    progress::set_derived(
        &mut *tx,
        payload.user_id,
        &payload.subject,
        &payload.chapter,
        &payload.topic,
        merged.accuracy,
        merged.classification.as_str(),
    )
    .await?;
    tx.commit().await?;

    row.accuracy = merged.accuracy;
    row.classification = merged.classification.as_str().to_string();

    tracing::debug!(
        user_id = %row.user_id,
        topic = %row.topic,
        total = row.total_attempts,
        accuracy = row.accuracy,
        classification = %row.classification,
        "Merged topic progress"
    );

    Ok(Json(row))
}

#[derive(Debug, Deserialize)]
struct ProgressFilter {
    #[serde(default)]
    classification: Option<String>,
}

async fn list_progress(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Query(filter): Query<ProgressFilter>,
) -> Result<Json<Vec<TopicProgress>>, ApiError> {
    let classification = filter
        .classification
        .as_deref()
        .map(str::parse::<Classification>)
        .transpose()
        .map_err(ApiError::Validation)?;

    let rows = progress::list_for_user(
        &state.pool,
        user_id,
        classification.as_ref().map(Classification::as_str),
    )
    .await?;

    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_counter_bounds() {
        assert_eq!(to_counter(15).unwrap(), 15);
        assert!(to_counter(u32::MAX).is_err());
    }
}
