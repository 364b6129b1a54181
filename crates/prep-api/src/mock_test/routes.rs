use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use prep_db::{
    models::{MockTest, NewMockTest},
    repositories::test as mock_tests,
};
use prep_mastery::{NEET_MAX_SCORE, round_one_decimal};
use uuid::Uuid;

use crate::{
    ApiState,
    error::ApiError,
    user::ensure_user_exists,
    validation::{validate_counts, validate_name, validate_subject, validate_test_type},
};

const LIST_LIMIT: i64 = 100;

/// Create the mock test routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/tests", post(create_test))
        .route("/tests/{user_id}", get(list_tests))
}

fn validate_record(record: &NewMockTest) -> Result<(), ApiError> {
    validate_test_type(&record.test_type)?;
    validate_counts(record.correct_answers, record.total_questions)?;

    match record.test_type.as_str() {
        "subject" | "chapter" => {
            let subject = record.subject.as_deref().ok_or_else(|| {
                ApiError::Validation(format!("{} tests require a subject", record.test_type))
            })?;
            validate_subject(subject)?;
        }
        _ => {}
    }

    if record.test_type == "chapter" {
        let chapter = record
            .chapter
            .as_deref()
            .ok_or_else(|| ApiError::Validation("chapter tests require a chapter".to_string()))?;
        validate_name("chapter", chapter)?;
    }

    if record.time_spent < 0 {
        return Err(ApiError::Validation(
            "timeSpent cannot be negative".to_string(),
        ));
    }

    if !(0.0..=NEET_MAX_SCORE).contains(&record.score) {
        return Err(ApiError::Validation(format!(
            "score must be between 0 and {NEET_MAX_SCORE}"
        )));
    }

    if !(0.0..=100.0).contains(&record.accuracy) {
        return Err(ApiError::Validation(
            "accuracy must be between 0 and 100".to_string(),
        ));
    }

    Ok(())
}

async fn create_test(
    State(state): State<ApiState>,
    Json(mut payload): Json<NewMockTest>,
) -> Result<(StatusCode, Json<MockTest>), ApiError> {
    validate_record(&payload)?;
    ensure_user_exists(&state.pool, payload.user_id).await?;

    payload.score = round_one_decimal(payload.score);
    payload.accuracy = round_one_decimal(payload.accuracy);

    let stored = mock_tests::insert(&state.pool, &payload).await?;
    tracing::info!(
        test_id = %stored.id,
        user_id = %stored.user_id,
        test_type = %stored.test_type,
        score = stored.score,
        "Stored mock test"
    );

    Ok((StatusCode::CREATED, Json(stored)))
}

/// Most recent tests first
async fn list_tests(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<MockTest>>, ApiError> {
    Ok(Json(mock_tests::list_for_user(&state.pool, user_id, LIST_LIMIT).await?))
}
