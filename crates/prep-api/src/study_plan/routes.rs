use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use prep_db::{models::StudyPlan, repositories::study_plan};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    ApiState,
    ai::{AiError, GenerationKind, parse::parse_json, prompts},
    error::ApiError,
    middleware::rate_limit::ai_rate_limit,
    user::ensure_user_exists,
    validation::{SUBJECTS, validate_prep_level, validate_subject},
};

const LIST_LIMIT: i64 = 10;
const MAX_DURATION_DAYS: u32 = 365;
const MAX_DAILY_HOURS: u32 = 16;

/// Create the study plan routes
pub fn routes() -> Router<ApiState> {
    let generation = Router::new().route("/study-plan/generate", post(generate_plan));

    Router::new()
        .route("/study-plan/{user_id}", get(list_plans))
        .merge(ai_rate_limit(generation))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanRequest {
    user_id: Uuid,
    daily_hours: u32,
    duration: u32,
    prep_level: String,
    #[serde(default)]
    weak_subjects: Vec<String>,
}

fn validate_request(request: &PlanRequest) -> Result<(), ApiError> {
    if request.duration == 0 || request.duration > MAX_DURATION_DAYS {
        return Err(ApiError::Validation(format!(
            "duration must be between 1 and {MAX_DURATION_DAYS} days"
        )));
    }
    if request.daily_hours == 0 || request.daily_hours > MAX_DAILY_HOURS {
        return Err(ApiError::Validation(format!(
            "dailyHours must be between 1 and {MAX_DAILY_HOURS}"
        )));
    }
    validate_prep_level(&request.prep_level)?;
    request
        .weak_subjects
        .iter()
        .try_for_each(|subject| validate_subject(subject))
}

/// Title of a generated plan, falling back to a name derived from its length
fn plan_title(plan: &Value, duration: u32) -> String {
    plan.get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map_or_else(|| format!("{duration}-Day NEET Study Plan"), String::from)
}

async fn generate_plan(
    State(state): State<ApiState>,
    Json(payload): Json<PlanRequest>,
) -> Result<(StatusCode, Json<StudyPlan>), ApiError> {
    validate_request(&payload)?;
    ensure_user_exists(&state.pool, payload.user_id).await?;

    let prompt = prompts::study_plan(
        payload.duration,
        payload.daily_hours,
        &payload.prep_level,
        &payload.weak_subjects,
    );
    let raw = state.ai.complete(GenerationKind::StudyPlan, &prompt).await?;
    let plan = parse_json(&raw)?;
    if !plan.is_object() {
        return Err(AiError::InvalidResponse("study plan is not a JSON object".to_string()).into());
    }

    let title = plan_title(&plan, payload.duration);
    let subjects: Vec<String> = SUBJECTS.iter().map(|s| s.to_string()).collect();

    // Bounded by MAX_DURATION_DAYS and MAX_DAILY_HOURS
    let stored = study_plan::insert(
        &state.pool,
        payload.user_id,
        &title,
        payload.duration as i32,
        payload.daily_hours as i32,
        &subjects,
        &plan,
    )
    .await?;

    tracing::info!(plan_id = %stored.id, user_id = %stored.user_id, "Stored study plan");

    Ok((StatusCode::CREATED, Json(stored)))
}

/// Latest plans first
async fn list_plans(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<StudyPlan>>, ApiError> {
    Ok(Json(
        study_plan::list_for_user(&state.pool, user_id, LIST_LIMIT).await?,
    ))
}
