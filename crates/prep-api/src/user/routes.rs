use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use prep_db::{models::User, repositories::user};
use serde::Deserialize;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    ApiState,
    error::ApiError,
    validation::{validate_email, validate_name, validate_prep_level},
};

/// Create the user routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    email: String,
    name: String,
    #[serde(default = "default_prep_level")]
    prep_level: String,
}

fn default_prep_level() -> String {
    "class12".to_string()
}

/// Register a user, or return the existing one registered under the same email
async fn create_user(
    State(state): State<ApiState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let email = payload.email.trim().to_lowercase();
    validate_email(&email)?;
    validate_name("name", &payload.name)?;
    validate_prep_level(&payload.prep_level)?;

    let user =
        user::create_or_get(&state.pool, &email, payload.name.trim(), &payload.prep_level).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::OK, Json(user)))
}

async fn get_user(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    user::find_by_id(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Fail with 404 unless the user exists
pub async fn ensure_user_exists<'e, E>(executor: E, user_id: Uuid) -> Result<(), ApiError>
where
    E: Executor<'e, Database = Postgres>,
{
    if user::exists(executor, user_id).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound("User not found".to_string()))
    }
}
