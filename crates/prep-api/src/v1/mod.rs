use axum::Router;

use crate::{
    ai, analytics, mock_test, practice, progress, question, state::ApiState, study_plan,
    syllabus, user,
};

/// API routes, nested under `/api`
pub fn routes() -> Router<ApiState> {
    Router::new()
        .merge(user::routes())
        .merge(question::routes())
        .merge(ai::routes())
        .merge(mock_test::routes())
        .merge(practice::routes())
        .merge(progress::routes())
        .merge(syllabus::routes())
        .merge(study_plan::routes())
        .merge(analytics::routes())
}
