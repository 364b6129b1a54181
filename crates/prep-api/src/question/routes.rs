use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use prep_db::{
    models::{NewQuestion, Question},
    repositories::question,
};
use serde::{Deserialize, Serialize};

use super::{daily::daily_question, samples::sample_questions};
use crate::{
    ApiState,
    ai::{GenerationKind, parse::parse_questions, prompts},
    error::ApiError,
    metrics::record_questions_served,
    middleware::rate_limit::ai_rate_limit,
    validation::{
        validate_difficulty, validate_generate_count, validate_name, validate_option_label,
        validate_subject,
    },
};

/// Create the question routes
pub fn routes() -> Router<ApiState> {
    let generation = Router::new()
        .route("/questions/generate", post(generate_questions))
        .route("/questions/pregenerated", get(pregenerated_questions));

    Router::new()
        .route("/questions", get(list_by_key).post(create_question))
        .route("/questions/all", get(list_all))
        .route("/questions/daily", get(daily_question))
        .route("/questions/populate-samples", post(populate_samples))
        .merge(ai_rate_limit(generation))
}

#[derive(Debug, Deserialize)]
struct QuestionKey {
    subject: String,
    chapter: String,
    topic: String,
}

/// Every stored question of a (subject, chapter, topic) key
async fn list_by_key(
    State(state): State<ApiState>,
    Query(key): Query<QuestionKey>,
) -> Result<Json<Vec<Question>>, ApiError> {
    validate_subject(&key.subject)?;
    validate_name("chapter", &key.chapter)?;
    validate_name("topic", &key.topic)?;

    let questions =
        question::serve_by_key(&state.pool, &key.subject, &key.chapter, &key.topic).await?;
    record_questions_served("store", questions.len() as u64);

    Ok(Json(questions))
}

async fn list_all(State(state): State<ApiState>) -> Result<Json<Vec<Question>>, ApiError> {
    Ok(Json(question::list_all(&state.pool).await?))
}

fn validate_new_question(new: &NewQuestion) -> Result<(), ApiError> {
    validate_subject(&new.subject)?;
    validate_name("chapter", &new.chapter)?;
    validate_name("topic", &new.topic)?;
    validate_difficulty(&new.difficulty)?;
    validate_option_label(&new.correct)?;

    if new.question.trim().is_empty() {
        return Err(ApiError::Validation(
            "Question text cannot be empty".to_string(),
        ));
    }

    let options = &new.options;
    if [&options.a, &options.b, &options.c, &options.d]
        .iter()
        .any(|text| text.trim().is_empty())
    {
        return Err(ApiError::Validation(
            "All four options are required".to_string(),
        ));
    }

    Ok(())
}

/// Store one question. Re-posting the same question returns the stored row.
async fn create_question(
    State(state): State<ApiState>,
    Json(payload): Json<NewQuestion>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    validate_new_question(&payload)?;

    let stored = question::insert(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

#[derive(Debug, Deserialize)]
struct GenerateParams {
    subject: String,
    chapter: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default = "default_count")]
    count: u32,
    #[serde(default = "default_difficulty")]
    difficulty: String,
}

fn default_count() -> u32 {
    10
}

fn default_difficulty() -> String {
    "Moderate".to_string()
}

#[derive(Debug, Serialize)]
struct GeneratedQuestions {
    questions: Vec<Question>,
}

/// Generate `count` questions with the AI and persist them
async fn generate_questions(
    State(state): State<ApiState>,
    Query(params): Query<GenerateParams>,
) -> Result<Json<GeneratedQuestions>, ApiError> {
    validate_subject(&params.subject)?;
    validate_name("chapter", &params.chapter)?;
    if let Some(topic) = &params.topic {
        validate_name("topic", topic)?;
    }
    validate_generate_count(params.count)?;
    validate_difficulty(&params.difficulty)?;

    let questions = generate_and_store(
        &state,
        &params.subject,
        &params.chapter,
        params.topic.as_deref(),
        &params.difficulty,
        params.count,
    )
    .await?;
    record_questions_served("generated", questions.len() as u64);

    Ok(Json(GeneratedQuestions { questions }))
}

/// Ask the AI for a batch and store it under the requested key. Questions
/// without a requested topic keep the topic the AI gave them, falling back
/// to the chapter name.
async fn generate_and_store(
    state: &ApiState,
    subject: &str,
    chapter: &str,
    topic: Option<&str>,
    difficulty: &str,
    count: u32,
) -> Result<Vec<Question>, ApiError> {
    let prompt = prompts::mcq_batch(
        subject,
        chapter,
        topic.unwrap_or("any topic of the chapter"),
        difficulty,
        count as usize,
    );
    let raw = state.ai.complete(GenerationKind::Mcq, &prompt).await?;
    let generated = parse_questions(&raw)?;

    let mut tx = state.pool.begin().await?;
    let mut questions = Vec::with_capacity(generated.len());
    for mut item in generated {
        let topic = topic
            .map(str::to_string)
            .or_else(|| item.topic.take())
            .unwrap_or_else(|| chapter.to_string());
        let new = item.into_new_question(subject, chapter, &topic, difficulty);
        questions.push(question::insert(&mut *tx, &new).await?);
    }
    tx.commit().await?;

    tracing::info!(
        subject = %subject,
        chapter = %chapter,
        count = questions.len(),
        "Stored generated questions"
    );
    Ok(questions)
}

#[derive(Debug, Deserialize)]
struct PregeneratedParams {
    subject: String,
    chapter: String,
    #[serde(default = "default_count")]
    count: u32,
}

/// `count` stored questions of a chapter, or a freshly generated and stored
/// batch when the chapter holds fewer.
async fn pregenerated_questions(
    State(state): State<ApiState>,
    Query(params): Query<PregeneratedParams>,
) -> Result<Json<GeneratedQuestions>, ApiError> {
    validate_subject(&params.subject)?;
    validate_name("chapter", &params.chapter)?;
    validate_generate_count(params.count)?;

    let stored = question::serve_by_chapter(
        &state.pool,
        &params.subject,
        &params.chapter,
        i64::from(params.count),
    )
    .await?;
    if !stored.is_empty() {
        record_questions_served("store", stored.len() as u64);
        return Ok(Json(GeneratedQuestions { questions: stored }));
    }

    tracing::debug!(
        subject = %params.subject,
        chapter = %params.chapter,
        count = params.count,
        "Chapter short of questions, generating"
    );
    let questions = generate_and_store(
        &state,
        &params.subject,
        &params.chapter,
        None,
        &default_difficulty(),
        params.count,
    )
    .await?;
    record_questions_served("generated", questions.len() as u64);

    Ok(Json(GeneratedQuestions { questions }))
}

#[derive(Debug, Serialize)]
struct PopulateResponse {
    message: String,
    count: usize,
}

/// Seed the built-in sample questions. Safe to call repeatedly.
async fn populate_samples(
    State(state): State<ApiState>,
) -> Result<Json<PopulateResponse>, ApiError> {
    let samples = sample_questions();

    let mut tx = state.pool.begin().await?;
    for sample in &samples {
        question::insert(&mut *tx, sample).await?;
    }
    tx.commit().await?;

    tracing::info!(count = samples.len(), "Populated sample questions");

    Ok(Json(PopulateResponse {
        message: format!("Sample question bank holds {} questions", samples.len()),
        count: samples.len(),
    }))
}
