use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use prep_db::{
    models::{ChatMessage, QuestionOptions},
    repositories::chat,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    GenerationKind,
    parse::{GeneratedQuestion, parse_questions},
    prompts,
};
use crate::{
    ApiState,
    error::ApiError,
    middleware::rate_limit::ai_rate_limit,
    user::ensure_user_exists,
    validation::{validate_difficulty, validate_name, validate_subject},
};

pub const MOTIVATION_FALLBACK: &str = "Success in NEET comes from consistent practice and deep \
NCERT understanding. Make every question count today!";

pub const BUDDY_FALLBACK: &str =
    "I'm having trouble processing your question. Could you please rephrase it?";

const HISTORY_LIMIT: i64 = 50;
const MAX_MESSAGE_CHARS: usize = 2000;

pub fn routes() -> Router<ApiState> {
    let generation = Router::new()
        .route("/ai/generate-mcq", post(generate_mcq))
        .route("/ai/buddy", post(buddy_chat));

    Router::new()
        .merge(ai_rate_limit(generation))
        .route("/ai/motivation", get(motivation))
        .route("/ai/buddy/history/{user_id}", get(buddy_history))
}

#[derive(Debug, Deserialize)]
struct GenerateMcqRequest {
    subject: String,
    chapter: String,
    topic: String,
    #[serde(default = "default_difficulty")]
    difficulty: String,
}

fn default_difficulty() -> String {
    "Moderate".to_string()
}

#[derive(Debug, Serialize)]
pub struct McqItem {
    pub question: String,
    pub options: QuestionOptions,
    pub correct: String,
    pub explanation: String,
}

impl From<GeneratedQuestion> for McqItem {
    fn from(q: GeneratedQuestion) -> Self {
        Self {
            question: q.question,
            options: q.options,
            correct: q.correct,
            explanation: q.explanation,
        }
    }
}

/// Response of `POST /ai/generate-mcq`, the fixed generation schema
#[derive(Debug, Serialize)]
pub struct McqBatch {
    pub subject: String,
    pub chapter: String,
    pub topic: String,
    pub difficulty: String,
    pub questions: Vec<McqItem>,
}

async fn generate_mcq(
    State(state): State<ApiState>,
    Json(payload): Json<GenerateMcqRequest>,
) -> Result<Json<McqBatch>, ApiError> {
    validate_subject(&payload.subject)?;
    validate_name("chapter", &payload.chapter)?;
    validate_name("topic", &payload.topic)?;
    validate_difficulty(&payload.difficulty)?;

    let prompt = prompts::mcq_batch(
        &payload.subject,
        &payload.chapter,
        &payload.topic,
        &payload.difficulty,
        prompts::MCQ_BATCH_SIZE,
    );
    let raw = state.ai.complete(GenerationKind::Mcq, &prompt).await?;
    let questions = parse_questions(&raw)?;

    tracing::info!(
        subject = %payload.subject,
        chapter = %payload.chapter,
        topic = %payload.topic,
        count = questions.len(),
        "Generated MCQ batch"
    );

    Ok(Json(McqBatch {
        subject: payload.subject,
        chapter: payload.chapter,
        topic: payload.topic,
        difficulty: payload.difficulty,
        questions: questions.into_iter().map(McqItem::from).collect(),
    }))
}

#[derive(Debug, Serialize)]
struct MotivationResponse {
    message: String,
}

async fn motivation(State(state): State<ApiState>) -> Json<MotivationResponse> {
    let message = match state
        .ai
        .complete(GenerationKind::Motivation, prompts::MOTIVATION)
        .await
    {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(error = %e, "Serving fallback motivation");
            MOTIVATION_FALLBACK.to_string()
        }
    };

    Json(MotivationResponse { message })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuddyRequest {
    user_id: Uuid,
    message: String,
}

#[derive(Debug, Serialize)]
struct BuddyResponse {
    response: String,
}

async fn buddy_chat(
    State(state): State<ApiState>,
    Json(payload): Json<BuddyRequest>,
) -> Result<Json<BuddyResponse>, ApiError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(ApiError::Validation("Message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::Validation(format!(
            "Message must be at most {MAX_MESSAGE_CHARS} characters long"
        )));
    }

    ensure_user_exists(&state.pool, payload.user_id).await?;

    let reply = match state
        .ai
        .complete(GenerationKind::Buddy, &prompts::buddy(message))
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, user_id = %payload.user_id, "Tutor reply failed");
            return Ok(Json(BuddyResponse {
                response: BUDDY_FALLBACK.to_string(),
            }));
        }
    };

    chat::insert(&state.pool, payload.user_id, message, &reply).await?;

    Ok(Json(BuddyResponse { response: reply }))
}

/// Latest tutor exchanges, newest first
async fn buddy_history(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let messages = chat::history(&state.pool, user_id, HISTORY_LIMIT).await?;
    Ok(Json(messages))
}
