use axum::{Json, extract::State};
use chrono::{NaiveDate, Utc};
use prep_db::{
    models::{Question, QuestionOptions},
    repositories::question,
};
use uuid::Uuid;

use crate::{
    ApiState,
    ai::{AiError, GenerationKind, parse::parse_questions, prompts},
    error::ApiError,
    metrics::record_questions_served,
    validation::validate_subject,
};

/// Question served when neither the store nor the AI can provide one.
pub fn fallback_question() -> Question {
    Question {
        id: Uuid::nil(),
        subject: "Physics".to_string(),
        chapter: "Laws of Motion".to_string(),
        topic: "Force and Newton's Laws".to_string(),
        difficulty: "Easy".to_string(),
        question: "What is the SI unit of force?".to_string(),
        options: QuestionOptions {
            a: "Newton".to_string(),
            b: "Joule".to_string(),
            c: "Watt".to_string(),
            d: "Pascal".to_string(),
        },
        correct: "A".to_string(),
        explanation: "Newton is the SI unit of force. Force = mass × acceleration.".to_string(),
        usage_count: 0,
        created_at: Utc::now(),
    }
}

/// Question of the UTC day. Never fails; degrades to [`fallback_question`].
pub async fn daily_question(State(state): State<ApiState>) -> Json<Question> {
    let today = Utc::now().date_naive();

    match resolve(&state, today).await {
        Ok(question) => {
            record_questions_served("daily", 1);
            Json(question)
        }
        Err(e) => {
            tracing::error!(error = %e, %today, "Failed to resolve daily question");
            record_questions_served("fallback", 1);
            Json(fallback_question())
        }
    }
}

async fn resolve(state: &ApiState, date: NaiveDate) -> Result<Question, ApiError> {
    if let Some(pinned) = question::find_daily(&state.pool, date).await? {
        return Ok(pinned);
    }

    let candidate = match question::find_random(&state.pool).await? {
        Some(candidate) => candidate,
        None => generate(state).await?,
    };

    if question::set_daily(&state.pool, date, candidate.id).await? {
        tracing::info!(%date, question_id = %candidate.id, "Pinned daily question");
        return Ok(candidate);
    }

    // A concurrent request pinned another question first
    question::find_daily(&state.pool, date)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("daily question for {date} disappeared")))
}

/// Generate and store one question for an empty bank.
async fn generate(state: &ApiState) -> Result<Question, ApiError> {
    let raw = state
        .ai
        .complete(GenerationKind::DailyQuestion, &prompts::daily_question())
        .await?;

    let mut generated = parse_questions(&raw)?
        .into_iter()
        .next()
        .ok_or_else(|| AiError::InvalidResponse("no question in response".to_string()))?;

    let subject = generated
        .subject
        .take()
        .filter(|subject| validate_subject(subject).is_ok())
        .ok_or_else(|| AiError::InvalidResponse("missing or unknown subject".to_string()))?;
    let chapter = generated
        .chapter
        .take()
        .unwrap_or_else(|| "General".to_string());
    let topic = generated.topic.take().unwrap_or_else(|| chapter.clone());

    let new = generated.into_new_question(&subject, &chapter, &topic, "Moderate");
    Ok(question::insert(&state.pool, &new).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_question() {
        let question = fallback_question();
        assert!(question.id.is_nil());
        assert_eq!(question.subject, "Physics");
        assert_eq!(question.chapter, "Laws of Motion");
        assert_eq!(question.correct, "A");
        assert_eq!(question.options.a, "Newton");
    }
}
