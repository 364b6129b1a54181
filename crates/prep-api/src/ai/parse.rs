//! Defensive parsing of model output into validated questions.
//!
//! Models wrap JSON in markdown fences, add prose around it, mix the labeled
//! `{A, B, C, D}` option map with a plain four element array, or answer with an
//! index instead of a label. Every shape is normalised here; questions that
//! still fail validation are dropped one by one.

use std::collections::BTreeMap;

use prep_db::models::{NewQuestion, QuestionOptions};
use serde::Deserialize;
use serde_json::Value;

use super::AiError;

const LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// One question that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuestion {
    pub subject: Option<String>,
    pub chapter: Option<String>,
    pub topic: Option<String>,
    pub question: String,
    pub options: QuestionOptions,
    /// `A` to `D`
    pub correct: String,
    pub explanation: String,
}

impl GeneratedQuestion {
    /// Insert payload filed under the requested key.
    pub fn into_new_question(
        self,
        subject: &str,
        chapter: &str,
        topic: &str,
        difficulty: &str,
    ) -> NewQuestion {
        NewQuestion {
            subject: subject.to_string(),
            chapter: chapter.to_string(),
            topic: topic.to_string(),
            difficulty: difficulty.to_string(),
            question: self.question,
            options: self.options,
            correct: self.correct,
            explanation: self.explanation,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Batch { questions: Vec<Value> },
    List(Vec<Value>),
    Single(Value),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    chapter: Option<String>,
    #[serde(default)]
    topic: Option<String>,
    question: String,
    options: RawOptions,
    #[serde(default)]
    correct: Option<String>,
    #[serde(default)]
    correct_answer: Option<usize>,
    #[serde(default)]
    explanation: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOptions {
    Labeled(BTreeMap<String, String>),
    Listed(Vec<String>),
}

/// Remove a surrounding markdown code fence, if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (`json`) on the opening fence line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Cut the outermost JSON value out of surrounding prose.
fn extract_json(raw: &str) -> &str {
    let text = strip_code_fences(raw);
    if text.starts_with('{') || text.starts_with('[') {
        return text;
    }

    let start = text.find(['{', '[']);
    let end = text.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Parse any JSON document out of a completion.
pub fn parse_json(raw: &str) -> Result<Value, AiError> {
    serde_json::from_str(extract_json(raw))
        .map_err(|e| AiError::InvalidResponse(format!("not valid JSON: {e}")))
}

/// Parse and validate the questions of a completion.
///
/// Accepts `{"questions": [...]}`, a bare array, or a single question object.
/// Fails only when no question survives validation.
pub fn parse_questions(raw: &str) -> Result<Vec<GeneratedQuestion>, AiError> {
    let payload: RawPayload = serde_json::from_str(extract_json(raw))
        .map_err(|e| AiError::InvalidResponse(format!("not valid JSON: {e}")))?;

    let candidates = match payload {
        RawPayload::Batch { questions } | RawPayload::List(questions) => questions,
        RawPayload::Single(value) => vec![value],
    };
    let received = candidates.len();

    let questions: Vec<GeneratedQuestion> = candidates
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawQuestion>(value).ok())
        .filter_map(validate)
        .collect();

    if questions.len() < received {
        tracing::warn!(
            received,
            kept = questions.len(),
            "Dropped malformed generated questions"
        );
    }

    if questions.is_empty() {
        return Err(AiError::InvalidResponse(
            "no valid questions in response".to_string(),
        ));
    }

    Ok(questions)
}

fn validate(raw: RawQuestion) -> Option<GeneratedQuestion> {
    let question = raw.question.trim();
    if question.is_empty() {
        return None;
    }

    let options = normalize_options(raw.options)?;
    let correct = match (raw.correct.as_deref(), raw.correct_answer) {
        (Some(label), _) => normalize_label(label)?,
        (None, Some(index)) => LABELS.get(index)?.to_string(),
        (None, None) => return None,
    };

    Some(GeneratedQuestion {
        subject: non_blank(raw.subject),
        chapter: non_blank(raw.chapter),
        topic: non_blank(raw.topic),
        question: question.to_string(),
        options,
        correct,
        explanation: raw.explanation.trim().to_string(),
    })
}

fn normalize_options(raw: RawOptions) -> Option<QuestionOptions> {
    let texts: Vec<String> = match raw {
        RawOptions::Labeled(map) => {
            let map: BTreeMap<String, String> = map
                .into_iter()
                .map(|(label, text)| (label.trim().to_uppercase(), text))
                .collect();
            if map.len() != LABELS.len() {
                return None;
            }
            LABELS
                .iter()
                .map(|label| map.get(*label).cloned())
                .collect::<Option<Vec<_>>>()?
        }
        RawOptions::Listed(list) => list,
    };

    let [a, b, c, d]: [String; 4] = texts.try_into().ok()?;
    let options = QuestionOptions {
        a: a.trim().to_string(),
        b: b.trim().to_string(),
        c: c.trim().to_string(),
        d: d.trim().to_string(),
    };

    if [&options.a, &options.b, &options.c, &options.d]
        .iter()
        .any(|text| text.is_empty())
    {
        return None;
    }

    Some(options)
}

/// Accepts `"B"`, `"b"`, `"B)"` or `"B. Joule"`.
fn normalize_label(label: &str) -> Option<String> {
    let mut chars = label.trim().chars();
    let first = chars.next()?.to_ascii_uppercase();
    let rest_ok = chars
        .next()
        .is_none_or(|next| !next.is_ascii_alphanumeric());

    if rest_ok && ('A'..='D').contains(&first) {
        Some(first.to_string())
    } else {
        None
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
