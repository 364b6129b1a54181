use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use prep_db::{
    models::{MockTest, PracticeSession, SubjectPracticeTotals, TestTotals},
    repositories::{analytics, practice, test as mock_tests},
};
use prep_mastery::round_one_decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError, user::ensure_user_exists};

const RECENT_SESSIONS: i64 = 10;
const RECENT_TESTS: i64 = 5;

/// Create the analytics routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/analytics/{user_id}", get(user_analytics))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectStats {
    pub attempted: i64,
    pub correct: i64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_questions: i64,
    pub total_correct: i64,
    pub overall_accuracy: f64,
    pub subject_stats: BTreeMap<String, SubjectStats>,
    pub tests_attempted: i64,
    pub avg_test_score: f64,
    /// Seconds of practice and tests
    pub total_study_time: i64,
    pub study_time_hours: f64,
    pub recent_sessions: Vec<PracticeSession>,
    pub recent_tests: Vec<MockTest>,
}

fn percent(correct: i64, attempted: i64) -> f64 {
    if attempted > 0 {
        round_one_decimal(correct as f64 / attempted as f64 * 100.0)
    } else {
        0.0
    }
}

/// Fold the aggregated counters of a user into the analytics report.
pub fn summarize(
    subjects: &[SubjectPracticeTotals],
    tests: &TestTotals,
    recent_sessions: Vec<PracticeSession>,
    recent_tests: Vec<MockTest>,
) -> Analytics {
    let total_questions: i64 = subjects.iter().map(|s| s.attempted).sum();
    let total_correct: i64 = subjects.iter().map(|s| s.correct).sum();
    let practice_time: i64 = subjects.iter().map(|s| s.time_spent).sum();
    let total_study_time = practice_time + tests.time_spent;

    let subject_stats = subjects
        .iter()
        .map(|s| {
            (
                s.subject.clone(),
                SubjectStats {
                    attempted: s.attempted,
                    correct: s.correct,
                    accuracy: percent(s.correct, s.attempted),
                },
            )
        })
        .collect();

    Analytics {
        total_questions,
        total_correct,
        overall_accuracy: percent(total_correct, total_questions),
        subject_stats,
        tests_attempted: tests.tests_attempted,
        avg_test_score: round_one_decimal(tests.avg_score),
        total_study_time,
        study_time_hours: round_one_decimal(total_study_time as f64 / 3600.0),
        recent_sessions,
        recent_tests,
    }
}

async fn user_analytics(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Analytics>, ApiError> {
    ensure_user_exists(&state.pool, user_id).await?;

    let subjects = analytics::practice_totals_by_subject(&state.pool, user_id).await?;
    let tests = analytics::test_totals(&state.pool, user_id).await?;
    let recent_sessions = practice::list_for_user(&state.pool, user_id, RECENT_SESSIONS).await?;
    let recent_tests = mock_tests::list_for_user(&state.pool, user_id, RECENT_TESTS).await?;

    Ok(Json(summarize(
        &subjects,
        &tests,
        recent_sessions,
        recent_tests,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(subject: &str, attempted: i64, correct: i64, time_spent: i64) -> SubjectPracticeTotals {
        SubjectPracticeTotals {
            subject: subject.to_string(),
            attempted,
            correct,
            time_spent,
        }
    }

    #[test]
    fn test_summarize_empty() {
        let report = summarize(
            &[],
            &TestTotals {
                tests_attempted: 0,
                avg_score: 0.0,
                time_spent: 0,
            },
            vec![],
            vec![],
        );

        assert_eq!(report.total_questions, 0);
        assert_eq!(report.overall_accuracy, 0.0);
        assert!(report.subject_stats.is_empty());
        assert_eq!(report.study_time_hours, 0.0);
    }

    #[test]
    fn test_summarize_totals() {
        let subjects = [
            totals("Biology", 40, 30, 1800),
            totals("Physics", 20, 7, 1800),
        ];
        let tests = TestTotals {
            tests_attempted: 2,
            avg_score: 456.666,
            time_spent: 5400,
        };

        let report = summarize(&subjects, &tests, vec![], vec![]);

        assert_eq!(report.total_questions, 60);
        assert_eq!(report.total_correct, 37);
        assert_eq!(report.overall_accuracy, 61.7);
        assert_eq!(report.subject_stats["Biology"].accuracy, 75.0);
        assert_eq!(report.subject_stats["Physics"].accuracy, 35.0);
        assert_eq!(report.tests_attempted, 2);
        assert_eq!(report.avg_test_score, 456.7);
        assert_eq!(report.total_study_time, 9000);
        assert_eq!(report.study_time_hours, 2.5);
    }

    #[test]
    fn test_serialized_field_names() {
        let report = summarize(
            &[totals("Chemistry", 10, 5, 600)],
            &TestTotals {
                tests_attempted: 0,
                avg_score: 0.0,
                time_spent: 0,
            },
            vec![],
            vec![],
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalQuestions"], 10);
        assert_eq!(json["overallAccuracy"], 50.0);
        assert_eq!(json["subjectStats"]["Chemistry"]["attempted"], 10);
        assert_eq!(json["studyTimeHours"], 0.2);
        assert!(json["recentSessions"].as_array().unwrap().is_empty());
    }
}
