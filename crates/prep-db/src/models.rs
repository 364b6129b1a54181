use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registered student
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// `class11`, `class12` or `dropper`
    pub prep_level: String,
    pub weak_areas: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The four labeled answer options of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QuestionOptions {
    #[serde(rename = "A")]
    #[sqlx(rename = "option_a")]
    pub a: String,
    #[serde(rename = "B")]
    #[sqlx(rename = "option_b")]
    pub b: String,
    #[serde(rename = "C")]
    #[sqlx(rename = "option_c")]
    pub c: String,
    #[serde(rename = "D")]
    #[sqlx(rename = "option_d")]
    pub d: String,
}

/// Stored multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub subject: String,
    pub chapter: String,
    pub topic: String,
    /// `Easy` or `Moderate`
    pub difficulty: String,
    pub question: String,
    #[sqlx(flatten)]
    pub options: QuestionOptions,
    /// Label of the correct option, `A` to `D`
    pub correct: String,
    pub explanation: String,
    /// Number of times the question was served from the store
    pub usage_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`Question`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub subject: String,
    pub chapter: String,
    pub topic: String,
    pub difficulty: String,
    pub question: String,
    pub options: QuestionOptions,
    pub correct: String,
    pub explanation: String,
}

/// Cumulative practice counters of one topic for one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    pub user_id: Uuid,
    pub subject: String,
    pub chapter: String,
    pub topic: String,
    pub total_attempts: i32,
    pub correct_attempts: i32,
    /// Percentage rounded to one decimal
    pub accuracy: f64,
    /// `Strong`, `Needs Revision` or `Weak`
    pub classification: String,
    pub last_practiced: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Finished mock test
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MockTest {
    pub id: Uuid,
    pub user_id: Uuid,
    /// `full`, `subject` or `chapter`
    pub test_type: String,
    pub subject: Option<String>,
    pub chapter: Option<String>,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score: f64,
    /// Seconds
    pub time_spent: i32,
    pub accuracy: f64,
    pub weak_chapters: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`MockTest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMockTest {
    pub user_id: Uuid,
    pub test_type: String,
    pub subject: Option<String>,
    pub chapter: Option<String>,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score: f64,
    pub time_spent: i32,
    pub accuracy: f64,
    #[serde(default)]
    pub weak_chapters: Vec<String>,
}

/// Completed practice session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub chapter: String,
    pub questions_attempted: i32,
    pub questions_correct: i32,
    /// Seconds
    pub time_spent: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`PracticeSession`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPracticeSession {
    pub user_id: Uuid,
    pub subject: String,
    pub chapter: String,
    #[serde(default)]
    pub questions_attempted: i32,
    #[serde(default)]
    pub questions_correct: i32,
    #[serde(default)]
    pub time_spent: i32,
}

/// Status of one syllabus topic
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub class_type: String,
    pub subject_id: String,
    pub chapter_id: String,
    pub topic_id: String,
    /// `not_started`, `in_progress`, `completed` or `revision`
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// AI generated study plan
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Days
    pub duration: i32,
    pub daily_hours: i32,
    pub subjects: Vec<String>,
    pub plan: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// One exchange with the AI tutor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

/// Question picked for a calendar day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyQuestion {
    pub question_date: NaiveDate,
    pub question_id: Uuid,
}

/// Practice totals of one subject, aggregated for analytics
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPracticeTotals {
    pub subject: String,
    pub attempted: i64,
    pub correct: i64,
    pub time_spent: i64,
}

/// Mock test totals of one user, aggregated for analytics
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TestTotals {
    pub tests_attempted: i64,
    pub avg_score: f64,
    pub time_spent: i64,
}
