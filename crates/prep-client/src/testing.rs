//! In-memory backend doubles for unit tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use prep_db::models::{
    MockTest, NewMockTest, NewQuestion, Question, QuestionOptions, SyllabusProgress,
    TopicProgress, User,
};
use prep_mastery::{Classification, TopicTally};
use reqwest::StatusCode;
use uuid::Uuid;

use crate::{
    error::ClientError,
    remote::{
        DocumentStore, GeneratedMcq, McqRequest, NewUser, PracticeSubmission, QuestionGenerator,
        RecordStore, SyllabusUpdate,
    },
};

pub(crate) fn question(subject: &str, chapter: &str, topic: &str, n: usize) -> Question {
    Question {
        id: Uuid::new_v4(),
        subject: subject.to_string(),
        chapter: chapter.to_string(),
        topic: topic.to_string(),
        difficulty: "Easy".to_string(),
        question: format!("{topic} question {n}?"),
        options: options(),
        correct: "A".to_string(),
        explanation: "Because.".to_string(),
        usage_count: 0,
        created_at: Utc::now(),
    }
}

fn options() -> QuestionOptions {
    QuestionOptions {
        a: "one".to_string(),
        b: "two".to_string(),
        c: "three".to_string(),
        d: "four".to_string(),
    }
}

#[derive(Default)]
struct State {
    questions: Vec<Question>,
    progress: Vec<TopicProgress>,
    users: Vec<User>,
    syllabus: Vec<SyllabusUpdate>,
    tests: Vec<NewMockTest>,
    last_request: Option<McqRequest>,
}

/// Backend double that records every call.
#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    state: Arc<Mutex<State>>,
    queries: Arc<AtomicUsize>,
    list_alls: Arc<AtomicUsize>,
    generations: Arc<AtomicUsize>,
    fail_generation: Arc<AtomicBool>,
    offline: Arc<AtomicBool>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn seed(&self, question: Question) {
        self.state.lock().unwrap().questions.push(question);
    }

    pub(crate) fn fail_generation(&self) {
        self.fail_generation.store(true, Ordering::SeqCst);
    }

    /// Fail every records call with a 503
    pub(crate) fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub(crate) fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub(crate) fn list_all_count(&self) -> usize {
        self.list_alls.load(Ordering::SeqCst)
    }

    pub(crate) fn generation_count(&self) -> usize {
        self.generations.load(Ordering::SeqCst)
    }

    pub(crate) fn stored_count(&self) -> usize {
        self.state.lock().unwrap().questions.len()
    }

    pub(crate) fn last_request(&self) -> Option<McqRequest> {
        self.state.lock().unwrap().last_request.clone()
    }

    pub(crate) fn syllabus_updates(&self) -> Vec<SyllabusUpdate> {
        self.state.lock().unwrap().syllabus.clone()
    }

    pub(crate) fn submitted_tests(&self) -> Vec<NewMockTest> {
        self.state.lock().unwrap().tests.clone()
    }

    fn check_online(&self) -> Result<(), ClientError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FakeBackend {
    async fn questions_by_key(
        &self,
        subject: &str,
        chapter: &str,
        topic: &str,
    ) -> Result<Vec<Question>, ClientError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state
            .questions
            .iter()
            .filter(|q| q.subject == subject && q.chapter == chapter && q.topic == topic)
            .cloned()
            .collect())
    }

    async fn all_questions(&self) -> Result<Vec<Question>, ClientError> {
        self.list_alls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().unwrap().questions.clone())
    }

    async fn insert_question(&self, new: &NewQuestion) -> Result<Question, ClientError> {
        let stored = Question {
            id: Uuid::new_v4(),
            subject: new.subject.clone(),
            chapter: new.chapter.clone(),
            topic: new.topic.clone(),
            difficulty: new.difficulty.clone(),
            question: new.question.clone(),
            options: new.options.clone(),
            correct: new.correct.clone(),
            explanation: new.explanation.clone(),
            usage_count: 0,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().questions.push(stored.clone());
        Ok(stored)
    }

    async fn record_practice(
        &self,
        submission: &PracticeSubmission,
    ) -> Result<TopicProgress, ClientError> {
        self.check_online()?;
        let mut state = self.state.lock().unwrap();
        let index = state.progress.iter().position(|p| {
            p.user_id == submission.user_id
                && p.subject == submission.subject
                && p.chapter == submission.chapter
                && p.topic == submission.topic
        });

        let previous = index.map_or_else(TopicTally::default, |i| {
            let row = &state.progress[i];
            TopicTally::new(row.correct_attempts as u32, row.total_attempts as u32)
        });
        let merged = previous
            .merge(TopicTally::new(submission.correct, submission.total))
            .map_err(|e| ClientError::Status {
                status: StatusCode::BAD_REQUEST,
                message: e.to_string(),
            })?;
        let summary = merged.summary().map_err(|e| ClientError::Status {
            status: StatusCode::BAD_REQUEST,
            message: e.to_string(),
        })?;

        let row = TopicProgress {
            user_id: submission.user_id,
            subject: submission.subject.clone(),
            chapter: submission.chapter.clone(),
            topic: submission.topic.clone(),
            total_attempts: merged.total as i32,
            correct_attempts: merged.correct as i32,
            accuracy: summary.accuracy,
            classification: summary.classification.as_str().to_string(),
            last_practiced: Utc::now(),
            updated_at: Utc::now(),
        };
        match index {
            Some(i) => state.progress[i] = row.clone(),
            None => state.progress.push(row.clone()),
        }
        Ok(row)
    }

    async fn topic_progress(
        &self,
        user_id: Uuid,
        classification: Option<Classification>,
    ) -> Result<Vec<TopicProgress>, ClientError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .progress
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter(|p| classification.is_none_or(|c| p.classification == c.as_str()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl QuestionGenerator for FakeBackend {
    async fn generate(&self, request: &McqRequest) -> Result<Vec<GeneratedMcq>, ClientError> {
        self.generations.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().last_request = Some(request.clone());

        if self.fail_generation.load(Ordering::SeqCst) {
            return Err(ClientError::Generation("model unavailable".to_string()));
        }

        Ok((1..=5)
            .map(|n| GeneratedMcq {
                question: format!("Generated {} question {n}?", request.topic),
                options: options(),
                correct: "C".to_string(),
                explanation: "Generated.".to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl RecordStore for FakeBackend {
    async fn register_user(&self, new: &NewUser) -> Result<User, ClientError> {
        self.check_online()?;
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.users.iter().find(|u| u.email == new.email) {
            return Ok(existing.clone());
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new.email.clone(),
            name: new.name.clone(),
            prep_level: new.prep_level.clone(),
            weak_areas: Vec::new(),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update_syllabus(
        &self,
        update: &SyllabusUpdate,
    ) -> Result<SyllabusProgress, ClientError> {
        self.check_online()?;
        self.state.lock().unwrap().syllabus.push(update.clone());
        Ok(SyllabusProgress {
            id: Uuid::new_v4(),
            user_id: update.user_id,
            class_type: update.class_type.clone(),
            subject_id: update.subject_id.clone(),
            chapter_id: update.chapter_id.clone(),
            topic_id: update.topic_id.clone(),
            status: update.status.clone(),
            updated_at: Utc::now(),
        })
    }

    async fn submit_test(&self, record: &NewMockTest) -> Result<MockTest, ClientError> {
        self.check_online()?;
        self.state.lock().unwrap().tests.push(record.clone());
        Ok(MockTest {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            test_type: record.test_type.clone(),
            subject: record.subject.clone(),
            chapter: record.chapter.clone(),
            total_questions: record.total_questions,
            correct_answers: record.correct_answers,
            score: record.score,
            time_spent: record.time_spent,
            accuracy: record.accuracy,
            weak_chapters: record.weak_chapters.clone(),
            created_at: Utc::now(),
        })
    }
}
