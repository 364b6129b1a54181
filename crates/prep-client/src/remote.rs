//! Backend seams: the shared document store, the question generator and the
//! account records endpoints, plus their HTTP implementation.

use async_trait::async_trait;
use prep_db::models::{
    MockTest, NewMockTest, NewQuestion, Question, QuestionOptions, SyllabusProgress,
    TopicProgress, User,
};
use prep_mastery::Classification;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::ClientError;

/// One practice round on a topic, merged server-side into the cumulative counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSubmission {
    pub user_id: Uuid,
    pub subject: String,
    pub chapter: String,
    pub topic: String,
    pub correct: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub prep_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusUpdate {
    pub user_id: Uuid,
    pub class_type: String,
    pub subject_id: String,
    pub chapter_id: String,
    pub topic_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct McqRequest {
    pub subject: String,
    pub chapter: String,
    pub topic: String,
    pub difficulty: String,
}

/// A generated question before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMcq {
    pub question: String,
    pub options: QuestionOptions,
    pub correct: String,
    pub explanation: String,
}

impl GeneratedMcq {
    pub fn into_new_question(self, request: &McqRequest) -> NewQuestion {
        NewQuestion {
            subject: request.subject.clone(),
            chapter: request.chapter.clone(),
            topic: request.topic.clone(),
            difficulty: request.difficulty.clone(),
            question: self.question,
            options: self.options,
            correct: self.correct,
            explanation: self.explanation,
        }
    }
}

/// Shared question and topic progress collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every stored question of a (subject, chapter, topic) key.
    async fn questions_by_key(
        &self,
        subject: &str,
        chapter: &str,
        topic: &str,
    ) -> Result<Vec<Question>, ClientError>;

    async fn all_questions(&self) -> Result<Vec<Question>, ClientError>;

    async fn insert_question(&self, question: &NewQuestion) -> Result<Question, ClientError>;

    async fn record_practice(
        &self,
        submission: &PracticeSubmission,
    ) -> Result<TopicProgress, ClientError>;

    async fn topic_progress(
        &self,
        user_id: Uuid,
        classification: Option<Classification>,
    ) -> Result<Vec<TopicProgress>, ClientError>;
}

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// One fixed-size batch for the requested key.
    async fn generate(&self, request: &McqRequest) -> Result<Vec<GeneratedMcq>, ClientError>;
}

/// Per-user records outside the document collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Idempotent by email.
    async fn register_user(&self, user: &NewUser) -> Result<User, ClientError>;

    async fn update_syllabus(
        &self,
        update: &SyllabusUpdate,
    ) -> Result<SyllabusProgress, ClientError>;

    async fn submit_test(&self, record: &NewMockTest) -> Result<MockTest, ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct GeneratedBatch {
    questions: Vec<GeneratedMcq>,
}

/// REST client for the prep backend.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    api_url: String,
}

impl HttpBackend {
    pub fn new(backend_url: &str) -> Self {
        Self::with_client(Client::new(), backend_url)
    }

    pub fn with_client(client: Client, backend_url: &str) -> Self {
        Self {
            client,
            api_url: format!("{}/api", backend_url.trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(ClientError::Status { status, message })
}

#[async_trait]
impl DocumentStore for HttpBackend {
    async fn questions_by_key(
        &self,
        subject: &str,
        chapter: &str,
        topic: &str,
    ) -> Result<Vec<Question>, ClientError> {
        let request = self
            .client
            .get(self.url("/questions"))
            .query(&[("subject", subject), ("chapter", chapter), ("topic", topic)]);
        Self::send(request).await
    }

    async fn all_questions(&self) -> Result<Vec<Question>, ClientError> {
        Self::send(self.client.get(self.url("/questions/all"))).await
    }

    async fn insert_question(&self, question: &NewQuestion) -> Result<Question, ClientError> {
        Self::send(self.client.post(self.url("/questions")).json(question)).await
    }

    async fn record_practice(
        &self,
        submission: &PracticeSubmission,
    ) -> Result<TopicProgress, ClientError> {
        Self::send(self.client.post(self.url("/topic-progress")).json(submission)).await
    }

    async fn topic_progress(
        &self,
        user_id: Uuid,
        classification: Option<Classification>,
    ) -> Result<Vec<TopicProgress>, ClientError> {
        let mut request = self
            .client
            .get(self.url(&format!("/topic-progress/{user_id}")));
        if let Some(classification) = classification {
            request = request.query(&[("classification", classification.as_str())]);
        }
        Self::send(request).await
    }
}

#[async_trait]
impl QuestionGenerator for HttpBackend {
    async fn generate(&self, request: &McqRequest) -> Result<Vec<GeneratedMcq>, ClientError> {
        let response = self
            .client
            .post(self.url("/ai/generate-mcq"))
            .json(request)
            .send()
            .await?;

        let batch: GeneratedBatch = decode(response).await.map_err(|e| match e {
            ClientError::Status { message, .. } => ClientError::Generation(message),
            other => other,
        })?;

        if batch.questions.is_empty() {
            return Err(ClientError::Generation(
                "backend returned an empty batch".to_string(),
            ));
        }
        Ok(batch.questions)
    }
}

#[async_trait]
impl RecordStore for HttpBackend {
    async fn register_user(&self, user: &NewUser) -> Result<User, ClientError> {
        Self::send(self.client.post(self.url("/users")).json(user)).await
    }

    async fn update_syllabus(
        &self,
        update: &SyllabusUpdate,
    ) -> Result<SyllabusProgress, ClientError> {
        Self::send(self.client.post(self.url("/syllabus/progress")).json(update)).await
    }

    async fn submit_test(&self, record: &NewMockTest) -> Result<MockTest, ClientError> {
        Self::send(self.client.post(self.url("/tests")).json(record)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let backend = HttpBackend::new("http://localhost:3000/");
        assert_eq!(
            backend.url("/questions/all"),
            "http://localhost:3000/api/questions/all"
        );
    }

    #[test]
    fn test_submission_wire_shape() {
        let submission = PracticeSubmission {
            user_id: Uuid::nil(),
            subject: "Physics".to_string(),
            chapter: "Optics".to_string(),
            topic: "Lenses".to_string(),
            correct: 3,
            total: 5,
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["userId"], Uuid::nil().to_string());
        assert_eq!(json["total"], 5);
    }

    #[test]
    fn test_generated_batch_shape() {
        let raw = r#"{
            "subject": "Physics", "chapter": "Optics", "topic": "Lenses", "difficulty": "Moderate",
            "questions": [{
                "question": "Power of a 50 cm lens?",
                "options": {"A": "1 D", "B": "2 D", "C": "0.5 D", "D": "5 D"},
                "correct": "B",
                "explanation": "P = 1/f in metres."
            }]
        }"#;
        let batch: GeneratedBatch = serde_json::from_str(raw).unwrap();
        assert_eq!(batch.questions.len(), 1);
        assert_eq!(batch.questions[0].options.b, "2 D");
    }
}
