use std::sync::Arc;

use prep_db::models::TopicProgress;
use prep_mastery::{Classification, TopicTally};
use uuid::Uuid;

use crate::{
    error::ClientError,
    remote::{DocumentStore, PracticeSubmission},
};

/// Topic mastery tracking for one device.
#[derive(Clone)]
pub struct ProgressService {
    documents: Arc<dyn DocumentStore>,
}

impl ProgressService {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Merge one practice round into the cumulative topic counters.
    ///
    /// Rounds without attempts or with more correct answers than attempts are
    /// rejected before reaching the backend.
    pub async fn record_practice(
        &self,
        submission: PracticeSubmission,
    ) -> Result<TopicProgress, ClientError> {
        TopicTally::default()
            .merge(TopicTally::new(submission.correct, submission.total))?;

        let progress = self.documents.record_practice(&submission).await?;
        tracing::debug!(
            topic = %progress.topic,
            accuracy = progress.accuracy,
            classification = %progress.classification,
            "Recorded practice"
        );
        Ok(progress)
    }

    pub async fn user_progress(&self, user_id: Uuid) -> Result<Vec<TopicProgress>, ClientError> {
        self.documents.topic_progress(user_id, None).await
    }

    /// Topics currently classified [`Classification::Weak`].
    pub async fn weak_topics(&self, user_id: Uuid) -> Result<Vec<TopicProgress>, ClientError> {
        self.documents
            .topic_progress(user_id, Some(Classification::Weak))
            .await
    }
}

#[cfg(test)]
mod tests {
    use prep_mastery::MasteryError;

    use super::*;
    use crate::testing::FakeBackend;

    fn submission(user_id: Uuid, topic: &str, correct: u32, total: u32) -> PracticeSubmission {
        PracticeSubmission {
            user_id,
            subject: "Chemistry".to_string(),
            chapter: "Chemical Bonding".to_string(),
            topic: topic.to_string(),
            correct,
            total,
        }
    }

    #[tokio::test]
    async fn test_practice_rounds_accumulate() {
        let service = ProgressService::new(Arc::new(FakeBackend::new()));
        let user_id = Uuid::new_v4();

        let first = service
            .record_practice(submission(user_id, "Hybridisation", 6, 10))
            .await
            .unwrap();
        assert_eq!(first.accuracy, 60.0);
        assert_eq!(first.classification, "Needs Revision");

        let merged = service
            .record_practice(submission(user_id, "Hybridisation", 2, 5))
            .await
            .unwrap();
        assert_eq!(merged.total_attempts, 15);
        assert_eq!(merged.correct_attempts, 8);
        assert_eq!(merged.accuracy, 53.3);
        assert_eq!(merged.classification, "Needs Revision");
    }

    #[tokio::test]
    async fn test_invalid_round_is_rejected_locally() {
        let service = ProgressService::new(Arc::new(FakeBackend::new()));
        let user_id = Uuid::new_v4();

        let err = service
            .record_practice(submission(user_id, "VSEPR", 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Invalid(MasteryError::NoAttempts)));

        let err = service
            .record_practice(submission(user_id, "VSEPR", 4, 3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Invalid(MasteryError::CorrectExceedsTotal { correct: 4, total: 3 })
        ));
        assert!(service.user_progress(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_weak_topics() {
        let service = ProgressService::new(Arc::new(FakeBackend::new()));
        let user_id = Uuid::new_v4();

        service
            .record_practice(submission(user_id, "Hybridisation", 7, 10))
            .await
            .unwrap();
        service
            .record_practice(submission(user_id, "VSEPR", 3, 10))
            .await
            .unwrap();
        service
            .record_practice(submission(Uuid::new_v4(), "Resonance", 0, 10))
            .await
            .unwrap();

        assert_eq!(service.user_progress(user_id).await.unwrap().len(), 2);

        let weak = service.weak_topics(user_id).await.unwrap();
        assert_eq!(weak.len(), 1);
        assert_eq!(weak[0].topic, "VSEPR");
        assert_eq!(weak[0].classification, "Weak");
    }
}
