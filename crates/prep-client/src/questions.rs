use std::sync::Arc;

use chrono::NaiveDate;
use prep_db::models::Question;
use rand::seq::SliceRandom;

use crate::{
    error::ClientError,
    keys,
    remote::{DocumentStore, McqRequest, QuestionGenerator},
    store::{self, LocalStore},
};

/// Difficulty requested when the stores cannot satisfy a fetch
pub const GENERATION_DIFFICULTY: &str = "Moderate";

/// Lookaside reader over the local cache, the document store and the generator.
#[derive(Clone)]
pub struct QuestionService {
    cache: Arc<dyn LocalStore>,
    documents: Arc<dyn DocumentStore>,
    generator: Arc<dyn QuestionGenerator>,
}

impl QuestionService {
    pub fn new(
        cache: Arc<dyn LocalStore>,
        documents: Arc<dyn DocumentStore>,
        generator: Arc<dyn QuestionGenerator>,
    ) -> Self {
        Self {
            cache,
            documents,
            generator,
        }
    }

    /// Up to `count` questions for a topic.
    ///
    /// Served from the local cache when it holds at least `count` questions,
    /// then from the document store (backfilling the cache with everything it
    /// returned). Otherwise a fresh batch is generated, stored and cached, and
    /// the whole batch is returned even when it is smaller than `count`.
    ///
    /// # Errors
    ///
    /// Document store and generation failures propagate. Cache failures are
    /// logged and treated as a miss.
    pub async fn fetch_questions(
        &self,
        subject: &str,
        chapter: &str,
        topic: &str,
        count: usize,
    ) -> Result<Vec<Question>, ClientError> {
        let key = keys::questions(subject, chapter, topic);

        if let Some(cached) = store::load_or_miss::<Vec<Question>>(self.cache.as_ref(), &key).await
            && cached.len() >= count
        {
            tracing::debug!(key, count, "Questions served from local cache");
            return Ok(take(cached, count));
        }

        let stored = self.documents.questions_by_key(subject, chapter, topic).await?;
        if stored.len() >= count {
            tracing::debug!(key, count, available = stored.len(), "Questions served from document store");
            store::save_or_log(self.cache.as_ref(), &key, &stored).await;
            return Ok(take(stored, count));
        }

        self.generate_and_store(subject, chapter, topic, &key).await
    }

    async fn generate_and_store(
        &self,
        subject: &str,
        chapter: &str,
        topic: &str,
        key: &str,
    ) -> Result<Vec<Question>, ClientError> {
        let request = McqRequest {
            subject: subject.to_string(),
            chapter: chapter.to_string(),
            topic: topic.to_string(),
            difficulty: GENERATION_DIFFICULTY.to_string(),
        };
        let generated = self.generator.generate(&request).await?;

        let mut questions = Vec::with_capacity(generated.len());
        for item in generated {
            let new = item.into_new_question(&request);
            questions.push(self.documents.insert_question(&new).await?);
        }

        tracing::info!(key, count = questions.len(), "Generated and stored questions");
        store::save_or_log(self.cache.as_ref(), key, &questions).await;

        Ok(questions)
    }

    /// The question of `today`, pinned in the local cache on first pick.
    ///
    /// Returns `None` when the collection is empty or the document store is
    /// unreachable.
    pub async fn daily_question(&self, today: NaiveDate) -> Option<Question> {
        let key = keys::daily_question(today);

        if let Some(question) = store::load_or_miss::<Question>(self.cache.as_ref(), &key).await {
            return Some(question);
        }

        let all = match self.documents.all_questions().await {
            Ok(all) => all,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load questions for the daily pick");
                return None;
            }
        };

        let question = all.choose(&mut rand::thread_rng())?.clone();
        store::save_or_log(self.cache.as_ref(), &key, &question).await;

        Some(question)
    }
}

fn take(mut questions: Vec<Question>, count: usize) -> Vec<Question> {
    questions.truncate(count);
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        store::MemoryStore,
        testing::{FakeBackend, question},
    };

    fn service(cache: &MemoryStore, backend: &FakeBackend) -> QuestionService {
        QuestionService::new(
            Arc::new(cache.clone()),
            Arc::new(backend.clone()),
            Arc::new(backend.clone()),
        )
    }

    fn ids(questions: &[Question]) -> Vec<uuid::Uuid> {
        questions.iter().map(|q| q.id).collect()
    }

    #[tokio::test]
    async fn test_cache_hit_skips_remote() {
        let cache = MemoryStore::new();
        let backend = FakeBackend::new();
        let cached: Vec<Question> = (0..6).map(|n| question("Physics", "Optics", "Lenses", n)).collect();
        store::save(&cache, &keys::questions("Physics", "Optics", "Lenses"), &cached)
            .await
            .unwrap();

        let served = service(&cache, &backend)
            .fetch_questions("Physics", "Optics", "Lenses", 5)
            .await
            .unwrap();

        assert_eq!(ids(&served), ids(&cached[..5]));
        assert_eq!(backend.query_count(), 0);
        assert_eq!(backend.generation_count(), 0);
    }

    #[tokio::test]
    async fn test_short_cache_falls_through_to_documents() {
        let cache = MemoryStore::new();
        let backend = FakeBackend::new();
        let key = keys::questions("Biology", "Cell Cycle", "Mitosis");
        let short: Vec<Question> = (0..2).map(|n| question("Biology", "Cell Cycle", "Mitosis", n)).collect();
        store::save(&cache, &key, &short).await.unwrap();
        for n in 0..7 {
            backend.seed(question("Biology", "Cell Cycle", "Mitosis", n));
        }

        let served = service(&cache, &backend)
            .fetch_questions("Biology", "Cell Cycle", "Mitosis", 5)
            .await
            .unwrap();

        assert_eq!(served.len(), 5);
        assert_eq!(backend.query_count(), 1);
        assert_eq!(backend.generation_count(), 0);

        // Backfilled with the full document result
        let cached: Vec<Question> = store::load(&cache, &key).await.unwrap().unwrap();
        assert_eq!(cached.len(), 7);
    }

    #[tokio::test]
    async fn test_repeated_fetch_is_served_identically() {
        let cache = MemoryStore::new();
        let backend = FakeBackend::new();
        for n in 0..5 {
            backend.seed(question("Chemistry", "Solutions", "Raoult's Law", n));
        }
        let service = service(&cache, &backend);

        let first = service
            .fetch_questions("Chemistry", "Solutions", "Raoult's Law", 5)
            .await
            .unwrap();
        let second = service
            .fetch_questions("Chemistry", "Solutions", "Raoult's Law", 5)
            .await
            .unwrap();

        assert_eq!(ids(&first), ids(&second));
        assert_eq!(backend.query_count(), 1);
    }

    #[tokio::test]
    async fn test_insufficient_documents_generate_a_batch() {
        let cache = MemoryStore::new();
        let backend = FakeBackend::new();
        backend.seed(question("Physics", "Laws of Motion", "Friction", 0));

        let served = service(&cache, &backend)
            .fetch_questions("Physics", "Laws of Motion", "Friction", 10)
            .await
            .unwrap();

        // The whole batch, even though fewer than requested
        assert_eq!(served.len(), 5);
        assert!(served.iter().all(|q| q.difficulty == GENERATION_DIFFICULTY));
        assert!(served.iter().all(|q| q.topic == "Friction"));
        assert_eq!(backend.generation_count(), 1);
        assert_eq!(backend.last_request().unwrap().difficulty, "Moderate");

        // Persisted remotely and cached locally
        assert_eq!(backend.stored_count(), 6);
        let cached: Vec<Question> = store::load(
            &cache,
            &keys::questions("Physics", "Laws of Motion", "Friction"),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(ids(&cached), ids(&served));
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let cache = MemoryStore::new();
        let backend = FakeBackend::new();
        backend.fail_generation();

        let err = service(&cache, &backend)
            .fetch_questions("Physics", "Optics", "Prisms", 5)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Generation(_)));
        assert_eq!(cache.get(&keys::questions("Physics", "Optics", "Prisms")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_a_miss() {
        let cache = MemoryStore::new();
        let backend = FakeBackend::new();
        let key = keys::questions("Physics", "Optics", "Lenses");
        cache.set(&key, "not json".to_string()).await.unwrap();
        for n in 0..5 {
            backend.seed(question("Physics", "Optics", "Lenses", n));
        }

        let served = service(&cache, &backend)
            .fetch_questions("Physics", "Optics", "Lenses", 5)
            .await
            .unwrap();

        assert_eq!(served.len(), 5);
        assert_eq!(backend.query_count(), 1);
    }

    #[tokio::test]
    async fn test_daily_question_is_pinned_per_day() {
        let cache = MemoryStore::new();
        let backend = FakeBackend::new();
        for n in 0..20 {
            backend.seed(question("Biology", "Genetics", "Linkage", n));
        }
        let service = service(&cache, &backend);
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();

        let first = service.daily_question(today).await.unwrap();
        for _ in 0..5 {
            assert_eq!(service.daily_question(today).await.unwrap().id, first.id);
        }
        assert_eq!(backend.list_all_count(), 1);

        let tomorrow = today.succ_opt().unwrap();
        service.daily_question(tomorrow).await.unwrap();
        assert_eq!(backend.list_all_count(), 2);
    }

    #[tokio::test]
    async fn test_daily_question_empty_collection() {
        let cache = MemoryStore::new();
        let backend = FakeBackend::new();
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();

        assert!(service(&cache, &backend).daily_question(today).await.is_none());
        assert_eq!(cache.get(&keys::daily_question(today)).await.unwrap(), None);
    }
}
