//! Device-side logic of the NEET prep app: local storage, the lookaside
//! question cache, progress tracking and mock tests.

pub mod auth;
pub mod config;
pub mod error;
pub mod keys;
pub mod progress;
pub mod questions;
pub mod remote;
pub mod session;
pub mod store;
pub mod syllabus;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use uuid::Uuid;

pub use config::ClientConfig;
pub use error::ClientError;

use crate::{
    auth::AuthSession,
    mock_test::MockTest,
    progress::ProgressService,
    questions::QuestionService,
    remote::{DocumentStore, HttpBackend, QuestionGenerator, RecordStore},
    session::SessionStore,
    store::{FileStore, LocalStore},
    syllabus::SyllabusTracker,
};

/// Services of one device, sharing a local store and a backend.
#[derive(Clone)]
pub struct PrepClient {
    pub config: ClientConfig,
    pub questions: QuestionService,
    pub progress: ProgressService,
    pub sessions: SessionStore,
    store: Arc<dyn LocalStore>,
    records: Arc<dyn RecordStore>,
}

impl PrepClient {
    /// Wire the file-backed store and the HTTP backend described by `config`.
    pub fn new(config: ClientConfig) -> Self {
        let backend = Arc::new(HttpBackend::new(&config.backend_url));
        let store: Arc<dyn LocalStore> = Arc::new(FileStore::new(&config.data_dir));

        Self::with_parts(config, store, backend.clone(), backend.clone(), backend)
    }

    pub fn with_parts(
        config: ClientConfig,
        store: Arc<dyn LocalStore>,
        documents: Arc<dyn DocumentStore>,
        generator: Arc<dyn QuestionGenerator>,
        records: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            questions: QuestionService::new(store.clone(), documents.clone(), generator),
            progress: ProgressService::new(documents),
            sessions: SessionStore::new(store.clone()),
            config,
            store,
            records,
        }
    }

    pub fn auth(&self) -> AuthSession {
        AuthSession::new(self.store.clone(), self.records.clone())
    }

    /// A mock test that autosaves on the configured interval.
    pub fn mock_test(&self, user_id: Uuid) -> MockTest {
        MockTest::new(user_id, self.sessions.clone())
            .with_autosave_interval(self.config.autosave_interval)
    }

    pub fn records(&self) -> &dyn RecordStore {
        self.records.as_ref()
    }

    pub async fn syllabus(&self, user_id: Uuid, class_type: &str) -> SyllabusTracker {
        SyllabusTracker::open(self.store.clone(), self.records.clone(), user_id, class_type).await
    }
}
