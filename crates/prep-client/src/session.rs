//! Snapshots of the active mock test, so a test survives an app restart.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::{sync::oneshot, task::JoinHandle};
use uuid::Uuid;

use crate::{
    error::ClientError,
    keys,
    store::{self, LocalStore},
};

/// Device-local state of an in-progress mock test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSession {
    pub test_id: Uuid,
    pub user_id: Uuid,
    /// `full`, `subject` or `chapter`
    pub test_type: String,
    pub question_ids: Vec<Uuid>,
    /// Question id to chosen option label
    pub answers: BTreeMap<Uuid, String>,
    pub current_index: usize,
    /// Seconds
    pub time_remaining: u64,
    /// Unix millis
    pub started_at: i64,
}

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn LocalStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, session: &TestSession) -> Result<(), ClientError> {
        store::save(self.store.as_ref(), keys::ACTIVE_TEST_SESSION, session).await
    }

    /// The stored snapshot. An unreadable snapshot is logged and treated as absent.
    pub async fn load(&self) -> Option<TestSession> {
        store::load_or_miss(self.store.as_ref(), keys::ACTIVE_TEST_SESSION).await
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        self.store.remove(keys::ACTIVE_TEST_SESSION).await
    }

    /// The snapshot to resume for `user_id`: it must belong to that user and
    /// have time left. Anything else is discarded.
    pub async fn resume(&self, user_id: Uuid) -> Option<TestSession> {
        let session = self.load().await?;

        if session.user_id == user_id && session.time_remaining > 0 {
            tracing::info!(test_id = %session.test_id, "Resuming mock test");
            return Some(session);
        }

        tracing::info!(test_id = %session.test_id, "Discarding stale mock test snapshot");
        if let Err(e) = self.clear().await {
            tracing::warn!(error = %e, "Failed to discard mock test snapshot");
        }
        None
    }

    /// Snapshot whatever `source` returns every `interval` until the handle
    /// is stopped or dropped. A `None` from `source` skips that tick.
    pub fn start_autosave<F>(&self, interval: Duration, source: F) -> AutosaveHandle
    where
        F: Fn() -> Option<TestSession> + Send + 'static,
    {
        let sessions = self.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            // A zero period panics
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {}
                }
                let Some(session) = source() else {
                    continue;
                };
                if let Err(e) = sessions.save(&session).await {
                    tracing::warn!(error = %e, test_id = %session.test_id, "Autosave failed");
                }
            }
        });

        AutosaveHandle {
            task: Some(task),
            shutdown: Some(shutdown_tx),
        }
    }
}

/// Owner of a running autosave task. Dropping it aborts the task.
#[derive(Debug)]
pub struct AutosaveHandle {
    task: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl AutosaveHandle {
    /// Stop autosaving. Waits for a save already in flight, so nothing is
    /// written after this returns.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
            && !e.is_cancelled()
        {
            tracing::warn!(error = %e, "Autosave task panicked");
        }
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}
