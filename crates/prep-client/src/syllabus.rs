use std::{collections::BTreeMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ClientError,
    keys,
    remote::{RecordStore, SyllabusUpdate},
    store::{self, LocalStore},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyllabusStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Revision,
}

impl SyllabusStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Revision => "revision",
        }
    }
}

impl fmt::Display for SyllabusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a topic in the syllabus tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRef {
    pub subject_id: String,
    pub chapter_id: String,
    pub topic_id: String,
}

impl TopicRef {
    pub fn new(
        subject_id: impl Into<String>,
        chapter_id: impl Into<String>,
        topic_id: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            chapter_id: chapter_id.into(),
            topic_id: topic_id.into(),
        }
    }

    // Topic ids repeat across chapters
    fn key(&self) -> String {
        format!("{}/{}/{}", self.subject_id, self.chapter_id, self.topic_id)
    }
}

/// Per-topic study status of one user and class, kept locally and mirrored
/// to the backend.
pub struct SyllabusTracker {
    store: Arc<dyn LocalStore>,
    records: Arc<dyn RecordStore>,
    user_id: Uuid,
    class_type: String,
    statuses: BTreeMap<String, SyllabusStatus>,
}

impl SyllabusTracker {
    /// Open the tracker, reading any statuses saved on the device.
    pub async fn open(
        store: Arc<dyn LocalStore>,
        records: Arc<dyn RecordStore>,
        user_id: Uuid,
        class_type: impl Into<String>,
    ) -> Self {
        let class_type = class_type.into();
        let key = keys::syllabus_progress(&user_id.to_string(), &class_type);
        let statuses = store::load_or_miss(store.as_ref(), &key)
            .await
            .unwrap_or_default();

        Self {
            store,
            records,
            user_id,
            class_type,
            statuses,
        }
    }

    fn storage_key(&self) -> String {
        keys::syllabus_progress(&self.user_id.to_string(), &self.class_type)
    }

    pub fn status(&self, topic: &TopicRef) -> SyllabusStatus {
        self.statuses.get(&topic.key()).copied().unwrap_or_default()
    }

    /// Topics marked completed.
    pub fn completed(&self) -> usize {
        self.statuses
            .values()
            .filter(|status| **status == SyllabusStatus::Completed)
            .count()
    }

    /// Save `status` on the device, then push it to the backend. A failed push
    /// is logged; the local status is kept.
    pub async fn set_status(
        &mut self,
        topic: &TopicRef,
        status: SyllabusStatus,
    ) -> Result<(), ClientError> {
        self.statuses.insert(topic.key(), status);
        store::save(self.store.as_ref(), &self.storage_key(), &self.statuses).await?;

        let update = SyllabusUpdate {
            user_id: self.user_id,
            class_type: self.class_type.clone(),
            subject_id: topic.subject_id.clone(),
            chapter_id: topic.chapter_id.clone(),
            topic_id: topic.topic_id.clone(),
            status: status.as_str().to_string(),
        };
        if let Err(e) = self.records.update_syllabus(&update).await {
            tracing::warn!(error = %e, topic = %topic.key(), "Failed to sync syllabus status");
        }

        Ok(())
    }
}
