use std::sync::Arc;

use prep_db::models::User;

use crate::{
    error::ClientError,
    keys,
    remote::{NewUser, RecordStore},
    store::{self, LocalStore},
};

/// Fields a signed-in user may change on the device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub prep_level: Option<String>,
    pub weak_areas: Option<Vec<String>>,
}

/// The signed-in user, persisted under the `user` key.
pub struct AuthSession {
    store: Arc<dyn LocalStore>,
    records: Arc<dyn RecordStore>,
    user: Option<User>,
}

impl AuthSession {
    pub fn new(store: Arc<dyn LocalStore>, records: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            records,
            user: None,
        }
    }

    /// Restore the persisted user, if any.
    pub async fn init(&mut self) -> Option<&User> {
        self.user = store::load_or_miss(self.store.as_ref(), keys::USER).await;
        self.user.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Register (or look up) the user by email and persist them locally.
    pub async fn login(&mut self, new: NewUser) -> Result<&User, ClientError> {
        let user = self.records.register_user(&new).await?;
        store::save(self.store.as_ref(), keys::USER, &user).await?;

        tracing::info!(user_id = %user.id, "Signed in");
        Ok(self.user.insert(user))
    }

    pub async fn logout(&mut self) -> Result<(), ClientError> {
        self.store.remove(keys::USER).await?;
        self.user = None;
        Ok(())
    }

    /// Apply `update` to the signed-in user. No-op when signed out.
    pub async fn update(&mut self, update: UserUpdate) -> Result<Option<&User>, ClientError> {
        let Some(current) = &self.user else {
            return Ok(None);
        };

        let mut updated = current.clone();
        if let Some(name) = update.name {
            updated.name = name;
        }
        if let Some(prep_level) = update.prep_level {
            updated.prep_level = prep_level;
        }
        if let Some(weak_areas) = update.weak_areas {
            updated.weak_areas = weak_areas;
        }

        store::save(self.store.as_ref(), keys::USER, &updated).await?;
        Ok(Some(self.user.insert(updated)))
    }
}
