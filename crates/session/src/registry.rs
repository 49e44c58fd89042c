//! Locally registered identities.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use snapshot_store::SnapshotStore;

use crate::error::{Result, SessionError};
use crate::user::{Signup, User};

/// Snapshot key for the registered-identity sequence.
pub const USERS_KEY: &str = "registered_users";

/// A registered identity plus its login credential.
///
/// The credential never leaves the registry; sessions only ever hold
/// the bare [`User`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegisteredUser {
    #[serde(flatten)]
    user: User,
    password: String,
}

/// The local identity registry.
///
/// Holds every locally registered `{user + credential}` record and
/// persists the full sequence on each registration.
#[derive(Clone)]
pub struct Registry<S: SnapshotStore> {
    users: Arc<RwLock<Vec<RegisteredUser>>>,
    store: S,
}

impl<S: SnapshotStore> Registry<S> {
    /// Loads the registry from the store; missing or unreadable
    /// snapshots start an empty registry.
    pub fn new(store: S) -> Self {
        let users = store.load_or_default(USERS_KEY);
        Self {
            users: Arc::new(RwLock::new(users)),
            store,
        }
    }

    /// Registers a new identity. Fails when the email is taken.
    pub fn register(&self, signup: Signup) -> Result<User> {
        let mut users = self.users.write().unwrap();
        if users
            .iter()
            .any(|existing| existing.user.email == signup.email)
        {
            return Err(SessionError::EmailTaken);
        }

        let password = signup.password.clone();
        let user = signup.into_user();
        users.push(RegisteredUser {
            user: user.clone(),
            password,
        });
        self.store.save(USERS_KEY, &*users)?;
        tracing::info!(user_id = %user.id, role = ?user.role, "identity registered");
        Ok(user)
    }

    /// Looks up an identity by email and credential.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let users = self.users.read().unwrap();
        users
            .iter()
            .find(|r| r.user.email == email && r.password == password)
            .map(|r| r.user.clone())
            .ok_or(SessionError::InvalidCredentials)
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.users.read().unwrap().len()
    }

    /// Returns true if no identities are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
