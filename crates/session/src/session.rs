//! The current-identity session and the seller earnings ledger.

use std::sync::{Arc, RwLock};

use common::Money;
use snapshot_store::SnapshotStore;

use crate::error::{Result, SessionError};
use crate::registry::Registry;
use crate::user::{ProfileUpdate, Role, Signup, User};

/// Snapshot key for the current identity.
pub const SESSION_KEY: &str = "session";

/// The currently authenticated identity, persisted across restarts.
///
/// The checkout core reads the identity through [`Session::current`]
/// and mutates earnings only through [`Session::credit`] and
/// [`Session::request_payout`]. All mutations persist the full user
/// record before returning.
#[derive(Clone)]
pub struct Session<S: SnapshotStore> {
    current: Arc<RwLock<Option<User>>>,
    registry: Registry<S>,
    store: S,
}

impl<S: SnapshotStore + Clone> Session<S> {
    /// Loads the session from the store; a missing or unreadable
    /// snapshot starts logged out.
    pub fn new(store: S) -> Self {
        let current = store.load_or_default(SESSION_KEY);
        Self {
            current: Arc::new(RwLock::new(current)),
            registry: Registry::new(store.clone()),
            store,
        }
    }

    /// Returns a copy of the current user, if any.
    pub fn current(&self) -> Option<User> {
        self.current.read().unwrap().clone()
    }

    /// Returns the current role, if logged in.
    pub fn role(&self) -> Option<Role> {
        self.current.read().unwrap().as_ref().map(|u| u.role)
    }

    /// Returns the identity registry backing this session.
    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    /// Registers a new identity and logs it in.
    pub fn signup(&self, signup: Signup) -> Result<User> {
        let user = self.registry.register(signup)?;
        self.replace_current(Some(user.clone()))?;
        Ok(user)
    }

    /// Authenticates against the registry and logs the identity in.
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self.registry.authenticate(email, password)?;
        self.replace_current(Some(user.clone()))?;
        tracing::info!(user_id = %user.id, "identity logged in");
        Ok(user)
    }

    /// Logs the current identity out.
    pub fn logout(&self) -> Result<()> {
        *self.current.write().unwrap() = None;
        self.store.remove(SESSION_KEY)?;
        Ok(())
    }

    /// Merges a partial profile update into the current user.
    pub fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        self.mutate_current(|user| {
            update.apply_to(user);
            Ok(())
        })
    }

    /// Credits a fulfilled order line to the acting artist.
    ///
    /// Adds `amount` to both cumulative earnings and the withdrawable
    /// balance and counts one more credited order. Valid only for
    /// artist identities.
    pub fn credit(&self, amount: Money) -> Result<User> {
        self.mutate_current(|user| {
            if !user.is_artist() {
                return Err(SessionError::NotAnArtist);
            }
            user.earnings = Some(user.earnings() + amount);
            user.pending_payout = Some(user.pending_payout() + amount);
            user.total_orders = Some(user.total_orders() + 1);
            tracing::info!(user_id = %user.id, %amount, "earnings credited");
            Ok(())
        })
    }

    /// Releases the withdrawable balance.
    ///
    /// Sets the pending payout to zero; cumulative earnings are
    /// unaffected. Requesting again with nothing pending is a no-op.
    /// Returns the amount released.
    pub fn request_payout(&self) -> Result<Money> {
        let mut released = Money::zero();
        self.mutate_current(|user| {
            if !user.is_artist() {
                return Err(SessionError::NotAnArtist);
            }
            released = user.pending_payout();
            user.pending_payout = Some(Money::zero());
            tracing::info!(user_id = %user.id, %released, "payout requested");
            Ok(())
        })?;
        Ok(released)
    }

    fn replace_current(&self, user: Option<User>) -> Result<()> {
        let mut current = self.current.write().unwrap();
        *current = user;
        self.store.save(SESSION_KEY, &*current)?;
        Ok(())
    }

    fn mutate_current(&self, f: impl FnOnce(&mut User) -> Result<()>) -> Result<User> {
        let mut current = self.current.write().unwrap();
        let user = current.as_mut().ok_or(SessionError::NotAuthenticated)?;
        f(user)?;
        let snapshot = user.clone();
        self.store.save(SESSION_KEY, &Some(&snapshot))?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapshot_store::MemoryStore;

    fn signup(email: &str, role: Role) -> Signup {
        Signup {
            email: email.to_string(),
            password: "hunter2".to_string(),
            name: "Test User".to_string(),
            phone: "+91 90000 00000".to_string(),
            role,
            bio: None,
        }
    }

    fn artist_session() -> Session<MemoryStore> {
        let session = Session::new(MemoryStore::new());
        session
            .signup(signup("meera@example.com", Role::Artist))
            .unwrap();
        session
    }

    #[test]
    fn test_signup_logs_in() {
        let session = Session::new(MemoryStore::new());
        assert!(session.current().is_none());

        session
            .signup(signup("ravi@example.com", Role::Customer))
            .unwrap();
        assert_eq!(session.role(), Some(Role::Customer));
    }

    #[test]
    fn test_login_logout_cycle() {
        let store = MemoryStore::new();
        let session = Session::new(store.clone());
        session
            .signup(signup("ravi@example.com", Role::Customer))
            .unwrap();
        session.logout().unwrap();
        assert!(session.current().is_none());

        session.login("ravi@example.com", "hunter2").unwrap();
        assert!(session.current().is_some());

        // Session survives a restart.
        let reloaded = Session::new(store);
        assert!(reloaded.current().is_some());
    }

    #[test]
    fn test_credit_accrues_all_three_fields() {
        let session = artist_session();
        session.credit(Money::from_units(1200)).unwrap();
        let user = session.credit(Money::from_units(800)).unwrap();

        assert_eq!(user.earnings(), Money::from_units(2000));
        assert_eq!(user.pending_payout(), Money::from_units(2000));
        assert_eq!(user.total_orders(), 2);
    }

    #[test]
    fn test_credit_rejected_for_customers() {
        let session = Session::new(MemoryStore::new());
        session
            .signup(signup("ravi@example.com", Role::Customer))
            .unwrap();

        let result = session.credit(Money::from_units(100));
        assert!(matches!(result, Err(SessionError::NotAnArtist)));
    }

    #[test]
    fn test_payout_clears_pending_only() {
        // Reach pending 2000 with earnings 5000, then pay out.
        let session = artist_session();
        session.credit(Money::from_units(3000)).unwrap();
        session.request_payout().unwrap();
        session.credit(Money::from_units(2000)).unwrap();

        let user = session.current().unwrap();
        assert_eq!(user.earnings(), Money::from_units(5000));
        assert_eq!(user.pending_payout(), Money::from_units(2000));

        let released = session.request_payout().unwrap();
        assert_eq!(released, Money::from_units(2000));

        let user = session.current().unwrap();
        assert_eq!(user.pending_payout(), Money::zero());
        assert_eq!(user.earnings(), Money::from_units(5000));
    }

    #[test]
    fn test_payout_with_nothing_pending_is_noop() {
        let session = artist_session();
        let released = session.request_payout().unwrap();
        assert_eq!(released, Money::zero());

        let user = session.current().unwrap();
        assert_eq!(user.pending_payout(), Money::zero());
    }

    #[test]
    fn test_credit_without_login_fails() {
        let session: Session<MemoryStore> = Session::new(MemoryStore::new());
        let result = session.credit(Money::from_units(100));
        assert!(matches!(result, Err(SessionError::NotAuthenticated)));
    }
}
