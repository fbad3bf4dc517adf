//! Session
//!
//! Signed-in state backed by a [`SessionStorage`]. The token and user are
//! written under fixed keys so a later process can restore them.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

mod models;
mod storage;

pub use models::{AuthResponse, Role, User};
pub use storage::{
    DRAFT_KEY, FileStorage, MemoryStorage, SessionStorage, StorageError, TOKEN_KEY, USER_KEY,
};

/// Access check failures.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Nobody is signed in.
    #[error("not signed in")]
    NotSignedIn,

    /// The signed-in user's role is not allowed.
    #[error("{0} accounts cannot access this page")]
    Forbidden(Role),
}

/// Whether a user is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No token is held.
    #[default]
    Anonymous,

    /// A token and its user are held.
    Authenticated {
        /// Bearer token
        token: String,

        /// Signed-in account
        user: User,
    },
}

/// Session state together with the storage it is persisted to.
#[derive(Debug)]
pub struct Session {
    storage: Box<dyn SessionStorage>,
    state: SessionState,
}

impl Session {
    /// Restore the session from storage.
    ///
    /// Both keys must be present and the user must parse; anything else
    /// restores as anonymous.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn restore(storage: Box<dyn SessionStorage>) -> Result<Self, StorageError> {
        let token = storage.get(TOKEN_KEY)?;
        let user = storage.get(USER_KEY)?;

        let state = match (token, user) {
            (Some(token), Some(user)) => match serde_json::from_str::<User>(&user) {
                Ok(user) => SessionState::Authenticated { token, user },
                Err(error) => {
                    warn!(%error, "stored user is unreadable; starting signed out");
                    SessionState::Anonymous
                }
            },
            _ => SessionState::Anonymous,
        };

        Ok(Self { storage, state })
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Bearer token, when signed in.
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            SessionState::Anonymous => None,
        }
    }

    /// Signed-in user.
    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            SessionState::Anonymous => None,
        }
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    /// Store a successful login or registration.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn sign_in(&mut self, auth: AuthResponse) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, &auth.access_token)?;
        self.storage.set(USER_KEY, &serde_json::to_string(&auth.user)?)?;

        info!(user_id = auth.user.id, role = %auth.user.role, "signed in");

        self.state = SessionState::Authenticated {
            token: auth.access_token,
            user: auth.user,
        };

        Ok(())
    }

    /// Sign out, forgetting the token and user.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn sign_out(&mut self) -> Result<(), StorageError> {
        self.clear()?;

        info!("signed out");

        Ok(())
    }

    /// Drop the session after the service rejected its token.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn expire(&mut self) -> Result<(), StorageError> {
        let was_signed_in = self.is_authenticated();

        self.clear()?;

        if was_signed_in {
            warn!("session rejected by the service; signed out");
        }

        Ok(())
    }

    /// Replace the stored user, keeping the token.
    ///
    /// Ignored while signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn refresh_user(&mut self, user: User) -> Result<(), StorageError> {
        let SessionState::Authenticated { user: current, .. } = &mut self.state else {
            return Ok(());
        };

        self.storage.set(USER_KEY, &serde_json::to_string(&user)?)?;

        *current = user;

        Ok(())
    }

    /// Signed-in user, if their role is one of `roles`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotSignedIn`]: nobody is signed in.
    /// - [`SessionError::Forbidden`]: the user's role is not in `roles`.
    pub fn require_role(&self, roles: &[Role]) -> Result<&User, SessionError> {
        let user = self.user().ok_or(SessionError::NotSignedIn)?;

        if roles.contains(&user.role) {
            Ok(user)
        } else {
            Err(SessionError::Forbidden(user.role))
        }
    }

    /// Backing storage.
    pub fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }

    /// Backing storage, for values kept next to the session such as drafts.
    pub fn storage_mut(&mut self) -> &mut dyn SessionStorage {
        self.storage.as_mut()
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.state = SessionState::Anonymous;

        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;

        Ok(())
    }
}

/// Shared handle to the session.
///
/// The API client and the caller hold clones, so an unauthorized response
/// signs out every holder at once.
#[derive(Debug, Clone)]
pub struct SessionContext {
    inner: Arc<Mutex<Session>>,
}

impl SessionContext {
    /// Wrap a session.
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Restore a session from storage and wrap it.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn restore(storage: impl SessionStorage + 'static) -> Result<Self, StorageError> {
        Ok(Self::new(Session::restore(Box::new(storage))?))
    }

    /// Lock the session.
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().await
    }

    /// Current bearer token.
    pub async fn token(&self) -> Option<String> {
        self.lock().await.token().map(str::to_string)
    }

    /// Current user.
    pub async fn user(&self) -> Option<User> {
        self.lock().await.user().cloned()
    }

    /// See [`Session::expire`].
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub async fn expire(&self) -> Result<(), StorageError> {
        self.lock().await.expire()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn user(role: Role) -> User {
        User {
            id: 9,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            is_active: true,
            role,
            created_at: None,
        }
    }

    fn auth(role: Role) -> AuthResponse {
        AuthResponse {
            access_token: "token-1".to_string(),
            token_type: "bearer".to_string(),
            user: user(role),
        }
    }

    #[test]
    fn sign_in_persists_token_and_user() -> TestResult {
        let mut session = Session::restore(Box::new(MemoryStorage::new()))?;

        session.sign_in(auth(Role::Customer))?;

        assert_eq!(session.token(), Some("token-1"));
        assert_eq!(session.storage().get(TOKEN_KEY)?.as_deref(), Some("token-1"));
        assert!(session.storage().get(USER_KEY)?.is_some());

        Ok(())
    }

    #[test]
    fn restore_reads_persisted_session() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "token-1")?;
        storage.set(USER_KEY, &serde_json::to_string(&user(Role::Admin))?)?;

        let session = Session::restore(Box::new(storage))?;

        assert_eq!(session.user().map(|user| user.role), Some(Role::Admin));

        Ok(())
    }

    #[test]
    fn restore_with_corrupt_user_is_anonymous() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "token-1")?;
        storage.set(USER_KEY, "{not json")?;

        let session = Session::restore(Box::new(storage))?;

        assert_eq!(session.state(), &SessionState::Anonymous);

        Ok(())
    }

    #[test]
    fn expire_clears_both_keys() -> TestResult {
        let mut session = Session::restore(Box::new(MemoryStorage::new()))?;
        session.sign_in(auth(Role::Shopkeeper))?;
        session.storage_mut().set(DRAFT_KEY, "{}")?;

        session.expire()?;

        assert!(!session.is_authenticated());
        assert_eq!(session.storage().get(TOKEN_KEY)?, None);
        assert_eq!(session.storage().get(USER_KEY)?, None);
        assert!(session.storage().get(DRAFT_KEY)?.is_some(), "drafts survive expiry");

        Ok(())
    }

    #[test]
    fn require_role_checks_membership() -> TestResult {
        let mut session = Session::restore(Box::new(MemoryStorage::new()))?;

        assert_eq!(
            session.require_role(&Role::STAFF).map(|user| user.id),
            Err(SessionError::NotSignedIn)
        );

        session.sign_in(auth(Role::Customer))?;

        assert_eq!(
            session.require_role(&Role::STAFF).map(|user| user.id),
            Err(SessionError::Forbidden(Role::Customer))
        );
        assert_eq!(session.require_role(&Role::ORDERING)?.id, 9);

        Ok(())
    }

    #[test]
    fn refresh_user_rewrites_stored_user() -> TestResult {
        let mut session = Session::restore(Box::new(MemoryStorage::new()))?;
        session.sign_in(auth(Role::Customer))?;

        let mut renamed = user(Role::Customer);
        renamed.name = "Asha Rao".to_string();

        session.refresh_user(renamed)?;

        let stored: User =
            serde_json::from_str(&session.storage().get(USER_KEY)?.ok_or("user missing")?)?;

        assert_eq!(stored.name, "Asha Rao");
        assert_eq!(session.token(), Some("token-1"));

        Ok(())
    }

    #[tokio::test]
    async fn context_expiry_is_seen_by_every_clone() -> TestResult {
        let context = SessionContext::restore(MemoryStorage::new())?;
        let clone = context.clone();

        context.lock().await.sign_in(auth(Role::Customer))?;
        assert_eq!(clone.token().await.as_deref(), Some("token-1"));

        clone.expire().await?;
        assert_eq!(context.token().await, None);

        Ok(())
    }
}
