//! The credential store hook.
//!
//! roomcast does not persist accounts itself. Whatever backs accounts in
//! production (SQL table with a unique username column, KV store, ...)
//! implements [`CredentialStore`]: one async insert that either returns the
//! new account id or reports that the username is taken.
//!
//! [`MemoryCredentialStore`] is the in-process implementation used by the
//! demo server and the tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use roomcast_protocol::PlayerId;
use tokio::sync::Mutex;

use crate::CredentialError;

/// Persists `(username, password_hash)` pairs with unique usernames.
///
/// # Example
///
/// ```rust
/// use roomcast_protocol::PlayerId;
/// use roomcast_session::{CredentialError, CredentialStore};
///
/// /// Rejects everything; handy for exercising the 500 path.
/// struct BrokenStore;
///
/// impl CredentialStore for BrokenStore {
///     async fn insert(
///         &self,
///         _username: &str,
///         _password_hash: &str,
///     ) -> Result<PlayerId, CredentialError> {
///         Err(CredentialError::Storage("offline".into()))
///     }
/// }
/// ```
pub trait CredentialStore: Send + Sync + 'static {
    /// Stores a new account.
    ///
    /// # Returns
    /// - `Ok(PlayerId)` — the id assigned to the account
    /// - `Err(CredentialError::DuplicateKey)` — username already present
    /// - `Err(CredentialError::Storage)` — any other failure
    fn insert(
        &self,
        username: &str,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<PlayerId, CredentialError>> + Send;
}

#[derive(Debug, Clone)]
struct Account {
    password_hash: String,
}

/// A [`CredentialStore`] backed by a `HashMap`. Ids start at 1.
#[derive(Debug)]
pub struct MemoryCredentialStore {
    accounts: Mutex<HashMap<String, Account>>,
    next_id: AtomicU64,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the stored hash for `username`, if registered.
    pub async fn password_hash(&self, username: &str) -> Option<String> {
        self.accounts
            .lock()
            .await
            .get(username)
            .map(|account| account.password_hash.clone())
    }

    /// Number of registered accounts.
    pub async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.lock().await.is_empty()
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn insert(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<PlayerId, CredentialError> {
        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(username) {
            return Err(CredentialError::DuplicateKey(username.to_string()));
        }

        let id = PlayerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        accounts.insert(
            username.to_string(),
            Account {
                password_hash: password_hash.to_string(),
            },
        );
        Ok(id)
    }
}
