//! Account registration: validate, hash, store.

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString};
use rand::Rng;
use roomcast_protocol::PlayerId;

use crate::{CredentialStore, RegistrationError};

/// Status reported to the client for a successful registration.
pub const STATUS_CREATED: u16 = 201;

/// A successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub player_id: PlayerId,
    pub message: String,
}

/// Front door for new accounts.
///
/// Checks that both fields are present, hashes the password with Argon2
/// and hands the pair to the [`CredentialStore`]. No retries: a failed insert is
/// reported as-is to the one caller that made it.
#[derive(Debug)]
pub struct Registrar<S: CredentialStore> {
    store: S,
}

impl<S: CredentialStore> Registrar<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers a new account.
    ///
    /// `None` and `""` are both treated as missing.
    ///
    /// # Errors
    /// - [`RegistrationError::MissingFields`] — a field is missing or empty
    /// - [`RegistrationError::DuplicateUsername`] — username taken
    /// - [`RegistrationError::Storage`] — the store failed otherwise
    /// - [`RegistrationError::Hashing`] — argon2 rejected the password
    pub async fn register(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Registration, RegistrationError> {
        let (username, password) = match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
            _ => return Err(RegistrationError::MissingFields),
        };

        let hash = hash_password(password).inspect_err(|e| {
            tracing::error!(username, error = %e, "password hashing failed");
        })?;
        match self.store.insert(username, &hash).await {
            Ok(player_id) => {
                tracing::info!(username, %player_id, "player registered");
                Ok(Registration {
                    player_id,
                    message: "registration successful".into(),
                })
            }
            Err(e) => {
                let err = RegistrationError::from(e);
                match &err {
                    RegistrationError::Storage(source) => {
                        tracing::error!(username, error = %source, "registration storage failure");
                    }
                    _ => tracing::debug!(username, error = %err, "registration rejected"),
                }
                Err(err)
            }
        }
    }
}

/// Hashes a password with Argon2id into a PHC string
/// (`$argon2id$v=19$...`).
///
/// The salt is 16 fresh random bytes, so hashing the same password twice
/// gives different strings.
///
/// # Errors
/// [`RegistrationError::Hashing`] if argon2 rejects the input.
pub fn hash_password(password: &str) -> Result<String, RegistrationError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| RegistrationError::Hashing(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| RegistrationError::Hashing(e.to_string()))
}
