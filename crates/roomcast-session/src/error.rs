//! Error types for the session layer.

/// Errors a [`CredentialStore`](crate::CredentialStore) can report.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The username is already taken.
    #[error("username {0:?} already exists")]
    DuplicateKey(String),

    /// Anything else the backing store failed at (connection lost, disk
    /// full, ...). The string is for logs only and never reaches clients.
    #[error("credential storage failed: {0}")]
    Storage(String),
}

/// Why a registration request was refused.
///
/// Each variant maps to an HTTP-style status through
/// [`status_code`](Self::status_code), and to the text shown to the client
/// through [`client_message`](Self::client_message).
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// Username or password was absent or empty.
    #[error("username and password are required")]
    MissingFields,

    /// The store already holds this username.
    #[error("username {0:?} already exists")]
    DuplicateUsername(String),

    /// The store failed for another reason.
    #[error("registration failed: {0}")]
    Storage(#[source] CredentialError),

    /// The password could not be hashed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl RegistrationError {
    /// 400 for caller mistakes, 500 for store failures.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingFields | Self::DuplicateUsername(_) => 400,
            Self::Storage(_) | Self::Hashing(_) => 500,
        }
    }

    /// The message sent back to the client.
    ///
    /// Storage failures get a fixed generic text so no backend detail
    /// leaks out.
    pub fn client_message(&self) -> String {
        match self {
            Self::MissingFields => "username and password are required".into(),
            Self::DuplicateUsername(_) => "username already exists".into(),
            Self::Storage(_) | Self::Hashing(_) => "registration failed".into(),
        }
    }
}

impl From<CredentialError> for RegistrationError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::DuplicateKey(username) => {
                Self::DuplicateUsername(username)
            }
            other => Self::Storage(other),
        }
    }
}
