use async_trait::async_trait;

use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::AuthError;
use crate::user::errors::HashingError;
use crate::user::errors::StoreError;

/// Port for registration and login.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `username` - Raw username, trimmed before use
    /// * `password` - Raw plaintext password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `InvalidInput` - Username blank or password empty
    /// * `DuplicateUsername` - Username is already taken
    /// * `StoreUnavailable` - Storage or hashing failed
    async fn register(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Check a credential pair.
    ///
    /// No session or token is issued; success only certifies the pair.
    ///
    /// # Returns
    /// The authenticated user entity
    ///
    /// # Errors
    /// * `InvalidInput` - Username blank or password empty
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `StoreUnavailable` - Storage failed
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;
}

/// Persistence operations for user credentials.
///
/// Implementations must enforce username uniqueness in storage, so that two
/// concurrent inserts for the same username cannot both succeed.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Exact-match lookup by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, StoreError>;

    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn exists_by_username(&self, username: &Username) -> Result<bool, StoreError>;

    /// Persist a new user and return it with its assigned id.
    ///
    /// # Errors
    /// * `UniquenessViolation` - Username is already stored
    /// * `Unavailable` - Storage operation failed
    async fn insert(&self, username: &Username, password_hash: &str) -> Result<User, StoreError>;
}

/// One-way salted password hashing.
#[async_trait]
pub trait PasswordHasher: Send + Sync + 'static {
    /// Hash a password with a fresh salt embedded in the output.
    ///
    /// # Errors
    /// * `Failed` - Hashing operation failed
    async fn hash(&self, password: &Password) -> Result<String, HashingError>;

    /// Check a password against a stored hash.
    ///
    /// Returns false for a malformed stored hash.
    async fn verify(&self, password: &Password, password_hash: &str) -> bool;
}
