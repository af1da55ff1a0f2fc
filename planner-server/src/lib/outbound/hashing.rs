use async_trait::async_trait;

use crate::config::HashingConfig;
use crate::domain::user::models::Password;
use crate::user::errors::HashingError;
use crate::user::ports::PasswordHasher;

/// Argon2id hasher backed by the `auth` crate.
///
/// Hashing is CPU bound, so both operations run on the blocking pool.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    inner: auth::PasswordHasher,
}

impl Argon2PasswordHasher {
    /// # Errors
    /// * `Failed` - Work factor parameters are out of range
    pub fn new(config: &HashingConfig) -> Result<Self, HashingError> {
        let inner =
            auth::PasswordHasher::with_params(config.memory_kib, config.iterations, config.parallelism)
                .map_err(|e| HashingError::Failed(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<String, HashingError> {
        let hasher = self.inner.clone();
        let password = password.expose().to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| HashingError::Failed(e.to_string()))?
            .map_err(|e| HashingError::Failed(e.to_string()))
    }

    async fn verify(&self, password: &Password, password_hash: &str) -> bool {
        let hasher = self.inner.clone();
        let password = password.expose().to_string();
        let password_hash = password_hash.to_string();

        match tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash)).await {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!(error = %e, "Password verification task failed");
                false
            }
        }
    }
}
