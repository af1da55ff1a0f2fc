use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::Instrument;
use tracing::Span;

use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::AuthError;
use crate::user::errors::HashingError;
use crate::user::errors::StoreError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::CredentialStore;
use crate::user::ports::PasswordHasher;

/// Domain service implementation for registration and login.
///
/// Holds no mutable state besides the decoy hash, computed by `warm_up` or on
/// first use. Uniqueness under concurrent registrations is the store's
/// responsibility.
pub struct AuthService<CS, PH>
where
    CS: CredentialStore,
    PH: PasswordHasher,
{
    store: Arc<CS>,
    hasher: Arc<PH>,
    decoy_hash: OnceCell<String>,
    span: Span,
}

impl<CS, PH> AuthService<CS, PH>
where
    CS: CredentialStore,
    PH: PasswordHasher,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `hasher` - Password hashing implementation
    pub fn new(store: Arc<CS>, hasher: Arc<PH>) -> Self {
        Self {
            store,
            hasher,
            decoy_hash: OnceCell::new(),
            span: tracing::info_span!("auth_service"),
        }
    }

    /// Replace the span every operation is recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Compute the decoy hash before the first unknown-username login, so
    /// that login costs one verification like any wrong password.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Hashing the decoy failed
    pub async fn warm_up(&self) -> Result<(), AuthError> {
        async {
            self.decoy().await.map_err(|e| {
                tracing::error!(error = %e, "Decoy hash failed");
                AuthError::from(e)
            })?;
            tracing::debug!("Decoy hash ready");
            Ok(())
        }
        .instrument(self.span.clone())
        .await
    }

    async fn decoy(&self) -> Result<&String, HashingError> {
        self.decoy_hash
            .get_or_try_init(|| async { self.hasher.hash(&Password::decoy()).await })
            .await
    }

    /// Spend roughly one verification worth of time for a username that
    /// does not exist.
    async fn verify_against_decoy(&self, password: &Password) {
        match self.decoy().await {
            Ok(hash) => {
                self.hasher.verify(password, hash).await;
            }
            Err(e) => tracing::debug!(error = %e, "Decoy hash unavailable"),
        }
    }
}

fn parse_credentials(username: &str, password: &str) -> Result<(Username, Password), AuthError> {
    let username = Username::new(username)?;
    let password = Password::new(password)?;
    Ok((username, password))
}

fn store_failure(username: &Username, err: StoreError) -> AuthError {
    tracing::error!(username = %username, error = %err, "Credential store failure");
    AuthError::from(err)
}

#[async_trait]
impl<CS, PH> AuthServicePort for AuthService<CS, PH>
where
    CS: CredentialStore,
    PH: PasswordHasher,
{
    async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        async {
            let (username, password) = parse_credentials(username, password).map_err(|e| {
                tracing::warn!(username = %username, error = %e, "Registration rejected");
                e
            })?;

            let exists = self
                .store
                .exists_by_username(&username)
                .await
                .map_err(|e| store_failure(&username, e))?;

            if exists {
                tracing::warn!(
                    username = %username,
                    "Registration attempted with existing username"
                );
                return Err(AuthError::DuplicateUsername(username.to_string()));
            }

            let password_hash = self.hasher.hash(&password).await.map_err(|e| {
                tracing::error!(username = %username, error = %e, "Password hashing failed");
                AuthError::from(e)
            })?;

            match self.store.insert(&username, &password_hash).await {
                Ok(user) => {
                    tracing::info!(
                        user_id = %user.id,
                        username = %user.username,
                        "User registered successfully"
                    );
                    Ok(user)
                }
                Err(StoreError::UniquenessViolation(_)) => {
                    tracing::warn!(
                        username = %username,
                        "Registration lost a concurrent insert for the same username"
                    );
                    Err(AuthError::DuplicateUsername(username.to_string()))
                }
                Err(e) => Err(store_failure(&username, e)),
            }
        }
        .instrument(self.span.clone())
        .await
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        async {
            let (username, password) = parse_credentials(username, password).map_err(|e| {
                tracing::warn!(username = %username, error = %e, "Login rejected");
                e
            })?;

            let user = self
                .store
                .find_by_username(&username)
                .await
                .map_err(|e| store_failure(&username, e))?;

            let Some(user) = user else {
                self.verify_against_decoy(&password).await;
                tracing::warn!(
                    username = %username,
                    "Login attempted with non-existent username"
                );
                return Err(AuthError::InvalidCredentials);
            };

            if self.hasher.verify(&password, &user.password_hash).await {
                tracing::info!(
                    user_id = %user.id,
                    username = %username,
                    result = "success",
                    "Login attempt"
                );
                Ok(user)
            } else {
                tracing::warn!(
                    user_id = %user.id,
                    username = %username,
                    result = "failed",
                    "Login attempt"
                );
                Err(AuthError::InvalidCredentials)
            }
        }
        .instrument(self.span.clone())
        .await
    }
}
