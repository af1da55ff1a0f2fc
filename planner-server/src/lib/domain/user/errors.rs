use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username is required")]
    Empty,
}

/// Error for Password validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password is required")]
    Empty,
}

/// Error reported by a password hasher
#[derive(Debug, Clone, Error)]
pub enum HashingError {
    #[error("Password hashing failed: {0}")]
    Failed(String),
}

/// Error reported by a credential store
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The insert would duplicate a unique column.
    #[error("Uniqueness violation for username: {0}")]
    UniquenessViolation(String),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for registration and login
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// Unknown username and wrong password both end up here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<UsernameError> for AuthError {
    fn from(err: UsernameError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniquenessViolation(username) => AuthError::DuplicateUsername(username),
            StoreError::Unavailable(reason) => AuthError::StoreUnavailable(reason),
        }
    }
}

impl From<HashingError> for AuthError {
    fn from(err: HashingError) -> Self {
        AuthError::StoreUnavailable(err.to_string())
    }
}
