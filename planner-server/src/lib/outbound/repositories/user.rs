use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqliteJournalMode;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::Instrument;
use tracing::Span;

use crate::config::DatabaseConfig;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialStore;
use crate::user::errors::StoreError;

/// Credential store backed by a SQLite file.
///
/// Username uniqueness is enforced by the `UNIQUE` constraint on
/// `users.username`; a losing concurrent insert surfaces as
/// `StoreError::UniquenessViolation`.
pub struct SqliteCredentialStore {
    pool: SqlitePool,
    span: Span,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(&row.username).map_err(|e| {
            StoreError::Unavailable(format!("corrupt username in row {}: {}", row.id, e))
        })?;

        Ok(User {
            id: UserId(row.id),
            username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

impl SqliteCredentialStore {
    /// Open (creating if missing) the database at `config.url`.
    ///
    /// Every operation waits at most `acquire_timeout` for a connection
    /// before failing with `Unavailable`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(unavailable)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.acquire_timeout());

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await
            .map_err(unavailable)?;

        tracing::info!(
            database = "sqlite",
            url = %config.url,
            max_connections = config.max_connections,
            "Database connection pool created"
        );

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            span: tracing::info_span!("credential_store", database = "sqlite"),
        }
    }

    /// Replace the span every operation is recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Create the `users` table if it does not exist yet. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .instrument(self.span.clone())
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        tracing::info!(database = "sqlite", "Database migrations completed");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(database = "sqlite", "Database connection pool closed");
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .instrument(self.span.clone())
        .await
        .map_err(unavailable)?;

        row.map(User::try_from).transpose()
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)
            "#,
        )
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .instrument(self.span.clone())
        .await
        .map_err(unavailable)
    }

    async fn insert(&self, username: &Username, password_hash: &str) -> Result<User, StoreError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash)
        .bind(created_at)
        .execute(&self.pool)
        .instrument(self.span.clone())
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StoreError::UniquenessViolation(username.to_string());
                }
            }
            unavailable(e)
        })?;

        Ok(User {
            id: UserId(result.last_insert_rowid()),
            username: username.clone(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteCredentialStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqliteCredentialStore::from_pool(pool);
        store.ensure_schema().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = memory_store().await;
        let username = Username::new("alice").unwrap();

        let created = store.insert(&username, "hash-a").await.unwrap();
        let found = store.find_by_username(&username).await.unwrap().unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.username, username);
        assert_eq!(found.password_hash, "hash-a");
        assert!(store.exists_by_username(&username).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let store = memory_store().await;
        let username = Username::new("nobody").unwrap();

        assert!(store.find_by_username(&username).await.unwrap().is_none());
        assert!(!store.exists_by_username(&username).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_uniqueness_violation() {
        let store = memory_store().await;
        let username = Username::new("alice").unwrap();

        store.insert(&username, "hash-a").await.unwrap();
        let second = store.insert(&username, "hash-b").await;

        assert!(matches!(second, Err(StoreError::UniquenessViolation(_))));
        let kept = store.find_by_username(&username).await.unwrap().unwrap();
        assert_eq!(kept.password_hash, "hash-a");
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let store = memory_store().await;

        store
            .insert(&Username::new("alice").unwrap(), "hash-a")
            .await
            .unwrap();
        store
            .insert(&Username::new("Alice").unwrap(), "hash-b")
            .await
            .unwrap();

        let upper = store
            .find_by_username(&Username::new("Alice").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(upper.password_hash, "hash-b");
    }

    #[tokio::test]
    async fn test_ids_are_distinct() {
        let store = memory_store().await;

        let a = store
            .insert(&Username::new("a").unwrap(), "h")
            .await
            .unwrap();
        let b = store
            .insert(&Username::new("b").unwrap(), "h")
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let store = memory_store().await;
        assert!(store.ensure_schema().await.is_ok());
    }

    #[tokio::test]
    async fn test_store_with_injected_span() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let span = tracing::info_span!("planner_test", component = "store");
        let store = SqliteCredentialStore::from_pool(pool).with_span(span);
        store.ensure_schema().await.unwrap();

        let username = Username::new("alice").unwrap();
        store.insert(&username, "hash-a").await.unwrap();

        assert!(store.exists_by_username(&username).await.unwrap());
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let store = memory_store().await;
        store.close().await;

        let result = store
            .find_by_username(&Username::new("alice").unwrap())
            .await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
