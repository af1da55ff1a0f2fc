use std::sync::Arc;

use planner_server::config::DatabaseConfig;
use planner_server::config::HashingConfig;
use planner_server::domain::user::service::AuthService;
use planner_server::inbound::http::router::create_router;
use planner_server::inbound::http::router::PlannerAuthService;
use planner_server::outbound::hashing::Argon2PasswordHasher;
use planner_server::outbound::repositories::SqliteCredentialStore;
use tempfile::TempDir;

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub db: TestDb,
    pub api_client: reqwest::Client,
}

/// SQLite database living in a temporary directory
pub struct TestDb {
    pub store: Arc<SqliteCredentialStore>,
    _dir: TempDir,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let db = TestDb::new().await;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let auth_service = db.auth_service();
        auth_service.warm_up().await.expect("Failed to compute decoy hash");
        let router = create_router(auth_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            db,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/auth/register")
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/auth/login")
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("planner.db").display()),
            max_connections: 5,
            acquire_timeout_secs: 5,
        };

        let store = SqliteCredentialStore::connect(&config)
            .await
            .expect("Failed to open test database")
            .with_span(tracing::info_span!("credential_store", test = true));
        store
            .ensure_schema()
            .await
            .expect("Failed to run migrations");

        Self {
            store: Arc::new(store),
            _dir: dir,
        }
    }

    /// Auth service over this database with a cheap work factor
    pub fn auth_service(&self) -> Arc<PlannerAuthService> {
        let span = tracing::info_span!("auth_service", test = true);
        Arc::new(AuthService::new(Arc::clone(&self.store), cheap_hasher()).with_span(span))
    }
}

pub fn cheap_hasher() -> Arc<Argon2PasswordHasher> {
    let config = HashingConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
    Arc::new(Argon2PasswordHasher::new(&config).expect("Invalid test hashing params"))
}
