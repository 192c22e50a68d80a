#[cfg(test)]
pub mod test_utils {
    use crate::config::AppConfig;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum::Router;
    use axum_test::TestServer;
    use migration::{Migrator, MigratorTrait};
    use moka::future::Cache;
    use sea_orm::{Database, DatabaseConnection};
    use serde_json::{json, Value};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const TEST_PASSWORD: &str = "correct-horse";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        AppState {
            db: setup_test_db().await,
            cache: Cache::new(100),
            config: AppConfig::default(),
            calculator: compute::default_calculator(),
        }
    }

    /// Log to STDERR at the `RUST_LOG` level, WARN when unset.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _guard = init_test_tracing();
        create_router(setup_test_app_state().await)
    }

    pub async fn setup_test_server() -> TestServer {
        TestServer::new(setup_test_app().await).unwrap()
    }

    /// Authorization header carrying `token`
    pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
        (
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
    }

    /// Registers `username` and returns an authorization header for it
    pub async fn login_as(server: &TestServer, username: &str) -> (HeaderName, HeaderValue) {
        server
            .post("/api/v1/auth/register")
            .json(&json!({ "username": username, "password": TEST_PASSWORD }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({ "username": username, "password": TEST_PASSWORD }))
            .await;
        response.assert_status(StatusCode::OK);

        let body: Value = response.json();
        let token = body["data"]["accessToken"]
            .as_str()
            .expect("login response without token");
        bearer(token)
    }

    /// Creates a person owned by the header's user and returns its id
    pub async fn create_person(
        server: &TestServer,
        auth: &(HeaderName, HeaderValue),
        body: Value,
    ) -> i64 {
        let response = server
            .post("/api/v1/persons")
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        body["data"]["id"].as_i64().unwrap()
    }

    /// Creates a salary record and returns the response body's `data`
    pub async fn create_salary(
        server: &TestServer,
        auth: &(HeaderName, HeaderValue),
        person_id: i64,
        body: Value,
    ) -> Value {
        let response = server
            .post(&format!("/api/v1/persons/{person_id}/salaries"))
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        body["data"].clone()
    }
}
