#[cfg(test)]
pub mod test_utils {
    use crate::cli::commands::create_admin::bootstrap_admin;
    use crate::identity::{NewUser, TokenService};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use axum_test::TestServer;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const TEST_SECRET: &str = "test_secret_key_at_least_32_characters_long";
    pub const TEST_PASSWORD: &str = "Pa$$w0rd";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        AppState::new(db, TokenService::new(TEST_SECRET, 1))
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level comes from RUST_LOG and defaults to WARN.
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
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
        let state = setup_test_app_state().await;
        create_router(state)
    }

    /// Test server plus the state behind it, for tests that seed data
    /// directly or need tokens.
    pub async fn setup_test_server() -> (TestServer, AppState) {
        let state = setup_test_app_state().await;
        let server = TestServer::new(create_router(state.clone())).expect("Failed to start test server");
        (server, state)
    }

    /// Creates an administrator holding every catalog claim and returns a
    /// bearer token for them.
    pub async fn admin_token(state: &AppState) -> String {
        let id = bootstrap_admin(&state.db, "admin", "admin@northwind.com", TEST_PASSWORD)
            .await
            .expect("Failed to create admin");
        token_for(state, id).await
    }

    /// Creates a plain user without roles and returns a bearer token for them.
    pub async fn user_token(state: &AppState, user_name: &str) -> String {
        let user = state
            .users
            .create(NewUser {
                user_name: user_name.to_string(),
                email: format!("{user_name}@northwind.com"),
                password: TEST_PASSWORD.to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .expect("Failed to create user");
        token_for(state, user.id).await
    }

    async fn token_for(state: &AppState, user_id: i32) -> String {
        let user = state.users.find_by_id(user_id).await.expect("user exists");
        let roles = state.users.role_names_of(user_id).await.expect("roles");
        let claims = state.users.granted_claims_of(user_id).await.expect("claims");
        state
            .tokens
            .issue(&user, roles, claims)
            .expect("Failed to issue token")
    }
}
