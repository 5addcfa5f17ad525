//! Test application over in-memory stores

use axum_test::TestServer;
use merkato::backend::server::{create_app_with_state, AppState};
use merkato::shared::AppConfig;
use std::time::Duration;

/// Config for tests: cheap password hashing, short rate timeout, and the
/// rate provider at `rate_base_url`.
pub fn test_config(rate_base_url: &str) -> AppConfig {
    AppConfig::builder()
        .jwt_secret("test-secret")
        .password_cost(4)
        .rate_api_base_url(rate_base_url)
        .rate_api_key(TEST_API_KEY)
        .rate_timeout(Duration::from_millis(500))
        .build()
        .expect("valid test config")
}

pub const TEST_API_KEY: &str = "test-key";

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub fn new(config: AppConfig) -> Self {
        let state = AppState::in_memory(config);
        let server = TestServer::new(create_app_with_state(state.clone())).expect("test server");
        Self { server, state }
    }
}

/// App whose rate provider is unreachable; every conversion falls back.
pub fn spawn_app() -> TestApp {
    // Port 9 (discard) refuses connections on test machines
    TestApp::new(test_config("http://127.0.0.1:9"))
}

/// App whose rate provider is `rates`
pub fn spawn_app_with_rates(rates: &wiremock::MockServer) -> TestApp {
    TestApp::new(test_config(&rates.uri()))
}
