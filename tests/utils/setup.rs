use axum::Router;
use std::sync::Arc;

use employee_api::{
    build_router, InMemoryEmployeeRepository, InMemoryUserRepository, TokenConfig, AppState,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestSetup {
    pub app: Router,
    pub token_config: TokenConfig,
    pub employee_repository: Arc<InMemoryEmployeeRepository>,
    pub user_repository: Arc<InMemoryUserRepository>,
}

pub struct TestSetupBuilder {
    token_ttl_minutes: i64,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            token_ttl_minutes: 30,
        }
    }

    pub fn with_token_ttl_minutes(mut self, minutes: i64) -> Self {
        self.token_ttl_minutes = minutes;
        self
    }

    pub fn build(self) -> TestSetup {
        let token_config = TokenConfig::new(TEST_SECRET, self.token_ttl_minutes);
        let employee_repository = Arc::new(InMemoryEmployeeRepository::new());
        let user_repository = Arc::new(InMemoryUserRepository::new());

        let state = AppState::new(
            user_repository.clone(),
            employee_repository.clone(),
            token_config.clone(),
        );

        TestSetup {
            app: build_router(state),
            token_config,
            employee_repository,
            user_repository,
        }
    }
}
