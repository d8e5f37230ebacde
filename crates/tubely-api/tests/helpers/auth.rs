use chrono::Duration;
use tubely_api::auth::JwtService;
use uuid::Uuid;

/// Signing secret shared with the test configuration (at least 32 characters).
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// A caller with a valid bearer token.
pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn new() -> Self {
        let user_id = Uuid::new_v4();
        let token = JwtService::new(TEST_JWT_SECRET)
            .issue_token(user_id, Duration::hours(1))
            .expect("Failed to issue token");
        Self { user_id, token }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// A token signed for `user_id` that expired an hour ago.
pub fn expired_token(user_id: Uuid) -> String {
    JwtService::new(TEST_JWT_SECRET)
        .issue_token(user_id, Duration::hours(-1))
        .expect("Failed to issue token")
}
