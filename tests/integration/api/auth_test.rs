//! Authentication API integration tests
//!
//! Register, login and the current-user endpoint, plus how the auth
//! middleware treats missing, bad and stale tokens.

#[cfg(feature = "ssr")]
mod tests {
    use axum::http::StatusCode;
    use merkato::backend::auth::{AuthResponse, JwtKeys, Role, User, UserResponse};
    use serde_json::json;
    use std::time::Duration;

    use crate::common::assertions::assert_api_error;
    use crate::common::{register_user, register_with_email, spawn_app, TEST_PASSWORD};

    #[tokio::test]
    async fn test_register_success() {
        let app = spawn_app();

        let response = app
            .server
            .post("/api/user/register")
            .json(&json!({
                "email": "seller@example.com",
                "password": "password123",
                "first_name": "Hanna",
                "last_name": "Tesfaye",
                "role": "vendor"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: AuthResponse = response.json();
        assert!(!body.token.is_empty());
        assert_eq!(body.user.email, "seller@example.com");
        assert_eq!(body.user.role, Role::Vendor);
    }

    #[tokio::test]
    async fn test_register_defaults_to_customer() {
        let app = spawn_app();

        let response = app
            .server
            .post("/api/user/register")
            .json(&json!({"email": "buyer@example.com", "password": "password123"}))
            .await;

        let body: AuthResponse = response.json();
        assert_eq!(body.user.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let app = spawn_app();
        register_with_email(&app.server, "taken@example.com", Role::Customer).await;

        let response = app
            .server
            .post("/api/user/register")
            .json(&json!({"email": "TAKEN@example.com", "password": "password123"}))
            .await;

        let message = assert_api_error(&response, StatusCode::BAD_REQUEST);
        crate::assert_contains!(message, "already registered");
    }

    #[tokio::test]
    async fn test_register_validation() {
        let app = spawn_app();

        for body in [
            json!({"email": "no-at-sign", "password": "password123"}),
            json!({"email": "short@example.com", "password": "short"}),
            json!({"email": "boss@example.com", "password": "password123", "role": "admin"}),
        ] {
            let response = app.server.post("/api/user/register").json(&body).await;
            assert_api_error(&response, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let app = spawn_app();
        let user = register_user(&app.server, Role::Customer).await;

        let response = app
            .server
            .post("/api/user/login")
            .json(&json!({"email": user.email, "password": TEST_PASSWORD}))
            .await;

        response.assert_status_ok();
        let body: AuthResponse = response.json();
        assert_eq!(body.user.id, user.id);
        assert!(!body.token.is_empty());
    }

    #[tokio::test]
    async fn test_login_failures_look_alike() {
        let app = spawn_app();
        let user = register_user(&app.server, Role::Customer).await;

        let wrong_password = app
            .server
            .post("/api/user/login")
            .json(&json!({"email": user.email, "password": "wrongpassword"}))
            .await;
        let unknown_email = app
            .server
            .post("/api/user/login")
            .json(&json!({"email": "nobody@example.com", "password": TEST_PASSWORD}))
            .await;

        assert_eq!(
            assert_api_error(&wrong_password, StatusCode::UNAUTHORIZED),
            assert_api_error(&unknown_email, StatusCode::UNAUTHORIZED)
        );
    }

    #[tokio::test]
    async fn test_me_returns_profile() {
        let app = spawn_app();
        let user = register_user(&app.server, Role::Vendor).await;

        let response = app
            .server
            .get("/api/user/me")
            .authorization_bearer(&user.token)
            .await;

        response.assert_status_ok();
        let body: UserResponse = response.json();
        assert_eq!(body.id, user.id);
        assert_eq!(body.role, Role::Vendor);
        assert_eq!(body.first_name, "Test");
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let app = spawn_app();
        let response = app.server.get("/api/user/me").await;
        assert_api_error(&response, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_rejected_even_on_public_route() {
        let app = spawn_app();
        let response = app
            .server
            .get("/api/product/products")
            .authorization_bearer("invalid.token.here")
            .await;
        assert_api_error(&response, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_for_unknown_user_rejected() {
        let app = spawn_app();
        let ghost = User::new(
            "ghost@example.com".to_string(),
            String::new(),
            String::new(),
            String::new(),
            Role::Customer,
        );
        let token = JwtKeys::new("test-secret", Duration::from_secs(60))
            .create_token(&ghost)
            .unwrap();

        let response = app.server.get("/api/user/me").authorization_bearer(token).await;
        assert_api_error(&response, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_health_and_unknown_route() {
        let app = spawn_app();

        let health = app.server.get("/health").await;
        health.assert_status_ok();
        health.assert_json(&json!({"status": "ok"}));

        let missing = app.server.get("/api/nothing-here").await;
        assert_api_error(&missing, StatusCode::NOT_FOUND);
    }
}
