//! Authentication test helpers
//!
//! Users are registered through the API so tests exercise the same path
//! as clients.

use axum_test::TestServer;
use merkato::backend::auth::{AuthResponse, Role};
use serde_json::json;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "password123";

/// Registered user and their token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

/// Register a user with a unique email and the given role
pub async fn register_user(server: &TestServer, role: Role) -> TestUser {
    let email = format!("{}_{}@example.com", role.as_str(), Uuid::new_v4().simple());
    register_with_email(server, &email, role).await
}

pub async fn register_with_email(server: &TestServer, email: &str, role: Role) -> TestUser {
    let response = server
        .post("/api/user/register")
        .json(&json!({
            "email": email,
            "password": TEST_PASSWORD,
            "first_name": "Test",
            "last_name": "User",
            "role": role,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: AuthResponse = response.json();
    TestUser {
        id: body.user.id,
        email: body.user.email,
        token: body.token,
    }
}

/// Admins cannot self-register; insert one straight into the store
pub async fn create_admin(app: &super::TestApp) -> TestUser {
    use merkato::backend::auth::users::{hash_password, User};
    use merkato::backend::store::UserStore;

    let user = User::new(
        format!("admin_{}@example.com", Uuid::new_v4().simple()),
        "Site".to_string(),
        "Admin".to_string(),
        hash_password(TEST_PASSWORD, 4).expect("hash"),
        Role::Admin,
    );
    let user = app.state.auth.users.create_user(user).await.expect("admin created");
    let token = app.state.auth.jwt.create_token(&user).expect("token");

    TestUser {
        id: user.id,
        email: user.email,
        token,
    }
}
