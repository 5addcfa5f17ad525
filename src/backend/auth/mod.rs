//! Authentication Module
//!
//! User accounts, password hashing and JWT sessions.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model, roles and password hashing
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers under /api/user
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email and password → user created → JWT token returned
//! 2. **Login**: email and password → credentials verified → JWT token returned
//! 3. **Me**: JWT token → token verified by middleware → profile returned
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 JWTs carrying the user's id, email and role
//! - Invalid credentials return 401 without saying which part was wrong

/// User model, roles and password hashing
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
pub use handlers::{get_me, login, register};
pub use sessions::{Claims, JwtKeys};
pub use users::{Role, User};
