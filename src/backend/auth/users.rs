/**
 * User Model
 *
 * This module defines the user record, its role, and password hashing.
 * Persistence goes through `backend::store::UserStore`.
 */

use bcrypt::{hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a user is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Browses, keeps favorites, chats
    #[default]
    Customer,
    /// Also sells
    Vendor,
    /// Sees and moderates everything
    Admin,
}

impl Role {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }

    /// Parse from string (database)
    pub fn from_db(s: &str) -> Self {
        match s {
            "vendor" => Role::Vendor,
            "admin" => Role::Admin,
            _ => Role::Customer,
        }
    }
}

/// User record as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        password_hash: String,
        role: Role,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            first_name,
            last_name,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }
}

/// Hash a password with bcrypt at work factor `cost`
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Check a password against a stored bcrypt hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, password_hash)
}
