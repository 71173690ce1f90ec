//! Account entity

use serde::{Deserialize, Serialize};

/// A registered account as stored in the document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Trimmed and lowercased; unique across the document
    pub email: String,
    /// Argon2 PHC string; persisted but never sent to clients
    pub password_hash: String,
    /// Current bearer token, replaced on every login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Token expiry in millis; tokens past this instant are rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<i64>,
    pub created_at: i64,
}

/// Client-facing view of an account: everything except credentials
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub created_at: i64,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_never_carries_credentials() {
        let user = User {
            id: 7,
            name: Some("Asha".into()),
            email: "asha@example.com".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".into(),
            token: Some("aabb".into()),
            token_expires_at: Some(1),
            created_at: 0,
        };
        let value = serde_json::to_value(UserProfile::from(&user)).unwrap();
        assert_eq!(value["email"], "asha@example.com");
        assert!(value.get("password_hash").is_none());
        assert!(value.get("token").is_none());
    }
}
