//! Account service: register, login, token validation
//!
//! Tokens are opaque: 32 random bytes hex-encoded, stored on the user
//! record with an explicit expiry and replaced wholesale on every login.
//! There is nothing to decode client-side and nothing to verify beyond a
//! lookup, which keeps revocation as simple as overwriting the field.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{User, UserProfile};
use crate::store::DocStore;
use crate::util;

const MIN_PASSWORD_LEN: usize = 6;

/// POST /register body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// POST /login body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued on register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Account operations, shared behind cheap clones
#[derive(Clone)]
pub struct AuthService {
    store: DocStore,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(store: DocStore, token_ttl_hours: i64) -> Self {
        Self {
            store,
            token_ttl_hours,
        }
    }

    fn token_expiry(&self) -> i64 {
        util::now_millis() + self.token_ttl_hours * 60 * 60 * 1000
    }

    /// Create an account and issue its first token.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<AuthResponse> {
        let email = req.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation("a valid email is required".into()));
        }
        if req.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = util::hash_password(&req.password)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;
        let token = util::generate_token();
        let expires_at = self.token_expiry();
        let name = req.name.filter(|n| !n.trim().is_empty());

        let user = {
            let token = token.clone();
            let email = email.clone();
            self.store
                .mutate(move |doc| {
                    if doc.users.iter().any(|u| u.email == email) {
                        return None;
                    }
                    let user = User {
                        id: util::next_id(),
                        name,
                        email,
                        password_hash,
                        token: Some(token),
                        token_expires_at: Some(expires_at),
                        created_at: util::now_millis(),
                    };
                    doc.users.push(user.clone());
                    Some(user)
                })
                .await
        };

        let user =
            user.ok_or_else(|| AppError::Conflict(format!("account already exists for {email}")))?;
        tracing::info!(user_id = user.id, email = %user.email, "account registered");
        Ok(AuthResponse {
            token,
            user: UserProfile::from(&user),
        })
    }

    /// Verify credentials and rotate the account's token.
    ///
    /// Unknown email and wrong password produce the same answer, so login
    /// cannot be used to probe which accounts exist.
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let email = req.email.trim().to_lowercase();
        let stored = self
            .store
            .read(|doc| {
                doc.users
                    .iter()
                    .find(|u| u.email == email)
                    .map(|u| (u.id, u.password_hash.clone()))
            })
            .await;

        let Some((user_id, password_hash)) = stored else {
            tracing::warn!(email = %email, "login attempt for unknown email");
            return Err(AppError::invalid_credentials());
        };
        if !util::verify_password(&req.password, &password_hash) {
            tracing::warn!(email = %email, "login attempt with wrong password");
            return Err(AppError::invalid_credentials());
        }

        let token = util::generate_token();
        let expires_at = self.token_expiry();
        let user = {
            let token = token.clone();
            self.store
                .mutate(move |doc| {
                    doc.users.iter_mut().find(|u| u.id == user_id).map(|u| {
                        u.token = Some(token);
                        u.token_expires_at = Some(expires_at);
                        u.clone()
                    })
                })
                .await
        };

        // the account was deleted between the read and the write
        let user = user.ok_or_else(AppError::invalid_credentials)?;
        tracing::info!(user_id = user.id, "login succeeded");
        Ok(AuthResponse {
            token,
            user: UserProfile::from(&user),
        })
    }

    /// Resolve a bearer token to its account.
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        if token.is_empty() {
            return Err(AppError::Unauthorized("invalid or expired token".into()));
        }
        let user = self
            .store
            .read(|doc| {
                doc.users
                    .iter()
                    .find(|u| u.token.as_deref() == Some(token))
                    .cloned()
            })
            .await;

        match user {
            Some(user)
                if user
                    .token_expires_at
                    .is_some_and(|exp| exp > util::now_millis()) =>
            {
                Ok(user)
            }
            Some(user) => {
                tracing::warn!(user_id = user.id, "expired token presented");
                Err(AppError::Unauthorized("invalid or expired token".into()))
            }
            None => Err(AppError::Unauthorized("invalid or expired token".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocStore, MemoryBackend};
    use std::sync::Arc;

    fn auth() -> AuthService {
        AuthService::new(DocStore::new(Arc::new(MemoryBackend::new())), 24)
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some("Asha".into()),
            email: email.into(),
            password: "hunter42".into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let auth = auth();
        let resp = auth.register(register_request("Asha@Example.com")).await.unwrap();
        // email is normalized on the way in
        assert_eq!(resp.user.email, "asha@example.com");

        let user = auth.authenticate(&resp.token).await.unwrap();
        assert_eq!(user.id, resp.user.id);
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let auth = auth();
        let bad_email = RegisterRequest {
            name: None,
            email: "not-an-email".into(),
            password: "hunter42".into(),
        };
        assert!(matches!(
            auth.register(bad_email).await.unwrap_err(),
            AppError::Validation(_)
        ));

        let short_password = RegisterRequest {
            name: None,
            email: "a@b.com".into(),
            password: "abc".into(),
        };
        assert!(matches!(
            auth.register(short_password).await.unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let auth = auth();
        auth.register(register_request("a@b.com")).await.unwrap();
        let err = auth.register(register_request("A@B.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_rotates_token() {
        let auth = auth();
        let first = auth.register(register_request("a@b.com")).await.unwrap();

        let second = auth
            .login(LoginRequest {
                email: "a@b.com".into(),
                password: "hunter42".into(),
            })
            .await
            .unwrap();
        assert_ne!(first.token, second.token);

        // the old token is dead, the new one works
        assert!(auth.authenticate(&first.token).await.is_err());
        assert!(auth.authenticate(&second.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let auth = auth();
        auth.register(register_request("a@b.com")).await.unwrap();

        let wrong_password = auth
            .login(LoginRequest {
                email: "a@b.com".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();
        let unknown_email = auth
            .login(LoginRequest {
                email: "nobody@b.com".into(),
                password: "hunter42".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let store = DocStore::new(Arc::new(MemoryBackend::new()));
        let auth = AuthService::new(store.clone(), 24);
        let resp = auth.register(register_request("a@b.com")).await.unwrap();

        // back-date the expiry
        store
            .mutate(|doc| {
                for user in &mut doc.users {
                    user.token_expires_at = Some(0);
                }
            })
            .await;

        let err = auth.authenticate(&resp.token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
