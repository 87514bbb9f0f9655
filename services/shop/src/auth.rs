//! Authentication service: registration, login and the administrator login

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    jwt::JwtService,
    models::{NewUser, PublicUser},
    password::{hash_password, verify_password},
    repositories::{CartRepository, UserRepository},
    validation::{normalize_email, required, validate_email},
};

/// The single administrator identity, supplied by configuration
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    /// Argon2 PHC hash of the administrator password
    pub password_hash: String,
}

/// Synthetic profile returned by the administrator login
#[derive(Debug, Clone, Serialize)]
pub struct AdminProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub email: String,
    pub role: &'static str,
}

/// Successful user login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Successful administrator login
#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin: AdminProfile,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    carts: Arc<dyn CartRepository>,
    jwt: JwtService,
    admin: AdminCredentials,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        carts: Arc<dyn CartRepository>,
        jwt: JwtService,
        admin: AdminCredentials,
    ) -> Self {
        Self {
            users,
            carts,
            jwt,
            admin,
        }
    }

    /// Shared token service, also used by the session middleware
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Create an account; does not open a session
    pub async fn register(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> ApiResult<()> {
        const MISSING: &str = "All fields are required";
        let name = required(name, MISSING)?;
        let email = normalize_email(&required(email, MISSING)?);
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::Validation(MISSING.to_string()))?;

        info!("Register request for: {}", email);
        validate_email(&email)?;

        if self.users.find_by_email(&email).await?.is_some() {
            warn!("Registration rejected, email already in use: {}", email);
            return Err(ApiError::Conflict("User already exists".to_string()));
        }

        let new_user = NewUser {
            name,
            email,
            password_hash: hash_password(password)?,
        };

        // The unique index still catches a concurrent registration
        let user = self.users.create(&new_user).await.map_err(|e| {
            if e.is_conflict() {
                ApiError::Conflict("User already exists".to_string())
            } else {
                ApiError::Database(e)
            }
        })?;

        info!("Registered user: {}", user.email);
        Ok(())
    }

    /// Verify credentials and issue a user session
    pub async fn login(&self, email: Option<&str>, password: Option<&str>) -> ApiResult<LoginResponse> {
        const MISSING: &str = "Email and password required";
        let email = normalize_email(&required(email, MISSING)?);
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::Validation(MISSING.to_string()))?;

        info!("Login attempt for: {}", email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("Login failed for: {}", email);
            return Err(ApiError::InvalidCredentials);
        };

        if !verify_password(&user.password_hash, password)? {
            warn!("Login failed for: {}", email);
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.jwt.issue_user_token(user.id).map_err(|e| {
            error!("Failed to generate session token: {}", e);
            ApiError::InternalServerError
        })?;
        let wishlist = self.carts.wishlist(user.id).await?;

        info!("Login success for: {}", email);
        Ok(LoginResponse {
            token,
            user: PublicUser {
                id: user.id,
                name: user.name,
                email: user.email,
                wishlist,
            },
        })
    }

    /// Check the configured administrator credentials and issue an admin session
    pub async fn login_admin(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> ApiResult<AdminLoginResponse> {
        let email = normalize_email(email.unwrap_or_default());
        let password = password.unwrap_or_default();

        info!("Admin login attempt for: {}", email);

        // Verify even on an email mismatch so both failures cost the same
        let password_ok = verify_password(&self.admin.password_hash, password)?;
        if email != normalize_email(&self.admin.email) || !password_ok {
            warn!("Admin login failed for: {}", email);
            return Err(ApiError::Unauthorized);
        }

        let token = self.jwt.issue_admin_token().map_err(|e| {
            error!("Failed to generate admin token: {}", e);
            ApiError::InternalServerError
        })?;

        info!("Admin login success");
        Ok(AdminLoginResponse {
            token,
            admin: AdminProfile {
                id: "admin",
                name: "Administrator",
                email: self.admin.email.clone(),
                role: "admin",
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{jwt::Session, repositories::MemoryStore};

    fn service() -> (AuthService, MemoryStore) {
        let store = MemoryStore::new();
        let admin = AdminCredentials {
            email: "admin@shop.test".to_string(),
            password_hash: hash_password("admin-pass").unwrap(),
        };
        let auth = AuthService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            JwtService::new("test-secret", 86_400).unwrap(),
            admin,
        );
        (auth, store)
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let (auth, store) = service();

        auth.register(Some("A"), Some("a@x.com"), Some("secret123"))
            .await
            .unwrap();
        let err = auth
            .register(Some("A"), Some(" A@X.com "), Some("secret123"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let stored = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret123");
    }

    #[tokio::test]
    async fn test_register_requires_every_field() {
        let (auth, _) = service();

        for (name, email, password) in [
            (None, Some("a@x.com"), Some("pw")),
            (Some("A"), None, Some("pw")),
            (Some("A"), Some("a@x.com"), None),
            (Some(" "), Some("a@x.com"), Some("pw")),
        ] {
            let err = auth.register(name, email, password).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let (auth, store) = service();
        auth.register(Some("A"), Some("a@x.com"), Some("secret123"))
            .await
            .unwrap();
        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();

        let response = auth
            .login(Some("A@x.com"), Some("secret123"))
            .await
            .unwrap();
        assert_eq!(response.user.id, user.id);
        assert_eq!(response.user.email, "a@x.com");
        assert_eq!(
            auth.jwt().validate_token(&response.token).unwrap(),
            Session::User(user.id)
        );
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let (auth, _) = service();
        auth.register(Some("A"), Some("a@x.com"), Some("secret123"))
            .await
            .unwrap();

        let wrong_password = auth.login(Some("a@x.com"), Some("nope")).await.unwrap_err();
        let unknown_email = auth
            .login(Some("b@x.com"), Some("secret123"))
            .await
            .unwrap_err();
        assert!(matches!(wrong_password, ApiError::InvalidCredentials));
        assert!(matches!(unknown_email, ApiError::InvalidCredentials));

        let missing = auth.login(Some("a@x.com"), None).await.unwrap_err();
        assert!(matches!(missing, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_admin_login() {
        let (auth, _) = service();

        let response = auth
            .login_admin(Some("admin@shop.test"), Some("admin-pass"))
            .await
            .unwrap();
        assert_eq!(response.admin.role, "admin");
        assert_eq!(
            auth.jwt().validate_token(&response.token).unwrap(),
            Session::Admin
        );

        for (email, password) in [
            (Some("admin@shop.test"), Some("wrong")),
            (Some("other@shop.test"), Some("admin-pass")),
            (None, None),
        ] {
            let err = auth.login_admin(email, password).await.unwrap_err();
            assert!(matches!(err, ApiError::Unauthorized));
        }
    }
}
