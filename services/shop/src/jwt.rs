//! JWT service for session token generation and validation
//!
//! Tokens are HS256-signed with a process-wide shared secret and carry either
//! a user identity or the fixed administrator role. They are stateless: there
//! is no revocation, a token stays valid until it expires.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Role claim carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID; absent for the administrator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<Uuid>,
    /// Session role
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Identity attached to a request once its token has been verified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    User(Uuid),
    Admin,
}

impl Session {
    /// The user ID, for sessions that have one
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Session::User(id) => Some(*id),
            Session::Admin => None,
        }
    }
}

impl TryFrom<Claims> for Session {
    type Error = anyhow::Error;

    fn try_from(claims: Claims) -> Result<Self> {
        match (claims.role, claims.sub) {
            (Role::User, Some(id)) => Ok(Session::User(id)),
            (Role::User, None) => Err(anyhow::anyhow!("User token without subject")),
            (Role::Admin, _) => Ok(Session::Admin),
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    ///
    /// An empty secret is refused: signing with it would make every token
    /// forgeable.
    pub fn new(secret: &str, token_ttl: u64) -> Result<Self> {
        if secret.trim().is_empty() {
            anyhow::bail!("JWT signing secret must not be empty");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Ok(JwtService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_ttl,
        })
    }

    /// Generate a session token for a user
    pub fn issue_user_token(&self, user_id: Uuid) -> Result<String> {
        self.issue(Some(user_id), Role::User, now()?)
    }

    /// Generate a session token carrying the administrator role
    pub fn issue_admin_token(&self) -> Result<String> {
        self.issue(None, Role::Admin, now()?)
    }

    fn issue(&self, sub: Option<Uuid>, role: Role, issued_at: u64) -> Result<String> {
        let claims = Claims {
            sub,
            role,
            iat: issued_at,
            exp: issued_at + self.token_ttl,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;
        Ok(token)
    }

    /// Validate a token's signature and expiry and return its session
    pub fn validate_token(&self, token: &str) -> Result<Session> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Session::try_from(token_data.claims)
    }
}

fn now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
        .as_secs())
}
