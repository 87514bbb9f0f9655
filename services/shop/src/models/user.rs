//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::CartItem;

/// User entity
///
/// Deliberately not `Serialize`: the password hash must never reach a
/// response body. Use [`PublicUser`] or [`UserProfile`] instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub address: String,
    pub phone_number: String,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    /// Already trimmed and lower-cased
    pub email: String,
    pub password_hash: String,
}

/// Partial profile update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        *self == UpdateUser::default()
    }
}

/// User projection returned by login
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub wishlist: Vec<Uuid>,
}

/// Full profile returned by the dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub profile_image: String,
    pub wishlist: Vec<Uuid>,
    pub cart: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user: User, wishlist: Vec<Uuid>, cart: Vec<CartItem>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            address: user.address,
            phone_number: user.phone_number,
            profile_image: user.profile_image,
            wishlist,
            cart,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_never_serializes_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            address: String::new(),
            phone_number: String::new(),
            profile_image: String::new(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserProfile::new(user, vec![], vec![])).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["phoneNumber"], "");
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_update_user_is_empty() {
        assert!(UpdateUser::default().is_empty());
        let changes = UpdateUser {
            address: Some("1 Main St".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
