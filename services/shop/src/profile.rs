//! Dashboard and profile management for signed-in users

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{UpdateUser, User, UserProfile},
    repositories::{CartRepository, UserRepository},
    storage::{ImageStore, ImageUpload},
    validation::{normalize_email, optional, validate_email},
};

/// Editable profile fields as returned by the profile endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub profile_image: String,
}

impl From<User> for ProfileView {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            address: user.address,
            phone_number: user.phone_number,
            profile_image: user.profile_image,
        }
    }
}

/// Text fields of a profile update form; blank values are ignored
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    carts: Arc<dyn CartRepository>,
    images: ImageStore,
}

impl ProfileService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        carts: Arc<dyn CartRepository>,
        images: ImageStore,
    ) -> Self {
        Self {
            users,
            carts,
            images,
        }
    }

    async fn user(&self, user_id: Uuid) -> ApiResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Full profile including wishlist and cart entries
    pub async fn dashboard(&self, user_id: Uuid) -> ApiResult<UserProfile> {
        let user = self.user(user_id).await?;
        let wishlist = self.carts.wishlist(user_id).await?;
        let cart = self.carts.cart(user_id).await?;
        Ok(UserProfile::new(user, wishlist, cart))
    }

    pub async fn profile(&self, user_id: Uuid) -> ApiResult<ProfileView> {
        Ok(self.user(user_id).await?.into())
    }

    /// Apply the supplied fields and, if given, replace the profile image
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        form: ProfileForm,
        image: Option<ImageUpload>,
        host: Option<&str>,
    ) -> ApiResult<ProfileView> {
        let current = self.user(user_id).await?;

        let email = optional(form.email.as_deref()).map(|e| normalize_email(&e));
        if let Some(email) = &email {
            validate_email(email)?;
        }
        if let Some(image) = &image {
            image.ensure_image()?;
        }

        let mut changes = UpdateUser {
            name: optional(form.name.as_deref()),
            email,
            address: optional(form.address.as_deref()),
            phone_number: optional(form.phone_number.as_deref()),
            profile_image: None,
        };

        if let Some(image) = &image {
            let url = self.images.save(image, host).await.map_err(|e| {
                error!("Failed to store profile image: {}", e);
                ApiError::InternalServerError
            })?;
            changes.profile_image = Some(url);
        }

        if changes.is_empty() {
            return Ok(current.into());
        }

        let updated = match self.users.update(user_id, &changes).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(ApiError::NotFound("User not found".to_string())),
            Err(e) => {
                if let Some(url) = &changes.profile_image {
                    self.images.discard(url).await;
                }
                if e.is_conflict() {
                    return Err(ApiError::Conflict("Email already in use".to_string()));
                }
                return Err(e.into());
            }
        };

        if changes.profile_image.is_some() && !current.profile_image.is_empty() {
            self.images.discard(&current.profile_image).await;
        }

        info!("Updated profile for user {}", user_id);
        Ok(updated.into())
    }
}
