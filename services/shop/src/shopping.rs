//! Wishlist and cart operations on behalf of a signed-in user

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{CartItem, CartLine, Product, WishlistToggle},
    repositories::{CartRepository, UserRepository},
};

#[derive(Clone)]
pub struct ShoppingService {
    users: Arc<dyn UserRepository>,
    carts: Arc<dyn CartRepository>,
}

impl ShoppingService {
    pub fn new(users: Arc<dyn UserRepository>, carts: Arc<dyn CartRepository>) -> Self {
        Self { users, carts }
    }

    async fn ensure_user(&self, user_id: Uuid) -> ApiResult<()> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound("User not found".to_string())),
        }
    }

    /// Wishlisted products, skipping ones that no longer exist
    pub async fn wishlist(&self, user_id: Uuid) -> ApiResult<Vec<Product>> {
        self.ensure_user(user_id).await?;
        Ok(self.carts.wishlist_products(user_id).await?)
    }

    /// Add the product to the wishlist, or remove it if already there
    pub async fn toggle_wishlist(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> ApiResult<(WishlistToggle, Vec<Uuid>)> {
        self.ensure_user(user_id).await?;
        let outcome = self.carts.toggle_wishlist(user_id, product_id).await?;
        info!("Wishlist toggle for user {}: {:?} {}", user_id, outcome, product_id);
        Ok((outcome, self.carts.wishlist(user_id).await?))
    }

    /// Denormalized cart view
    pub async fn cart(&self, user_id: Uuid) -> ApiResult<Vec<CartLine>> {
        self.ensure_user(user_id).await?;
        Ok(self.carts.cart_lines(user_id).await?)
    }

    pub async fn add_to_cart(&self, user_id: Uuid, product_id: Uuid) -> ApiResult<Vec<CartItem>> {
        self.ensure_user(user_id).await?;
        if !self.carts.add_to_cart(user_id, product_id).await? {
            return Err(ApiError::Validation(
                "Quantity limit reached for this product".to_string(),
            ));
        }
        Ok(self.carts.cart(user_id).await?)
    }

    /// Set the quantity of an existing entry; quantities below one are refused
    pub async fn update_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> ApiResult<Vec<CartItem>> {
        if quantity < 1 {
            return Err(ApiError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }
        self.ensure_user(user_id).await?;

        if !self
            .carts
            .set_cart_quantity(user_id, product_id, quantity)
            .await?
        {
            return Err(ApiError::NotFound("Product not in cart".to_string()));
        }
        Ok(self.carts.cart(user_id).await?)
    }

    /// Remove the product from the cart; absent products are not an error
    pub async fn remove_from_cart(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> ApiResult<Vec<CartItem>> {
        self.ensure_user(user_id).await?;
        let removed = self.carts.remove_from_cart(user_id, product_id).await?;
        info!(
            "Removed {} cart entries of {} for user {}",
            removed, product_id, user_id
        );
        Ok(self.carts.cart(user_id).await?)
    }

    pub async fn clear_cart(&self, user_id: Uuid) -> ApiResult<Vec<CartItem>> {
        self.ensure_user(user_id).await?;
        self.carts.clear_cart(user_id).await?;
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::NewUser, repositories::MemoryStore};

    async fn setup() -> (ShoppingService, Uuid) {
        let store = MemoryStore::new();
        let user = store
            .create(&NewUser {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let service = ShoppingService::new(Arc::new(store.clone()), Arc::new(store));
        (service, user.id)
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_wishlist() {
        let (service, user_id) = setup().await;
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();

        service.toggle_wishlist(user_id, p1).await.unwrap();
        let (outcome, wishlist) = service.toggle_wishlist(user_id, p2).await.unwrap();
        assert_eq!(outcome, WishlistToggle::Added);
        assert_eq!(wishlist, vec![p1, p2]);

        let (outcome, wishlist) = service.toggle_wishlist(user_id, p1).await.unwrap();
        assert_eq!(outcome, WishlistToggle::Removed);
        assert_eq!(wishlist, vec![p2]);
    }

    #[tokio::test]
    async fn test_add_twice_increments_quantity() {
        let (service, user_id) = setup().await;
        let p1 = Uuid::new_v4();

        service.add_to_cart(user_id, p1).await.unwrap();
        let cart = service.add_to_cart(user_id, p1).await.unwrap();
        assert_eq!(
            cart,
            vec![CartItem {
                product: p1,
                quantity: 2
            }]
        );
    }

    #[tokio::test]
    async fn test_update_quantity() {
        let (service, user_id) = setup().await;
        let p1 = Uuid::new_v4();

        let err = service.update_quantity(user_id, p1, 3).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "Product not in cart"));

        service.add_to_cart(user_id, p1).await.unwrap();
        let cart = service.update_quantity(user_id, p1, 5).await.unwrap();
        assert_eq!(cart[0].quantity, 5);

        for quantity in [0, -1] {
            let err = service
                .update_quantity(user_id, p1, quantity)
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_add_at_max_quantity_is_refused() {
        let (service, user_id) = setup().await;
        let p1 = Uuid::new_v4();

        service.add_to_cart(user_id, p1).await.unwrap();
        service.update_quantity(user_id, p1, i32::MAX).await.unwrap();

        let err = service.add_to_cart(user_id, p1).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(service.cart(user_id).await.unwrap()[0].quantity, i32::MAX);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let (service, user_id) = setup().await;
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();

        service.add_to_cart(user_id, p1).await.unwrap();
        service.add_to_cart(user_id, p2).await.unwrap();

        let cart = service.remove_from_cart(user_id, Uuid::new_v4()).await.unwrap();
        assert_eq!(cart.len(), 2);

        let cart = service.remove_from_cart(user_id, p1).await.unwrap();
        assert_eq!(cart.iter().map(|i| i.product).collect::<Vec<_>>(), vec![p2]);

        assert!(service.clear_cart(user_id).await.unwrap().is_empty());
        assert!(service.cart(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (service, _) = setup().await;
        let stranger = Uuid::new_v4();

        let err = service.add_to_cart(stranger, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "User not found"));
        let err = service
            .toggle_wishlist(stranger, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
