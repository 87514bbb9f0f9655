//! Repositories for database operations
//!
//! Each storage concern sits behind a trait so handlers can be driven either
//! by PostgreSQL or by the in-memory store used in tests.

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{
    CartItem, CartLine, NewProduct, NewUser, Product, ProductFields, UpdateUser, User,
    WishlistToggle,
};

pub mod cart;
pub mod memory;
pub mod product;
pub mod user;

pub use cart::PgCartRepository;
pub use memory::MemoryStore;
pub use product::PgProductRepository;
pub use user::PgUserRepository;

/// Credential store
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; a taken email yields `DatabaseError::Conflict`
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;

    /// Find a user by normalized email
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    /// Apply a partial update, returning the updated user if it exists
    async fn update(&self, id: Uuid, changes: &UpdateUser) -> DatabaseResult<Option<User>>;
}

/// Wishlist and cart entries owned by a user, keyed by `(user_id, product_id)`
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Wishlisted product IDs in insertion order
    async fn wishlist(&self, user_id: Uuid) -> DatabaseResult<Vec<Uuid>>;

    /// Wishlisted products that still exist, in insertion order
    async fn wishlist_products(&self, user_id: Uuid) -> DatabaseResult<Vec<Product>>;

    /// Remove the product if present, otherwise append it, as one atomic step
    async fn toggle_wishlist(&self, user_id: Uuid, product_id: Uuid)
    -> DatabaseResult<WishlistToggle>;

    /// Cart entries in insertion order
    async fn cart(&self, user_id: Uuid) -> DatabaseResult<Vec<CartItem>>;

    /// Cart entries joined with their products
    async fn cart_lines(&self, user_id: Uuid) -> DatabaseResult<Vec<CartLine>>;

    /// Increment the entry's quantity, creating it with quantity 1 if absent
    ///
    /// Returns `false`, leaving the entry untouched, when the quantity is
    /// already `i32::MAX`.
    async fn add_to_cart(&self, user_id: Uuid, product_id: Uuid) -> DatabaseResult<bool>;

    /// Set the entry's quantity; returns `false` when there is no such entry
    async fn set_cart_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> DatabaseResult<bool>;

    /// Remove every entry for the product, returning how many were removed
    async fn remove_from_cart(&self, user_id: Uuid, product_id: Uuid) -> DatabaseResult<u64>;

    /// Remove every entry of the user's cart
    async fn clear_cart(&self, user_id: Uuid) -> DatabaseResult<()>;
}

/// Product store
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, new_product: &NewProduct) -> DatabaseResult<Product>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Product>>;

    /// All products, most recently created first
    async fn list(&self) -> DatabaseResult<Vec<Product>>;

    /// Overwrite every scalar field and the image reference
    async fn update(
        &self,
        id: Uuid,
        fields: &ProductFields,
        image_url: &str,
    ) -> DatabaseResult<Option<Product>>;

    /// Delete a product; returns `false` when it did not exist
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}
