//! In-memory store implementing every repository trait
//!
//! Backs the test suite and local experiments that have no PostgreSQL at
//! hand. All state sits behind one lock, so each trait method is atomic just
//! like its single-statement SQL counterpart.

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CartRepository, ProductRepository, UserRepository};
use crate::models::{
    CartItem, CartLine, NewProduct, NewUser, Product, ProductFields, UpdateUser, User,
    WishlistToggle,
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    /// Products in creation order
    products: Vec<Product>,
    wishlists: HashMap<Uuid, Vec<Uuid>>,
    carts: HashMap<Uuid, Vec<CartItem>>,
}

impl MemoryState {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut state = self.state.lock().await;
        if state.email_taken(&new_user.email, None) {
            return Err(DatabaseError::Conflict("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            address: String::new(),
            phone_number: String::new(),
            profile_image: String::new(),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, changes: &UpdateUser) -> DatabaseResult<Option<User>> {
        let mut state = self.state.lock().await;
        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(DatabaseError::Conflict("users_email_key".to_string()));
            }
        }

        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(address) = &changes.address {
            user.address = address.clone();
        }
        if let Some(phone_number) = &changes.phone_number {
            user.phone_number = phone_number.clone();
        }
        if let Some(profile_image) = &changes.profile_image {
            user.profile_image = profile_image.clone();
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn wishlist(&self, user_id: Uuid) -> DatabaseResult<Vec<Uuid>> {
        let state = self.state.lock().await;
        Ok(state.wishlists.get(&user_id).cloned().unwrap_or_default())
    }

    async fn wishlist_products(&self, user_id: Uuid) -> DatabaseResult<Vec<Product>> {
        let state = self.state.lock().await;
        let ids = state.wishlists.get(&user_id).map(Vec::as_slice).unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| state.product(*id).cloned())
            .collect())
    }

    async fn toggle_wishlist(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> DatabaseResult<WishlistToggle> {
        let mut state = self.state.lock().await;
        let wishlist = state.wishlists.entry(user_id).or_default();
        match wishlist.iter().position(|id| *id == product_id) {
            Some(index) => {
                wishlist.remove(index);
                Ok(WishlistToggle::Removed)
            }
            None => {
                wishlist.push(product_id);
                Ok(WishlistToggle::Added)
            }
        }
    }

    async fn cart(&self, user_id: Uuid) -> DatabaseResult<Vec<CartItem>> {
        let state = self.state.lock().await;
        Ok(state.carts.get(&user_id).cloned().unwrap_or_default())
    }

    async fn cart_lines(&self, user_id: Uuid) -> DatabaseResult<Vec<CartLine>> {
        let state = self.state.lock().await;
        let items = state.carts.get(&user_id).map(Vec::as_slice).unwrap_or_default();
        Ok(items
            .iter()
            .map(|item| {
                let product = state.product(item.product);
                CartLine {
                    id: item.product,
                    name: product.map(|p| p.name.clone()),
                    image: product.map(|p| p.image_url.clone()),
                    price: product.map(|p| p.price).unwrap_or(0.0),
                    quantity: item.quantity,
                }
            })
            .collect())
    }

    async fn add_to_cart(&self, user_id: Uuid, product_id: Uuid) -> DatabaseResult<bool> {
        let mut state = self.state.lock().await;
        let cart = state.carts.entry(user_id).or_default();
        match cart.iter().position(|item| item.product == product_id) {
            Some(index) => match cart[index].quantity.checked_add(1) {
                Some(quantity) => cart[index].quantity = quantity,
                None => return Ok(false),
            },
            None => cart.push(CartItem {
                product: product_id,
                quantity: 1,
            }),
        }
        Ok(true)
    }

    async fn set_cart_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> DatabaseResult<bool> {
        let mut state = self.state.lock().await;
        let entry = state
            .carts
            .get_mut(&user_id)
            .and_then(|cart| cart.iter_mut().find(|item| item.product == product_id));
        match entry {
            Some(item) => {
                item.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_from_cart(&self, user_id: Uuid, product_id: Uuid) -> DatabaseResult<u64> {
        let mut state = self.state.lock().await;
        let Some(cart) = state.carts.get_mut(&user_id) else {
            return Ok(0);
        };
        let before = cart.len();
        cart.retain(|item| item.product != product_id);
        Ok((before - cart.len()) as u64)
    }

    async fn clear_cart(&self, user_id: Uuid) -> DatabaseResult<()> {
        self.state.lock().await.carts.remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create(&self, new_product: &NewProduct) -> DatabaseResult<Product> {
        let now = Utc::now();
        let fields = new_product.fields.clone();
        let product = Product {
            id: Uuid::new_v4(),
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            sizes: fields.sizes,
            image_url: new_product.image_url.clone(),
            created_by: new_product.created_by,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.products.push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Product>> {
        Ok(self.state.lock().await.product(id).cloned())
    }

    async fn list(&self) -> DatabaseResult<Vec<Product>> {
        let state = self.state.lock().await;
        // Reverse insertion order keeps same-instant creations newest first
        Ok(state.products.iter().rev().cloned().collect())
    }

    async fn update(
        &self,
        id: Uuid,
        fields: &ProductFields,
        image_url: &str,
    ) -> DatabaseResult<Option<Product>> {
        let mut state = self.state.lock().await;
        let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.name = fields.name.clone();
        product.description = fields.description.clone();
        product.price = fields.price;
        product.category = fields.category;
        product.sizes = fields.sizes.clone();
        product.image_url = image_url.to_string();
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        Ok(state.products.len() < before)
    }
}
