//! Cart and wishlist models

use serde::Serialize;
use uuid::Uuid;

/// One cart entry as stored for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartItem {
    pub product: Uuid,
    pub quantity: i32,
}

/// Cart entry with the referenced product's fields inlined
///
/// Product fields fall back to `null`/`0` once the product has been deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub id: Uuid,
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: f64,
    pub quantity: i32,
}

/// Which branch a wishlist toggle took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistToggle {
    Added,
    Removed,
}

impl WishlistToggle {
    pub fn message(&self) -> &'static str {
        match self {
            WishlistToggle::Added => "Product added to wishlist",
            WishlistToggle::Removed => "Product removed from wishlist",
        }
    }
}
