//! Shop service models

pub mod cart;
pub mod product;
pub mod user;

// Re-export for convenience
pub use cart::{CartItem, CartLine, WishlistToggle};
pub use product::{Category, NewProduct, Product, ProductFields};
pub use user::{NewUser, PublicUser, UpdateUser, User, UserProfile};
