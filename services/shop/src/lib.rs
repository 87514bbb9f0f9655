//! Shop service: accounts, wishlist, cart and product catalog over HTTP
//!
//! The binary in `main.rs` wires PostgreSQL repositories into [`state::AppState`];
//! tests build the same router over [`repositories::MemoryStore`].

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod profile;
pub mod repositories;
pub mod routes;
pub mod shopping;
pub mod state;
pub mod storage;
pub mod validation;

pub use routes::create_router;
pub use state::{AppState, Repositories};
