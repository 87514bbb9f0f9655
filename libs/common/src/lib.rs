//! Common library for the shop workspace
//!
//! This crate provides shared functionality used by the services in the
//! workspace: database connectivity, migrations and the storage error
//! taxonomy.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     assert!(is_healthy);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
