//! Service configuration loaded from `SHOP_*` environment variables

use anyhow::{Context, Result};
use argon2::PasswordHash;
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Runtime settings of the shop service
///
/// # Environment Variables
/// - `SHOP_HOST` / `SHOP_PORT`: listen address (default: 0.0.0.0:5000)
/// - `SHOP_JWT_SECRET`: shared token signing secret (required)
/// - `SHOP_TOKEN_TTL_SECONDS`: session lifetime (default: 86400)
/// - `SHOP_ADMIN_EMAIL`: administrator login (required)
/// - `SHOP_ADMIN_PASSWORD_HASH`: Argon2 PHC hash of the admin password (required)
/// - `SHOP_UPLOAD_DIR`: directory for uploaded images (default: uploads)
/// - `SHOP_PUBLIC_BASE_URL`: base of image URLs; derived from `Host` when unset
/// - `SHOP_MAX_UPLOAD_BYTES`: request body cap (default: 5 MiB)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_seconds: u64,
    pub admin_email: String,
    pub admin_password_hash: String,
    pub upload_dir: PathBuf,
    pub public_base_url: Option<String>,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Load `.env` if present, then read the environment
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::info!("Loaded environment from {}", path.display());
        }

        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("token_ttl_seconds", 86_400)?
            .set_default("upload_dir", "uploads")?
            .set_default("max_upload_bytes", 5 * 1024 * 1024)?
            .add_source(Environment::with_prefix("SHOP"))
            .build()
            .context("Failed to read configuration")?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            anyhow::bail!("SHOP_JWT_SECRET must not be empty");
        }
        if self.admin_email.trim().is_empty() {
            anyhow::bail!("SHOP_ADMIN_EMAIL must not be empty");
        }
        if self.admin_password_hash.trim().is_empty() {
            anyhow::bail!("SHOP_ADMIN_PASSWORD_HASH must not be empty");
        }
        PasswordHash::new(&self.admin_password_hash).map_err(|e| {
            anyhow::anyhow!("SHOP_ADMIN_PASSWORD_HASH is not a valid PHC hash string: {}", e)
        })?;
        Ok(())
    }

    /// Socket address to bind
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
