//! Configuration - Server settings loaded from the environment

use dotenv::dotenv;
use std::env;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "quickrent-development-secret";

/// Default cap for a single uploaded file (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/initials/svg";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub connection_lifetime_secs: u64,
    pub app_env: String,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub avatar_base_url: String,
}

impl Config {
    /// Loads the configuration from environment variables.
    /// Calls dotenv() first so a local `.env` file is honoured.
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in .env file".to_string())?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default (not secure for production!)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "16".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let connection_lifetime_secs = env::var("DB_CONNECTION_LIFETIME_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse::<u64>()
            .map_err(|_| {
                "Invalid DB_CONNECTION_LIFETIME_SECS: must be a positive number".to_string()
            })?;

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "public/uploads".to_string());

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|_| "Invalid MAX_UPLOAD_BYTES: must be a positive number".to_string())?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let avatar_base_url =
            env::var("AVATAR_BASE_URL").unwrap_or_else(|_| DEFAULT_AVATAR_BASE_URL.to_string());

        Ok(Config {
            database_url,
            jwt_secret,
            server_host,
            server_port,
            max_connections,
            connection_lifetime_secs,
            app_env,
            upload_dir,
            max_upload_bytes,
            avatar_base_url,
        })
    }

    /// Logs the configuration, hiding secrets
    pub fn print_info(&self) {
        info!("Server configuration:");
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}:{}", self.server_host, self.server_port);
        info!("   Database: {}", Self::mask_url(&self.database_url));
        info!("   Max DB Connections: {}", self.max_connections);
        info!("   Connection Lifetime: {}s", self.connection_lifetime_secs);
        info!("   Upload Dir: {} (max {} bytes)", self.upload_dir, self.max_upload_bytes);
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("   JWT Secret: USING DEFAULT (INSECURE!)");
        } else {
            info!("   JWT Secret: custom secret configured");
        }
    }

    /// Masks credentials in the database URL for logging
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        if url.starts_with("sqlite:") {
            return url.to_string();
        }
        "***".to_string()
    }
}
