//! Application State - Repositories, settings and the online-user map shared by
//! every route and middleware

use crate::core::Config;
use crate::core::config::{DEFAULT_AVATAR_BASE_URL, DEFAULT_MAX_UPLOAD_BYTES};
use crate::repositories::{
    ChatRepository, MessageRepository, RentalRepository, UserRepository, UserTypeRepository,
};
use crate::ws::usermap::UserMap;
use sqlx::SqlitePool;
use std::path::PathBuf;

pub struct AppState {
    pub pool: SqlitePool,

    /// Mirrored identity provider profiles
    pub user: UserRepository,

    /// Tenant/landlord status
    pub user_type: UserTypeRepository,

    pub chat: ChatRepository,

    pub msg: MessageRepository,

    pub rental: RentalRepository,

    /// Secret shared with the identity provider to verify tokens
    pub jwt_secret: String,

    /// Root of the stored uploads, served under `/uploads`
    pub upload_dir: PathBuf,

    /// Cap for a single uploaded file
    pub max_upload_bytes: usize,

    pub avatar_base_url: String,

    /// WebSocket channels of the connected users
    pub users_online: UserMap,
}

impl AppState {
    /// Creates the state with default upload and avatar settings
    pub fn new(pool: SqlitePool, jwt_secret: String) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            user_type: UserTypeRepository::new(pool.clone()),
            chat: ChatRepository::new(pool.clone()),
            msg: MessageRepository::new(pool.clone()),
            rental: RentalRepository::new(pool.clone()),
            pool,
            jwt_secret,
            upload_dir: PathBuf::from("public/uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            avatar_base_url: DEFAULT_AVATAR_BASE_URL.to_string(),
            users_online: UserMap::new(),
        }
    }

    pub fn from_config(pool: SqlitePool, config: &Config) -> Self {
        Self::new(pool, config.jwt_secret.clone())
            .with_uploads(&config.upload_dir, config.max_upload_bytes)
            .with_avatar_base_url(&config.avatar_base_url)
    }

    pub fn with_uploads(mut self, upload_dir: impl Into<PathBuf>, max_upload_bytes: usize) -> Self {
        self.upload_dir = upload_dir.into();
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn with_avatar_base_url(mut self, avatar_base_url: &str) -> Self {
        self.avatar_base_url = avatar_base_url.to_string();
        self
    }
}
