//! Core Module - Infrastructure components of the application
//!
//! - Authentication and JWT verification
//! - Configuration
//! - Database pool and migrations
//! - Error handling
//! - Application state

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod time;

// Re-exports to ease imports
pub use auth::{
    Claims, authentication_middleware, chat_participant_middleware, decode_jwt, encode_jwt,
    optional_claims,
};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
