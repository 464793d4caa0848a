//! Auth services - Caller profile and marketplace status
//!
//! Sign-in happens at the identity provider; these endpoints only read and
//! update what the service keeps about the verified caller.

use crate::core::AppState;
use crate::dtos::{ApiResponse, ApiResult, UserDTO, UserStatusDTO};
use crate::entities::{User, UserStatus};
use axum::{Extension, extract::State};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[instrument(skip(current_user), fields(user_id = %current_user.user_id))]
pub async fn get_current_user(Extension(current_user): Extension<User>) -> ApiResult<UserDTO> {
    Ok(ApiResponse::ok(UserDTO::from(current_user)))
}

/// Status of the caller. Falls back to TENANT when it cannot be read.
#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn get_user_status(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> ApiResult<UserStatusDTO> {
    let status = state
        .user_type
        .status_of(&current_user.user_id)
        .await
        .unwrap_or_else(|e| {
            warn!("User status unavailable, assuming tenant: {:?}", e);
            UserStatus::Tenant
        });

    Ok(ApiResponse::ok(UserStatusDTO { status }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn register_landlord(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> ApiResult<UserStatusDTO> {
    let user_type = state
        .user_type
        .upsert_status(&current_user.user_id, UserStatus::Landlord, &Utc::now())
        .await?;

    info!("User registered as landlord");
    Ok(ApiResponse::ok(UserStatusDTO {
        status: user_type.status,
    }))
}
