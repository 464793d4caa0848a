//! User services - Public profiles and avatars

use crate::core::{AppState, optional_claims};
use crate::dtos::{ApiResponse, ApiResult, UserDTO};
use crate::entities::{User, user::FALLBACK_DISPLAY_NAME};
use crate::repositories::Read;
use axum::{
    Extension,
    extract::{Path, State},
    http::HeaderMap,
    response::Redirect,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Profile of any user. Unknown users get a generic profile instead of a 404.
#[instrument(skip(state, current_user), fields(user_id = %user_id))]
pub async fn get_user_by_id(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<String>,
) -> ApiResult<UserDTO> {
    if user_id == current_user.user_id {
        return Ok(ApiResponse::ok(UserDTO::from(current_user)));
    }

    let profile = match state.user.read(&user_id).await? {
        Some(user) => UserDTO::from(user),
        None => {
            debug!("Unknown user, returning fallback profile");
            UserDTO::fallback(&user_id)
        }
    };

    Ok(ApiResponse::ok(profile))
}

/// Redirects to a generated avatar seeded with the user id, or with a generic
/// seed for anonymous callers
#[instrument(skip(state, headers), fields(user_id = %user_id))]
pub async fn get_user_avatar(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Redirect {
    let seed = match optional_claims(&headers, &state.jwt_secret) {
        Some(_) => user_id.as_str(),
        None => FALLBACK_DISPLAY_NAME,
    };
    Redirect::temporary(&format!("{}?seed={}", state.avatar_base_url, seed))
}
