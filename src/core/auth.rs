use crate::core::{AppError, AppState};
use crate::dtos::UpsertUserDTO;
use crate::entities::User;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Claims of a token issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
}

impl Claims {
    /// Claims valid for 24 hours from now
    pub fn new(sub: impl Into<String>, name: Option<String>, email: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            name,
            email,
            picture: None,
            exp: (now + Duration::hours(24)).timestamp() as usize,
            iat: now.timestamp() as usize,
        }
    }
}

#[instrument(skip(claims, secret), fields(sub = %claims.sub))]
pub fn encode_jwt(claims: &Claims, secret: &str) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        AppError::internal_server_error("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, AppError> {
    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| {
        debug!("JWT token decoded for subject {}", data.claims.sub);
        data
    })
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        AppError::unauthorized("Invalid or expired token")
    })
}

/// Extracts the token of an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Please add the JWT token to the header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid authorization header"))?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AppError::unauthorized("Invalid authorization header")),
    }
}

/// Claims of the caller when a valid token is present, for public routes that
/// adapt to a signed-in caller
pub fn optional_claims(headers: &HeaderMap, secret: &str) -> Option<Claims> {
    let token = bearer_token(headers).ok()?;
    decode_jwt(token, secret).ok().map(|data| data.claims)
}

/// Verifies the bearer token, mirrors the caller's profile and stores the
/// resulting `User` in the request extensions
#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = bearer_token(req.headers()).inspect_err(|_| {
        warn!("Missing or malformed authorization header");
    })?;
    let claims = decode_jwt(token, &state.jwt_secret)?.claims;

    let current_user: User = state
        .user
        .upsert(&UpsertUserDTO {
            user_id: claims.sub,
            display_name: claims.name,
            primary_email: claims.email,
            profile_image_url: claims.picture,
            updated_at: crate::core::time::now(),
        })
        .await?;

    info!("User authenticated: {}", current_user.user_id);
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Checks that the current user takes part in the chat named by the first
/// numeric path segment and stores the `Chat` in the request extensions
#[instrument(skip(state, req, next))]
pub async fn chat_participant_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    let current_user = req
        .extensions()
        .get::<User>()
        .ok_or_else(|| {
            warn!("User not found in request extensions");
            AppError::unauthorized("User not authenticated")
        })?
        .clone();

    let chat_id: i32 = req
        .uri()
        .path()
        .split('/')
        .find_map(|segment| segment.parse::<i32>().ok())
        .ok_or_else(|| {
            warn!("Chat ID not found in path: {}", req.uri().path());
            AppError::bad_request("Chat ID not found in path")
        })?;

    let chat = crate::conversation::authorize(&state, chat_id, &current_user.user_id).await?;

    req.extensions_mut().insert(chat);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "unit-test-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn token_round_trips_with_profile_claims() {
        let claims = Claims::new("user_abc", Some("Maria".into()), Some("maria@mail.ph".into()));
        let token = encode_jwt(&claims, SECRET).unwrap();

        let decoded = decode_jwt(&token, SECRET).unwrap().claims;
        assert_eq!(decoded.sub, "user_abc");
        assert_eq!(decoded.name.as_deref(), Some("Maria"));
        assert_eq!(decoded.picture, None);
    }

    #[test]
    fn token_signed_with_another_secret_is_unauthorized() {
        let token = encode_jwt(&Claims::new("user_abc", None, None), "other").unwrap();
        let err = decode_jwt(&token, SECRET).unwrap_err();
        assert_eq!(err.status(), http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn bearer_token_requires_the_bearer_scheme() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(&headers_with("bearer abc")).unwrap(), "abc");
        assert!(bearer_token(&headers_with("Basic abc")).is_err());
        assert!(bearer_token(&headers_with("Bearer")).is_err());
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn optional_claims_ignores_bad_tokens() {
        assert!(optional_claims(&headers_with("Bearer garbage"), SECRET).is_none());

        let token = encode_jwt(&Claims::new("user_abc", None, None), SECRET).unwrap();
        let claims = optional_claims(&headers_with(&format!("Bearer {token}")), SECRET);
        assert_eq!(claims.map(|c| c.sub), Some("user_abc".to_string()));
    }
}
