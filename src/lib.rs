//! QuickRent PH server library - exposes the modules for the binary and the tests

pub mod conversation;
pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod ws;

// Re-exports of the main types
pub use core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, get, post, put},
};
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Room left for multipart boundaries and text fields on top of file bytes
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Images accepted by one rental form
const MAX_RENTAL_IMAGES: usize = 10;

/// Builds the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    use core::authentication_middleware;
    use services::upload_file;
    use ws::ws_handler;

    let upload_limit = state.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes(state.clone()))
        .nest("/landlord", configure_landlord_routes(state.clone()))
        .nest("/rentals", configure_rental_routes(state.clone()))
        .nest("/users", configure_user_routes(state.clone()))
        .nest("/chats", configure_chat_routes(state.clone()))
        .route(
            "/upload",
            post(upload_file)
                .layer(DefaultBodyLimit::max(upload_limit))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    authentication_middleware,
                )),
        )
        .route(
            "/ws",
            any(ws_handler).layer(middleware::from_fn_with_state(
                state.clone(),
                authentication_middleware,
            )),
        )
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        .with_state(state)
}

/// Profile and status of the caller
fn configure_auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/user", get(get_current_user))
        .route("/status", get(get_user_status))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Landlord dashboard
fn configure_landlord_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/register", post(register_landlord))
        .route("/listings", get(landlord_listings))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Listings: reads are public, writes need an authenticated caller
fn configure_rental_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;
    use services::*;

    let auth = || middleware::from_fn_with_state(state.clone(), authentication_middleware);
    let form_limit = state.max_upload_bytes * MAX_RENTAL_IMAGES + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route(
            "/",
            get(list_rentals).merge(post(create_rental).route_layer(auth())),
        )
        .route(
            "/{rental_id}",
            get(get_rental).merge(
                put(update_rental)
                    .delete(delete_rental)
                    .route_layer(auth()),
            ),
        )
        .layer(DefaultBodyLimit::max(form_limit))
}

/// Profiles need an authenticated caller; avatars are public
fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;
    use services::*;

    Router::new()
        .route(
            "/{user_id}",
            get(get_user_by_id).route_layer(middleware::from_fn_with_state(
                state,
                authentication_middleware,
            )),
        )
        .route("/{user_id}/avatar", get(get_user_avatar))
}

/// Chat routes
fn configure_chat_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::{authentication_middleware, chat_participant_middleware};
    use services::*;

    // Routes that only need authentication
    let user_routes = Router::new()
        .route("/", get(list_chats))
        .route("/enquire", post(enquire))
        .route("/unread-count", get(unread_count))
        .route("/mark-read", post(mark_read))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ));

    // Routes on one chat (authentication + participant check)
    let participant_routes = Router::new()
        .route("/{chat_id}", get(get_chat).delete(delete_chat))
        .route(
            "/{chat_id}/messages",
            get(get_chat_messages).post(send_message),
        )
        .route("/{chat_id}/read", post(mark_chat_read))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            chat_participant_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    user_routes.merge(participant_routes)
}
