#![allow(dead_code)]

use axum_test::TestServer;
use quickrent::core::{AppState, Claims, db, encode_jwt};
use quickrent::dtos::{CreateRentalDTO, RentalFieldsDTO};
use quickrent::entities::{Chat, Rental};
use quickrent::repositories::Create;
use sqlx::SqlitePool;
use std::sync::Arc;

pub const JWT_SECRET: &str = "quickrent-integration-test-secret";

pub const TENANT: &str = "user_tenant";
pub const LANDLORD: &str = "user_landlord";
pub const STRANGER: &str = "user_stranger";

/// Fresh in-memory database with the schema applied
pub async fn create_test_pool() -> SqlitePool {
    let pool = db::connect_pool("sqlite::memory:", 1, 0)
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, JWT_SECRET.to_string()))
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = quickrent::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// State and server over a fresh database
pub async fn setup() -> (Arc<AppState>, TestServer) {
    let state = create_test_state(create_test_pool().await);
    let server = create_test_server(state.clone());
    (state, server)
}

/// Token as the identity provider would issue it, valid for 24 hours
pub fn create_test_jwt(user_id: &str, name: Option<&str>, email: Option<&str>) -> String {
    let claims = Claims::new(user_id, name.map(str::to_string), email.map(str::to_string));
    encode_jwt(&claims, JWT_SECRET).expect("Failed to create JWT token")
}

/// `Authorization` header value for `user_id`
pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}", create_test_jwt(user_id, None, None))
}

pub async fn seed_rental(state: &AppState, owner_id: &str, name: &str) -> Rental {
    state
        .rental
        .create(&CreateRentalDTO {
            fields: RentalFieldsDTO {
                name: name.to_string(),
                description: Some("Near the MRT station".to_string()),
                category: "Condo".to_string(),
                address: "Makati City".to_string(),
                size: 28,
                bedroom: 1,
                bathroom: 1,
                price: 18000.0,
            },
            image_urls: vec![],
            owner_id: owner_id.to_string(),
            created_at: quickrent::core::time::now(),
        })
        .await
        .expect("Failed to seed rental")
}

/// Rental owned by LANDLORD and the chat TENANT opened about it
pub async fn seed_chat(state: &AppState) -> (Rental, Chat) {
    let rental = seed_rental(state, LANDLORD, "Studio Unit in Makati").await;
    let chat = quickrent::conversation::enquire(state, rental.rental_id, TENANT)
        .await
        .expect("Failed to seed chat");
    (rental, chat)
}
