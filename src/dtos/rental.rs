//! Rental DTOs - Data Transfer Objects for listings

use crate::entities::Rental;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RentalDTO {
    pub rental_id: i32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub address: String,
    pub size: i64,
    pub bedroom: i64,
    pub bathroom: i64,
    pub price: f64,
    pub image_urls: Vec<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Rental> for RentalDTO {
    fn from(value: Rental) -> Self {
        Self {
            slug: value.slug(),
            rental_id: value.rental_id,
            name: value.name,
            description: value.description,
            category: value.category,
            address: value.address,
            size: value.size,
            bedroom: value.bedroom,
            bathroom: value.bathroom,
            price: value.price,
            image_urls: value.image_urls,
            owner_id: value.owner_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Listing fields submitted by the create and edit forms
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct RentalFieldsDTO {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,

    #[validate(range(min = 0))]
    pub size: i64,

    #[validate(range(min = 0))]
    pub bedroom: i64,

    #[validate(range(min = 0))]
    pub bathroom: i64,

    #[validate(range(min = 0.0))]
    pub price: f64,
}

/// DTO to create a rental (without rental_id)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateRentalDTO {
    pub fields: RentalFieldsDTO,
    pub image_urls: Vec<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// DTO to update a rental; `image_urls: None` keeps the stored images
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateRentalDTO {
    pub fields: RentalFieldsDTO,
    pub image_urls: Option<Vec<String>>,
    pub updated_at: DateTime<Utc>,
}
