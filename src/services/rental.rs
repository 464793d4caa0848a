//! Rental services - Listing catalogue and landlord dashboard

use super::upload::{PUBLIC_UPLOAD_PREFIX, read_limited, store_upload};
use crate::core::{AppError, AppState};
use crate::dtos::{
    ApiResponse, ApiResult, CreateRentalDTO, RentalDTO, RentalFieldsDTO, UpdateRentalDTO,
};
use crate::entities::{Rental, User};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Multipart, Path, State},
};
use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Create/edit form: listing fields plus the uploaded images
#[derive(Debug, Default)]
struct RentalForm {
    fields: RentalFieldsDTO,
    images: Vec<(String, Vec<u8>)>,
}

fn parse_number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, AppError> {
    raw.trim().parse::<T>().map_err(|_| {
        AppError::bad_request("Invalid number").with_details(format!("Field '{field}' must be a number"))
    })
}

/// Reads the multipart form. Empty file parts are ignored.
async fn read_form(mut multipart: Multipart, max_upload_bytes: usize) -> Result<RentalForm, AppError> {
    let mut form = RentalForm::default();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "images" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = read_limited(&mut field, max_upload_bytes).await?;
            if !bytes.is_empty() {
                form.images.push((file_name, bytes));
            }
            continue;
        }

        let value = field.text().await?;
        let f = &mut form.fields;
        match name.as_str() {
            "name" => f.name = value,
            "description" => f.description = Some(value).filter(|d| !d.trim().is_empty()),
            "category" => f.category = value,
            "address" => f.address = value,
            "size" => f.size = parse_number("size", &value)?,
            "bedroom" => f.bedroom = parse_number("bedroom", &value)?,
            "bathroom" => f.bathroom = parse_number("bathroom", &value)?,
            "price" => f.price = parse_number("price", &value)?,
            other => debug!("Ignoring form field {}", other),
        }
    }

    form.fields.validate()?;
    Ok(form)
}

/// Stores the form images and returns their public urls, in form order
async fn store_images(state: &AppState, images: &[(String, Vec<u8>)]) -> Result<Vec<String>, AppError> {
    let mut urls = Vec::with_capacity(images.len());
    for (name, bytes) in images {
        let stored = store_upload(&state.upload_dir, name, bytes).await?;
        urls.push(format!("{PUBLIC_UPLOAD_PREFIX}/{stored}"));
    }
    Ok(urls)
}

async fn find_rental(state: &AppState, rental_id: i32) -> Result<Rental, AppError> {
    state.rental.read(&rental_id).await?.ok_or_else(|| {
        warn!("Rental not found");
        AppError::not_found("Rental not found")
    })
}

/// Loads a rental and checks that `user_id` owns it
async fn find_owned_rental(state: &AppState, rental_id: i32, user_id: &str) -> Result<Rental, AppError> {
    let rental = find_rental(state, rental_id).await?;
    if rental.owner_id != user_id {
        warn!("User does not own the rental");
        return Err(AppError::forbidden("You do not own this rental"));
    }
    Ok(rental)
}

#[instrument(skip(state))]
pub async fn list_rentals(State(state): State<Arc<AppState>>) -> ApiResult<Vec<RentalDTO>> {
    let rentals = state.rental.find_all().await?;
    Ok(ApiResponse::ok(rentals.into_iter().map(RentalDTO::from).collect()))
}

#[instrument(skip(state), fields(rental_id = %rental_id))]
pub async fn get_rental(
    State(state): State<Arc<AppState>>,
    Path(rental_id): Path<i32>,
) -> ApiResult<RentalDTO> {
    let rental = find_rental(&state, rental_id).await?;
    Ok(ApiResponse::ok(RentalDTO::from(rental)))
}

#[instrument(skip(state, current_user, multipart), fields(user_id = %current_user.user_id))]
pub async fn create_rental(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    multipart: Multipart,
) -> ApiResult<RentalDTO> {
    let form = read_form(multipart, state.max_upload_bytes).await?;
    let image_urls = store_images(&state, &form.images).await?;

    let rental = state
        .rental
        .create(&CreateRentalDTO {
            fields: form.fields,
            image_urls,
            owner_id: current_user.user_id,
            created_at: crate::core::time::now(),
        })
        .await?;

    info!("Rental {} created", rental.rental_id);
    Ok(ApiResponse::ok(RentalDTO::from(rental)))
}

/// Replaces the listing fields. New images replace the stored ones; without
/// new images the stored ones are kept.
#[instrument(skip(state, current_user, multipart), fields(user_id = %current_user.user_id, rental_id = %rental_id))]
pub async fn update_rental(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(rental_id): Path<i32>,
    multipart: Multipart,
) -> ApiResult<RentalDTO> {
    find_owned_rental(&state, rental_id, &current_user.user_id).await?;

    let form = read_form(multipart, state.max_upload_bytes).await?;
    let image_urls = if form.images.is_empty() {
        None
    } else {
        Some(store_images(&state, &form.images).await?)
    };

    let rental = state
        .rental
        .update(
            &rental_id,
            &UpdateRentalDTO {
                fields: form.fields,
                image_urls,
                updated_at: Utc::now(),
            },
        )
        .await?;

    info!("Rental updated");
    Ok(ApiResponse::ok(RentalDTO::from(rental)))
}

/// Deletes an owned rental together with its chats
#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, rental_id = %rental_id))]
pub async fn delete_rental(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(rental_id): Path<i32>,
) -> ApiResult<RentalDTO> {
    let rental = find_owned_rental(&state, rental_id, &current_user.user_id).await?;
    state.rental.delete(&rental_id).await?;

    info!("Rental deleted");
    Ok(ApiResponse::ok(RentalDTO::from(rental)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn landlord_listings(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> ApiResult<Vec<RentalDTO>> {
    let rentals = state.rental.find_many_by_owner(&current_user.user_id).await?;
    debug!("Landlord has {} listings", rentals.len());
    Ok(ApiResponse::ok(rentals.into_iter().map(RentalDTO::from).collect()))
}
