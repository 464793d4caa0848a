//! RentalRepository - Property listings

use super::{Create, Delete, Read, Update};
use crate::core::time::{from_micros, to_micros};
use crate::dtos::{CreateRentalDTO, UpdateRentalDTO};
use crate::entities::Rental;
use sqlx::types::Json;
use sqlx::{Error, FromRow, SqlitePool};
use tracing::{debug, info, instrument};

const SELECT_RENTALS: &str = r#"
    SELECT rental_id, name, description, category, address, size, bedroom, bathroom,
           price, image_urls, owner_id, created_at, updated_at
    FROM rentals"#;

#[derive(FromRow)]
struct RentalRow {
    rental_id: i32,
    name: String,
    description: Option<String>,
    category: String,
    address: String,
    size: i64,
    bedroom: i64,
    bathroom: i64,
    price: f64,
    image_urls: Json<Vec<String>>,
    owner_id: String,
    created_at: i64,
    updated_at: i64,
}

impl From<RentalRow> for Rental {
    fn from(row: RentalRow) -> Self {
        Self {
            rental_id: row.rental_id,
            name: row.name,
            description: row.description,
            category: row.category,
            address: row.address,
            size: row.size,
            bedroom: row.bedroom,
            bathroom: row.bathroom,
            price: row.price,
            image_urls: row.image_urls.0,
            owner_id: row.owner_id,
            created_at: from_micros(row.created_at),
            updated_at: from_micros(row.updated_at),
        }
    }
}

// RENTAL REPOSITORY
pub struct RentalRepository {
    connection_pool: SqlitePool,
}

impl RentalRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Every listing, newest first
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Rental>, Error> {
        let rows: Vec<RentalRow> = sqlx::query_as(&format!(
            "{SELECT_RENTALS} ORDER BY created_at DESC, rental_id DESC"
        ))
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("Fetched {} rentals", rows.len());
        Ok(rows.into_iter().map(Rental::from).collect())
    }

    /// Listings owned by a landlord, newest first
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    pub async fn find_many_by_owner(&self, owner_id: &str) -> Result<Vec<Rental>, Error> {
        let rows: Vec<RentalRow> = sqlx::query_as(&format!(
            "{SELECT_RENTALS} WHERE owner_id = ? ORDER BY created_at DESC, rental_id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows.into_iter().map(Rental::from).collect())
    }
}

impl Create<Rental, CreateRentalDTO> for RentalRepository {
    #[instrument(skip(self, data), fields(owner_id = %data.owner_id))]
    async fn create(&self, data: &CreateRentalDTO) -> Result<Rental, Error> {
        let f = &data.fields;
        let created_at = to_micros(&data.created_at);
        let result = sqlx::query(
            r#"
            INSERT INTO rentals (name, description, category, address, size, bedroom, bathroom,
                                 price, image_urls, owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&f.name)
        .bind(&f.description)
        .bind(&f.category)
        .bind(&f.address)
        .bind(f.size)
        .bind(f.bedroom)
        .bind(f.bathroom)
        .bind(f.price)
        .bind(Json(&data.image_urls))
        .bind(&data.owner_id)
        .bind(created_at)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Rental created with id {}", new_id);

        Ok(Rental {
            rental_id: new_id,
            name: f.name.clone(),
            description: f.description.clone(),
            category: f.category.clone(),
            address: f.address.clone(),
            size: f.size,
            bedroom: f.bedroom,
            bathroom: f.bathroom,
            price: f.price,
            image_urls: data.image_urls.clone(),
            owner_id: data.owner_id.clone(),
            created_at: data.created_at,
            updated_at: data.created_at,
        })
    }
}

impl Read<Rental, i32> for RentalRepository {
    #[instrument(skip(self), fields(rental_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<Rental>, Error> {
        let row: Option<RentalRow> =
            sqlx::query_as(&format!("{SELECT_RENTALS} WHERE rental_id = ?"))
                .bind(id)
                .fetch_optional(&self.connection_pool)
                .await?;

        Ok(row.map(Rental::from))
    }
}

impl Update<Rental, UpdateRentalDTO, i32> for RentalRepository {
    #[instrument(skip(self, data), fields(rental_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateRentalDTO) -> Result<Rental, Error> {
        // Keep the stored images when the form brought no new ones
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;
        let image_urls = data
            .image_urls
            .clone()
            .unwrap_or_else(|| current.image_urls.clone());

        let f = &data.fields;
        sqlx::query(
            r#"
            UPDATE rentals
            SET name = ?, description = ?, category = ?, address = ?, size = ?, bedroom = ?,
                bathroom = ?, price = ?, image_urls = ?, updated_at = ?
            WHERE rental_id = ?
            "#,
        )
        .bind(&f.name)
        .bind(&f.description)
        .bind(&f.category)
        .bind(&f.address)
        .bind(f.size)
        .bind(f.bedroom)
        .bind(f.bathroom)
        .bind(f.price)
        .bind(Json(&image_urls))
        .bind(to_micros(&data.updated_at))
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for RentalRepository {
    #[instrument(skip(self), fields(rental_id = %id))]
    async fn delete(&self, id: &i32) -> Result<(), Error> {
        sqlx::query("DELETE FROM rentals WHERE rental_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}
