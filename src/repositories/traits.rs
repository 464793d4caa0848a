//! Common repository traits
//!
//! This module defines generic interfaces for database operations.

/// Trait for creating new entities in the database
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the database)
/// * `CreateDTO` - DTO for creation (without ID, will be automatically generated)
pub trait Create<Entity, CreateDTO> {
    /// Creates a new entity in the database
    ///
    /// # Returns
    /// * `Ok(Entity)` - Created entity with ID assigned by the database
    /// * `Err(sqlx::Error)` - Error during insertion
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Trait for reading a single entity by primary key
///
/// # Type Parameters
/// * `Entity` - Type of the entity to read
/// * `Id` - Type of the primary key (e.g. `i32`, `String`)
pub trait Read<Entity, Id: ?Sized> {
    /// Reads an entity from the database by its primary key
    ///
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    /// * `Err(sqlx::Error)` - Error during reading
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Trait for updating existing entities
///
/// # Type Parameters
/// * `Entity` - Type of the updated entity
/// * `UpdateDTO` - DTO for updating
/// * `Id` - Type of the primary key
pub trait Update<Entity, UpdateDTO, Id> {
    /// Updates an existing entity in the database
    ///
    /// # Returns
    /// * `Ok(Entity)` - Updated entity
    /// * `Err(sqlx::Error)` - Error during update (`RowNotFound` if the entity does not exist)
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Trait for deleting entities
///
/// # Type Parameters
/// * `Id` - Type of the primary key
pub trait Delete<Id> {
    /// Deletes an entity from the database
    ///
    /// # Returns
    /// * `Ok(())` - Deletion successful
    /// * `Err(sqlx::Error)` - Error during deletion
    async fn delete(&self, id: &Id) -> Result<(), sqlx::Error>;
}
