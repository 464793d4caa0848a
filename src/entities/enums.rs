//! Enumerations used by the entities

use serde::{Deserialize, Serialize};

/// Role a user plays on the marketplace. Users without a stored status are tenants.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum UserStatus {
    #[default]
    Tenant,
    Landlord,
}
