//! Rental entity - A property listing owned by a landlord

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref SLUG_STRIP: Regex = Regex::new(r"[^a-z0-9 -]").unwrap();
    static ref SLUG_SPACES: Regex = Regex::new(r"\s+").unwrap();
    static ref SLUG_DASHES: Regex = Regex::new(r"-+").unwrap();
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Rental {
    pub rental_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub address: String,
    /// Floor area in square metres
    pub size: i64,
    pub bedroom: i64,
    pub bathroom: i64,
    pub price: f64,
    pub image_urls: Vec<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rental {
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// URL fragment for a listing name: "Cozy Studio @ Makati!" -> "cozy-studio-makati"
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = SLUG_STRIP.replace_all(&lowered, "");
    let hyphenated = SLUG_SPACES.replace_all(stripped.trim(), "-");
    SLUG_DASHES.replace_all(&hyphenated, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_strips_special_characters() {
        assert_eq!(slugify("Cozy Studio @ Makati!"), "cozy-studio-makati");
    }

    #[test]
    fn slugify_collapses_dashes() {
        assert_eq!(slugify("2BR -- Condo  Unit"), "2br-condo-unit");
    }
}
