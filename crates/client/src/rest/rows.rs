//! Database row shapes returned by the REST endpoint and their normalization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use bizsync_core::{Business, Category, VersionDescriptor};

/// A column that may come back as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    pub fn into_string(self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

/// Raw row from the `businesses` table.
#[derive(Debug, Deserialize)]
pub struct BusinessRow {
    pub id: Scalar,
    pub shop_name: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub category: Scalar,
    #[serde(default)]
    pub services: Option<String>,
    #[serde(default)]
    pub payment_options: Option<Vec<String>>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub home_delivery: Option<bool>,
}

/// Raw row from the `categories` table.
#[derive(Debug, Deserialize)]
pub struct CategoryRow {
    pub id: Scalar,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Raw row from the `data_version` table.
#[derive(Debug, Deserialize)]
pub struct VersionRow {
    pub version: Scalar,
    pub updated_at: DateTime<Utc>,
}

/// Only the primary key, as carried by delete payloads.
#[derive(Debug, Deserialize)]
pub struct KeyRow {
    pub id: Scalar,
}

impl From<BusinessRow> for Business {
    fn from(row: BusinessRow) -> Self {
        Business {
            id: row.id.into_string(),
            shop_name: row.shop_name,
            owner_name: row.owner_name.unwrap_or_default(),
            contact_number: row.contact_number.unwrap_or_default(),
            address: row.address,
            category: row.category.into_string(),
            services: row.services,
            payment_options: row.payment_options.unwrap_or_default(),
            opening_hours: row.opening_hours,
            home_delivery: row.home_delivery.unwrap_or(false),
        }
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category { id: row.id.into_string(), name: row.name, icon: row.icon }
    }
}

impl From<VersionRow> for VersionDescriptor {
    fn from(row: VersionRow) -> Self {
        VersionDescriptor::new(row.version.into_string(), row.updated_at)
    }
}
