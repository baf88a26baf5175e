//! Cached domain records.
//!
//! Every record type that lives in the local store implements [`Entity`], which
//! ties it to a storage key, an identifier, and its collection inside a
//! [`Dataset`](super::Dataset).

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;
use std::str::FromStr;

use super::Dataset;

/// The kinds of entity collections held by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Business,
    Category,
}

impl EntityKind {
    /// Local store key holding the serialized collection.
    pub fn storage_key(self) -> &'static str {
        match self {
            EntityKind::Business => "businesses",
            EntityKind::Category => "categories",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Business => "business",
            EntityKind::Category => "category",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Accepts both the singular kind and the remote table name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" | "businesses" => Ok(EntityKind::Business),
            "category" | "categories" => Ok(EntityKind::Category),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

/// A record type stored in the local cache.
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Stable unique identifier.
    fn id(&self) -> &str;

    /// Decoded records that fail this check cause the whole collection to be
    /// treated as absent.
    fn is_valid(&self) -> bool {
        !self.id().trim().is_empty()
    }

    fn collection(dataset: &Dataset) -> &Vec<Self>;

    fn collection_mut(dataset: &mut Dataset) -> &mut Vec<Self>;
}

/// A business listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    pub shop_name: String,
    pub owner_name: String,
    pub contact_number: String,
    #[serde(default)]
    pub address: Option<String>,
    /// Identifier of the owning category.
    pub category: String,
    #[serde(default)]
    pub services: Option<String>,
    #[serde(default)]
    pub payment_options: Vec<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub home_delivery: bool,
}

impl Entity for Business {
    const KIND: EntityKind = EntityKind::Business;

    fn id(&self) -> &str {
        &self.id
    }

    fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.shop_name.trim().is_empty()
    }

    fn collection(dataset: &Dataset) -> &Vec<Self> {
        &dataset.businesses
    }

    fn collection_mut(dataset: &mut Dataset) -> &mut Vec<Self> {
        &mut dataset.businesses
    }
}

/// A business category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Entity for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(dataset: &Dataset) -> &Vec<Self> {
        &dataset.categories
    }

    fn collection_mut(dataset: &mut Dataset) -> &mut Vec<Self> {
        &mut dataset.categories
    }
}
