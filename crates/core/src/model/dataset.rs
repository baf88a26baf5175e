//! The full cached dataset and the in-place patch operations on it.

use serde::{Deserialize, Serialize};

use super::{Business, Category, Entity};

/// Categories and businesses as one unit.
///
/// Used for full snapshots fetched from the remote, for the collections read
/// back from the local store, and for the in-memory working copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Dataset {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub businesses: Vec<Business>,
}

impl Dataset {
    pub fn new(categories: Vec<Category>, businesses: Vec<Business>) -> Self {
        Self { categories, businesses }
    }

    /// True when neither collection holds a record.
    ///
    /// An empty dataset is indistinguishable from "never synced".
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.businesses.is_empty()
    }

    /// Look up a business by id.
    pub fn business(&self, id: &str) -> Option<&Business> {
        self.businesses.iter().find(|b| b.id == id)
    }

    /// Categories ordered by name, for display.
    pub fn sorted_categories(&self) -> Vec<Category> {
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    /// Drop records that would fail validation on read.
    ///
    /// Returns how many were dropped.
    pub fn retain_valid(&mut self) -> usize {
        let before = self.categories.len() + self.businesses.len();
        self.categories.retain(Category::is_valid);
        self.businesses.retain(Business::is_valid);
        before - self.categories.len() - self.businesses.len()
    }

    /// Replace the entity with the same id in place, or prepend it.
    ///
    /// Returns true when an existing entity was replaced.
    pub fn upsert<E: Entity>(&mut self, entity: E) -> bool {
        let items = E::collection_mut(self);
        match items.iter_mut().find(|e| e.id() == entity.id()) {
            Some(slot) => {
                *slot = entity;
                true
            }
            None => {
                items.insert(0, entity);
                false
            }
        }
    }

    /// Remove the entity with the given id. Returns true if one was removed.
    pub fn remove<E: Entity>(&mut self, id: &str) -> bool {
        let items = E::collection_mut(self);
        let before = items.len();
        items.retain(|e| e.id() != id);
        items.len() != before
    }
}
