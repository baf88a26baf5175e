//! In-memory working copy of the cached dataset.

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::model::{Business, Category, Dataset};

/// The view the application renders from.
///
/// Writers hold the lock across the paired local-store write and the in-memory
/// mutation, so readers only ever see the two in agreement.
#[derive(Debug, Clone, Default)]
pub struct WorkingCopy {
    inner: Arc<RwLock<Dataset>>,
}

impl WorkingCopy {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Dataset {
        self.inner.read().await.clone()
    }

    pub async fn businesses(&self) -> Vec<Business> {
        self.inner.read().await.businesses.clone()
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.inner.read().await.categories.clone()
    }

    pub async fn business(&self, id: &str) -> Option<Business> {
        self.inner.read().await.business(id).cloned()
    }

    pub async fn replace(&self, dataset: Dataset) {
        *self.inner.write().await = dataset;
    }

    pub(crate) async fn lock(&self) -> RwLockWriteGuard<'_, Dataset> {
        self.inner.write().await
    }
}
