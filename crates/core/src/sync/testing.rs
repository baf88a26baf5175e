//! Scripted remote source and fixtures for sync tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;

use super::source::RemoteSource;
use crate::Error;
use crate::model::{Business, Category, Dataset, VersionDescriptor};

/// A remote whose answers are set by the test. `None` means "fail".
pub(crate) struct ScriptedSource {
    version: Mutex<Option<String>>,
    dataset: Mutex<Option<Dataset>>,
    version_calls: AtomicUsize,
    dataset_calls: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn new(version: Option<&str>, dataset: Option<Dataset>) -> Self {
        Self {
            version: Mutex::new(version.map(str::to_string)),
            dataset: Mutex::new(dataset),
            version_calls: AtomicUsize::new(0),
            dataset_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn set_version(&self, version: Option<&str>) {
        *self.version.lock().unwrap() = version.map(str::to_string);
    }

    pub(crate) fn version_calls(&self) -> usize {
        self.version_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn dataset_calls(&self) -> usize {
        self.dataset_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RemoteSource for ScriptedSource {
    async fn fetch_remote_version(&self) -> Result<VersionDescriptor, Error> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        let token = self.version.lock().unwrap().clone();
        token
            .map(|t| VersionDescriptor::new(t, Utc::now()))
            .ok_or_else(|| Error::Remote("version endpoint unreachable".into()))
    }

    async fn fetch_full_dataset(&self) -> Result<Dataset, Error> {
        self.dataset_calls.fetch_add(1, Ordering::SeqCst);
        let dataset = self.dataset.lock().unwrap().clone();
        dataset.ok_or_else(|| Error::Remote("dataset fetch failed".into()))
    }
}

pub(crate) fn business(id: &str, name: &str) -> Business {
    Business {
        id: id.to_string(),
        shop_name: name.to_string(),
        owner_name: "Owner".to_string(),
        contact_number: "9800000000".to_string(),
        address: Some("Main Road".to_string()),
        category: "c1".to_string(),
        services: None,
        payment_options: vec!["cash".to_string(), "upi".to_string()],
        opening_hours: Some("9-9".to_string()),
        home_delivery: true,
    }
}

pub(crate) fn category(id: &str, name: &str) -> Category {
    Category { id: id.to_string(), name: name.to_string(), icon: None }
}

pub(crate) fn dataset(businesses: &[(&str, &str)]) -> Dataset {
    Dataset::new(
        vec![category("c1", "Food")],
        businesses.iter().map(|(id, name)| business(id, name)).collect(),
    )
}
