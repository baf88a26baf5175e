//! Entity collection operations.
//!
//! Reads never fail: a missing, undecodable, or unreadable collection comes
//! back empty, which callers treat as "needs full sync". Writes report
//! storage errors and are each applied as one transaction. Writes also refuse
//! records that would fail validation on the next read.

use super::connection::LocalStore;
use super::kv::{self, VERSION_KEY};
use crate::Error;
use crate::model::{Business, Category, Dataset, Entity, LocalVersionRecord};

fn ensure_valid<E: Entity>(items: &[E]) -> Result<(), Error> {
    match items.iter().find(|e| !e.is_valid()) {
        Some(e) => Err(Error::InvalidInput(format!("{} {:?} is not a valid record", E::KIND, e.id()))),
        None => Ok(()),
    }
}

impl LocalStore {
    /// Read every entity of one collection.
    pub async fn get<E: Entity>(&self) -> Vec<E> {
        let key = E::KIND.storage_key();
        let result = self
            .conn
            .call(move |conn| -> Result<Option<String>, Error> { kv::read(conn, key) })
            .await
            .map_err(Error::from);

        match result {
            Ok(Some(raw)) => kv::decode_collection(&raw).unwrap_or_default(),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "local store read failed, treating collection as empty");
                Vec::new()
            }
        }
    }

    /// Read both collections in a single call.
    pub async fn load_dataset(&self) -> Dataset {
        let result = self
            .conn
            .call(|conn| -> Result<(Option<String>, Option<String>), Error> {
                let categories = kv::read(conn, Category::KIND.storage_key())?;
                let businesses = kv::read(conn, Business::KIND.storage_key())?;
                Ok((categories, businesses))
            })
            .await
            .map_err(Error::from);

        match result {
            Ok((categories, businesses)) => Dataset {
                categories: categories
                    .and_then(|raw| kv::decode_collection(&raw))
                    .unwrap_or_default(),
                businesses: businesses
                    .and_then(|raw| kv::decode_collection(&raw))
                    .unwrap_or_default(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "local store read failed, treating dataset as empty");
                Dataset::default()
            }
        }
    }

    /// Overwrite a whole collection.
    pub async fn set_all<E: Entity>(&self, items: &[E]) -> Result<(), Error> {
        ensure_valid(items)?;
        let key = E::KIND.storage_key();
        let raw = kv::encode(items)?;
        self.conn
            .call(move |conn| -> Result<(), Error> { kv::write(conn, key, &raw) })
            .await
            .map_err(Error::from)
    }

    /// Replace the entity with a matching id, or append it.
    pub async fn upsert_one<E: Entity>(&self, entity: &E) -> Result<(), Error> {
        ensure_valid(std::slice::from_ref(entity))?;
        let key = E::KIND.storage_key();
        let entity = entity.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                let mut items = kv::load_for_patch::<E>(&tx)?;
                match items.iter_mut().find(|e| e.id() == entity.id()) {
                    Some(slot) => *slot = entity,
                    None => items.push(entity),
                }
                kv::write(&tx, key, &kv::encode(&items)?)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Remove the entity with the given id. A missing id is a no-op.
    pub async fn delete_one<E: Entity>(&self, id: &str) -> Result<(), Error> {
        let key = E::KIND.storage_key();
        let id = id.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                if kv::read(&tx, key)?.is_none() {
                    return Ok(());
                }
                let mut items = kv::load_for_patch::<E>(&tx)?;
                let before = items.len();
                items.retain(|e| e.id() != id);
                if items.len() != before {
                    kv::write(&tx, key, &kv::encode(&items)?)?;
                } else if before == 0 {
                    kv::remove(&tx, key)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Write both collections and the version record in one transaction.
    ///
    /// Either everything lands or nothing does; a failure leaves the previous
    /// collections and version record untouched.
    pub async fn commit_full_sync(&self, dataset: &Dataset, record: &LocalVersionRecord) -> Result<(), Error> {
        ensure_valid(&dataset.categories)?;
        ensure_valid(&dataset.businesses)?;
        let categories = kv::encode(&dataset.categories)?;
        let businesses = kv::encode(&dataset.businesses)?;
        let version = kv::encode(record)?;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                kv::write(&tx, Category::KIND.storage_key(), &categories)?;
                kv::write(&tx, Business::KIND.storage_key(), &businesses)?;
                kv::write(&tx, VERSION_KEY, &version)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Drop every cached collection and the version record.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM kv_entries", [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
