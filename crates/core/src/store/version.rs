//! Local version record access.

use super::connection::LocalStore;
use super::kv::{self, VERSION_KEY};
use crate::Error;
use crate::model::LocalVersionRecord;

impl LocalStore {
    /// Read the version record recorded by the last sync.
    ///
    /// Returns None when absent, undecodable, or unreadable.
    pub async fn get_version(&self) -> Option<LocalVersionRecord> {
        let result = self
            .conn
            .call(|conn| -> Result<Option<String>, Error> { kv::read(conn, VERSION_KEY) })
            .await
            .map_err(Error::from);

        match result {
            Ok(raw) => raw.and_then(|raw| kv::decode(VERSION_KEY, &raw)),
            Err(e) => {
                tracing::warn!(error = %e, "local store read failed, treating version record as absent");
                None
            }
        }
    }

    pub async fn set_version(&self, record: &LocalVersionRecord) -> Result<(), Error> {
        let raw = kv::encode(record)?;
        self.conn
            .call(move |conn| -> Result<(), Error> { kv::write(conn, VERSION_KEY, &raw) })
            .await
            .map_err(Error::from)
    }
}
