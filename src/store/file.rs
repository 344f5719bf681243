//! JSON file store
//!
//! The whole map lives in one JSON object on disk. Reads are served from the
//! in-memory copy loaded at open; every write replaces the file through a
//! sibling temp file and a rename, so a crash mid-write leaves the previous
//! version intact. The in-memory copy only changes once the file write
//! succeeded.

use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::KvStore;
use crate::error::StoreResult;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty one if the file is missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let values = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read(&path).await?;
            if raw.iter().all(u8::is_ascii_whitespace) {
                Map::new()
            } else {
                serde_json::from_slice::<Map<String, Value>>(&raw)?
            }
        } else {
            Map::new()
        };

        log::debug!(
            "Opened store {} with {} keys",
            path.display(),
            values.len()
        );

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, values: &Map<String, Value>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl KvStore for JsonFileStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, StoreResult<Option<Value>>> {
        Box::pin(async move { Ok(self.values.lock().await.get(key).cloned()) })
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            // Held across the write so two writers cannot interleave renames.
            let mut values = self.values.lock().await;
            let mut next = values.clone();
            next.insert(key.to_string(), value);
            self.persist(&next).await?;
            *values = next;
            Ok(())
        })
    }
}
