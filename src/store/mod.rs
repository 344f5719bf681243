//! Persistent key-value storage
//!
//! The archiver's only shared mutable resource. Values are whole JSON
//! documents; every caller reads the full value, computes, and writes the
//! full value back. There are no transactions.

pub mod file;
pub mod keys;
pub mod memory;

use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Async get/set map
pub trait KvStore: Send + Sync {
    /// Value stored under `key`, `None` when absent
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, StoreResult<Option<Value>>>;

    /// Store `value` under `key`, replacing what was there
    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, StoreResult<()>>;
}

/// Typed helpers on top of [`KvStore`]
pub trait KvStoreExt: KvStore {
    /// Decode the value under `key`, falling back to `default` when absent
    fn get_or<'a, T>(&'a self, key: &'a str, default: T) -> BoxFuture<'a, StoreResult<T>>
    where
        T: DeserializeOwned + Send + 'a,
    {
        Box::pin(async move {
            match self.get(key).await? {
                None | Some(Value::Null) => Ok(default),
                Some(value) => serde_json::from_value(value).map_err(|e| StoreError::Decode {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
            }
        })
    }

    /// Like [`get_or`](Self::get_or), but a value of the wrong shape is
    /// logged and replaced by `default` instead of failing the read
    fn get_lenient<'a, T>(&'a self, key: &'a str, default: T) -> BoxFuture<'a, StoreResult<T>>
    where
        T: DeserializeOwned + Send + 'a,
    {
        Box::pin(async move {
            match self.get(key).await? {
                None | Some(Value::Null) => Ok(default),
                Some(value) => match serde_json::from_value(value) {
                    Ok(decoded) => Ok(decoded),
                    Err(e) => {
                        log::warn!("Ignoring undecodable value under {key}: {e}");
                        Ok(default)
                    }
                },
            }
        })
    }

    /// Encode and store `value` under `key`
    fn put<'a, T>(&'a self, key: &'a str, value: &'a T) -> BoxFuture<'a, StoreResult<()>>
    where
        T: Serialize + Sync + ?Sized,
    {
        Box::pin(async move {
            let value = serde_json::to_value(value)?;
            self.set(key, value).await
        })
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}
