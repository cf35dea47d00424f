//! Durable client storage for wizard form data
//!
//! A small key-value abstraction: the wizard writes one JSON snapshot under a
//! single key and reads it back when a sub-step is loaded.

use async_trait::async_trait;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage key holding the serialized form data store
pub const FORM_DATA_KEY: &str = "building-form-data";

/// Errors from a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read '{0}': {1}")]
    Read(String, String),

    #[error("failed to write '{0}': {1}")]
    Write(String, String),

    #[error("failed to remove '{0}': {1}")]
    Remove(String, String),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Persistent key-value store surviving restarts
#[async_trait]
pub trait FormStorage: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, overwriting any prior value
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
