//! Product collection storage.
//!
//! The whole collection is read and written as one unit. Handlers are
//! generic over [`ProductStore`], so the on-disk [`JsonFileStore`] and the
//! in-memory [`MemoryStore`] are interchangeable.
//!
//! There is no locking between `load` and `save`: two concurrent writers
//! that load the same snapshot race, and the later save wins.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

use crate::product::Product;

/// Failure of a storage round-trip.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reading {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("decoding {}: {source}", .path.display())]
    Decode { path: PathBuf, source: serde_json::Error },

    #[error("encoding collection: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("writing {}: {source}", .path.display())]
    Write { path: PathBuf, source: std::io::Error },
}

/// Whole-collection load/save.
pub trait ProductStore: Send + Sync + 'static {
    /// Reads every stored product, in stored order.
    fn load(&self) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    /// Replaces the stored collection with `products`.
    fn save(&self, products: &[Product]) -> impl Future<Output = Result<(), StoreError>> + Send;
}

// ── JSON file ─────────────────────────────────────────────────────────────────

/// A JSON array in a single file, pretty-printed with two-space indentation.
///
/// `save` truncates and rewrites the file in place. An I/O failure half way
/// through can leave it truncated.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProductStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Product>, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| StoreError::Read { path: self.path.clone(), source })?;
        let products: Vec<Product> = serde_json::from_slice(&bytes)
            .map_err(|source| StoreError::Decode { path: self.path.clone(), source })?;
        debug!(path = %self.path.display(), count = products.len(), "loaded products");
        Ok(products)
    }

    async fn save(&self, products: &[Product]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(products).map_err(StoreError::Encode)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|source| StoreError::Write { path: self.path.clone(), source })?;
        debug!(path = %self.path.display(), count = products.len(), "saved products");
        Ok(())
    }
}

// ── In memory ─────────────────────────────────────────────────────────────────

/// A collection held in process memory. Never fails.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: Mutex<Vec<Product>>,
}

impl MemoryStore {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products: Mutex::new(products) }
    }

    /// A copy of the current contents.
    pub fn snapshot(&self) -> Vec<Product> {
        self.lock().clone()
    }

    // A poisoned lock still holds a whole collection; every write replaces it
    // in one assignment.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Product>> {
        self.products.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProductStore for MemoryStore {
    async fn load(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.snapshot())
    }

    async fn save(&self, products: &[Product]) -> Result<(), StoreError> {
        *self.lock() = products.to_vec();
        Ok(())
    }
}
