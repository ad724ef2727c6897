//! Process-wide table cache.
//! The loader takes no arguments, so a single slot holds the loaded table.

use crate::data::{DataLoader, LoaderError};
use polars::prelude::DataFrame;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Load-once cache around a [`DataLoader`].
///
/// Every caller observes the same `Arc` until [`TableCache::invalidate`] is
/// called. Failed loads leave the slot empty so the next `get` retries.
pub struct TableCache {
    loader: DataLoader,
    slot: Mutex<Option<Arc<DataFrame>>>,
}

impl TableCache {
    pub fn new(loader: DataLoader) -> Self {
        Self {
            loader,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached table, loading it on first use.
    ///
    /// The slot stays locked during the load, so concurrent callers wait for
    /// one fetch instead of issuing their own.
    pub fn get(&self) -> Result<Arc<DataFrame>, LoaderError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = slot.as_ref() {
            debug!("Trip table served from cache");
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(self.loader.load()?);
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Drop the cached table; the next `get` fetches again.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            info!("Trip table cache cleared");
        }
    }

    pub fn is_cached(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn source_description(&self) -> String {
        self.loader.source_description()
    }
}
