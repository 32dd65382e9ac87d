//! Process-wide store handle.
//!
//! Contract: the embedding host calls [`init`] exactly once at startup (after
//! opening a [`crate::store::FileStore`] or building a
//! [`crate::store::MemoryStore`]), request handlers fetch the shared instance
//! with [`get`] and pass it into the operation functions, and [`shutdown`]
//! releases the handle on teardown. The core operations never consult this
//! module themselves; the store is always an explicit argument.

use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use super::{ContentStore, StoreError};

static STORE: Lazy<RwLock<Option<Arc<dyn ContentStore>>>> = Lazy::new(|| RwLock::new(None));

/// Install the process-wide store.
///
/// # Errors
///
/// Returns [`StoreError::AlreadyInitialized`] if a store is already installed.
pub fn init(store: Arc<dyn ContentStore>) -> Result<(), StoreError> {
    let mut slot = STORE.write().unwrap_or_else(|e| e.into_inner());
    if slot.is_some() {
        return Err(StoreError::AlreadyInitialized);
    }
    *slot = Some(store);
    Ok(())
}

/// Fetch the installed store.
///
/// # Errors
///
/// Returns [`StoreError::NotInitialized`] before [`init`] has run.
pub fn get() -> Result<Arc<dyn ContentStore>, StoreError> {
    STORE
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
        .ok_or(StoreError::NotInitialized)
}

/// Release the installed store. Safe to call when nothing is installed.
pub fn shutdown() {
    *STORE.write().unwrap_or_else(|e| e.into_inner()) = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    // Single test so the global slot is never contended across parallel tests.
    #[test]
    fn test_lifecycle() {
        shutdown();
        assert!(matches!(get(), Err(StoreError::NotInitialized)));

        init(Arc::new(MemoryStore::new())).unwrap();
        assert!(get().is_ok());
        assert!(matches!(
            init(Arc::new(MemoryStore::new())),
            Err(StoreError::AlreadyInitialized)
        ));

        shutdown();
        assert!(matches!(get(), Err(StoreError::NotInitialized)));
    }
}
