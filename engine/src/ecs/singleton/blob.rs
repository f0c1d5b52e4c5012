//! Reference-bearing singleton payloads.
//!
//! A [`BlobRef<T>`] is a handle to externally owned, reference counted storage. Cloning the
//! handle shares the storage; [`dispose`](BlobRef::dispose) frees it for every handle at
//! once, the way an asset loader releases a blob it built. A singleton that only held a
//! shared handle would therefore break as soon as the loader disposed the converter's blob,
//! which is why the blob conversion path deep-copies the winner with
//! [`deep_copy`](BlobRef::deep_copy) before it is written into the slot.
//!
//! ```rust,ignore
//! let loaded = BlobRef::create(Locales::new("en", ["en", "fr"]));
//! let slot = loaded.deep_copy();
//!
//! loaded.dispose();
//! assert!(!loaded.is_created());
//! assert!(slot.is_created());
//! ```

use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

/// A shared handle to disposable blob storage.
pub struct BlobRef<T> {
    storage: Arc<RwLock<Option<T>>>,
}

impl<T> BlobRef<T> {
    /// Create new blob storage holding `value`.
    pub fn create(value: T) -> Self {
        Self {
            storage: Arc::new(RwLock::new(Some(value))),
        }
    }

    /// A handle that was never backed by storage.
    pub fn null() -> Self {
        Self {
            storage: Arc::new(RwLock::new(None)),
        }
    }

    /// Whether the storage behind this handle is still alive.
    pub fn is_created(&self) -> bool {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Free the backing storage. Every handle sharing it observes the disposal.
    ///
    /// Returns the freed value, or `None` if it was already disposed.
    pub fn dispose(&self) -> Option<T> {
        self.storage
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Run `f` against the blob contents, if the storage is still alive.
    pub fn resolve<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(f)
    }

    /// Whether both handles point at the same storage.
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }
}

impl<T: Clone> BlobRef<T> {
    /// Copy the blob contents into newly owned storage.
    ///
    /// Copying a disposed handle yields a [`null`](Self::null) handle.
    pub fn deep_copy(&self) -> Self {
        match self.resolve(T::clone) {
            Some(value) => Self::create(value),
            None => Self::null(),
        }
    }

    /// Clone the blob contents out, if the storage is still alive.
    pub fn get(&self) -> Option<T> {
        self.resolve(T::clone)
    }
}

impl<T> Clone for BlobRef<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<T> Default for BlobRef<T> {
    fn default() -> Self {
        Self::null()
    }
}

/// Structural equality: two handles are equal when both resolve to equal contents, or both
/// are disposed. Storage identity is not compared, see [`BlobRef::shares_storage`].
impl<T: PartialEq> PartialEq for BlobRef<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.shares_storage(other) {
            return true;
        }
        let this = self.storage.read().unwrap_or_else(PoisonError::into_inner);
        let that = other.storage.read().unwrap_or_else(PoisonError::into_inner);
        *this == *that
    }
}

impl<T: fmt::Debug> fmt::Debug for BlobRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let storage = self.storage.read().unwrap_or_else(PoisonError::into_inner);
        match storage.as_ref() {
            Some(value) => f.debug_tuple("BlobRef").field(value).finish(),
            None => f.write_str("BlobRef(<disposed>)"),
        }
    }
}
