//! In-memory mirrors of the remote collections
//!
//! [`RigCatalog`] refetches the whole collection after every mutation;
//! [`ProductCatalog`] merges the single record each mutation returns.

mod products;
mod rigs;

pub use products::ProductCatalog;
pub use rigs::RigCatalog;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Items plus a loading flag
#[derive(Debug)]
pub(crate) struct Mirror<T> {
    state: RwLock<MirrorState<T>>,
}

#[derive(Debug)]
pub(crate) struct MirrorState<T> {
    pub items: Vec<T>,
    pub loading: bool,
}

impl<T: Clone> Mirror<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(MirrorState {
                items: Vec::new(),
                loading: false,
            }),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, MirrorState<T>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, MirrorState<T>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.read().items.clone()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.write().loading = loading;
    }

    /// Replace everything and clear the loading flag.
    pub(crate) fn replace(&self, items: Vec<T>) {
        let mut state = self.write();
        state.items = items;
        state.loading = false;
    }
}
