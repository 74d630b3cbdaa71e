//! Process-wide memoization for expensive resources
//!
//! The record set and the model are read at most once per process. A loader
//! that produced an "absent" value (empty records, no model) is still cached:
//! a missing file is not retried until the process restarts.

use std::sync::OnceLock;

/// A value computed on first access and shared for the rest of the process
pub struct ResourceCache<T> {
    cell: OnceLock<T>,
}

impl<T> ResourceCache<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the cached value, running `load` only if nothing is cached yet.
    ///
    /// Concurrent first callers block until one of them finishes loading.
    pub fn get_or_load<F>(&self, load: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(load)
    }
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
