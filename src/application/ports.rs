//! Ports (interfaces) for the application layer.
//!
//! Dispatch and the deprecation log reach the outside world through these
//! traits. Infrastructure provides the adapters (`ShardedStorage`,
//! `TracingSink`) and test doubles (`RecordingSink`).

use std::fmt::Debug;
use std::hash::Hash;

/// Port for the output of `log`-handled deprecations.
///
/// Receives the fully formatted line, e.g. `DEPRECATION: Foo is deprecated`.
pub trait LogSink: Send + Sync + Debug {
    /// Emit a warning line.
    fn warn(&self, line: &str);
}

/// Port for concurrent key-value storage.
///
/// The deprecation log keeps one value per identifier; the storage decides
/// how entries are sharded and locked.
pub trait Storage<K, V>: Send + Sync + Debug
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Run `accessor` on the entry for `key`, inserting `factory()` first if
    /// the key is absent.
    ///
    /// Insert-then-access is atomic per key: two threads recording the same
    /// identifier observe exactly one insertion.
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool;

    /// Drop every entry.
    fn clear(&self);

    /// Iterate over all entries in no particular order.
    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V);
}
