//! Ordered source registry
//!
//! Readers take a lock-free snapshot of the current list; writers serialize
//! on a mutex, build a new sorted list and swap it in.

use super::SharedSource;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Property sources sorted by descending ordinal
///
/// Sources with equal ordinals keep the order in which they were added.
pub struct SourceRegistry {
    sources: ArcSwap<Vec<SharedSource>>,
    write_lock: Mutex<()>,
}

impl SourceRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            sources: ArcSwap::from_pointee(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Merges `to_add` into the registry and re-sorts by descending ordinal
    pub fn add_sources<I>(&self, to_add: I)
    where
        I: IntoIterator<Item = SharedSource>,
    {
        let _guard = self.write_lock.lock();

        let mut all: Vec<SharedSource> = self.sources.load().iter().cloned().collect();
        let before = all.len();
        all.extend(to_add);

        // stable: equal ordinals keep registration order
        all.sort_by(|a, b| b.ordinal().cmp(&a.ordinal()));

        tracing::debug!(
            added = all.len() - before,
            total = all.len(),
            "Property sources registered"
        );

        self.sources.store(Arc::new(all));
    }

    /// Returns a snapshot of the sources in lookup order
    pub fn sources(&self) -> Arc<Vec<SharedSource>> {
        self.sources.load_full()
    }

    /// Number of registered sources
    pub fn len(&self) -> usize {
        self.sources.load().len()
    }

    /// Whether no source is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `close` on every source, logging and discarding failures
    pub fn close_all(&self) {
        for source in self.sources.load().iter() {
            if let Err(e) = source.close() {
                crate::log_release_failure!("property source", source.name(), e);
            }
        }
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
