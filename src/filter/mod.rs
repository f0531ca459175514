//! Value filters
//!
//! Filters transform every value a configuration returns, e.g. to decrypt
//! it, and provide a parallel transform for values that are about to be
//! logged, e.g. to mask it. Filters run in registration order; each one
//! receives the previous filter's output.

pub mod base64;
pub mod mask;

pub use self::base64::Base64Filter;
pub use mask::SecretMaskFilter;

use crate::domain::Result;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared handle to a filter
pub type SharedFilter = Arc<dyn ConfigFilter>;

/// Transforms values on their way from a source to the caller
pub trait ConfigFilter: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Transforms a value returned to the caller
    fn filter_value(&self, key: &str, value: &str) -> String;

    /// Transforms a value that is about to be logged
    ///
    /// Defaults to returning the value unchanged.
    fn filter_value_for_log(&self, _key: &str, value: &str) -> String {
        value.to_string()
    }

    /// Releases resources held by this filter
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Ordered list of filters
///
/// Readers fold over a lock-free snapshot; additions serialize on a mutex.
pub struct FilterChain {
    filters: ArcSwap<Vec<SharedFilter>>,
    write_lock: Mutex<()>,
}

impl FilterChain {
    /// Creates an empty chain, which leaves values unchanged
    pub fn new() -> Self {
        Self {
            filters: ArcSwap::from_pointee(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Appends filters to the end of the chain
    pub fn add_filters<I>(&self, to_add: I)
    where
        I: IntoIterator<Item = SharedFilter>,
    {
        let _guard = self.write_lock.lock();
        let mut all: Vec<SharedFilter> = self.filters.load().iter().cloned().collect();
        all.extend(to_add);
        self.filters.store(Arc::new(all));
    }

    /// Appends one filter
    pub fn add_filter(&self, filter: SharedFilter) {
        self.add_filters(std::iter::once(filter));
    }

    /// Runs `value` through every filter's value transform
    pub fn filter_value(&self, key: &str, value: &str) -> String {
        self.filters
            .load()
            .iter()
            .fold(value.to_string(), |acc, filter| filter.filter_value(key, &acc))
    }

    /// Runs `value` through every filter's log transform
    pub fn filter_value_for_log(&self, key: &str, value: &str) -> String {
        self.filters
            .load()
            .iter()
            .fold(value.to_string(), |acc, filter| {
                filter.filter_value_for_log(key, &acc)
            })
    }

    /// Snapshot of the filters in application order
    pub fn filters(&self) -> Arc<Vec<SharedFilter>> {
        self.filters.load_full()
    }

    /// Number of filters
    pub fn len(&self) -> usize {
        self.filters.load().len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `close` on every filter, logging and discarding failures
    pub fn close_all(&self) {
        for filter in self.filters.load().iter() {
            if let Err(e) = filter.close() {
                crate::log_release_failure!("filter", filter.name(), e);
            }
        }
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}
