//! Thread-local execution scope
//!
//! While a configuration resolves a value or releases its resources it
//! marks its scope as the current scope of the calling thread, so sources
//! and filters that need to know on whose behalf they run can ask
//! [`current_scope`]. The previous scope is restored when the guard drops,
//! including during unwinding.

use crate::domain::ScopeId;
use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<ScopeId>> = const { RefCell::new(None) };
}

/// Returns the scope entered on this thread, if any
pub fn current_scope() -> Option<ScopeId> {
    CURRENT_SCOPE.with(|current| current.borrow().clone())
}

/// Restores the previous scope on drop
#[must_use = "the scope is left as soon as the guard is dropped"]
pub struct ScopeGuard {
    previous: Option<ScopeId>,
    // must drop on the thread that created it
    _not_send: PhantomData<*const ()>,
}

impl ScopeGuard {
    /// Makes `scope` the current scope of this thread
    pub fn enter(scope: &ScopeId) -> Self {
        let previous = CURRENT_SCOPE.with(|current| current.replace(Some(scope.clone())));
        Self {
            previous,
            _not_send: PhantomData,
        }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_SCOPE.with(|current| *current.borrow_mut() = previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(name: &str) -> ScopeId {
        ScopeId::new(name).unwrap()
    }

    #[test]
    fn test_enter_and_restore() {
        assert_eq!(current_scope(), None);
        {
            let _outer = ScopeGuard::enter(&scope("outer"));
            assert_eq!(current_scope(), Some(scope("outer")));
            {
                let _inner = ScopeGuard::enter(&scope("inner"));
                assert_eq!(current_scope(), Some(scope("inner")));
            }
            assert_eq!(current_scope(), Some(scope("outer")));
        }
        assert_eq!(current_scope(), None);
    }

    #[test]
    fn test_restored_after_panic() {
        let result = std::panic::catch_unwind(|| {
            let _guard = ScopeGuard::enter(&scope("panicking"));
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(current_scope(), None);
    }

    #[test]
    fn test_scope_is_per_thread() {
        let _guard = ScopeGuard::enter(&scope("main"));
        let other = std::thread::spawn(current_scope).join().unwrap();
        assert_eq!(other, None);
    }
}
