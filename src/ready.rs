//! One-shot completion signals used for the startup rendezvous of a selector.

use std::sync::Arc;

use once_cell::sync::OnceCell;

/// Resolves at most once with a value; every clone observes the same resolution.
///
/// There is no timeout and no cancellation: a signal that is never resolved
/// stays pending for the life of its holders.
#[derive(Debug)]
pub struct ReadySignal<T> {
    cell: Arc<OnceCell<T>>,
}

impl<T> Clone for ReadySignal<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> Default for ReadySignal<T> {
    fn default() -> Self {
        Self::pending()
    }
}

impl<T> ReadySignal<T> {
    pub fn pending() -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub fn resolved(value: T) -> Self {
        Self {
            cell: Arc::new(OnceCell::with_value(value)),
        }
    }

    /// Resolve the signal. Returns `false` if it was already resolved; the first value wins.
    pub fn resolve(&self, value: T) -> bool {
        self.cell.set(value).is_ok()
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_resolution_wins_across_clones() {
        let a: ReadySignal<u32> = ReadySignal::pending();
        let b = a.clone();
        assert!(!b.is_resolved());
        assert!(a.resolve(1));
        assert!(!b.resolve(2));
        assert_eq!(b.get(), Some(&1));
    }
}
