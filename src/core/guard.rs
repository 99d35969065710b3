//! Guard predicates for conditional transitions.
//!
//! A guard inspects the machine's domain payload and decides whether a
//! declared transition fires. A rejected guard is not an error: the event
//! still counts as handled and nothing runs.

use std::fmt;

/// Pure predicate over a machine's domain data.
///
/// # Example
///
/// ```rust
/// use statetree::core::Guard;
///
/// struct Tank {
///     level: u32,
/// }
///
/// let full = Guard::new(|tank: &Tank| tank.level >= 100);
///
/// assert!(full.check(&Tank { level: 120 }));
/// assert!(!full.check(&Tank { level: 10 }));
/// ```
pub struct Guard<D> {
    predicate: Box<dyn Fn(&D) -> bool + Send + Sync>,
}

impl<D> Guard<D> {
    /// Create a guard from a predicate.
    ///
    /// The predicate must be deterministic and thread-safe (Send + Sync)
    /// because the graph holding it may be shared between machines.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard against the current domain data.
    pub fn check(&self, data: &D) -> bool {
        (self.predicate)(data)
    }

    /// Guard that holds when `self` does not.
    pub fn negate(self) -> Self
    where
        D: 'static,
    {
        Guard::new(move |data: &D| !self.check(data))
    }
}

impl<D> fmt::Debug for Guard<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
