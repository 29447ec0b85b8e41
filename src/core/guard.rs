//! Guard predicates for gating commands on the current state.
//!
//! Guards are pure boolean functions over a state snapshot and a command.
//! The guard middleware evaluates them before a command reaches the reducer.

use std::marker::PhantomData;

/// Pure predicate deciding whether a command may be applied.
///
/// # Example
///
/// ```rust
/// use reductor::core::Guard;
///
/// struct Session {
///     logged_in: bool,
/// }
///
/// enum Act {
///     Login,
///     Post(String),
/// }
///
/// let requires_login = Guard::new(|session: &Session, action: &Act| {
///     session.logged_in || matches!(action, Act::Login)
/// });
///
/// let guest = Session { logged_in: false };
/// assert!(requires_login.check(&guest, &Act::Login));
/// assert!(!requires_login.check(&guest, &Act::Post("hi".into())));
/// ```
pub struct Guard<S, A> {
    predicate: Box<dyn Fn(&S, &A) -> bool + Send + Sync>,
    _phantom: PhantomData<fn(&S, &A)>,
}

impl<S, A> Guard<S, A> {
    /// Create a guard from a pure predicate.
    ///
    /// The predicate must be deterministic and thread-safe.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S, &A) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    pub fn check(&self, state: &S, action: &A) -> bool {
        (self.predicate)(state, action)
    }
}
